//! yash: a small line-oriented command interpreter.
//!
//! Each input line is split on whitespace and dispatched to a built-in command
//! (navigation, file and directory management, printing, sleeping, a
//! user-visible error log) or, when no built-in matches, handed to the host
//! shell. Built-in failures never abort the session; they are appended to an
//! [`ErrorLog`] that the `trace` command inspects newest first.
//!
//! The main entry point is [`Interpreter`]. Built-ins reach the outside world
//! only through the [`FileSystem`], [`Output`] and [`ProcessExec`] traits, so an
//! interpreter can run entirely in memory with [`MemOutput`] and [`MemExec`].

mod builtin;
mod builtin_fs;
pub mod cli;
pub mod command;
mod console;
pub mod error;
mod error_log;
mod external;
mod interpreter;
mod io_adapters;
mod lexer;
mod local_fs;
mod registry;
mod session;

pub use builtin::version_lines;
pub use builtin_fs::{PathCommand, PathOp};
pub use command::{
    Builtin, Context, ControlToken, ExitCode, FileSystem, LineSource, Output, ProcessExec,
};
pub use console::{ConsoleOutput, Terminal, format_error};
pub use error::{BuiltinError, ErrorRecord, RecordKind};
pub use error_log::ErrorLog;
pub use external::SystemShell;
pub use interpreter::Interpreter;
pub use io_adapters::{MemExec, MemOutput, ScriptedInput, Transcript};
pub use lexer::tokenize;
pub use local_fs::LocalFs;
pub use registry::CommandRegistry;
pub use session::Session;
