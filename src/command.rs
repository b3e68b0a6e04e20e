use crate::error::BuiltinError;
use crate::error_log::ErrorLog;
use crate::registry::CommandRegistry;
use crate::session::Session;
use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Signal returned by every dispatch, telling the driver how to continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlToken {
    /// The command ran (successfully or not); keep looping.
    Success,
    /// The line had no tokens.
    Blank,
    /// Leave the loop with the session return code.
    Exit,
    /// Leave the loop after `return` stored an explicit code.
    Return,
    /// Reset the session return code and last token, then keep looping.
    Restart,
}

impl ControlToken {
    /// Whether this token ends the interactive loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exit | Self::Return)
    }
}

/// File system operations used by built-ins.
///
/// Relative paths are resolved against the process working directory.
pub trait FileSystem {
    fn create_file(&mut self, path: &Path) -> io::Result<()>;
    fn remove_file(&mut self, path: &Path) -> io::Result<()>;
    fn create_dir(&mut self, path: &Path) -> io::Result<()>;
    fn remove_dir(&mut self, path: &Path) -> io::Result<()>;
    /// Names of the entries of `path`, sorted.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;
    fn current_dir(&self) -> io::Result<PathBuf>;
    fn set_current_dir(&mut self, path: &Path) -> io::Result<()>;
}

/// Console sink for command output.
pub trait Output {
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    /// Writes a `label: value` line.
    fn write_labeled(&mut self, label: &str, value: &str) -> io::Result<()> {
        self.write_line(&format!("{label}: {value}"))
    }

    /// Writes a human-readable error line, optionally naming the offending item.
    fn write_error(&mut self, message: &str, item: Option<&str>) -> io::Result<()>;

    /// Clears the screen.
    fn clear(&mut self) -> io::Result<()>;
}

/// Runs a command line through the host shell, blocking until it finishes.
///
/// The child's exit status is not reported back.
pub trait ProcessExec {
    fn run(&mut self, command_line: &str) -> io::Result<()>;
}

/// Source of input lines for the interactive loop.
pub trait LineSource {
    /// Shows `prompt` and reads one line. `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Everything a built-in may touch while it runs.
pub struct Context<'a> {
    pub session: &'a mut Session,
    pub errors: &'a mut ErrorLog,
    pub fs: &'a mut dyn FileSystem,
    pub out: &'a mut dyn Output,
    pub exec: &'a mut dyn ProcessExec,
    pub registry: &'a CommandRegistry,
}

impl Context<'_> {
    /// Records `kind` in the error log and reports `message` on the console.
    pub fn fail(&mut self, kind: BuiltinError, message: &str, item: Option<&str>) -> io::Result<()> {
        let position = self.errors.push(kind.into());
        tracing::warn!(error = kind.name(), position, item, "{message}");
        self.out.write_error(message, item)
    }
}

/// A command implemented natively by the interpreter.
pub trait Builtin {
    /// Every name the command answers to; the first one is canonical.
    fn names(&self) -> &'static [&'static str];

    /// Argument synopsis shown by `help`, e.g. `<path>` or `[seconds=1]`.
    fn usage(&self) -> &'static str;

    /// One-line description shown by `help`.
    fn description(&self) -> &'static str;

    /// Runs the command. `argv[0]` is the name as typed.
    ///
    /// Argument and file system failures are reported through
    /// [`Context::fail`] and still return `Ok`; `Err` is reserved for console
    /// I/O failures.
    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken>;
}
