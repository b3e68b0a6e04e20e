//! Process entry: decides from the command line what the process does.

use crate::builtin::version_lines;
use crate::command::{ExitCode, LineSource};
use crate::error::BuiltinError;
use crate::interpreter::Interpreter;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::path::Path;

#[derive(FromArgs, Debug, PartialEq)]
/// A small line-oriented command interpreter. Without flags, starts the
/// interactive loop in the home directory.
#[argh(note = "Use `-c, --command <tokens...>` to run a single command line in the current directory and exit.")]
struct Flags {
    #[argh(switch, short = 'v')]
    /// print version and build information, also `-i` or `--info`
    version: bool,

    #[argh(option, short = 'd')]
    /// start the interactive loop in this directory, also `--wdir` or `-ld`
    directory: Option<String>,
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// No arguments: the interactive loop.
    Interactive,
    Version,
    /// Dispatch these tokens once.
    Command(Vec<String>),
    /// Change directory, then run the interactive loop.
    Directory(String),
    /// `--help` output.
    Help(String),
    /// Parser message for an invocation that was not understood.
    Invalid(String),
}

/// Interpret the process arguments, program name excluded.
///
/// The first argument decides. `-c`/`--command` takes every following argument
/// as the command line, `-d` and its aliases take the next one as the
/// directory, and anything after that is ignored. Flags are matched exactly.
pub fn parse_args(args: &[String]) -> Invocation {
    let Some(first) = args.first() else {
        return Invocation::Interactive;
    };
    if matches!(first.as_str(), "-c" | "--command") {
        return Invocation::Command(args[1..].to_vec());
    }

    // only the first flag and its own value are parsed
    let (flag, owned) = match first.as_str() {
        "-v" | "--version" | "-i" | "--info" => ("--version", 1),
        "-d" | "--directory" | "--wdir" | "-ld" => ("--directory", 2),
        other => (other, 1),
    };
    let mut argv: Vec<&str> = args[..owned.min(args.len())]
        .iter()
        .map(String::as_str)
        .collect();
    argv[0] = flag;

    match Flags::from_args(&["yash"], &argv) {
        Ok(Flags { version: true, .. }) => Invocation::Version,
        Ok(Flags {
            directory: Some(dir),
            ..
        }) => Invocation::Directory(dir),
        Ok(_) => Invocation::Interactive,
        Err(EarlyExit { output, status }) => match status {
            Ok(()) => Invocation::Help(output),
            Err(()) => Invocation::Invalid(output),
        },
    }
}

/// Carry out `invocation` and return the process exit code.
///
/// `open_input` is only called when an interactive loop is started.
pub fn launch<F>(invocation: Invocation, sh: &mut Interpreter, open_input: F) -> Result<ExitCode>
where
    F: FnOnce() -> Result<Box<dyn LineSource>>,
{
    tracing::debug!(?invocation, "launching");
    match invocation {
        Invocation::Interactive => {
            if let Err(err) = sh.enter_home() {
                tracing::warn!(error = %err, "could not enter home directory");
            }
            let mut input = open_input()?;
            sh.repl(input.as_mut())
        }
        Invocation::Directory(dir) => {
            if let Err(err) = sh.change_dir(Path::new(&dir)) {
                tracing::debug!(error = %err, dir = %dir, "startup directory rejected");
                sh.report(BuiltinError::InvalidData, "invalid directory", Some(&dir));
                return Ok(sh.return_code());
            }
            let mut input = open_input()?;
            sh.repl(input.as_mut())
        }
        Invocation::Command(tokens) => {
            if tokens.is_empty() {
                sh.report(BuiltinError::InsufficientArguments, "insufficient arguments", None);
            } else {
                let argv: Vec<&str> = tokens.iter().map(String::as_str).collect();
                sh.dispatch(&argv);
            }
            let code = sh.return_code();
            sh.shutdown();
            Ok(code)
        }
        Invocation::Version => {
            for line in version_lines() {
                sh.write_line(&line)?;
            }
            Ok(0)
        }
        Invocation::Help(text) => {
            for line in text.lines() {
                sh.write_line(line)?;
            }
            Ok(0)
        }
        Invocation::Invalid(text) => {
            sh.report(BuiltinError::InvalidArguments, "invalid arguments", None);
            for line in text.lines() {
                sh.write_line(line)?;
            }
            Ok(sh.return_code())
        }
    }
}
