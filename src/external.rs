use crate::command::ProcessExec;
use std::io;
use std::process::{Command, ExitStatus};

/// Runs command lines through the host shell (`sh -c` on Unix, `cmd /C` on
/// Windows) with inherited standard streams.
#[derive(Debug, Clone)]
pub struct SystemShell {
    program: String,
    flag: String,
}

impl SystemShell {
    /// Shell invoked as `program flag <command line>`.
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }
}

impl Default for SystemShell {
    #[cfg(unix)]
    fn default() -> Self {
        Self::new("sh", "-c")
    }

    #[cfg(not(unix))]
    fn default() -> Self {
        Self::new("cmd", "/C")
    }
}

impl ProcessExec for SystemShell {
    fn run(&mut self, command_line: &str) -> io::Result<()> {
        tracing::debug!(shell = %self.program, command_line, "spawning");
        let status = Command::new(&self.program)
            .arg(&self.flag)
            .arg(command_line)
            .status()?;
        tracing::debug!(code = describe(status), "child finished");
        Ok(())
    }
}

#[cfg(unix)]
fn describe(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => -1,
    }
}

#[cfg(not(unix))]
fn describe(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
