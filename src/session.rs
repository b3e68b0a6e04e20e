use crate::command::{ControlToken, ExitCode};
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable state of one interpreter session.
///
/// The session contains:
/// - `cwd`: the working directory as last reported by the file system.
/// - `home_dir` / `user`: resolved once from the process environment.
/// - `last_return_code`: the code the process exits with on `exit` or `return`.
/// - `last_token`: the control token produced by the most recent dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Directory `cd` goes to without an argument. Taken from `HOME`.
    pub home_dir: PathBuf,
    /// User name shown in the prompt. Taken from `USER` (or `USERNAME`).
    pub user: String,
    /// Exit code used when the loop terminates.
    pub last_return_code: ExitCode,
    /// Token of the previous dispatch, `None` at startup and after `restart`.
    pub last_token: Option<ControlToken>,
}

impl Session {
    /// Capture the current process state into a new session.
    pub fn new() -> Self {
        let cwd = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let home_dir = stdenv::var_os("HOME")
            .or_else(|| stdenv::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.clone());
        let user = stdenv::var("USER")
            .or_else(|_| stdenv::var("USERNAME"))
            .unwrap_or_else(|_| "user".to_string());
        Self::with_home(cwd, home_dir, user)
    }

    /// Session with explicit directories, independent of the process environment.
    pub fn with_home(cwd: PathBuf, home_dir: PathBuf, user: impl Into<String>) -> Self {
        Self {
            cwd,
            home_dir,
            user: user.into(),
            last_return_code: 0,
            last_token: None,
        }
    }

    /// Forget the accumulated return code and last token.
    pub fn reset(&mut self) {
        self.last_return_code = 0;
        self.last_token = None;
    }

    pub fn prompt(&self) -> String {
        format!("[{}@yash  {}]$ ", self.user, self.cwd.display())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
