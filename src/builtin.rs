use crate::command::{Builtin, Context, ControlToken, ExitCode};
use crate::error::{BuiltinError, ErrorRecord};
use anyhow::Result;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Lines printed by `version` and by the `--version` flag.
pub fn version_lines() -> [String; 2] {
    let build = if cfg!(debug_assertions) { "debug" } else { "release" };
    [
        format!(
            "yash v{} ({build}) for {}.",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        ),
        format!("developed by {}.", env!("CARGO_PKG_AUTHORS")),
    ]
}

/// Reports a missing argument. Shared by every command with a required operand.
pub(crate) fn insufficient(ctx: &mut Context<'_>) -> Result<ControlToken> {
    ctx.fail(BuiltinError::InsufficientArguments, "insufficient arguments", None)?;
    Ok(ControlToken::Success)
}

fn invalid_integer(ctx: &mut Context<'_>, text: &str) -> Result<ControlToken> {
    ctx.fail(BuiltinError::InvalidData, "invalid integer", Some(text))?;
    Ok(ControlToken::Success)
}

/// Change the working directory; without a path, go home.
pub struct Cd;

impl Builtin for Cd {
    fn names(&self) -> &'static [&'static str] {
        &["cd", "chdir", "cwd"]
    }

    fn usage(&self) -> &'static str {
        "[path=HOME]"
    }

    fn description(&self) -> &'static str {
        "Changes the current working directory to the provided path"
    }

    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        match argv.get(1) {
            Some(&path) => {
                if let Err(err) = ctx.fs.set_current_dir(Path::new(path)) {
                    tracing::debug!(%err, path, "cd failed");
                    ctx.fail(BuiltinError::InvalidArguments, "invalid path", Some(path))?;
                    return Ok(ControlToken::Success);
                }
            }
            None => {
                let home = ctx.session.home_dir.clone();
                if let Err(err) = ctx.fs.set_current_dir(&home) {
                    tracing::debug!(%err, home = %home.display(), "cd home failed");
                    ctx.fail(BuiltinError::Unknown, "failed to navigate to home directory", None)?;
                    return Ok(ControlToken::Success);
                }
            }
        }
        if let Ok(cwd) = ctx.fs.current_dir() {
            ctx.session.cwd = cwd;
        }
        Ok(ControlToken::Success)
    }
}

/// Print the current working directory.
pub struct Gwd;

impl Builtin for Gwd {
    fn names(&self) -> &'static [&'static str] {
        &["gwd"]
    }

    fn usage(&self) -> &'static str {
        ""
    }

    fn description(&self) -> &'static str {
        "Get the current working directory"
    }

    fn execute(&self, _argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        match ctx.fs.current_dir() {
            Ok(cwd) => ctx.out.write_line(&cwd.display().to_string())?,
            Err(err) => {
                tracing::debug!(%err, "current_dir failed");
                ctx.fail(BuiltinError::Unknown, "failed to get working directory", None)?;
            }
        }
        Ok(ControlToken::Success)
    }
}

pub struct Exit;

impl Builtin for Exit {
    fn names(&self) -> &'static [&'static str] {
        &["exit", "quit", "q"]
    }

    fn usage(&self) -> &'static str {
        ""
    }

    fn description(&self) -> &'static str {
        "Exit yash"
    }

    fn execute(&self, _argv: &[&str], _ctx: &mut Context<'_>) -> Result<ControlToken> {
        Ok(ControlToken::Exit)
    }
}

/// Exit with an explicit code. Without one, the stored return code is kept.
pub struct Return;

impl Builtin for Return {
    fn names(&self) -> &'static [&'static str] {
        &["return"]
    }

    fn usage(&self) -> &'static str {
        "[code=saved]"
    }

    fn description(&self) -> &'static str {
        "Exit yash and return an exit code. Default value is the saved return status of the current session"
    }

    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        if let Some(&text) = argv.get(1) {
            match text.parse::<ExitCode>() {
                Ok(code) => ctx.session.last_return_code = code,
                Err(_) => return invalid_integer(ctx, text),
            }
        }
        Ok(ControlToken::Return)
    }
}

pub struct Restart;

impl Builtin for Restart {
    fn names(&self) -> &'static [&'static str] {
        &["restart"]
    }

    fn usage(&self) -> &'static str {
        ""
    }

    fn description(&self) -> &'static str {
        "Reset the saved return status and continue"
    }

    fn execute(&self, _argv: &[&str], _ctx: &mut Context<'_>) -> Result<ControlToken> {
        Ok(ControlToken::Restart)
    }
}

pub struct Version;

impl Builtin for Version {
    fn names(&self) -> &'static [&'static str] {
        &["version", "info"]
    }

    fn usage(&self) -> &'static str {
        ""
    }

    fn description(&self) -> &'static str {
        "Displays the build version and info"
    }

    fn execute(&self, _argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        ctx.out.write_line("")?;
        for line in version_lines() {
            ctx.out.write_line(&line)?;
        }
        ctx.out.write_line("")?;
        Ok(ControlToken::Success)
    }
}

pub struct Clear;

impl Builtin for Clear {
    fn names(&self) -> &'static [&'static str] {
        &["clear", "cls"]
    }

    fn usage(&self) -> &'static str {
        ""
    }

    fn description(&self) -> &'static str {
        "Clears the screen"
    }

    fn execute(&self, _argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        ctx.out.clear()?;
        Ok(ControlToken::Success)
    }
}

/// Write the arguments separated by single spaces.
pub struct Print;

impl Builtin for Print {
    fn names(&self) -> &'static [&'static str] {
        &["stdout", "print"]
    }

    fn usage(&self) -> &'static str {
        "[*message]"
    }

    fn description(&self) -> &'static str {
        "Output to the console"
    }

    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        ctx.out.write_line(&argv[1..].join(" "))?;
        Ok(ControlToken::Success)
    }
}

/// Block the whole process for a number of seconds.
pub struct Sleep;

impl Builtin for Sleep {
    fn names(&self) -> &'static [&'static str] {
        &["sleep"]
    }

    fn usage(&self) -> &'static str {
        "[seconds=1]"
    }

    fn description(&self) -> &'static str {
        "Sleep for a certain amount of seconds"
    }

    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        let seconds = match argv.get(1) {
            None => 1,
            Some(&text) => match text.parse::<u64>() {
                Ok(seconds) => seconds,
                Err(_) => return invalid_integer(ctx, text),
            },
        };
        thread::sleep(Duration::from_secs(seconds));
        Ok(ControlToken::Success)
    }
}

/// Push a user-defined error record.
pub struct Throw;

impl Builtin for Throw {
    fn names(&self) -> &'static [&'static str] {
        &["throw"]
    }

    fn usage(&self) -> &'static str {
        "<name> <code> [*message=None]"
    }

    fn description(&self) -> &'static str {
        "Throw an error and assign it information"
    }

    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        let (name, text) = match argv {
            [_, name, code, ..] => (*name, *code),
            _ => return insufficient(ctx),
        };
        let Ok(code) = text.parse::<i32>() else {
            return invalid_integer(ctx, text);
        };
        let message = if argv.len() > 3 {
            argv[3..].join(" ")
        } else {
            "None".to_string()
        };
        let position = ctx.errors.push(ErrorRecord::user_defined(name, code, message));
        tracing::debug!(name, code, position, "user error thrown");
        Ok(ControlToken::Success)
    }
}

/// Inspect the error log, newest first.
pub struct Trace;

impl Trace {
    fn show(index: i64, ctx: &mut Context<'_>) -> Result<()> {
        match ctx.errors.traceback(index) {
            Some(record) => {
                ctx.out.write_labeled("name", &record.name)?;
                ctx.out.write_labeled("message", &record.message)?;
                ctx.out.write_labeled("code", &record.code.to_string())?;
                ctx.out.write_labeled("type", &record.kind.to_string())?;
            }
            None => ctx.out.write_line("no errors have been traced")?,
        }
        Ok(())
    }
}

impl Builtin for Trace {
    fn names(&self) -> &'static [&'static str] {
        &["trace", "traceback"]
    }

    fn usage(&self) -> &'static str {
        "(--count, --available, -ls) | ([index=1])"
    }

    fn description(&self) -> &'static str {
        "Trace an error's information"
    }

    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        match argv.get(1).copied() {
            None => Self::show(1, ctx)?,
            Some("--count" | "--available" | "-ls") => {
                let count = ctx.errors.count().to_string();
                ctx.out.write_labeled("available errors to trace", &count)?;
            }
            Some(selector) if selector.starts_with("--") => {
                ctx.fail(BuiltinError::InvalidToken, "invalid option", Some(selector))?;
            }
            Some(text) => match text.parse::<i64>() {
                Ok(index) => Self::show(index, ctx)?,
                Err(_) => return invalid_integer(ctx, text),
            },
        }
        Ok(ControlToken::Success)
    }
}

/// Run the remaining tokens through the host shell.
pub struct System;

impl Builtin for System {
    fn names(&self) -> &'static [&'static str] {
        &["sh", "sys", "system"]
    }

    fn usage(&self) -> &'static str {
        "<*input>"
    }

    fn description(&self) -> &'static str {
        "Execute a system shell command"
    }

    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        if argv.len() < 2 {
            return insufficient(ctx);
        }
        let line = argv[1..].join(" ");
        if let Err(err) = ctx.exec.run(&line) {
            tracing::debug!(%err, line = %line, "shell command failed to start");
            ctx.fail(BuiltinError::Unknown, "failed to run command", Some(&line))?;
        }
        Ok(ControlToken::Success)
    }
}

/// List every registered command.
pub struct Help;

impl Builtin for Help {
    fn names(&self) -> &'static [&'static str] {
        &["help"]
    }

    fn usage(&self) -> &'static str {
        ""
    }

    fn description(&self) -> &'static str {
        "Show this list"
    }

    fn execute(&self, _argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        ctx.out.write_line("")?;
        ctx.out.write_line("Available Commands:")?;
        ctx.out.write_line("")?;
        for cmd in ctx.registry.iter() {
            let names = cmd.names().join(", ");
            let line = match cmd.usage() {
                "" => format!(" {names}\t: {}", cmd.description()),
                usage => format!(" {names} {usage}\t: {}", cmd.description()),
            };
            ctx.out.write_line(&line)?;
        }
        ctx.out.write_line("")?;
        Ok(ControlToken::Success)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::RecordKind;
    use crate::error_log::ErrorLog;
    use crate::io_adapters::{MemExec, MemOutput, Transcript};
    use crate::local_fs::LocalFs;
    use crate::local_fs::tests::lock_current_dir;
    use crate::registry::CommandRegistry;
    use crate::session::Session;
    use std::env as stdenv;
    use std::fs;

    /// Everything a built-in needs, with in-memory output and process execution.
    pub(crate) struct Fixture {
        pub session: Session,
        pub errors: ErrorLog,
        pub fs: LocalFs,
        pub out: MemOutput,
        pub lines: Transcript,
        pub exec: MemExec,
        pub commands: Transcript,
        pub registry: CommandRegistry,
    }

    impl Fixture {
        pub fn new() -> Self {
            let (out, lines) = MemOutput::with_handle();
            let (exec, commands) = MemExec::with_handle();
            let tmp = stdenv::temp_dir();
            Self {
                session: Session::with_home(tmp.clone(), tmp, "tester"),
                errors: ErrorLog::new(),
                fs: LocalFs,
                out,
                lines,
                exec,
                commands,
                registry: CommandRegistry::with_builtins(),
            }
        }

        /// Runs `line` through the registered command named by its first word.
        pub fn run(&mut self, line: &str) -> ControlToken {
            let argv = crate::lexer::tokenize(line);
            let cmd = self.registry.resolve(argv[0]).expect("not a builtin");
            let mut ctx = Context {
                session: &mut self.session,
                errors: &mut self.errors,
                fs: &mut self.fs,
                out: &mut self.out,
                exec: &mut self.exec,
                registry: &self.registry,
            };
            cmd.execute(&argv, &mut ctx).unwrap()
        }

        pub fn output(&self) -> Vec<String> {
            self.lines.borrow().clone()
        }

        pub fn last_error(&self) -> Option<BuiltinError> {
            self.errors.traceback(1).and_then(ErrorRecord::builtin)
        }
    }

    #[test]
    fn test_print_joins_with_single_spaces() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("print hello   world"), ControlToken::Success);
        fx.run("stdout");
        assert_eq!(fx.output(), vec!["hello world", ""]);
        assert!(fx.errors.is_empty());
    }

    #[test]
    fn test_exit_aliases_and_restart_tokens() {
        let mut fx = Fixture::new();
        for line in ["exit", "quit", "q", "exit 3"] {
            assert_eq!(fx.run(line), ControlToken::Exit);
        }
        assert_eq!(fx.run("restart"), ControlToken::Restart);
        assert_eq!(fx.session.last_return_code, 0);
    }

    #[test]
    fn test_return_sets_code() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("return 5"), ControlToken::Return);
        assert_eq!(fx.session.last_return_code, 5);
    }

    #[test]
    fn test_return_without_code_keeps_saved_code() {
        let mut fx = Fixture::new();
        fx.session.last_return_code = 9;
        assert_eq!(fx.run("return"), ControlToken::Return);
        assert_eq!(fx.session.last_return_code, 9);
    }

    #[test]
    fn test_return_with_bad_code_does_not_terminate() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("return five"), ControlToken::Success);
        assert_eq!(fx.session.last_return_code, 0);
        assert_eq!(fx.last_error(), Some(BuiltinError::InvalidData));
        assert_eq!(fx.output(), vec!["error: invalid integer: five"]);
    }

    #[test]
    fn test_throw_pushes_user_defined_record() {
        let mut fx = Fixture::new();
        fx.run("throw foo 7 bad thing");
        assert_eq!(fx.errors.count(), 1);
        let record = fx.errors.traceback(1).unwrap();
        assert_eq!(record, &ErrorRecord::user_defined("foo", 7, "bad thing"));
        assert_eq!(record.kind, RecordKind::UserDefined);
        assert!(fx.output().is_empty());
    }

    #[test]
    fn test_throw_without_message_uses_none() {
        let mut fx = Fixture::new();
        fx.run("throw oops -2");
        let record = fx.errors.traceback(1).unwrap();
        assert_eq!(record.message, "None");
        assert_eq!(record.code, -2);
    }

    #[test]
    fn test_throw_with_bad_code_records_invalid_data_only() {
        let mut fx = Fixture::new();
        fx.run("throw foo notanint msg");
        assert_eq!(fx.errors.count(), 1);
        assert_eq!(fx.last_error(), Some(BuiltinError::InvalidData));
        assert!(fx.errors.iter().all(|r| r.kind == RecordKind::Standard));
    }

    #[test]
    fn test_throw_needs_name_and_code() {
        let mut fx = Fixture::new();
        fx.run("throw foo");
        assert_eq!(fx.last_error(), Some(BuiltinError::InsufficientArguments));
        assert_eq!(fx.output(), vec!["error: insufficient arguments"]);
    }

    #[test]
    fn test_trace_on_empty_log() {
        let mut fx = Fixture::new();
        fx.run("trace");
        fx.run("traceback 4");
        assert_eq!(
            fx.output(),
            vec!["no errors have been traced", "no errors have been traced"]
        );
        assert!(fx.errors.is_empty());
    }

    #[test]
    fn test_trace_shows_newest_first() {
        let mut fx = Fixture::new();
        fx.run("throw first 1 one");
        fx.run("throw second 2 two");
        fx.run("trace 2");
        assert_eq!(
            fx.output(),
            vec!["name: first", "message: one", "code: 1", "type: User Defined Error"]
        );
        fx.lines.borrow_mut().clear();
        fx.run("trace");
        assert_eq!(fx.output()[0], "name: second");
    }

    #[test]
    fn test_trace_count_selectors() {
        let mut fx = Fixture::new();
        fx.run("throw a 1");
        fx.run("throw b 2");
        for selector in ["--count", "--available", "-ls"] {
            fx.run(&format!("trace {selector}"));
        }
        assert_eq!(fx.output(), vec!["available errors to trace: 2"; 3]);
    }

    #[test]
    fn test_trace_rejects_bad_index_and_unknown_selector() {
        let mut fx = Fixture::new();
        fx.run("trace abc");
        assert_eq!(fx.last_error(), Some(BuiltinError::InvalidData));
        fx.run("trace --everything");
        assert_eq!(fx.last_error(), Some(BuiltinError::InvalidToken));
        // out-of-range is not a failure
        fx.run("trace 0");
        fx.run("trace -1");
        assert_eq!(fx.errors.count(), 2);
        assert_eq!(
            fx.output(),
            vec![
                "error: invalid integer: abc",
                "error: invalid option: --everything",
                "no errors have been traced",
                "no errors have been traced",
            ]
        );
    }

    #[test]
    fn test_sleep_validates_seconds() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("sleep 0"), ControlToken::Success);
        assert!(fx.errors.is_empty());
        fx.run("sleep -1");
        assert_eq!(fx.last_error(), Some(BuiltinError::InvalidData));
        fx.run("sleep soon");
        assert_eq!(fx.errors.count(), 2);
    }

    #[test]
    fn test_system_forwards_joined_tokens() {
        let mut fx = Fixture::new();
        fx.run("sh ls   -la /tmp");
        fx.run("system");
        assert_eq!(*fx.commands.borrow(), vec!["ls -la /tmp"]);
        assert_eq!(fx.last_error(), Some(BuiltinError::InsufficientArguments));
    }

    #[test]
    fn test_version_and_help() {
        let mut fx = Fixture::new();
        fx.run("version");
        let out = fx.output();
        assert!(out[1].starts_with(&format!("yash v{}", env!("CARGO_PKG_VERSION"))));
        assert!(out[2].starts_with("developed by"));

        fx.run("clear");
        assert!(fx.output().is_empty());

        fx.run("help");
        let out = fx.output();
        assert!(out.iter().any(|l| l.starts_with(" cd, chdir, cwd [path=HOME]\t: ")));
        assert!(out.iter().any(|l| l.starts_with(" gwd\t: ")));
        assert!(out.iter().any(|l| l.starts_with(" trace, traceback ")));
    }

    #[test]
    fn test_gwd_prints_current_dir() {
        let _lock = lock_current_dir();
        let mut fx = Fixture::new();
        fx.run("gwd");
        let cur = stdenv::current_dir().unwrap();
        assert_eq!(fx.output(), vec![cur.display().to_string()]);
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = tempfile::tempdir().unwrap();
        let canonical = fs::canonicalize(temp.path()).unwrap();
        let orig = stdenv::current_dir().unwrap();

        let mut fx = Fixture::new();
        fx.run(&format!("cd {}", canonical.display()));

        assert_eq!(fx.session.cwd, canonical);
        assert_eq!(fs::canonicalize(stdenv::current_dir().unwrap()).unwrap(), canonical);
        assert!(fx.errors.is_empty());

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
    }

    #[test]
    fn test_cd_without_path_goes_home() {
        let _lock = lock_current_dir();
        let temp = tempfile::tempdir().unwrap();
        let canonical = fs::canonicalize(temp.path()).unwrap();
        let orig = stdenv::current_dir().unwrap();

        let mut fx = Fixture::new();
        fx.session.home_dir = canonical.clone();
        fx.run("chdir");

        assert_eq!(fx.session.cwd, canonical);
        stdenv::set_current_dir(orig).expect("failed to restore cwd");
    }

    #[test]
    fn test_cd_nonexistent_path_keeps_cwd() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut fx = Fixture::new();
        let before = fx.session.cwd.clone();

        let name = format!("nonexistent_dir_for_yash_test_{}", std::process::id());
        fx.run(&format!("cwd {name}"));

        assert_eq!(stdenv::current_dir().unwrap(), orig);
        assert_eq!(fx.session.cwd, before);
        assert_eq!(fx.last_error(), Some(BuiltinError::InvalidArguments));
        assert_eq!(fx.output(), vec![format!("error: invalid path: {name}")]);
    }

    #[test]
    fn test_cd_home_failure_is_unknown() {
        let _lock = lock_current_dir();
        let mut fx = Fixture::new();
        fx.session.home_dir = "/definitely/not/a/home/for/yash".into();
        fx.run("cd");
        assert_eq!(fx.last_error(), Some(BuiltinError::Unknown));
    }
}
