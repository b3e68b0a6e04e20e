use crate::command::{
    Context, ControlToken, ExitCode, FileSystem, LineSource, Output, ProcessExec,
};
use crate::console::ConsoleOutput;
use crate::error::BuiltinError;
use crate::error_log::ErrorLog;
use crate::external::SystemShell;
use crate::lexer;
use crate::local_fs::LocalFs;
use crate::registry::CommandRegistry;
use crate::session::Session;
use anyhow::{Context as _, Result};
use std::path::Path;

/// A line-oriented command interpreter with a traceable error log.
///
/// The interpreter owns the [`Session`], the [`ErrorLog`] and the
/// [`CommandRegistry`], plus the three capabilities built-ins act through. See
/// [`Default`] for the host-backed setup.
///
/// Example
/// ```
/// use yash::{ControlToken, Interpreter, MemExec, MemOutput, LocalFs, Session};
/// let (out, lines) = MemOutput::with_handle();
/// let mut sh = Interpreter::new(
///     Session::new(),
///     Box::new(LocalFs),
///     Box::new(out),
///     Box::new(MemExec::new()),
/// );
/// assert_eq!(sh.run_line("print hello   world"), ControlToken::Success);
/// assert_eq!(*lines.borrow(), vec!["hello world"]);
/// ```
pub struct Interpreter {
    session: Session,
    errors: ErrorLog,
    registry: CommandRegistry,
    fs: Box<dyn FileSystem>,
    out: Box<dyn Output>,
    exec: Box<dyn ProcessExec>,
}

impl Interpreter {
    /// Create an interpreter with every built-in registered and an empty error log.
    pub fn new(
        session: Session,
        fs: Box<dyn FileSystem>,
        out: Box<dyn Output>,
        exec: Box<dyn ProcessExec>,
    ) -> Self {
        Self::with_registry(session, CommandRegistry::with_builtins(), fs, out, exec)
    }

    /// Like [`Interpreter::new`], with a custom command table.
    pub fn with_registry(
        session: Session,
        registry: CommandRegistry,
        fs: Box<dyn FileSystem>,
        out: Box<dyn Output>,
        exec: Box<dyn ProcessExec>,
    ) -> Self {
        Self {
            session,
            errors: ErrorLog::new(),
            registry,
            fs,
            out,
            exec,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Exit code the process ends with if the session ended now.
    pub fn return_code(&self) -> ExitCode {
        self.session.last_return_code
    }

    /// Write a line through the interpreter's output sink.
    pub fn write_line(&mut self, text: &str) -> std::io::Result<()> {
        self.out.write_line(text)
    }

    /// Record a failure outside of any command, e.g. a bad invocation flag.
    pub fn report(&mut self, kind: BuiltinError, message: &str, item: Option<&str>) {
        let mut ctx = self.context();
        if let Err(err) = ctx.fail(kind, message, item) {
            tracing::error!(%err, "failed to write error line");
        }
    }

    /// Run one tokenized command line.
    ///
    /// Built-ins are looked up by name, case-sensitively. Anything else is
    /// handed to the process executor as the tokens joined by single spaces.
    pub fn dispatch(&mut self, argv: &[&str]) -> ControlToken {
        let token = self.dispatch_inner(argv);
        tracing::debug!(?token, "dispatched");
        self.session.last_token = Some(token);
        token
    }

    fn dispatch_inner(&mut self, argv: &[&str]) -> ControlToken {
        let Some(&name) = argv.first() else {
            return ControlToken::Blank;
        };

        let Self {
            session,
            errors,
            registry,
            fs,
            out,
            exec,
        } = self;
        let registry: &CommandRegistry = registry;
        let mut ctx = Context {
            session,
            errors,
            fs: fs.as_mut(),
            out: out.as_mut(),
            exec: exec.as_mut(),
            registry,
        };

        match registry.resolve(name) {
            Some(cmd) => {
                tracing::debug!(command = cmd.names()[0], args = argv.len() - 1, "builtin");
                match cmd.execute(argv, &mut ctx) {
                    Ok(token) => token,
                    Err(err) => {
                        tracing::error!(command = name, error = %err, "builtin failed");
                        let position = ctx.errors.push(BuiltinError::Unknown.into());
                        tracing::warn!(error = BuiltinError::Unknown.name(), position, "unexpected failure");
                        ControlToken::Success
                    }
                }
            }
            None => {
                let line = argv.join(" ");
                if let Err(err) = ctx.exec.run(&line) {
                    tracing::debug!(%err, line = %line, "external command failed to start");
                    if let Err(err) = ctx.fail(BuiltinError::Unknown, "failed to run command", Some(&line)) {
                        tracing::error!(%err, "failed to write error line");
                    }
                }
                ControlToken::Success
            }
        }
    }

    /// Tokenize and dispatch a single line.
    pub fn run_line(&mut self, line: &str) -> ControlToken {
        let argv = lexer::tokenize(line);
        self.dispatch(&argv)
    }

    /// Change directory through the file system and update the session.
    pub fn change_dir(&mut self, path: &Path) -> Result<()> {
        self.fs
            .set_current_dir(path)
            .with_context(|| format!("cannot change directory to {}", path.display()))?;
        self.session.cwd = self.fs.current_dir().context("cannot read working directory")?;
        tracing::debug!(cwd = %self.session.cwd.display(), "working directory changed");
        Ok(())
    }

    /// Move to the session's home directory, as the interactive loop starts there.
    pub fn enter_home(&mut self) -> Result<()> {
        let home = self.session.home_dir.clone();
        self.change_dir(&home)
    }

    /// The interactive loop: prompt, read, dispatch until `exit`, `return` or
    /// end of input. A failed read ends the loop like end of input. Returns
    /// the session return code.
    ///
    /// The error log is cleared when the loop ends.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> Result<ExitCode> {
        loop {
            let prompt = self.session.prompt();
            let token = match source.read_line(&prompt) {
                Ok(Some(line)) => self.run_line(&line),
                Ok(None) => {
                    tracing::debug!("end of input");
                    ControlToken::Exit
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to read input, ending session");
                    ControlToken::Exit
                }
            };

            let last_terminal = self.session.last_token.is_some_and(ControlToken::is_terminal);
            if token.is_terminal() || last_terminal {
                break;
            }
            if token == ControlToken::Restart {
                tracing::info!(code = self.session.last_return_code, "session restarted");
                self.session.reset();
            }
        }
        let code = self.session.last_return_code;
        self.shutdown();
        Ok(code)
    }

    /// Clear the error log. Called whenever a session ends.
    pub fn shutdown(&mut self) {
        tracing::debug!(records = self.errors.count(), "clearing error log");
        self.errors.clear();
    }

    fn context(&mut self) -> Context<'_> {
        Context {
            session: &mut self.session,
            errors: &mut self.errors,
            fs: self.fs.as_mut(),
            out: self.out.as_mut(),
            exec: self.exec.as_mut(),
            registry: &self.registry,
        }
    }
}

impl Default for Interpreter {
    /// Host file system, console output and the system shell.
    fn default() -> Self {
        Self::new(
            Session::new(),
            Box::new(LocalFs),
            Box::new(ConsoleOutput),
            Box::new(SystemShell::default()),
        )
    }
}
