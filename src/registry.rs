use crate::command::Builtin;
use std::collections::HashMap;

/// Table of built-in commands keyed by every name and alias.
///
/// Lookup is case-sensitive. Registering a command whose alias is already taken
/// rebinds that alias to the new command.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Builtin>>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under all of its names.
    pub fn register(&mut self, cmd: Box<dyn Builtin>) {
        let slot = self.commands.len();
        for &name in cmd.names() {
            self.index.insert(name, slot);
        }
        self.commands.push(cmd);
    }

    pub fn resolve(&self, name: &str) -> Option<&dyn Builtin> {
        self.index.get(name).map(|&slot| self.commands[slot].as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered commands in registration order, skipping fully shadowed ones.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Builtin> {
        self.commands
            .iter()
            .enumerate()
            .filter(|(slot, cmd)| cmd.names().iter().any(|n| self.index.get(n) == Some(slot)))
            .map(|(_, cmd)| cmd.as_ref())
    }

    /// Registry with every built-in command of the interpreter.
    pub fn with_builtins() -> Self {
        use crate::builtin::*;
        use crate::builtin_fs::*;

        let commands: Vec<Box<dyn Builtin>> = vec![
            Box::new(Cd),
            Box::new(Gwd),
            Box::new(Exit),
            Box::new(Return),
            Box::new(Restart),
            Box::new(Version),
            Box::new(Clear),
            Box::new(Print),
            Box::new(Sleep),
            Box::new(Throw),
            Box::new(Trace),
            Box::new(System),
            Box::new(PathCommand::single(PathOp::CreateFile)),
            Box::new(PathCommand::single(PathOp::RemoveFile)),
            Box::new(PathCommand::single(PathOp::CreateDir)),
            Box::new(PathCommand::single(PathOp::RemoveDir)),
            Box::new(PathCommand::batch(PathOp::CreateFile)),
            Box::new(PathCommand::batch(PathOp::RemoveFile)),
            Box::new(PathCommand::batch(PathOp::CreateDir)),
            Box::new(PathCommand::batch(PathOp::RemoveDir)),
            Box::new(ListDir),
            Box::new(Help),
        ];
        let mut registry = Self::new();
        for cmd in commands {
            registry.register(cmd);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Context, ControlToken};

    struct Named(&'static [&'static str]);

    impl Builtin for Named {
        fn names(&self) -> &'static [&'static str] {
            self.0
        }
        fn usage(&self) -> &'static str {
            ""
        }
        fn description(&self) -> &'static str {
            "test command"
        }
        fn execute(&self, _argv: &[&str], _ctx: &mut Context<'_>) -> anyhow::Result<ControlToken> {
            Ok(ControlToken::Success)
        }
    }

    #[test]
    fn test_aliases_resolve_to_the_same_command() {
        let registry = CommandRegistry::with_builtins();
        for alias in ["cd", "chdir", "cwd"] {
            let cmd = registry.resolve(alias).expect(alias);
            assert_eq!(cmd.names()[0], "cd");
        }
        assert_eq!(registry.resolve("q").unwrap().names()[0], "exit");
        assert_eq!(registry.resolve("dig").unwrap().names()[0], "ls");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = CommandRegistry::with_builtins();
        assert!(registry.contains("exit"));
        assert!(!registry.contains("EXIT"));
        assert!(registry.resolve("Cd").is_none());
    }

    #[test]
    fn test_every_documented_name_is_registered() {
        let registry = CommandRegistry::with_builtins();
        let names = [
            "cd", "chdir", "cwd", "gwd", "exit", "quit", "q", "return", "restart", "version",
            "info", "clear", "cls", "stdout", "print", "sleep", "throw", "trace", "traceback",
            "sh", "sys", "system", "mk", "make", "rm", "remove", "mks", "makes", "rms",
            "removes", "mkdir", "rmdir", "mkdirs", "rmdirs", "ls", "listdir", "dig", "help",
        ];
        for name in names {
            assert!(registry.contains(name), "{name} is not registered");
        }
    }

    #[test]
    fn test_shadowed_command_disappears_from_iter() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(Named(&["a"])));
        registry.register(Box::new(Named(&["b", "bb"])));
        registry.register(Box::new(Named(&["a"])));
        assert_eq!(registry.iter().count(), 2);
        assert!(registry.contains("bb"));
    }
}
