//! In-memory capabilities for embedding the interpreter and for tests.

use crate::command::{LineSource, Output, ProcessExec};
use crate::console::format_error;
use anyhow::Result;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

/// Shared buffer of captured lines.
pub type Transcript = Rc<RefCell<Vec<String>>>;

/// Line source that replays a fixed script, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, one per read.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines that were never read.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

/// Output sink that keeps every line in memory.
///
/// Error lines are stored formatted, e.g. `error: invalid path: /nope`.
/// Clearing the screen drops everything captured so far.
#[derive(Debug, Default)]
pub struct MemOutput {
    buf: Transcript,
}

impl MemOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create the sink and return (sink, handle to its lines).
    pub fn with_handle() -> (Self, Transcript) {
        let out = Self::new();
        let handle = out.buf.clone();
        (out, handle)
    }
}

impl Output for MemOutput {
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.buf.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn write_error(&mut self, message: &str, item: Option<&str>) -> io::Result<()> {
        self.buf.borrow_mut().push(format_error(message, item));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.buf.borrow_mut().clear();
        Ok(())
    }
}

/// Process executor that records command lines instead of running them.
#[derive(Debug, Default)]
pub struct MemExec {
    buf: Transcript,
}

impl MemExec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create the executor and return (executor, handle to the
    /// recorded command lines).
    pub fn with_handle() -> (Self, Transcript) {
        let exec = Self::new();
        let handle = exec.buf.clone();
        (exec, handle)
    }
}

impl ProcessExec for MemExec {
    fn run(&mut self, command_line: &str) -> io::Result<()> {
        self.buf.borrow_mut().push(command_line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_replays_then_ends() {
        let mut input = ScriptedInput::new(["gwd", "exit"]);
        assert_eq!(input.read_line("> ").unwrap().as_deref(), Some("gwd"));
        assert_eq!(input.read_line("> ").unwrap().as_deref(), Some("exit"));
        assert_eq!(input.read_line("> ").unwrap(), None);
        assert_eq!(input.prompts().len(), 3);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_mem_output_captures_and_clears() {
        let (mut out, lines) = MemOutput::with_handle();
        out.write_line("hello").unwrap();
        out.write_labeled("created file", "a").unwrap();
        out.write_error("invalid integer", Some("x")).unwrap();
        assert_eq!(
            *lines.borrow(),
            vec!["hello", "created file: a", "error: invalid integer: x"]
        );
        out.clear().unwrap();
        assert!(lines.borrow().is_empty());
    }

    #[test]
    fn test_mem_exec_records_lines() {
        let (mut exec, lines) = MemExec::with_handle();
        exec.run("git status").unwrap();
        assert_eq!(*lines.borrow(), vec!["git status"]);
    }
}
