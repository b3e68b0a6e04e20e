//! Terminal-facing [`Output`] and [`LineSource`] implementations.

use crate::command::{LineSource, Output};
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};

/// Formats an error line the way every output sink prints it.
pub fn format_error(message: &str, item: Option<&str>) -> String {
    match item {
        Some(item) => format!("error: {message}: {item}"),
        None => format!("error: {message}"),
    }
}

/// Writes regular output to stdout and errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }

    fn write_error(&mut self, message: &str, item: Option<&str>) -> io::Result<()> {
        writeln!(io::stderr().lock(), "{}", format_error(message, item))
    }

    fn clear(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "\x1b[2J\x1b[1;1H")?;
        stdout.flush()
    }
}

/// Reads lines from the terminal through rustyline. No history is kept.
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new().context("failed to initialise the line editor")?,
        })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            // ^C abandons the current line only
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
