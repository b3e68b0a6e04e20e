//! File and directory built-ins.
//!
//! Batch variants treat every operand independently: one failure is recorded
//! and the rest are still attempted.

use crate::builtin::insufficient;
use crate::command::{Builtin, Context, ControlToken};
use crate::error::BuiltinError;
use anyhow::Result;
use std::path::Path;

/// What a path command does to each operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOp {
    CreateFile,
    RemoveFile,
    CreateDir,
    RemoveDir,
}

impl PathOp {
    fn done(self) -> &'static str {
        match self {
            Self::CreateFile => "created file",
            Self::RemoveFile => "removed file",
            Self::CreateDir => "created directory",
            Self::RemoveDir => "removed directory",
        }
    }

    fn failed(self) -> &'static str {
        match self {
            Self::CreateFile => "failed to create file",
            Self::RemoveFile => "failed to remove file",
            Self::CreateDir => "failed to create directory",
            Self::RemoveDir => "failed to remove directory",
        }
    }

    fn apply(self, path: &str, ctx: &mut Context<'_>) -> Result<()> {
        let target = Path::new(path);
        let res = match self {
            Self::CreateFile => ctx.fs.create_file(target),
            Self::RemoveFile => ctx.fs.remove_file(target),
            Self::CreateDir => ctx.fs.create_dir(target),
            Self::RemoveDir => ctx.fs.remove_dir(target),
        };
        match res {
            Ok(()) => ctx.out.write_labeled(self.done(), path)?,
            Err(err) => {
                tracing::debug!(%err, path, op = ?self, "file system operation failed");
                ctx.fail(BuiltinError::InvalidArguments, self.failed(), Some(path))?;
            }
        }
        Ok(())
    }
}

/// `mk`, `rm`, `mkdir`, `rmdir` and their batch forms.
///
/// The single form acts on its first operand only.
#[derive(Debug, Clone, Copy)]
pub struct PathCommand {
    op: PathOp,
    batch: bool,
}

impl PathCommand {
    pub fn single(op: PathOp) -> Self {
        Self { op, batch: false }
    }

    pub fn batch(op: PathOp) -> Self {
        Self { op, batch: true }
    }
}

impl Builtin for PathCommand {
    fn names(&self) -> &'static [&'static str] {
        match (self.op, self.batch) {
            (PathOp::CreateFile, false) => &["mk", "make"],
            (PathOp::CreateFile, true) => &["mks", "makes"],
            (PathOp::RemoveFile, false) => &["rm", "remove"],
            (PathOp::RemoveFile, true) => &["rms", "removes"],
            (PathOp::CreateDir, false) => &["mkdir"],
            (PathOp::CreateDir, true) => &["mkdirs"],
            (PathOp::RemoveDir, false) => &["rmdir"],
            (PathOp::RemoveDir, true) => &["rmdirs"],
        }
    }

    fn usage(&self) -> &'static str {
        if self.batch { "<*paths>" } else { "<path>" }
    }

    fn description(&self) -> &'static str {
        match (self.op, self.batch) {
            (PathOp::CreateFile, false) => "Create a file",
            (PathOp::CreateFile, true) => "Create multiple files",
            (PathOp::RemoveFile, false) => "Remove a file",
            (PathOp::RemoveFile, true) => "Remove multiple files",
            (PathOp::CreateDir, false) => "Create a directory",
            (PathOp::CreateDir, true) => "Create multiple directories",
            (PathOp::RemoveDir, false) => "Remove an empty directory",
            (PathOp::RemoveDir, true) => "Remove multiple empty directories",
        }
    }

    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        let operands = match &argv[1..] {
            [] => return insufficient(ctx),
            [first, ..] if !self.batch => std::slice::from_ref(first),
            all => all,
        };
        for path in operands {
            self.op.apply(path, ctx)?;
        }
        Ok(ControlToken::Success)
    }
}

/// List a directory, the working directory by default.
pub struct ListDir;

impl Builtin for ListDir {
    fn names(&self) -> &'static [&'static str] {
        &["ls", "listdir", "dig"]
    }

    fn usage(&self) -> &'static str {
        "[path=CWD]"
    }

    fn description(&self) -> &'static str {
        "List all items in a directory"
    }

    fn execute(&self, argv: &[&str], ctx: &mut Context<'_>) -> Result<ControlToken> {
        let path = match argv.get(1) {
            Some(path) => path.to_string(),
            None => ctx
                .fs
                .current_dir()
                .unwrap_or_else(|_| ctx.session.cwd.clone())
                .display()
                .to_string(),
        };
        let entries = match ctx.fs.list_dir(Path::new(&path)) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(%err, path = %path, "listing failed");
                ctx.fail(BuiltinError::InvalidArguments, "failed to list directory", Some(&path))?;
                return Ok(ControlToken::Success);
            }
        };
        if entries.is_empty() {
            ctx.out.write_labeled("Empty directory", &path)?;
            return Ok(ControlToken::Success);
        }
        ctx.out.write_labeled("Searching for items in directory", &path)?;
        ctx.out.write_line("")?;
        for (i, name) in entries.iter().enumerate() {
            ctx.out.write_line(&format!("{i}.\t{name}"))?;
        }
        ctx.out.write_line("")?;
        Ok(ControlToken::Success)
    }
}
