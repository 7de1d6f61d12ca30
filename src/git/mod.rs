//! Git command-line plumbing
//!
//! All repository knowledge comes from the `git` binary; nothing here parses
//! git's on-disk format. Arguments always travel as a discrete vector so a
//! repository name or URL can never be interpreted by a shell.

use std::ffi::OsString;

pub mod mutate;
pub mod probe;
pub mod runner;

pub use runner::{CommandResult, CommandRunner, ProcessCommandRunner, RunError};

/// A git binary bound to a command runner.
pub struct Git<'r, R: CommandRunner> {
    runner: &'r R,
    binary: String,
}

impl<'r, R: CommandRunner> Git<'r, R> {
    pub fn new(runner: &'r R, binary: impl Into<String>) -> Self {
        Self { runner, binary: binary.into() }
    }

    fn run(&self, args: &[&str]) -> CommandResult {
        let args: Vec<OsString> = args.iter().map(OsString::from).collect();
        self.runner.run(&self.binary, &args)
    }
}
