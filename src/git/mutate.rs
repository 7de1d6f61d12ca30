//! Adding and repointing a named remote

use std::io::Write;

use super::{CommandRunner, Git};
use crate::render::Reporter;

impl<R: CommandRunner> Git<'_, R> {
    /// `git remote add <name> <url>`. Git itself refuses an existing name.
    pub fn add_remote<W: Write>(&self, name: &str, url: &str, reporter: &mut Reporter<W>) -> bool {
        let result = self.run(&["remote", "add", "--", name, url]);
        if result.succeeded {
            reporter.success(format_args!("Added {name} remote"));
        } else {
            reporter.error(format_args!("Failed to add {name} remote: {}", result.stderr));
        }
        result.succeeded
    }

    /// `git remote set-url <name> <url>`. Git itself refuses a missing name.
    pub fn update_remote<W: Write>(
        &self,
        name: &str,
        url: &str,
        reporter: &mut Reporter<W>,
    ) -> bool {
        let result = self.run(&["remote", "set-url", "--", name, url]);
        if result.succeeded {
            reporter.success(format_args!("Updated {name} remote URL"));
        } else {
            reporter.error(format_args!("Failed to update {name} remote URL: {}", result.stderr));
        }
        result.succeeded
    }
}
