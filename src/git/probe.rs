//! Read-only questions about the working copy and remotes

use std::io::Write;

use super::{CommandRunner, Git};
use crate::render::Reporter;

impl<R: CommandRunner> Git<'_, R> {
    /// Whether git can find a repository from the current directory.
    pub fn is_working_copy(&self) -> bool {
        self.run(&["rev-parse", "--git-dir"]).succeeded
    }

    /// Whether a remote called `name` is configured.
    pub fn remote_exists(&self, name: &str) -> bool {
        self.run(&["remote", "get-url", "--", name]).succeeded
    }

    /// Whether `git ls-remote` can list `url`.
    ///
    /// A failure is reported as a warning and returned; it is up to the caller
    /// whether that stops anything.
    pub fn is_reachable<W: Write>(&self, url: &str, reporter: &mut Reporter<W>) -> bool {
        reporter.info("Checking whether the remote repository exists...");
        let result = self.run(&["ls-remote", "--", url]);
        if !result.succeeded {
            reporter.warning(format_args!("Remote repository '{url}' does not exist or is not accessible"));
            if !result.stderr.is_empty() {
                reporter.warning(format_args!("Details: {}", result.stderr));
            }
        }
        result.succeeded
    }

    /// Raw `git remote -v` output, or an empty string when git fails.
    pub fn current_remotes(&self) -> String {
        let result = self.run(&["remote", "-v"]);
        if result.succeeded {
            result.stdout
        } else {
            String::new()
        }
    }

    /// Probe the configured remote by name and report the result.
    pub fn test_connection<W: Write>(
        &self,
        remote: &str,
        url: &str,
        reporter: &mut Reporter<W>,
    ) -> bool {
        reporter.info(format_args!("Testing connection to {url} ..."));
        let result = self.run(&["ls-remote", "--", remote]);
        if result.succeeded {
            reporter.success("Connection test succeeded");
        } else {
            reporter.warning(format_args!("Connection test failed: {}", result.stderr));
        }
        result.succeeded
    }
}
