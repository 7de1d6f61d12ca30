//! The change-remote workflow
//!
//! Steps run strictly in order and stop at the first terminal outcome:
//! inputs → working copy check → reachability check → current remotes →
//! dry-run preview → add or update → new remotes → optional connection test.

use std::io::Write;
use std::process::ExitCode;

use crate::git::{CommandRunner, Git};
use crate::render::Reporter;
use crate::url::{build_url, normalize_host_path};

pub const BANNER: &str = "Git Remote Changer";

/// Resolved inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub repo_name: String,
    pub host_path: String,
    pub url: String,
    pub remote_name: String,
    pub test_connection: bool,
    pub dry_run: bool,
}

impl Invocation {
    pub fn new(repo_name: &str, host_path: &str, remote_name: &str) -> Self {
        Self {
            repo_name: repo_name.to_string(),
            host_path: normalize_host_path(host_path),
            url: build_url(host_path, repo_name),
            remote_name: remote_name.to_string(),
            test_connection: false,
            dry_run: false,
        }
    }

    pub fn test_connection(mut self, yes: bool) -> Self {
        self.test_connection = yes;
        self
    }

    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The remote was added or updated.
    Completed,
    /// The candidate URL could not be listed, so nothing was touched.
    Skipped,
    /// Dry run: the action was only described.
    Previewed,
    NotAWorkingCopy,
    MutationFailed,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Completed | Outcome::Skipped | Outcome::Previewed => 0,
            Outcome::NotAWorkingCopy | Outcome::MutationFailed => 1,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

pub struct Workflow<'a, R: CommandRunner, W: Write> {
    git: Git<'a, R>,
    reporter: &'a mut Reporter<W>,
}

impl<'a, R: CommandRunner, W: Write> Workflow<'a, R, W> {
    pub fn new(git: Git<'a, R>, reporter: &'a mut Reporter<W>) -> Self {
        Self { git, reporter }
    }

    pub fn run(&mut self, inv: &Invocation) -> Outcome {
        self.reporter.banner(BANNER);
        self.reporter.info(format_args!("Repository name: {}", inv.repo_name));
        self.reporter.info(format_args!("Host path: {}", inv.host_path));
        self.reporter.info(format_args!("Full URL: {}", inv.url));
        if inv.dry_run {
            self.reporter.info("Dry-run mode: showing actions only, nothing will be changed");
        }

        if !self.git.is_working_copy() {
            self.reporter.error("Current directory is not a git repository");
            return Outcome::NotAWorkingCopy;
        }

        if !self.git.is_reachable(&inv.url, &mut *self.reporter) {
            self.reporter.info("Skipping: no changes made");
            return Outcome::Skipped;
        }
        self.reporter.success("Remote repository exists, continuing");

        self.show_remotes("Current remote configuration:");

        let remote = inv.remote_name.as_str();
        let exists = self.git.remote_exists(remote);

        if inv.dry_run {
            if exists {
                self.reporter.info(format_args!("[DRY-RUN] Would update {remote} to: {}", inv.url));
            } else {
                self.reporter.info(format_args!("[DRY-RUN] Would add {remote}: {}", inv.url));
            }
            return Outcome::Previewed;
        }

        let changed = if exists {
            self.reporter.info(format_args!("Updating existing {remote} remote..."));
            self.git.update_remote(remote, &inv.url, &mut *self.reporter)
        } else {
            self.reporter.info(format_args!("Adding new {remote} remote..."));
            self.git.add_remote(remote, &inv.url, &mut *self.reporter)
        };
        if !changed {
            return Outcome::MutationFailed;
        }

        self.reporter.blank();
        self.show_remotes("Updated remote configuration:");

        if inv.test_connection {
            self.reporter.blank();
            // Informational only; the remote is already written.
            self.git.test_connection(remote, &inv.url, &mut *self.reporter);
        }

        self.reporter.blank();
        self.reporter.success("Remote changed successfully!");
        Outcome::Completed
    }

    fn show_remotes(&mut self, heading: &str) {
        let remotes = self.git.current_remotes();
        if !remotes.is_empty() {
            self.reporter.info(heading);
            self.reporter.listing(&remotes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::CommandResult;
    use crate::render::Palette;
    use crate::url::DEFAULT_HOST_PATH;
    use std::ffi::OsString;
    use std::sync::Mutex;

    /// Answers git subcommands from a fixed description of the world and
    /// records every call.
    struct StubRunner {
        working_copy: bool,
        reachable: bool,
        origin: bool,
        mutation_ok: bool,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl StubRunner {
        fn new(working_copy: bool, reachable: bool, origin: bool) -> Self {
            Self { working_copy, reachable, origin, mutation_ok: true, calls: Mutex::new(Vec::new()) }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().expect("lock").clone()
        }

        fn count(&self, subcommand: &[&str]) -> usize {
            self.calls().iter().filter(|call| call.starts_with(&to_strings(subcommand))).count()
        }
    }

    fn to_strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn answer(ok: bool, stdout: &str, stderr: &str) -> CommandResult {
        CommandResult { succeeded: ok, stdout: stdout.into(), stderr: stderr.into() }
    }

    impl CommandRunner for StubRunner {
        fn run(&self, _program: &str, args: &[OsString]) -> CommandResult {
            let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
            self.calls.lock().expect("lock").push(args.clone());

            let words: Vec<&str> = args.iter().map(String::as_str).collect();
            match words.as_slice() {
                ["rev-parse", ..] => answer(self.working_copy, ".git", "fatal: not a git repository"),
                ["ls-remote", ..] => answer(self.reachable, "", "fatal: repository not found"),
                ["remote", "-v"] if self.origin => {
                    answer(true, "origin\thttps://old/x.git (fetch)\norigin\thttps://old/x.git (push)", "")
                }
                ["remote", "-v"] => answer(true, "", ""),
                ["remote", "get-url", ..] => answer(self.origin, "https://old/x.git", "error: No such remote"),
                ["remote", "add", ..] | ["remote", "set-url", ..] => {
                    answer(self.mutation_ok, "", "error: could not lock config file")
                }
                other => panic!("unexpected git call: {other:?}"),
            }
        }
    }

    fn run(runner: &StubRunner, inv: &Invocation) -> (Outcome, String) {
        let mut reporter = Reporter::new(Vec::new(), Palette::plain());
        let outcome = Workflow::new(Git::new(runner, "git"), &mut reporter).run(inv);
        (outcome, String::from_utf8(reporter.into_inner()).expect("utf8"))
    }

    fn foo() -> Invocation {
        Invocation::new("Foo", DEFAULT_HOST_PATH, "origin")
    }

    const FOO_URL: &str = "https://github.com/lzorn-lzorn/Foo.git";

    #[test]
    fn invocation_normalizes_host_path() {
        let inv = Invocation::new("Bar", "https://git.example.com/me", "origin");
        assert_eq!(inv.host_path, "https://git.example.com/me/");
        assert_eq!(inv.url, "https://git.example.com/me/Bar.git");
    }

    #[test]
    fn adds_origin_when_absent() {
        let runner = StubRunner::new(true, true, false);
        let (outcome, out) = run(&runner, &foo());

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(outcome.code(), 0);
        assert_eq!(runner.count(&["remote", "add"]), 1);
        assert_eq!(runner.count(&["remote", "set-url"]), 0);
        assert!(runner.calls().contains(&to_strings(&["remote", "add", "--", "origin", FOO_URL])));
        assert!(out.contains("[SUCCESS] Remote changed successfully!"));
    }

    #[test]
    fn updates_origin_when_present() {
        let runner = StubRunner::new(true, true, true);
        let (outcome, out) = run(&runner, &foo());

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(runner.count(&["remote", "set-url"]), 1);
        assert_eq!(runner.count(&["remote", "add"]), 0);
        assert!(runner.calls().contains(&to_strings(&["remote", "set-url", "--", "origin", FOO_URL])));
        assert!(out.contains("[INFO] Current remote configuration:\n  origin\thttps://old/x.git (fetch)"));
        assert!(out.contains("[INFO] Updated remote configuration:"));
    }

    #[test]
    fn stops_after_working_copy_check() {
        let runner = StubRunner::new(false, true, true);
        let (outcome, out) = run(&runner, &foo());

        assert_eq!(outcome, Outcome::NotAWorkingCopy);
        assert_eq!(outcome.code(), 1);
        assert_eq!(runner.calls(), vec![to_strings(&["rev-parse", "--git-dir"])]);
        assert!(out.contains("[ERROR] Current directory is not a git repository"));
    }

    #[test]
    fn unreachable_url_is_a_successful_no_op() {
        let runner = StubRunner::new(true, false, false);
        let (outcome, out) = run(&runner, &foo());

        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(outcome.code(), 0);
        assert_eq!(runner.count(&["ls-remote"]), 1);
        assert_eq!(runner.count(&["remote", "add"]) + runner.count(&["remote", "set-url"]), 0);
        assert!(out.contains("[INFO] Skipping: no changes made"));
    }

    #[test]
    fn dry_run_previews_update_without_mutating() {
        let runner = StubRunner::new(true, true, true);
        let (outcome, out) = run(&runner, &foo().dry_run(true));

        assert_eq!(outcome, Outcome::Previewed);
        assert_eq!(outcome.code(), 0);
        assert_eq!(runner.count(&["remote", "add"]) + runner.count(&["remote", "set-url"]), 0);
        assert!(out.contains(&format!("[DRY-RUN] Would update origin to: {FOO_URL}")));
    }

    #[test]
    fn dry_run_previews_add_without_mutating() {
        let runner = StubRunner::new(true, true, false);
        let (outcome, out) = run(&runner, &foo().dry_run(true));

        assert_eq!(outcome, Outcome::Previewed);
        assert_eq!(runner.count(&["remote", "add"]) + runner.count(&["remote", "set-url"]), 0);
        assert!(out.contains(&format!("[DRY-RUN] Would add origin: {FOO_URL}")));
    }

    #[test]
    fn dry_run_checks_reachability_first() {
        let runner = StubRunner::new(true, false, true);
        let (outcome, out) = run(&runner, &foo().dry_run(true));

        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(runner.count(&["remote", "get-url"]), 0);
        assert!(!out.contains("[DRY-RUN]"));
    }

    #[test]
    fn mutation_failure_exits_with_failure() {
        let mut runner = StubRunner::new(true, true, false);
        runner.mutation_ok = false;
        let (outcome, out) = run(&runner, &foo());

        assert_eq!(outcome, Outcome::MutationFailed);
        assert_eq!(outcome.code(), 1);
        assert!(out.contains("[ERROR] Failed to add origin remote: error: could not lock config file"));
        assert!(!out.contains("Remote changed successfully"));
    }

    #[test]
    fn connection_test_runs_only_when_requested() {
        let runner = StubRunner::new(true, true, false);
        run(&runner, &foo());
        assert_eq!(runner.count(&["ls-remote"]), 1);

        let runner = StubRunner::new(true, true, false);
        let (outcome, out) = run(&runner, &foo().test_connection(true));
        assert_eq!(outcome, Outcome::Completed);
        assert!(runner.calls().contains(&to_strings(&["ls-remote", "--", "origin"])));
        assert!(out.contains(&format!("[INFO] Testing connection to {FOO_URL} ...")));
    }

    #[test]
    fn failed_connection_test_does_not_change_outcome() {
        // Reachability and the connection test share `ls-remote`; make only the
        // second one fail.
        struct FlakyRemote {
            inner: StubRunner,
            ls_remote_calls: Mutex<usize>,
        }

        impl CommandRunner for FlakyRemote {
            fn run(&self, program: &str, args: &[OsString]) -> CommandResult {
                if args.first().is_some_and(|a| a == "ls-remote") {
                    let mut seen = self.ls_remote_calls.lock().expect("lock");
                    *seen += 1;
                    if *seen > 1 {
                        return answer(false, "", "fatal: unable to access");
                    }
                }
                self.inner.run(program, args)
            }
        }

        let runner = FlakyRemote {
            inner: StubRunner::new(true, true, true),
            ls_remote_calls: Mutex::new(0),
        };
        let mut reporter = Reporter::new(Vec::new(), Palette::plain());
        let outcome =
            Workflow::new(Git::new(&runner, "git"), &mut reporter).run(&foo().test_connection(true));
        let out = String::from_utf8(reporter.into_inner()).expect("utf8");

        assert_eq!(outcome, Outcome::Completed);
        assert!(out.contains("[WARNING] Connection test failed: fatal: unable to access"));
    }

    #[test]
    fn custom_remote_name_is_used_throughout() {
        let runner = StubRunner::new(true, true, false);
        let inv = Invocation::new("Foo", DEFAULT_HOST_PATH, "upstream");
        let (outcome, _) = run(&runner, &inv);

        assert_eq!(outcome, Outcome::Completed);
        assert!(runner.calls().contains(&to_strings(&["remote", "get-url", "--", "upstream"])));
        assert!(runner.calls().contains(&to_strings(&["remote", "add", "--", "upstream", FOO_URL])));
    }
}
