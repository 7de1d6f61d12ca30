//! change-remote: point a working copy's origin remote at a repository
//!
//! Checks that the current directory is a git working copy and that the
//! candidate repository can be listed, then adds or updates the remote.

use std::process::ExitCode;

fn main() -> ExitCode {
    change_remote::cli::run()
}
