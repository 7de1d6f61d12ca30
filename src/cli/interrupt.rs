//! Ctrl-C handling
//!
//! A watcher thread waits for the interrupt signal, prints a notice and ends
//! the process with exit code 1. Child git processes receive the same signal
//! from the terminal.

use std::io;
use std::process;
use std::thread;

use crate::render::{Palette, Reporter};

/// Exit code used when the user interrupts a run.
pub const INTERRUPTED_EXIT_CODE: i32 = 1;

/// Register for the interrupt signal, then start the watcher.
///
/// Registration happens before this returns, so an interrupt that arrives
/// while the first git command runs is already caught. Failing to install
/// only costs the notice.
pub fn install(palette: Palette) {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::warn!(%error, "interrupt handler unavailable");
            return;
        }
    };

    let mut listener = {
        let _guard = runtime.enter();
        match listen() {
            Ok(listener) => listener,
            Err(error) => {
                tracing::warn!(%error, "failed to listen for ctrl-c");
                return;
            }
        }
    };

    let spawned = thread::Builder::new().name("interrupt".into()).spawn(move || {
        if runtime.block_on(listener.recv()).is_none() {
            tracing::warn!("ctrl-c listener closed");
            return;
        }
        Reporter::new(io::stdout(), palette).interrupted();
        process::exit(INTERRUPTED_EXIT_CODE);
    });

    if let Err(error) = spawned {
        tracing::warn!(%error, "interrupt handler unavailable");
    }
}

#[cfg(unix)]
fn listen() -> io::Result<tokio::signal::unix::Signal> {
    use tokio::signal::unix::{signal, SignalKind};
    signal(SignalKind::interrupt())
}

#[cfg(windows)]
fn listen() -> io::Result<tokio::signal::windows::CtrlC> {
    tokio::signal::windows::ctrl_c()
}
