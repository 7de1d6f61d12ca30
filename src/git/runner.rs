//! Bounded execution of external commands

use std::ffi::OsString;
use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Upper bound on a single external command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Outcome of one external command: success flag plus trimmed output streams.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self { succeeded: true, stdout: stdout.into(), stderr: String::new() }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self { succeeded: false, stdout: String::new(), stderr: stderr.into() }
    }
}

/// Reasons a command produced no exit status of its own.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("command timed out after {}s", .timeout.as_secs())]
    Timeout { timeout: Duration },

    #[error("failed to run `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs a program with a discrete argument vector and never fails outright.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> CommandResult;
}

#[derive(Debug, Clone)]
pub struct ProcessCommandRunner {
    timeout: Duration,
}

impl Default for ProcessCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ProcessCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn run_bounded(&self, program: &str, args: &[OsString]) -> Result<CommandResult, RunError> {
        let mut child = create_command(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunError::Launch { program: program.to_owned(), source })?;

        let (output_tx, output_rx) = mpsc::channel();
        let mut readers = 0;
        readers += spawn_reader(child.stdout.take(), Stream::Stdout, &output_tx);
        readers += spawn_reader(child.stderr.take(), Stream::Stderr, &output_tx);
        drop(output_tx);

        // A timeout too large to represent is no deadline at all.
        let deadline = Instant::now().checked_add(self.timeout);
        let timed_out = || RunError::Timeout { timeout: self.timeout };

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(source) => {
                    terminate_child(&mut child);
                    return Err(RunError::Wait { program: program.to_owned(), source });
                }
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                // Reader threads are left detached; whatever they collected is discarded.
                terminate_child(&mut child);
                return Err(timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        };

        // Background descendants can keep the pipes open after the child exits,
        // so the output itself must arrive before the same deadline.
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        for _ in 0..readers {
            let received = match deadline {
                Some(deadline) => {
                    output_rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => output_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((Stream::Stdout, bytes)) => stdout = bytes,
                Ok((Stream::Stderr, bytes)) => stderr = bytes,
                Err(RecvTimeoutError::Timeout) => return Err(timed_out()),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(CommandResult {
            succeeded: status.success(),
            stdout: decode(&stdout),
            stderr: decode(&stderr),
        })
    }
}

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> CommandResult {
        tracing::debug!(program, args = ?args, "running command");
        let started = Instant::now();

        let result = self.run_bounded(program, args).unwrap_or_else(|error| {
            tracing::warn!(program, %error, "command did not complete");
            CommandResult::failure(error.to_string())
        });

        tracing::debug!(
            program,
            succeeded = result.succeeded,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "command finished"
        );
        result
    }
}

fn create_command(program: &str) -> Command {
    let mut cmd = Command::new(program);
    // Fail instead of waiting on a credential prompt nobody will answer.
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    cmd
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Drain `pipe` on a helper thread and send its bytes once it closes.
/// Returns how many readers were started.
fn spawn_reader<R>(pipe: Option<R>, stream: Stream, output_tx: &Sender<(Stream, Vec<u8>)>) -> usize
where
    R: Read + Send + 'static,
{
    let Some(mut pipe) = pipe else {
        return 0;
    };
    let output_tx = output_tx.clone();
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        let _ = output_tx.send((stream, buffer));
    });
    1
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_owned()
}

fn terminate_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
