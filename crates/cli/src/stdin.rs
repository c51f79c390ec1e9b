//! Formatting piped standard input.
//!
//! A background thread owns the input: it reads until end of file, then runs
//! the completion handler (format, then optionally write the output file).
//! It reports progress over a channel. The foreground waits briefly for the
//! first bytes. If none arrive it gives up and the caller shows help. Once
//! input is streaming it waits up to a longer bound for the handler's result.

use std::io::{self, Read};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};
use log::debug;
use swiftfmt_core::error::{Error, Result};

/// Wait bounds for a stdin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdinTimeouts {
    /// How long to wait for the first bytes before assuming none will come.
    pub probe: Duration,
    /// How long to wait for formatting to finish once input has started.
    pub bound: Duration,
}

impl Default for StdinTimeouts {
    fn default() -> Self {
        Self {
            probe: Duration::from_millis(50),
            bound: Duration::from_secs(30),
        }
    }
}

/// What the completion handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinCompletion {
    /// Formatted text to be printed to standard output.
    Formatted(String),
    /// The formatted text was written to this file.
    Written(PathBuf),
}

#[derive(Debug, PartialEq, Eq)]
pub enum StdinOutcome {
    NoInput,
    Completed(StdinCompletion),
}

enum StdinEvent {
    Received,
    Finished(Result<StdinCompletion>),
}

/// Reads all of `input` on a background thread and hands the text to
/// `handler`.
///
/// # Errors
///
/// Returns the handler's error, a read error, or [`Error::StdinTimeout`] if
/// the handler has not finished within `timeouts.bound` of input arriving.
/// On timeout the background thread is abandoned.
pub fn run_session<R, F>(input: R, timeouts: StdinTimeouts, handler: F) -> Result<StdinOutcome>
where
    R: Read + Send + 'static,
    F: FnOnce(String) -> Result<StdinCompletion> + Send + 'static,
{
    let (sender, receiver) = bounded(2);

    thread::spawn(move || {
        let mut input = input;
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(read) => {
                    if buffer.is_empty() {
                        // The receiver may already have given up.
                        let _ = sender.send(StdinEvent::Received);
                    }
                    buffer.extend_from_slice(&chunk[..read]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    let _ = sender.send(StdinEvent::Finished(Err(Error::Stdio(e))));
                    return;
                }
            }
        }

        if buffer.is_empty() {
            return;
        }
        debug!("Read {} byte(s) from stdin", buffer.len());
        let text = String::from_utf8_lossy(&buffer).into_owned();
        let _ = sender.send(StdinEvent::Finished(handler(text)));
    });

    match receiver.recv_timeout(timeouts.probe) {
        Ok(StdinEvent::Received) => {}
        Ok(StdinEvent::Finished(result)) => return result.map(StdinOutcome::Completed),
        Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
            debug!("No input on stdin");
            return Ok(StdinOutcome::NoInput);
        }
    }

    match receiver.recv_timeout(timeouts.bound) {
        Ok(StdinEvent::Finished(result)) => result.map(StdinOutcome::Completed),
        Ok(StdinEvent::Received) | Err(RecvTimeoutError::Disconnected) => Err(Error::custom(
            "standard input reader stopped unexpectedly",
        )),
        Err(RecvTimeoutError::Timeout) => Err(Error::StdinTimeout),
    }
}
