//! Bounded execution of external identity utilities.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs `command` and returns its trimmed stdout.
///
/// Returns `None` if the program cannot be started, fails while being
/// waited on, or does not exit within `timeout` (it is killed in that case).
/// The exit status is not inspected.
pub(crate) fn run_with_timeout(mut command: Command, timeout: Duration) -> Option<String> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| warn!("failed to start {program}: {e}"))
        .ok()?;

    // Drain stdout on a separate thread so a chatty child cannot block on a full pipe.
    let mut stdout = child.stdout.take()?;
    let reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).map(|_| buf)
    });

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) if Instant::now() >= deadline => {
                warn!("{program} did not finish within {timeout:?}, killing it");
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                warn!("failed to wait for {program}: {e}");
                let _ = child.kill();
                return None;
            }
        }
    }

    let bytes = reader.join().ok()?.ok()?;
    Some(String::from_utf8_lossy(&bytes).trim().to_string())
}
