//! Starts the game executable and reports when it exits.
//!
//! The launcher tracks at most one process. Cancelling only detaches the
//! handle: the game keeps running and its completion callback is dropped.
//! Terminating the game from here is not supported.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use tracing::{debug, info, warn};

use crate::core_api::{CoreError, CoreErrorCode, Rejection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Idle,
    Running,
    Completed,
}

#[derive(Debug)]
struct Tracked {
    state: LaunchState,
    // Bumped on every launch and cancel so a stale monitor thread can tell
    // it no longer owns the handle.
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct GameLauncher {
    tracked: Arc<Mutex<Tracked>>,
}

impl Default for GameLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLauncher {
    pub fn new() -> Self {
        Self {
            tracked: Arc::new(Mutex::new(Tracked {
                state: LaunchState::Idle,
                generation: 0,
            })),
        }
    }

    pub fn state(&self) -> LaunchState {
        lock(&self.tracked).state
    }

    pub fn launch<F>(&self, executable: impl AsRef<Path>, on_complete: F) -> Result<(), CoreError>
    where
        F: FnOnce(io::Result<ExitStatus>) + Send + 'static,
    {
        self.launch_command(Command::new(executable.as_ref()), on_complete)
    }

    /// Spawns `command` and fires `on_complete` once it exits, unless the
    /// launch was cancelled first.
    pub fn launch_command<F>(&self, mut command: Command, on_complete: F) -> Result<(), CoreError>
    where
        F: FnOnce(io::Result<ExitStatus>) + Send + 'static,
    {
        let mut tracked = lock(&self.tracked);
        if tracked.state == LaunchState::Running {
            return Err(CoreError::rejected(
                Rejection::AlreadyRunning,
                "the game is already running",
            ));
        }

        let mut child = command.spawn().map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to start {:?}: {e}", command.get_program()),
            )
        })?;
        tracked.generation += 1;
        tracked.state = LaunchState::Running;
        let generation = tracked.generation;
        drop(tracked);
        info!(pid = child.id(), "launched game");

        let shared = Arc::clone(&self.tracked);
        let monitor = thread::Builder::new()
            .name("game-monitor".to_string())
            .spawn(move || {
                let status = child.wait();
                let mut tracked = lock(&shared);
                if tracked.generation != generation || tracked.state != LaunchState::Running {
                    debug!("game exited after cancellation, dropping notification");
                    return;
                }
                tracked.state = LaunchState::Completed;
                drop(tracked);
                match &status {
                    Ok(status) => info!(%status, "game exited"),
                    Err(e) => warn!("failed to wait for game: {e}"),
                }
                on_complete(status);
            });

        if let Err(e) = monitor {
            let mut tracked = lock(&self.tracked);
            tracked.state = LaunchState::Idle;
            tracked.generation += 1;
            return Err(CoreError::new(
                CoreErrorCode::Io,
                format!("failed to monitor game process: {e}"),
            ));
        }
        Ok(())
    }

    /// Detaches a running launch. Returns whether anything was running; a
    /// cancel while idle or completed does nothing.
    pub fn cancel(&self) -> bool {
        let mut tracked = lock(&self.tracked);
        if tracked.state != LaunchState::Running {
            return false;
        }
        tracked.state = LaunchState::Idle;
        tracked.generation += 1;
        info!("detached from running game; the process is left running");
        true
    }
}

fn lock(tracked: &Mutex<Tracked>) -> MutexGuard<'_, Tracked> {
    tracked.lock().unwrap_or_else(PoisonError::into_inner)
}
