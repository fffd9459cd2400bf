//! Server lifecycle supervision
//!
//! The [`Supervisor`] owns the single managed server process and exposes the
//! start/stop/status/uptime operations that every trigger source (HTTP
//! handler, physical button) calls into. Start and stop are serialized by an
//! async mutex so two trigger sources can never interleave a spawn with a
//! shutdown; status and uptime read a small shared snapshot without taking
//! that lock, so a status poll never waits behind a slow stop.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Mutex};

use craftwarden_core::events::{IndicatorMode, ServerEvent, ServerStatus};
use craftwarden_core::prelude::*;

use crate::launch::LaunchCommand;
use crate::process::ServerProcess;
use crate::readiness::spawn_readiness_monitor;

/// Buffer for the per-run process event stream (console lines plus exit).
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Supervisor settings: how to launch the server and how to stop it.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Program, argument vector, and working directory for the child
    pub launch: LaunchCommand,
    /// Console command requesting a graceful exit (`stop` for Minecraft)
    pub stop_command: String,
    /// How long to wait for a graceful exit before force-killing
    pub stop_timeout: Duration,
    /// Substring of a stdout line that marks the server as ready
    pub ready_marker: String,
}

impl SupervisorConfig {
    /// Config with the conventional Minecraft console protocol: `stop` on
    /// stdin, a `Done` line on stdout, 30 seconds of shutdown grace.
    pub fn new(launch: LaunchCommand) -> Self {
        Self {
            launch,
            stop_command: "stop".to_string(),
            stop_timeout: Duration::from_secs(30),
            ready_marker: "Done".to_string(),
        }
    }
}

/// The live process handle plus its start timestamp.
///
/// Created by `start`, cleared by `stop` or when a later `start` finds the
/// process already dead. At most one exists at any time.
struct Managed {
    process: Arc<ServerProcess>,
    started_at: Instant,
}

/// Owns the managed server process and serializes lifecycle operations.
///
/// Instantiated once at daemon startup and shared (`Arc`) with every trigger
/// source. Indicator mode changes are fire-and-forget sends on the indicator
/// channel; the supervisor never blocks on indicator rendering.
pub struct Supervisor {
    config: SupervisorConfig,
    /// Serializes `start`/`stop` across trigger sources. Held for the full
    /// spawn-and-record / stop-and-record sequence.
    op_lock: Mutex<()>,
    /// The managed process and its start time. Written only while `op_lock`
    /// is held; read freely by `status`/`uptime`.
    managed: RwLock<Option<Managed>>,
    indicator_tx: mpsc::Sender<IndicatorMode>,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig, indicator_tx: mpsc::Sender<IndicatorMode>) -> Self {
        Self {
            config,
            op_lock: Mutex::new(()),
            managed: RwLock::new(None),
            indicator_tx,
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Current server state, polled from process liveness. No side effects.
    pub fn status(&self) -> ServerStatus {
        let guard = self.managed.read().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(m) if m.process.is_running() => ServerStatus::Running,
            _ => ServerStatus::Stopped,
        }
    }

    /// Seconds since the server was started, or 0 when not running.
    ///
    /// The child may exit between this call and the next; liveness is
    /// re-checked here so a dead server always reads as 0.
    pub fn uptime(&self) -> u64 {
        let guard = self.managed.read().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(m) if m.process.is_running() => m.started_at.elapsed().as_secs(),
            _ => 0,
        }
    }

    /// Start the server. Returns `true` on success or when already running.
    ///
    /// Failure (`false`) means the runtime is missing or the spawn failed;
    /// no state is retained and the caller decides whether to retry.
    pub async fn start(&self) -> bool {
        let _guard = self.op_lock.lock().await;

        if self.status().is_running() {
            info!("Server already running, start is a no-op");
            return true;
        }

        // A handle may remain from a server that died outside of stop();
        // discard it before spawning the replacement.
        self.clear_managed();

        match self.spawn_locked() {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to start server: {}", e);
                false
            }
        }
    }

    /// Spawn-and-record sequence. Caller must hold `op_lock`.
    fn spawn_locked(&self) -> Result<()> {
        self.config.launch.ensure_runtime()?;

        let (event_tx, event_rx) = mpsc::channel::<ServerEvent>(EVENT_CHANNEL_CAPACITY);
        let process = ServerProcess::spawn(&self.config.launch, event_tx)?;

        {
            let mut guard = self.managed.write().unwrap_or_else(|e| e.into_inner());
            *guard = Some(Managed {
                process: Arc::new(process),
                started_at: Instant::now(),
            });
        }

        // Blinking until the readiness monitor sees the marker
        self.signal_indicator(IndicatorMode::Blinking);
        spawn_readiness_monitor(
            event_rx,
            self.indicator_tx.clone(),
            self.config.ready_marker.clone(),
        );

        Ok(())
    }

    /// Stop the server. Always returns `true` once the lock is acquired:
    /// shutdown degrades from graceful to forced but always completes, and
    /// the handle is always cleared so the supervisor can never get stuck
    /// believing a dead process is alive.
    pub async fn stop(&self) -> bool {
        let _guard = self.op_lock.lock().await;

        let live = {
            let guard = self.managed.read().unwrap_or_else(|e| e.into_inner());
            match guard.as_ref() {
                None => {
                    info!("Server already stopped, stop is a no-op");
                    return true;
                }
                Some(m) if m.process.is_running() => Some(Arc::clone(&m.process)),
                Some(_) => None,
            }
        };

        let Some(process) = live else {
            // Died outside of stop(); just reconcile state
            info!("Server already exited, clearing stale handle");
            self.clear_managed();
            self.signal_indicator(IndicatorMode::Off);
            return true;
        };

        self.signal_indicator(IndicatorMode::Blinking);

        if let Err(e) = process
            .shutdown(&self.config.stop_command, self.config.stop_timeout)
            .await
        {
            // Best effort: the handle is cleared regardless
            error!("Error during server shutdown: {}", e);
        }

        self.clear_managed();
        self.signal_indicator(IndicatorMode::Off);
        true
    }

    /// Button behavior: start when stopped, stop when running.
    ///
    /// The status read here is unlocked; if another trigger source wins the
    /// race, the chosen operation degrades to an idempotent no-op.
    pub async fn toggle(&self) -> bool {
        match self.status() {
            ServerStatus::Stopped => {
                info!("Toggle: starting server");
                self.start().await
            }
            ServerStatus::Running => {
                info!("Toggle: stopping server");
                self.stop().await
            }
        }
    }

    fn clear_managed(&self) {
        let mut guard = self.managed.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Fire-and-forget mode change; a full indicator channel never stalls
    /// a lifecycle operation.
    fn signal_indicator(&self, mode: IndicatorMode) {
        if let Err(e) = self.indicator_tx.try_send(mode) {
            debug!("Indicator signal dropped: {}", e);
        }
    }
}
