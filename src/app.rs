//! Daemon wiring: hardware, supervisor, trigger sources, lifecycle
//!
//! Everything is owned here with an explicit lifetime: built at startup,
//! torn down when the HTTP server returns. No component is reachable as
//! ambient global state; trigger sources receive the supervisor by `Arc`.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use craftwarden_core::events::IndicatorMode;
use craftwarden_core::prelude::*;
use craftwarden_daemon::Supervisor;
use craftwarden_hw::{
    Button, Indicator, IndicatorController, NoopButton, NoopIndicator, SimulatedButton,
    SimulatedPin,
};

use crate::config::{self, HardwareMode, HardwareSettings, Settings};
use crate::{api, signals};

/// Buffer for indicator mode changes; senders fire-and-forget, the
/// controller drains to the latest, so a small buffer is plenty.
const INDICATOR_CHANNEL_CAPACITY: usize = 8;

/// Owns the activity LED and the button for the daemon's lifetime.
///
/// `release()` is idempotent: it may run after (or race with) a cleanup that
/// already completed, and `Drop` calls it as well so a panic path still
/// switches the LED off.
pub struct HardwareGuard {
    active_led: Box<dyn Indicator>,
    button: Box<dyn Button>,
    released: bool,
}

impl HardwareGuard {
    /// Activity LED on: the daemon itself is alive.
    pub fn activate(&mut self) {
        self.active_led.on();
    }

    pub fn button_mut(&mut self) -> &mut dyn Button {
        self.button.as_mut()
    }

    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.active_led.off();
        info!("Hardware released");
    }
}

impl Drop for HardwareGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Build the hardware backends for the configured mode.
///
/// Returns the status LED (handed to the indicator controller) and the
/// guard owning the rest. The supervisor runs identically in every mode.
pub fn build_hardware(settings: &HardwareSettings) -> (Box<dyn Indicator>, HardwareGuard) {
    match settings.mode {
        HardwareMode::Simulated => {
            info!("Hardware mode: simulated pins");
            (
                Box::new(SimulatedPin::new("status-led", settings.status_led_pin)),
                HardwareGuard {
                    active_led: Box::new(SimulatedPin::new("active-led", settings.active_led_pin)),
                    button: Box::new(SimulatedButton::new()),
                    released: false,
                },
            )
        }
        HardwareMode::Off => {
            info!("Hardware mode: off (no-op rendering)");
            (
                Box::new(NoopIndicator::default()),
                HardwareGuard {
                    active_led: Box::new(NoopIndicator::default()),
                    button: Box::new(NoopButton),
                    released: false,
                },
            )
        }
    }
}

/// Route button presses through the shared supervisor.
///
/// The callback fires on a thread managed by the button backend, so it only
/// hands the toggle off to the runtime; serialization against HTTP-triggered
/// calls happens inside the supervisor.
pub fn wire_button(
    button: &mut dyn Button,
    supervisor: Arc<Supervisor>,
    handle: tokio::runtime::Handle,
) {
    button.on_press(Arc::new(move || {
        info!("Button pressed");
        let supervisor = Arc::clone(&supervisor);
        handle.spawn(async move {
            supervisor.toggle().await;
        });
    }));
}

/// Run the daemon until a termination signal arrives.
pub async fn run(settings: Settings) -> Result<()> {
    let supervisor_config =
        config::supervisor_config(&settings).context("Server configuration rejected")?;

    let (status_led, mut hardware) = build_hardware(&settings.hardware);
    hardware.activate();

    let (indicator_tx, indicator_rx) = mpsc::channel(INDICATOR_CHANNEL_CAPACITY);
    let controller_handle = IndicatorController::new(status_led, indicator_rx).spawn();

    let supervisor = Arc::new(Supervisor::new(supervisor_config, indicator_tx.clone()));

    // Status indicator starts in sync with the actual server state
    let _ = indicator_tx.try_send(IndicatorMode::Off);

    wire_button(
        hardware.button_mut(),
        Arc::clone(&supervisor),
        tokio::runtime::Handle::current(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    signals::spawn_signal_listener(shutdown_tx);

    let served = api::serve(&settings.http.listen, Arc::clone(&supervisor), shutdown_rx).await;

    // Teardown: stop the server best-effort, then release hardware.
    info!("Shutting down");
    supervisor.stop().await;
    hardware.release();

    // Dropping every indicator sender ends the controller loop, which
    // switches the status LED off on its way out.
    drop(indicator_tx);
    drop(hardware);
    drop(supervisor);
    if tokio::time::timeout(std::time::Duration::from_secs(1), controller_handle)
        .await
        .is_err()
    {
        warn!("Indicator controller did not stop in time");
    }

    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    use craftwarden_core::events::ServerStatus;
    use craftwarden_daemon::{LaunchCommand, SupervisorConfig};
    use tempfile::tempdir;

    #[test]
    fn test_build_hardware_modes() {
        let simulated = HardwareSettings::default();
        let (_led, mut guard) = build_hardware(&simulated);
        guard.activate();
        guard.release();
        guard.release(); // idempotent

        let off = HardwareSettings {
            mode: HardwareMode::Off,
            ..HardwareSettings::default()
        };
        let (_led, mut guard) = build_hardware(&off);
        guard.activate();
        guard.release();
    }

    fn sh_supervisor(script: &str, dir: &Path) -> Arc<Supervisor> {
        let (tx, _rx) = mpsc::channel(32);
        let config = SupervisorConfig {
            launch: LaunchCommand {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), script.to_string()],
                working_dir: dir.to_path_buf(),
            },
            stop_command: "stop".to_string(),
            stop_timeout: Duration::from_secs(5),
            ready_marker: "Done".to_string(),
        };
        Arc::new(Supervisor::new(config, tx))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_button_press_toggles_server() {
        let dir = tempdir().unwrap();
        let supervisor = sh_supervisor(
            r#"while read line; do if [ "$line" = "stop" ]; then exit 0; fi; done"#,
            dir.path(),
        );

        let mut button = SimulatedButton::new();
        wire_button(
            &mut button,
            Arc::clone(&supervisor),
            tokio::runtime::Handle::current(),
        );

        button.press();
        for _ in 0..100 {
            if supervisor.status() == ServerStatus::Running {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(supervisor.status(), ServerStatus::Running);

        button.press();
        for _ in 0..100 {
            if supervisor.status() == ServerStatus::Stopped {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(supervisor.status(), ServerStatus::Stopped);
    }
}
