//! Status indicator rendering loop

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::debug;

use craftwarden_core::events::IndicatorMode;

use crate::indicator::Indicator;

/// Steady-state render cadence for `Off` and `On`.
const RENDER_INTERVAL: Duration = Duration::from_millis(100);
/// Toggle cadence for `Blinking`; slower so the blink is visible.
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Long-lived task that owns one status indicator and continuously renders
/// the most recently received [`IndicatorMode`].
///
/// Mode changes arrive over an mpsc channel; each loop iteration drains the
/// channel without blocking and keeps only the newest value (latest mode
/// wins — the channel is not a work queue). The loop ends only when every
/// sender is gone, i.e. at whole-system shutdown, and drives the indicator
/// off on the way out.
pub struct IndicatorController {
    indicator: Box<dyn Indicator>,
    rx: mpsc::Receiver<IndicatorMode>,
    mode: IndicatorMode,
    render_interval: Duration,
    blink_interval: Duration,
}

impl IndicatorController {
    pub fn new(indicator: Box<dyn Indicator>, rx: mpsc::Receiver<IndicatorMode>) -> Self {
        Self {
            indicator,
            rx,
            mode: IndicatorMode::Off,
            render_interval: RENDER_INTERVAL,
            blink_interval: BLINK_INTERVAL,
        }
    }

    /// Override the render cadences (tests use short intervals).
    pub fn with_cadence(mut self, render: Duration, blink: Duration) -> Self {
        self.render_interval = render;
        self.blink_interval = blink;
        self
    }

    /// Spawn the rendering loop as an independent task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// The rendering loop. One iteration: adopt the newest queued mode,
    /// then render a single step of it.
    pub async fn run(mut self) {
        loop {
            loop {
                match self.rx.try_recv() {
                    Ok(mode) => self.mode = mode,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        debug!("indicator channel closed, controller shutting down");
                        self.indicator.off();
                        return;
                    }
                }
            }

            match self.mode {
                IndicatorMode::Off => {
                    self.indicator.off();
                    tokio::time::sleep(self.render_interval).await;
                }
                IndicatorMode::On => {
                    self.indicator.on();
                    tokio::time::sleep(self.render_interval).await;
                }
                IndicatorMode::Blinking => {
                    self.indicator.toggle();
                    tokio::time::sleep(self.blink_interval).await;
                }
            }
        }
    }
}
