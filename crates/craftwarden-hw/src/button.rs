//! Physical button capability trait and backends

use std::sync::{Arc, Mutex};

use tracing::debug;

/// Callback invoked when the button is pressed. Runs on a thread managed by
/// the button implementation, so it must be safe to run concurrently with
/// any other trigger source.
pub type PressCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// A momentary push button that fires a callback on press.
pub trait Button: Send {
    /// Register the press callback, replacing any previous one.
    fn on_press(&mut self, callback: PressCallback);
}

/// Button that never fires. Used when hardware is disabled.
pub struct NoopButton;

impl Button for NoopButton {
    fn on_press(&mut self, _callback: PressCallback) {}
}

/// Simulated button: presses are injected programmatically (tests, or a
/// debug console). Clones share the same registered callback.
#[derive(Clone, Default)]
pub struct SimulatedButton {
    callback: Arc<Mutex<Option<PressCallback>>>,
}

impl SimulatedButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a press. The callback runs on its own thread, matching how a
    /// real GPIO library delivers interrupt callbacks.
    pub fn press(&self) {
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match callback {
            Some(cb) => {
                debug!("[sim] button pressed");
                std::thread::spawn(move || (*cb)());
            }
            None => debug!("[sim] button pressed with no callback registered"),
        }
    }
}

impl Button for SimulatedButton {
    fn on_press(&mut self, callback: PressCallback) {
        *self.callback.lock().unwrap_or_else(|e| e.into_inner()) = Some(callback);
    }
}
