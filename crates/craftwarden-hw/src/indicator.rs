//! Indicator (LED) capability trait and backends

use std::sync::{Arc, Mutex};

use tracing::debug;

/// One status LED. Implementations must be cheap to call: the controller
/// invokes these on every render step.
pub trait Indicator: Send {
    fn on(&mut self);
    fn off(&mut self);
    fn toggle(&mut self);
    /// Current logical state (what was last driven, not a hardware read)
    fn is_lit(&self) -> bool;
}

/// Simulated pin: tracks state and logs every transition. The drop-in used
/// when no real GPIO hardware is present.
pub struct SimulatedPin {
    label: &'static str,
    pin: u8,
    lit: bool,
}

impl SimulatedPin {
    pub fn new(label: &'static str, pin: u8) -> Self {
        Self {
            label,
            pin,
            lit: false,
        }
    }

    fn set(&mut self, lit: bool) {
        if self.lit != lit {
            debug!(
                "[sim] {} (pin {}) -> {}",
                self.label,
                self.pin,
                if lit { "high" } else { "low" }
            );
        }
        self.lit = lit;
    }
}

impl Indicator for SimulatedPin {
    fn on(&mut self) {
        self.set(true);
    }

    fn off(&mut self) {
        self.set(false);
    }

    fn toggle(&mut self) {
        let next = !self.lit;
        self.set(next);
    }

    fn is_lit(&self) -> bool {
        self.lit
    }
}

/// Indicator that does nothing. Used when hardware is disabled entirely.
#[derive(Default)]
pub struct NoopIndicator {
    lit: bool,
}

impl Indicator for NoopIndicator {
    fn on(&mut self) {
        self.lit = true;
    }

    fn off(&mut self) {
        self.lit = false;
    }

    fn toggle(&mut self) {
        self.lit = !self.lit;
    }

    fn is_lit(&self) -> bool {
        self.lit
    }
}

/// Indicator that records every state *change*, for asserting render
/// sequences in tests. Redundant renders (off while already off) are not
/// recorded, so the history reads as the sequence of visible transitions.
#[derive(Clone, Default)]
pub struct RecordingIndicator {
    states: Arc<Mutex<Vec<bool>>>,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every state transition so far, in order. The implicit initial state
    /// is off.
    pub fn history(&self) -> Vec<bool> {
        self.states.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, lit: bool) {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        if states.last().copied().unwrap_or(false) != lit {
            states.push(lit);
        }
    }
}

impl Indicator for RecordingIndicator {
    fn on(&mut self) {
        self.record(true);
    }

    fn off(&mut self) {
        self.record(false);
    }

    fn toggle(&mut self) {
        let next = !self.is_lit();
        self.record(next);
    }

    fn is_lit(&self) -> bool {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .copied()
            .unwrap_or(false)
    }
}
