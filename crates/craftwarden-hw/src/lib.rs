//! # craftwarden-hw - Hardware Capability Surface
//!
//! Capability traits for the status LEDs and the physical button, plus the
//! indicator controller task that renders the current mode.
//!
//! The daemon never talks to GPIO pins directly: it consumes the
//! [`Indicator`] and [`Button`] traits. This crate ships a simulated backend
//! (logs pin transitions) and a no-op backend; a real GPIO backend implements
//! the same traits out of tree. The supervisor behaves identically in every
//! mode — rendering degrades to a no-op, the mode machine does not.
//!
//! ## Public API
//! - [`Indicator`] - `on`/`off`/`toggle` capability for one LED
//! - [`Button`] - `on_press(callback)` registration
//! - [`IndicatorController`] - long-lived task rendering the current
//!   [`IndicatorMode`](craftwarden_core::IndicatorMode)
//! - [`SimulatedPin`], [`NoopIndicator`], [`RecordingIndicator`] - backends
//! - [`SimulatedButton`], [`NoopButton`] - button backends

pub mod button;
pub mod controller;
pub mod indicator;

pub use button::{Button, NoopButton, PressCallback, SimulatedButton};
pub use controller::IndicatorController;
pub use indicator::{Indicator, NoopIndicator, RecordingIndicator, SimulatedPin};
