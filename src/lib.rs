//! craftwarden - Minecraft server supervisor daemon
//!
//! Supervises a Paper/Vanilla server child process with three trigger
//! surfaces: an HTTP control API, an embedded status page, and a physical
//! push button. Server state is mirrored on a status LED (off / blinking
//! while starting or stopping / solid once the server prints its readiness
//! line). Hardware is consumed through capability traits, so the daemon runs
//! unchanged with simulated pins.
//!
//! The workspace splits along the same lines as the crates it builds on:
//! [`craftwarden_core`] for domain types, [`craftwarden_daemon`] for process
//! supervision, [`craftwarden_hw`] for the hardware capability surface. This
//! crate wires them together behind the control API.

pub mod api;
pub mod app;
pub mod config;
pub mod signals;

pub use app::run;
pub use config::Settings;
