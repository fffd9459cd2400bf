//! # craftwarden-daemon - Server Process Supervision
//!
//! Manages the Minecraft server child process: spawning, console I/O,
//! readiness detection, and the start/stop state machine.
//!
//! Depends on [`craftwarden_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Process Management
//! - [`ServerProcess`] - Spawn and manage the server child process
//! - [`LaunchCommand`] - Argument vector and working directory for the child
//!
//! ### Supervision
//! - [`Supervisor`] - start/stop/status/uptime operations, serialized across
//!   trigger sources (HTTP handlers and the physical button)
//! - [`SupervisorConfig`] - launch command, stop command, timeouts, marker
//!
//! ### Readiness
//! - [`spawn_readiness_monitor()`] - watch server output for the readiness
//!   marker and signal the indicator channel

pub mod launch;
pub mod process;
pub mod readiness;
pub mod supervisor;

// Public API re-exports
pub use launch::LaunchCommand;
pub use process::ServerProcess;
pub use readiness::spawn_readiness_monitor;
pub use supervisor::{Supervisor, SupervisorConfig};
