//! # craftwarden-core - Core Domain Types
//!
//! Foundation crate for craftwarden. Provides domain types, error handling,
//! event definitions, and the logging bootstrap.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Events (`events`)
//! - [`ServerEvent`] - Output and exit events from the managed server process
//! - [`IndicatorMode`] - Status indicator rendering mode (Off / On / Blinking)
//! - [`ServerStatus`] - Supervisor-visible server state (Running / Stopped)
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use craftwarden_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;

/// Prelude for common imports used throughout all craftwarden crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{IndicatorMode, ServerEvent, ServerStatus};
