//! Configuration file parsing for craftwarden
//!
//! One TOML file (`craftwarden.toml` by default) covering the HTTP listen
//! address, the managed server's launch parameters, and the hardware mode.

pub mod settings;
pub mod types;

pub use settings::{init_config_file, load_settings, supervisor_config};
pub use types::{HardwareMode, HardwareSettings, HttpSettings, ServerSettings, Settings};
