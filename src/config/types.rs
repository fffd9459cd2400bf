//! Configuration types for craftwarden.toml

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level daemon settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub http: HttpSettings,
    pub server: ServerSettings,
    pub hardware: HardwareSettings,
}

/// HTTP control surface settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Listen address for the control API and status page
    pub listen: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Managed server settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Java binary, resolved through PATH unless absolute
    pub java_bin: String,
    /// JVM max heap (-Xmx)
    pub heap_max: String,
    /// JVM initial heap (-Xms)
    pub heap_min: String,
    /// Server jar path
    pub jar: PathBuf,
    /// Working directory the server runs in (world data, server.properties)
    pub working_dir: PathBuf,
    /// Console command requesting graceful shutdown
    pub stop_command: String,
    /// Seconds to wait for graceful exit before force-killing
    pub stop_timeout_secs: u64,
    /// Stdout substring marking the server as ready
    pub ready_marker: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            java_bin: "java".to_string(),
            heap_max: "512M".to_string(),
            heap_min: "128M".to_string(),
            jar: PathBuf::from("minecraft_server/paper-1.21.10-113.jar"),
            working_dir: PathBuf::from("minecraft_server"),
            stop_command: "stop".to_string(),
            stop_timeout_secs: 30,
            ready_marker: "Done".to_string(),
        }
    }
}

/// Hardware backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareMode {
    /// Simulated pins: full mode machine, transitions logged
    Simulated,
    /// No hardware at all: rendering calls are no-ops
    Off,
}

/// Hardware settings. Pin numbers label the simulated pins and are what a
/// real GPIO backend would bind to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareSettings {
    pub mode: HardwareMode,
    /// LED lit while the daemon itself is alive
    pub active_led_pin: u8,
    /// LED reflecting server status (off/blinking/on)
    pub status_led_pin: u8,
    /// Push button toggling the server
    pub button_pin: u8,
}

impl Default for HardwareSettings {
    fn default() -> Self {
        Self {
            mode: HardwareMode::Simulated,
            active_led_pin: 16,
            status_led_pin: 17,
            button_pin: 26,
        }
    }
}
