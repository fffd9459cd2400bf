//! Domain event definitions

use serde::{Deserialize, Serialize};

/// Output and lifecycle events emitted by the managed server process.
///
/// The stdout/stderr reader tasks emit `Stdout`/`Stderr` per line; the
/// dedicated wait task emits exactly one `Exited` with the real exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// A line of server stdout (console log output)
    Stdout(String),
    /// A line of server stderr
    Stderr(String),
    /// The server process exited (naturally or after a kill)
    Exited { code: Option<i32> },
}

/// Rendering mode for the status indicator.
///
/// Owned by the indicator controller; every other component only sends
/// mode changes over the indicator channel, never touches the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorMode {
    Off,
    On,
    Blinking,
}

/// Supervisor-visible server state.
///
/// Computed by polling process liveness on every call, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Running,
    Stopped,
}

impl ServerStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ServerStatus::Running)
    }

    /// Stable string form used by the HTTP status endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Running => "running",
            ServerStatus::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(ServerStatus::Running.as_str(), "running");
        assert_eq!(ServerStatus::Stopped.as_str(), "stopped");
        assert!(ServerStatus::Running.is_running());
        assert!(!ServerStatus::Stopped.is_running());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ServerStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
    }

    #[test]
    fn test_indicator_mode_roundtrip() {
        let json = serde_json::to_string(&IndicatorMode::Blinking).unwrap();
        assert_eq!(json, "\"blinking\"");
        let mode: IndicatorMode = serde_json::from_str(&json).unwrap();
        assert_eq!(mode, IndicatorMode::Blinking);
    }
}
