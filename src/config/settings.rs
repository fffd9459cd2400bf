//! Settings parser for craftwarden.toml

use std::path::Path;
use std::time::Duration;

use craftwarden_core::prelude::*;
use craftwarden_daemon::{LaunchCommand, SupervisorConfig};

use super::types::Settings;

/// Load settings from the given TOML file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Write a commented default config file, if none exists yet.
pub fn init_config_file(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        return Ok(());
    }

    let default_content = r#"# craftwarden configuration

[http]
listen = "0.0.0.0:8000"

[server]
java_bin = "java"
heap_max = "512M"
heap_min = "128M"
jar = "minecraft_server/paper-1.21.10-113.jar"
working_dir = "minecraft_server"
stop_command = "stop"       # console command for graceful shutdown
stop_timeout_secs = 30      # grace before force-kill
ready_marker = "Done"       # stdout substring marking readiness

[hardware]
mode = "simulated"          # "simulated" or "off"
active_led_pin = 16
status_led_pin = 17
button_pin = 26
"#;
    std::fs::write(config_path, default_content)
        .map_err(|e| Error::config(format!("Failed to write {:?}: {}", config_path, e)))?;

    Ok(())
}

/// Build the supervisor config, validating jar and working directory.
pub fn supervisor_config(settings: &Settings) -> Result<SupervisorConfig> {
    let server = &settings.server;
    let launch = LaunchCommand::java_server(
        &server.java_bin,
        &server.heap_max,
        &server.heap_min,
        &server.jar,
        &server.working_dir,
    )?;

    Ok(SupervisorConfig {
        launch,
        stop_command: server.stop_command.clone(),
        stop_timeout: Duration::from_secs(server.stop_timeout_secs),
        ready_marker: server.ready_marker.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_defaults_when_missing() {
        let temp = tempdir().unwrap();
        let settings = load_settings(&temp.path().join("craftwarden.toml"));
        assert_eq!(settings.server.java_bin, "java");
        assert_eq!(settings.server.stop_timeout_secs, 30);
    }

    #[test]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("craftwarden.toml");
        std::fs::write(
            &path,
            r#"
[http]
listen = "127.0.0.1:9000"

[server]
stop_timeout_secs = 5
"#,
        )
        .unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.http.listen, "127.0.0.1:9000");
        assert_eq!(settings.server.stop_timeout_secs, 5);
        // Untouched sections keep defaults
        assert_eq!(settings.server.ready_marker, "Done");
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("craftwarden.toml");
        std::fs::write(&path, "not valid toml {{{{").unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.server.java_bin, "java");
    }

    #[test]
    fn test_init_config_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("craftwarden.toml");

        init_config_file(&path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        let _: Settings = toml::from_str(&content).expect("default config should be valid TOML");
    }

    #[test]
    fn test_init_config_file_idempotent() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("craftwarden.toml");

        init_config_file(&path).unwrap();
        std::fs::write(&path, "[http]\nlisten = \"1.2.3.4:1\"\n").unwrap();
        init_config_file(&path).unwrap();

        // Existing file is never overwritten
        let settings = load_settings(&path);
        assert_eq!(settings.http.listen, "1.2.3.4:1");
    }

    #[test]
    fn test_supervisor_config_validates_jar() {
        let temp = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.server.working_dir = temp.path().to_path_buf();
        settings.server.jar = temp.path().join("missing.jar");

        assert!(matches!(
            supervisor_config(&settings),
            Err(Error::NoServerJar { .. })
        ));
    }

    #[test]
    fn test_supervisor_config_builds_launch() {
        let temp = tempdir().unwrap();
        let jar = temp.path().join("paper.jar");
        std::fs::write(&jar, b"").unwrap();

        let mut settings = Settings::default();
        settings.server.working_dir = temp.path().to_path_buf();
        settings.server.jar = jar;
        settings.server.stop_timeout_secs = 7;

        let config = supervisor_config(&settings).unwrap();
        assert_eq!(config.launch.program, "java");
        assert_eq!(config.stop_timeout, Duration::from_secs(7));
        assert_eq!(config.stop_command, "stop");
    }
}
