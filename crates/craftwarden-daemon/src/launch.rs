//! Launch command construction and runtime dependency checks
//!
//! The server is launched with a fixed argument vector
//! (`java -Xmx<max> -Xms<min> -jar <jar> nogui`) in its own working
//! directory. The Java runtime is resolved through `PATH` before every
//! spawn attempt, since the supervisor may outlive a JVM uninstall.

use std::path::{Path, PathBuf};

use craftwarden_core::prelude::*;

/// Program, arguments, and working directory used to spawn the server.
#[derive(Debug, Clone)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl LaunchCommand {
    /// Standard Paper/Vanilla server invocation.
    ///
    /// Validates that the jar and working directory exist; runtime
    /// availability is checked separately at spawn time.
    pub fn java_server(
        java_bin: impl Into<String>,
        heap_max: &str,
        heap_min: &str,
        server_jar: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let server_jar = server_jar.into();
        let working_dir = working_dir.into();

        if !working_dir.is_dir() {
            return Err(Error::no_working_dir(working_dir));
        }
        if !server_jar.is_file() {
            return Err(Error::no_server_jar(server_jar));
        }

        Ok(Self {
            program: java_bin.into(),
            args: vec![
                format!("-Xmx{}", heap_max),
                format!("-Xms{}", heap_min),
                "-jar".to_string(),
                server_jar.to_string_lossy().into_owned(),
                "nogui".to_string(),
            ],
            working_dir,
        })
    }

    /// Check whether the runtime program resolves through `PATH`
    /// (or is a valid absolute path).
    pub fn runtime_available(&self) -> bool {
        if Path::new(&self.program).is_absolute() {
            return Path::new(&self.program).is_file();
        }
        which::which(&self.program).is_ok()
    }

    /// Like [`runtime_available`](Self::runtime_available) but returns a
    /// typed error naming the missing binary.
    pub fn ensure_runtime(&self) -> Result<()> {
        if self.runtime_available() {
            Ok(())
        } else {
            Err(Error::java_not_found(&self.program))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_java_server_builds_fixed_argv() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("paper.jar");
        std::fs::write(&jar, b"").unwrap();

        let cmd = LaunchCommand::java_server("java", "512M", "128M", &jar, dir.path()).unwrap();

        assert_eq!(cmd.program, "java");
        assert_eq!(cmd.args[0], "-Xmx512M");
        assert_eq!(cmd.args[1], "-Xms128M");
        assert_eq!(cmd.args[2], "-jar");
        assert_eq!(cmd.args[4], "nogui");
        assert_eq!(cmd.working_dir, dir.path());
    }

    #[test]
    fn test_java_server_missing_jar() {
        let dir = tempdir().unwrap();
        let result =
            LaunchCommand::java_server("java", "512M", "128M", dir.path().join("no.jar"), dir.path());
        assert!(matches!(result, Err(Error::NoServerJar { .. })));
    }

    #[test]
    fn test_java_server_missing_working_dir() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("paper.jar");
        std::fs::write(&jar, b"").unwrap();

        let result = LaunchCommand::java_server("java", "512M", "128M", &jar, "/nonexistent/dir");
        assert!(matches!(result, Err(Error::NoWorkingDir { .. })));
    }

    #[test]
    fn test_runtime_available_for_sh() {
        let cmd = LaunchCommand {
            program: "sh".to_string(),
            args: vec![],
            working_dir: PathBuf::from("."),
        };
        assert!(cmd.runtime_available());
        assert!(cmd.ensure_runtime().is_ok());
    }

    #[test]
    fn test_runtime_missing() {
        let cmd = LaunchCommand {
            program: "craftwarden-no-such-binary".to_string(),
            args: vec![],
            working_dir: PathBuf::from("."),
        };
        assert!(!cmd.runtime_available());
        assert!(matches!(
            cmd.ensure_runtime(),
            Err(Error::JavaNotFound { .. })
        ));
    }
}
