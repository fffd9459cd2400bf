//! HTTP control surface
//!
//! Three JSON endpoints plus an embedded status page. Handlers are thin:
//! they call into the shared [`Supervisor`] and report its boolean outcome.
//! Serialization of concurrent requests happens inside the supervisor, not
//! here — two simultaneous POSTs are safe.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::watch;

use craftwarden_core::prelude::*;
use craftwarden_daemon::Supervisor;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Body of `GET /status`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
}

/// Body of `POST /start` and `POST /stop`
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub status: &'static str,
    pub message: String,
}

/// Build the control router around a shared supervisor.
pub fn router(supervisor: Arc<Supervisor>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/status", get(status_handler))
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .with_state(supervisor)
}

/// Serve the control API until the shutdown signal fires.
pub async fn serve(
    listen_addr: &str,
    supervisor: Arc<Supervisor>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let addr: SocketAddr = listen_addr
        .parse()
        .map_err(|e| Error::http(format!("invalid listen address {:?}: {}", listen_addr, e)))?;

    let app = router(supervisor);

    info!("Control API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::http(format!("failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|&stop| stop).await;
        })
        .await
        .map_err(|e| Error::http(e.to_string()))
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn status_handler(State(supervisor): State<Arc<Supervisor>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: supervisor.status().as_str(),
        uptime_seconds: supervisor.uptime(),
    })
}

async fn start_handler(State(supervisor): State<Arc<Supervisor>>) -> Json<ActionResponse> {
    let ok = supervisor.start().await;
    let message = if ok {
        "Server started".to_string()
    } else {
        "Start failed, see daemon logs".to_string()
    };
    Json(ActionResponse {
        status: supervisor.status().as_str(),
        message,
    })
}

async fn stop_handler(State(supervisor): State<Arc<Supervisor>>) -> Json<ActionResponse> {
    supervisor.stop().await;
    Json(ActionResponse {
        status: supervisor.status().as_str(),
        message: "Server stopped".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    use craftwarden_daemon::{LaunchCommand, SupervisorConfig};
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    fn sh_supervisor(script: &str, dir: &Path) -> Arc<Supervisor> {
        let (tx, _rx) = mpsc::channel(32);
        let config = SupervisorConfig {
            launch: LaunchCommand {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), script.to_string()],
                working_dir: dir.to_path_buf(),
            },
            stop_command: "stop".to_string(),
            stop_timeout: Duration::from_secs(5),
            ready_marker: "Done".to_string(),
        };
        Arc::new(Supervisor::new(config, tx))
    }

    const OBEDIENT_SERVER: &str =
        r#"while read line; do if [ "$line" = "stop" ]; then exit 0; fi; done"#;

    #[tokio::test]
    async fn test_status_handler_stopped() {
        let dir = tempdir().unwrap();
        let supervisor = sh_supervisor(OBEDIENT_SERVER, dir.path());

        let Json(body) = status_handler(State(supervisor)).await;
        assert_eq!(body.status, "stopped");
        assert_eq!(body.uptime_seconds, 0);
    }

    #[tokio::test]
    async fn test_start_stop_round_trip() {
        let dir = tempdir().unwrap();
        let supervisor = sh_supervisor(OBEDIENT_SERVER, dir.path());

        let Json(body) = start_handler(State(Arc::clone(&supervisor))).await;
        assert_eq!(body.status, "running");
        assert_eq!(body.message, "Server started");

        let Json(body) = status_handler(State(Arc::clone(&supervisor))).await;
        assert_eq!(body.status, "running");

        let Json(body) = stop_handler(State(Arc::clone(&supervisor))).await;
        assert_eq!(body.status, "stopped");

        let Json(body) = status_handler(State(supervisor)).await;
        assert_eq!(body.status, "stopped");
        assert_eq!(body.uptime_seconds, 0);
    }

    #[tokio::test]
    async fn test_start_handler_reports_failure() {
        let dir = tempdir().unwrap();
        let supervisor = {
            let (tx, _rx) = mpsc::channel(32);
            let config = SupervisorConfig {
                launch: LaunchCommand {
                    program: "craftwarden-no-such-binary".to_string(),
                    args: vec![],
                    working_dir: dir.path().to_path_buf(),
                },
                stop_command: "stop".to_string(),
                stop_timeout: Duration::from_secs(5),
                ready_marker: "Done".to_string(),
            };
            Arc::new(Supervisor::new(config, tx))
        };

        let Json(body) = start_handler(State(supervisor)).await;
        assert_eq!(body.status, "stopped");
        assert!(body.message.contains("failed"));
    }

    #[tokio::test]
    async fn test_status_response_serializes() {
        let body = StatusResponse {
            status: "running",
            uptime_seconds: 42,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["uptime_seconds"], 42);
    }

    #[tokio::test]
    async fn test_index_serves_embedded_page() {
        let Html(page) = index_handler().await;
        assert!(page.contains("craftwarden"));
    }
}
