//! Readiness detection from server console output
//!
//! The server prints a line containing the readiness marker (`Done` for
//! Paper/Vanilla) once world loading finishes. One monitor task runs per
//! server process lifetime; it consumes the process event stream and
//! upgrades the status indicator to solid `On` when the marker appears.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use craftwarden_core::events::{IndicatorMode, ServerEvent};
use craftwarden_core::prelude::*;

/// Spawn the readiness monitor for one server run.
///
/// Consumes `events` until the stream closes (all process tasks have
/// dropped their senders). On the first stdout line containing `marker`
/// it sends a single `IndicatorMode::On` to `indicator_tx`; repeated
/// markers are ignored. The monitor never writes to the server and never
/// touches supervisor state — the indicator channel is its only output.
pub fn spawn_readiness_monitor(
    mut events: mpsc::Receiver<ServerEvent>,
    indicator_tx: mpsc::Sender<IndicatorMode>,
    marker: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ready = false;

        while let Some(event) = events.recv().await {
            match event {
                ServerEvent::Stdout(line) => {
                    if !ready && line.contains(&marker) {
                        info!("Server ready: {}", line);
                        ready = true;
                        // try_send: a full channel must never stall this task
                        let _ = indicator_tx.try_send(IndicatorMode::On);
                    }
                }
                ServerEvent::Stderr(line) => {
                    debug!("server stderr: {}", line);
                }
                ServerEvent::Exited { code } => {
                    if ready {
                        info!("Server exited with code {:?}", code);
                    } else {
                        warn!("Server exited before becoming ready (code {:?})", code);
                    }
                }
            }
        }

        debug!("readiness monitor finished");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn recv_mode(rx: &mut mpsc::Receiver<IndicatorMode>) -> Option<IndicatorMode> {
        tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test]
    async fn test_marker_sends_exactly_one_on() {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (indicator_tx, mut indicator_rx) = mpsc::channel(16);

        let handle = spawn_readiness_monitor(event_rx, indicator_tx, "Done".to_string());

        event_tx
            .send(ServerEvent::Stdout("[12:00:01 INFO]: Starting server".into()))
            .await
            .unwrap();
        event_tx
            .send(ServerEvent::Stdout(
                r#"[12:00:09 INFO]: Done (8.2s)! For help, type "help""#.into(),
            ))
            .await
            .unwrap();
        // Repeated marker must not produce a second message
        event_tx
            .send(ServerEvent::Stdout("[12:05:00 INFO]: Done again".into()))
            .await
            .unwrap();
        drop(event_tx);

        assert_eq!(recv_mode(&mut indicator_rx).await, Some(IndicatorMode::On));
        assert_eq!(recv_mode(&mut indicator_rx).await, None);

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_marker_on_stderr_is_ignored() {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (indicator_tx, mut indicator_rx) = mpsc::channel(16);

        let handle = spawn_readiness_monitor(event_rx, indicator_tx, "Done".to_string());

        event_tx
            .send(ServerEvent::Stderr("Done complaining".into()))
            .await
            .unwrap();
        drop(event_tx);

        assert_eq!(recv_mode(&mut indicator_rx).await, None);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_monitor_ends_when_stream_closes() {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (indicator_tx, _indicator_rx) = mpsc::channel(16);

        let handle = spawn_readiness_monitor(event_rx, indicator_tx, "Done".to_string());

        event_tx
            .send(ServerEvent::Exited { code: Some(1) })
            .await
            .unwrap();
        drop(event_tx);

        tokio::time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("monitor should end when the event stream closes")
            .unwrap();
    }
}
