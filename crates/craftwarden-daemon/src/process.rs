//! Server child process management

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, Notify};

use craftwarden_core::events::ServerEvent;
use craftwarden_core::prelude::*;

use crate::launch::LaunchCommand;

/// Manages the Minecraft server child process.
///
/// The `Child` handle is moved into a dedicated `wait_for_exit` background task
/// that calls `child.wait()`. This ensures the real exit code is captured and
/// emitted as `ServerEvent::Exited { code: Some(N) }` rather than always `None`.
///
/// `ServerProcess` retains a kill channel ([`kill_tx`]) to request a force-kill,
/// an atomic flag ([`exited`]) for synchronous `is_running()` checks, and a
/// [`Notify`] handle so `shutdown()` can await exit without holding a lock
/// across `.await`. All methods take `&self`, so the supervisor can share the
/// handle behind an `Arc` while status polls run concurrently.
pub struct ServerProcess {
    /// Sender for console commands written to the child's stdin
    stdin_tx: mpsc::Sender<String>,
    /// Process ID for logging
    pid: Option<u32>,
    /// One-shot sender that tells the wait task to force-kill the process.
    /// Consumed on first use (or on drop).
    kill_tx: Mutex<Option<oneshot::Sender<()>>>,
    /// Set to `true` by the wait task once the child has exited.
    exited: Arc<AtomicBool>,
    /// Notified by the wait task immediately after the child exits.
    exit_notify: Arc<Notify>,
}

impl ServerProcess {
    /// Spawn the server process described by `launch`.
    ///
    /// Stdout/stderr lines and the final exit are sent to `event_tx` as
    /// [`ServerEvent`]s; the readiness monitor is the usual consumer.
    pub fn spawn(launch: &LaunchCommand, event_tx: mpsc::Sender<ServerEvent>) -> Result<Self> {
        info!(
            "Spawning server: {} {}",
            launch.program,
            launch.args.join(" ")
        );

        let mut child = Command::new(&launch.program)
            .args(&launch.args)
            .current_dir(&launch.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true) // Critical: cleanup on drop
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::java_not_found(&launch.program)
                } else {
                    Error::spawn(e.to_string())
                }
            })?;

        let pid = child.id();
        info!("Server process started with PID: {:?}", pid);

        // Take ownership of stdin and create the console command channel
        let stdin = child.stdin.take().expect("stdin was configured");
        let (stdin_tx, stdin_rx) = mpsc::channel::<String>(32);
        tokio::spawn(Self::stdin_writer(stdin, stdin_rx));

        // Spawn stdout reader task (does not emit Exited — that's the wait task's job)
        let stdout = child.stdout.take().expect("stdout was configured");
        tokio::spawn(Self::stdout_reader(stdout, event_tx.clone()));

        // Spawn stderr reader task
        let stderr = child.stderr.take().expect("stderr was configured");
        tokio::spawn(Self::stderr_reader(stderr, event_tx.clone()));

        // Shared exit-state primitives
        let exited = Arc::new(AtomicBool::new(false));
        let exit_notify = Arc::new(Notify::new());

        // Kill channel: ServerProcess holds the sender, wait task holds the receiver.
        let (kill_tx, kill_rx) = oneshot::channel::<()>();

        // Spawn the dedicated wait task — takes ownership of `child`.
        tokio::spawn(Self::wait_for_exit(
            child,
            kill_rx,
            event_tx,
            Arc::clone(&exited),
            Arc::clone(&exit_notify),
        ));

        Ok(Self {
            stdin_tx,
            pid,
            kill_tx: Mutex::new(Some(kill_tx)),
            exited,
            exit_notify,
        })
    }

    /// Background task: owns `child`, waits for it to exit, emits `ServerEvent::Exited`.
    ///
    /// Two ways the task can end:
    /// 1. The server exits naturally — `child.wait()` resolves.
    /// 2. `kill_rx` fires — we kill the child first, then wait for it.
    async fn wait_for_exit(
        mut child: Child,
        kill_rx: oneshot::Receiver<()>,
        event_tx: mpsc::Sender<ServerEvent>,
        exited: Arc<AtomicBool>,
        exit_notify: Arc<Notify>,
    ) {
        let code: Option<i32> = tokio::select! {
            // Natural exit path
            result = child.wait() => {
                match result {
                    Ok(status) => {
                        info!("Server process exited with status: {:?}", status);
                        status.code()
                    }
                    Err(e) => {
                        error!("Error waiting for server process: {}", e);
                        None
                    }
                }
            }
            // Force-kill path: kill_tx was sent (by shutdown or drop)
            _ = kill_rx => {
                info!("Kill signal received, force-killing server process");
                if let Err(e) = child.kill().await {
                    error!("Failed to kill server process: {}", e);
                }
                match child.wait().await {
                    Ok(status) => {
                        info!("Server process killed, exit status: {:?}", status);
                        status.code()
                    }
                    Err(e) => {
                        error!("Error waiting after kill: {}", e);
                        None
                    }
                }
            }
        };

        // Mark the process as exited and wake any waiters before sending the
        // event, so `is_running()` is already false when the event is observed.
        exited.store(true, Ordering::Release);
        exit_notify.notify_waiters();

        debug!("Sending ServerEvent::Exited {{ code: {:?} }}", code);
        let _ = event_tx.send(ServerEvent::Exited { code }).await;
    }

    /// Read lines from stdout and send as `ServerEvent::Stdout`.
    async fn stdout_reader(stdout: tokio::process::ChildStdout, tx: mpsc::Sender<ServerEvent>) {
        let mut reader = BufReader::new(stdout).lines();

        while let Ok(Some(line)) = reader.next_line().await {
            trace!("stdout: {}", line);

            if tx.send(ServerEvent::Stdout(line)).await.is_err() {
                debug!("stdout channel closed");
                break;
            }
        }

        // Stdout EOF just means the pipe closed; the process may still be
        // shutting down. The wait task emits Exited with the real exit code.
        debug!("stdout reader finished");
    }

    /// Read lines from stderr and send as `ServerEvent::Stderr`.
    async fn stderr_reader(stderr: tokio::process::ChildStderr, tx: mpsc::Sender<ServerEvent>) {
        let mut reader = BufReader::new(stderr).lines();

        while let Ok(Some(line)) = reader.next_line().await {
            trace!("stderr: {}", line);

            if tx.send(ServerEvent::Stderr(line)).await.is_err() {
                debug!("stderr channel closed");
                break;
            }
        }

        debug!("stderr reader finished");
    }

    /// Write console commands to stdin, one per line.
    async fn stdin_writer(mut stdin: tokio::process::ChildStdin, mut rx: mpsc::Receiver<String>) {
        while let Some(command) = rx.recv().await {
            debug!("Sending to server console: {}", command);

            if let Err(e) = stdin.write_all(command.as_bytes()).await {
                error!("Failed to write to stdin: {}", e);
                break;
            }
            if let Err(e) = stdin.write_all(b"\n").await {
                error!("Failed to write newline: {}", e);
                break;
            }
            if let Err(e) = stdin.flush().await {
                error!("Failed to flush stdin: {}", e);
                break;
            }
        }

        debug!("stdin writer finished");
    }

    /// Send a console command to the server (newline appended by the writer).
    pub async fn send(&self, command: &str) -> Result<()> {
        self.stdin_tx
            .send(command.to_string())
            .await
            .map_err(|_| Error::channel_send("stdin channel closed"))
    }

    /// Gracefully shut down the server process.
    ///
    /// 1. Early exit if the process is already dead (atomic check — no lock)
    /// 2. Write `stop_command` to the server console
    /// 3. Wait up to `grace` for exit via `exit_notify`
    /// 4. On timeout, send the kill signal to the wait task and wait
    ///    unconditionally — a zombie is a worse failure than a slow shutdown
    pub async fn shutdown(&self, stop_command: &str, grace: Duration) -> Result<()> {
        use tokio::time::timeout;

        // Fast path: if the process already exited, we're done
        if self.has_exited() {
            info!("Server process already exited, skipping stop command");
            return Ok(());
        }

        info!("Initiating server shutdown (grace: {:?})", grace);

        // Best effort: if stdin is already gone the process is on its way out,
        // and the timed wait below still covers us.
        if let Err(e) = self.send(stop_command).await {
            warn!("Failed to send stop command (continuing): {}", e);
        }

        // Race-free pattern: create the `notified()` future BEFORE the final
        // `has_exited()` check, so we cannot miss a notification that fires
        // between the check and the await.
        let notified = self.exit_notify.notified();
        if self.has_exited() {
            info!("Server process exited gracefully");
            return Ok(());
        }

        match timeout(grace, notified).await {
            Ok(()) => {
                info!("Server process exited gracefully");
                Ok(())
            }
            Err(_) => {
                warn!("Timeout waiting for graceful exit, force killing");
                self.force_kill();
                // No overall deadline here: the wait task always reaps the
                // child after a kill and then notifies. The short tick only
                // covers a notification landing before the waiter registers.
                loop {
                    let notified = self.exit_notify.notified();
                    if self.has_exited() {
                        break;
                    }
                    let _ = timeout(Duration::from_millis(100), notified).await;
                }
                info!("Server process terminated after force kill");
                Ok(())
            }
        }
    }

    /// Force kill the process by signalling the wait task.
    ///
    /// The wait task calls `child.kill()` and then `child.wait()`, ensuring the
    /// OS reaps the process correctly before emitting `ServerEvent::Exited`.
    pub fn force_kill(&self) {
        let tx = self
            .kill_tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(tx) = tx {
            warn!("Force killing server process via kill channel");
            // Ignore send error — the wait task may have already exited naturally.
            let _ = tx.send(());
        }
    }

    /// Check if the process has already exited.
    ///
    /// Non-blocking, synchronous check backed by an atomic flag that the
    /// `wait_for_exit` task keeps current, so every read reflects real
    /// liveness rather than a value cached at spawn time.
    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }

    /// Check if the process is still running.
    pub fn is_running(&self) -> bool {
        !self.has_exited()
    }

    /// Get the process ID
    pub fn id(&self) -> Option<u32> {
        self.pid
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        if !self.has_exited() {
            warn!("ServerProcess dropped while process may still be running");
            // Send the kill signal so the wait task tears down the child
            // cleanly. If kill_tx was already consumed, this is a no-op.
            self.force_kill();
        }
        // kill_on_drop(true) on the Child is the final safety net if the
        // wait task hasn't had a chance to handle the kill yet.
        debug!("ServerProcess dropped");
    }
}
