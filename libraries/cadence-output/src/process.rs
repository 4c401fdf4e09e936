//! One external process per track

use crate::error::OutputError;
use crate::settings::OutputSettings;
use async_trait::async_trait;
use cadence_core::{CompletionCallback, StreamingTransport, TransportError};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

#[derive(Default)]
struct OutputState {
    channel: Option<String>,
    active: Option<ActiveStream>,
    next_id: u64,
}

/// Handle on the running process; dropping it also ends the stream
struct ActiveStream {
    id: u64,
    stop: oneshot::Sender<()>,
}

/// Streams tracks by running the configured executable once per track
///
/// "Connecting" records the channel that is passed to the process as its
/// output target. Each [`play`](StreamingTransport::play) spawns a process
/// that is watched on its own task; the completion callback fires when it
/// exits (`None` on success or stop, `TransportError::Stream` on a failing
/// exit status). Stopping kills the process.
pub struct ProcessTransport {
    settings: OutputSettings,
    state: Arc<Mutex<OutputState>>,
}

fn lock(state: &Mutex<OutputState>) -> MutexGuard<'_, OutputState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProcessTransport {
    pub fn new(settings: OutputSettings) -> Self {
        Self {
            settings,
            state: Arc::new(Mutex::new(OutputState::default())),
        }
    }

    pub fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    /// Channel recorded by the last successful connect
    pub fn channel(&self) -> Option<String> {
        lock(&self.state).channel.clone()
    }

    fn spawn(&self, address: &str, channel: &str) -> Result<Child, OutputError> {
        let args = self.settings.arguments(address, channel);
        debug!(
            executable = %self.settings.executable.display(),
            ?args,
            "Starting stream process"
        );

        Command::new(&self.settings.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OutputError::Spawn {
                executable: self.settings.executable.clone(),
                source,
            })
    }
}

#[async_trait]
impl StreamingTransport for ProcessTransport {
    async fn connect(&self, channel: &str) -> Result<(), TransportError> {
        let channel = channel.trim();
        if channel.is_empty() {
            return Err(OutputError::EmptyChannel.into());
        }

        let previous = lock(&self.state).channel.replace(channel.to_string());
        if let Some(previous) = previous.filter(|previous| previous != channel) {
            debug!(from = %previous, to = %channel, "Switching output channel");
        }
        info!(channel = %channel, "Output connected");
        Ok(())
    }

    async fn disconnect(&self, force: bool) {
        let (channel, active) = {
            let mut state = lock(&self.state);
            (state.channel.take(), state.active.take())
        };

        if let Some(active) = active {
            debug!(stream = active.id, force, "Ending stream on disconnect");
            let _ = active.stop.send(());
        }
        if let Some(channel) = channel {
            info!(channel = %channel, force, "Output disconnected");
        }
    }

    fn is_connected(&self) -> bool {
        lock(&self.state).channel.is_some()
    }

    fn is_playing(&self) -> bool {
        lock(&self.state).active.is_some()
    }

    fn play(&self, source: &str, on_complete: CompletionCallback) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        let channel = state.channel.clone().ok_or(TransportError::NotConnected)?;
        if state.active.is_some() {
            return Err(OutputError::Busy.into());
        }

        let mut child = self.spawn(source, &channel)?;
        state.next_id += 1;
        let id = state.next_id;
        let (stop_tx, stop_rx) = oneshot::channel();
        state.active = Some(ActiveStream { id, stop: stop_tx });
        drop(state);

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(log_stderr(stderr, id));
        }
        tokio::spawn(watch(
            child,
            stop_rx,
            Arc::clone(&self.state),
            id,
            on_complete,
        ));

        info!(stream = id, source = %source, "Stream started");
        Ok(())
    }

    fn stop(&self) {
        let active = lock(&self.state).active.take();
        if let Some(active) = active {
            debug!(stream = active.id, "Stopping stream");
            let _ = active.stop.send(());
        }
    }
}

async fn watch(
    mut child: Child,
    stop: oneshot::Receiver<()>,
    state: Arc<Mutex<OutputState>>,
    id: u64,
    on_complete: CompletionCallback,
) {
    let outcome = tokio::select! {
        status = child.wait() => match status {
            Ok(status) if status.success() => {
                debug!(stream = id, "Stream finished");
                None
            }
            Ok(status) => {
                warn!(stream = id, %status, "Stream process failed");
                Some(TransportError::Stream(format!("process exited with {}", status)))
            }
            Err(e) => {
                warn!(stream = id, error = %e, "Lost track of stream process");
                Some(TransportError::Stream(e.to_string()))
            }
        },
        // Either an explicit stop or the transport going away
        _ = stop => {
            if let Err(e) = child.kill().await {
                warn!(stream = id, error = %e, "Failed to kill stream process");
            }
            debug!(stream = id, "Stream stopped");
            None
        }
    };

    {
        let mut state = lock(&state);
        if state.active.as_ref().is_some_and(|active| active.id == id) {
            state.active = None;
        }
    }

    on_complete(outcome);
}

async fn log_stderr(stderr: ChildStderr, id: u64) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(stream = id, "{}", line);
    }
}
