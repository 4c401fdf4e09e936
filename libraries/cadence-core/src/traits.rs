/// Collaborator traits for Cadence
use crate::error::TransportError;
use async_trait::async_trait;

/// Callback invoked exactly once when a stream ends
///
/// Receives `None` when the stream finished or was stopped, and the
/// transport error when it broke.
pub type CompletionCallback = Box<dyn FnOnce(Option<TransportError>) + Send + 'static>;

/// Streaming output for resolved tracks
///
/// A transport owns at most one connection and plays at most one source at a
/// time. Implementations must invoke the completion callback passed to
/// [`StreamingTransport::play`] exactly once, including when the stream is
/// ended by [`StreamingTransport::stop`] or by a disconnect.
#[async_trait]
pub trait StreamingTransport: Send + Sync {
    /// Connect to the given output channel
    ///
    /// # Errors
    /// Returns `TransportError::Connect` when the channel cannot be reached
    async fn connect(&self, channel: &str) -> Result<(), TransportError>;

    /// Drop the connection, ending any active stream
    ///
    /// With `force`, the stream is torn down without waiting for it to drain.
    async fn disconnect(&self, force: bool);

    /// Whether a connection is currently established
    fn is_connected(&self) -> bool;

    /// Whether a stream is currently running
    fn is_playing(&self) -> bool;

    /// Start streaming `source`
    ///
    /// Returns once the stream has been scheduled; streaming itself happens on
    /// the transport's own task.
    ///
    /// # Errors
    /// Returns an error if the transport is not connected or the stream
    /// cannot be started. The callback is dropped without being called in
    /// that case.
    fn play(&self, source: &str, on_complete: CompletionCallback) -> Result<(), TransportError>;

    /// Stop the active stream, if any
    fn stop(&self);
}
