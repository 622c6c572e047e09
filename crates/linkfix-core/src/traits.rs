use crate::{
    error::LinkfixError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// Every chat platform implements this trait to receive and send
/// messages; the pipeline stays platform-agnostic behind it.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, LinkfixError>;

    /// Send a response back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), LinkfixError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), LinkfixError>;
}
