use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::crypto::CryptoError;
use crate::framing::FrameError;
use crate::utils::is_timeout;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// Peer closed the stream, or the channel was closed locally.
    #[error("connection closed")]
    ConnectionClosed,

    /// Frame failed authentication. The frame is consumed; the channel stays usable.
    #[error("decryption failed: {0}")]
    Decryption(#[source] CryptoError),

    /// Sealing failed or the cipher could not be built.
    #[error("encryption failed: {0}")]
    Encryption(#[source] CryptoError),

    /// Receive buffer grew past its bound without completing a frame.
    #[error("receive buffer overflow: {buffered} bytes buffered, limit {limit}")]
    BufferOverflow { limit: usize, buffered: usize },

    /// Payload could not be serialized or deserialized.
    #[error("payload encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("framing error: {0}")]
    Frame(#[from] FrameError),

    #[error("invalid channel config: {0}")]
    Config(#[from] ConfigError),

    /// Any other I/O error, timeouts included, passed through unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ChannelError {
    /// True when a read or write deadline set by `set_timeout` expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ChannelError::Io(e) if is_timeout(e))
    }
}
