use thiserror::Error;

use crate::channel::ChannelError;
use crate::config::ConfigError;
use crate::crypto::CryptoError;
use crate::framing::FrameError;
use crate::path::PathError;
use crate::server::ServerError;

/// Unified error covering every layer of the crate.
/// - `From<T>` impls enable `?` across layers.
/// - Each variant keeps the layer's own error intact for matching.
#[derive(Debug, Error)]
pub enum NetkitError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("server error: {0}")]
    Server(#[from] ServerError),

    #[error("path error: {0}")]
    Path(#[from] PathError),
}

pub type Result<T, E = NetkitError> = std::result::Result<T, E>;
