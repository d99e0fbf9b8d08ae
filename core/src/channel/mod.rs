//! Framed encrypted channel.
//!
//! A [`Channel`] turns a duplex byte stream into a message pipe: every
//! `send` seals one payload under the shared key and frames it, every
//! `receive` reassembles one frame and opens it.
//!
//! A channel is single-reader/single-writer. `send` and `receive` take
//! `&mut self`; share one across threads behind a mutex (the session registry
//! does this for you).

pub mod types;
pub mod transport;
pub mod framed;

pub use types::ChannelError;
pub use transport::Transport;
pub use framed::Channel;
