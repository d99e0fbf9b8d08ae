//! netkit-core
//!
//! Two independent building blocks:
//! - an encrypted, framed message channel over TCP, with a server accept loop
//!   that registers every connection in a session registry
//! - a path expression engine that reads and writes nested JSON values
//!   through `.a.b[1:3]`-style paths

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Channel stack, leaves first
pub mod crypto;
pub mod framing;
pub mod telemetry;
pub mod channel;
pub mod server;

// Independent of the channel stack
pub mod path;

pub use types::{NetkitError, Result};

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::channel::{Channel, ChannelError, Transport};
    pub use crate::config::{ChannelConfig, ServerConfig};
    pub use crate::crypto::{CipherSuite, SessionKey};
    pub use crate::framing::FramingMode;
    pub use crate::path::{resolve, resolve_and_write, Document, PathError, PathExpression};
    pub use crate::server::{Server, ServerState, SessionRegistry};
}
