//! TCP server: accept loop + session registry.
//!
//! Lifecycle: `Uninitialized -> Initialized (bind) -> Listening (listen) -> Stopped (stop)`.
//! Every accepted connection is wrapped in a [`Channel`](crate::channel::Channel)
//! and stored in the server's [`SessionRegistry`] under the peer's IP.

pub mod types;
pub mod registry;
pub mod listener;

pub use types::{ServerError, ServerState};
pub use registry::{SessionRegistry, SharedChannel};
pub use listener::Server;
