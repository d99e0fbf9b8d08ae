use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, TcpStream};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::channel::Channel;

/// A registered channel. The per-entry mutex is what makes a channel safe to
/// use from several threads; take it for the duration of one send or receive.
pub type SharedChannel = Arc<Mutex<Channel<TcpStream>>>;

/// Peer IP -> channel map filled by a server's accept loop.
///
/// Cloning is cheap and every clone sees the same map, so a registry can be
/// created up front and handed to both the server and its consumers.
/// Entries are never evicted on their own; use [`remove`](Self::remove) or
/// [`clear`](Self::clear). A new connection from an IP that already has an
/// entry replaces it.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<IpAddr, SharedChannel>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `channel` for `peer`. Returns the entry it replaced, if any.
    pub fn insert(&self, peer: IpAddr, channel: Channel<TcpStream>) -> Option<SharedChannel> {
        self.inner.lock().insert(peer, Arc::new(Mutex::new(channel)))
    }

    pub fn get(&self, peer: &IpAddr) -> Option<SharedChannel> {
        self.inner.lock().get(peer).cloned()
    }

    pub fn contains(&self, peer: &IpAddr) -> bool {
        self.inner.lock().contains_key(peer)
    }

    /// Remove and return the entry for `peer`. The channel is not closed.
    pub fn remove(&self, peer: &IpAddr) -> Option<SharedChannel> {
        self.inner.lock().remove(peer)
    }

    /// Drop every entry, returning them so the caller can close them.
    pub fn clear(&self) -> Vec<(IpAddr, SharedChannel)> {
        self.inner.lock().drain().collect()
    }

    pub fn peers(&self) -> Vec<IpAddr> {
        self.inner.lock().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("peers", &self.peers())
            .finish()
    }
}
