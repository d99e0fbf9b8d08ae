use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError};
use tracing::{debug, info, warn};

use crate::channel::Channel;
use crate::config::{ChannelConfig, ServerConfig};
use crate::constants::{ACCEPT_ERROR_BACKOFF, ACCEPT_POLL_INTERVAL};

use super::registry::SessionRegistry;
use super::types::{ServerError, ServerState};

/// Sleeps used by the accept loop between attempts.
#[derive(Debug, Clone, Copy)]
struct Pacing {
    /// No connection pending.
    poll: Duration,
    /// Accept failed with a real error.
    backoff: Duration,
}

impl Pacing {
    const DEFAULT: Pacing = Pacing { poll: ACCEPT_POLL_INTERVAL, backoff: ACCEPT_ERROR_BACKOFF };

    /// Longest stretch the loop spends without looking at the stop flag.
    fn stop_latency(&self) -> Duration {
        self.poll.max(self.backoff)
    }
}

/// Accept thread handle plus its exit notification.
struct AcceptWorker {
    handle: JoinHandle<()>,
    done_rx: Receiver<()>,
}

/// Listening socket whose accept loop feeds a [`SessionRegistry`].
pub struct Server {
    config: ServerConfig,
    registry: SessionRegistry,
    state: ServerState,
    listener: Option<TcpListener>,
    local_addr: Option<SocketAddr>,
    stop_flag: Arc<AtomicBool>,
    worker: Option<AcceptWorker>,
}

impl Server {
    /// New server with its own registry.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        Self::with_registry(config, SessionRegistry::new())
    }

    /// New server that fills a registry supplied by the caller.
    pub fn with_registry(config: ServerConfig, registry: SessionRegistry) -> Result<Self, ServerError> {
        config.validate()?;
        Ok(Self {
            config,
            registry,
            state: ServerState::Uninitialized,
            listener: None,
            local_addr: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }

    /// `new` + `bind` + `listen`.
    pub fn start(config: ServerConfig) -> Result<Self, ServerError> {
        let mut server = Self::new(config)?;
        server.bind()?;
        server.listen()?;
        Ok(server)
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Handle on the registry this server writes to.
    pub fn registry(&self) -> SessionRegistry {
        self.registry.clone()
    }

    /// Bound address, with the real port when the config asked for port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Bind the configured address. `Uninitialized -> Initialized`.
    pub fn bind(&mut self) -> Result<SocketAddr, ServerError> {
        self.expect_state("bind", ServerState::Uninitialized)?;

        let listener = TcpListener::bind(self.config.bind_addr)?;
        let addr = listener.local_addr()?;

        self.listener = Some(listener);
        self.local_addr = Some(addr);
        self.state = ServerState::Initialized;
        debug!(%addr, "server bound");
        Ok(addr)
    }

    /// Start the accept loop on a background thread. `Initialized -> Listening`.
    pub fn listen(&mut self) -> Result<(), ServerError> {
        self.expect_state("listen", ServerState::Initialized)?;
        let listener = self
            .listener
            .take()
            .ok_or(ServerError::InvalidState { op: "listen", state: self.state })?;

        // Polled, so the loop sees the stop flag without a wake-up connection.
        listener.set_nonblocking(true)?;

        let (done_tx, done_rx) = bounded(1);
        let stop = Arc::clone(&self.stop_flag);
        let registry = self.registry.clone();
        let channel_cfg = self.config.channel.clone();

        let handle = thread::Builder::new()
            .name("netkit-accept".into())
            .spawn(move || {
                accept_loop(|| listener.accept(), &stop, &registry, &channel_cfg, Pacing::DEFAULT);
                // Listener drops here, closing the socket.
                drop(listener);
                let _ = done_tx.send(());
            })?;

        self.worker = Some(AcceptWorker { handle, done_rx });
        self.state = ServerState::Listening;
        if let Some(addr) = self.local_addr {
            info!(%addr, "server listening");
        }
        Ok(())
    }

    /// Stop accepting. `Listening | Initialized -> Stopped`; no-op when already stopped.
    ///
    /// Sets the stop flag and waits for the accept loop to close the socket and
    /// exit. The wait is the grace delay, stretched to cover one full poll or
    /// error backoff. Registered channels are left untouched.
    ///
    /// Should the wait still run out, the thread is detached; it closes the
    /// socket itself the next time it looks at the flag.
    pub fn stop(&mut self) -> Result<(), ServerError> {
        match self.state {
            ServerState::Stopped => return Ok(()),
            ServerState::Uninitialized => {
                return Err(ServerError::InvalidState { op: "stop", state: self.state });
            }
            ServerState::Initialized | ServerState::Listening => {}
        }

        self.stop_flag.store(true, Ordering::Release);
        self.state = ServerState::Stopped;
        // Never listened: dropping the socket is all there is.
        self.listener = None;

        if let Some(worker) = self.worker.take() {
            let wait = self.config.grace.max(Pacing::DEFAULT.stop_latency() * 2);
            match worker.done_rx.recv_timeout(wait) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    let _ = worker.handle.join();
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(wait_ms = wait.as_millis() as u64,
                          "accept loop still running after grace delay; detaching");
                }
            }
        }

        info!("server stopped");
        Ok(())
    }

    fn expect_state(&self, op: &'static str, expected: ServerState) -> Result<(), ServerError> {
        if self.state != expected {
            return Err(ServerError::InvalidState { op, state: self.state });
        }
        Ok(())
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if matches!(self.state, ServerState::Initialized | ServerState::Listening) {
            let _ = self.stop();
        }
    }
}

/// Accept until `stop` is set. `accept` is `TcpListener::accept` on a
/// non-blocking listener: `WouldBlock` means nothing is pending.
fn accept_loop<A>(
    mut accept: A,
    stop: &AtomicBool,
    registry: &SessionRegistry,
    channel_cfg: &ChannelConfig,
    pacing: Pacing,
) where
    A: FnMut() -> io::Result<(TcpStream, SocketAddr)>,
{
    while !stop.load(Ordering::Acquire) {
        let (stream, peer) = match accept() {
            Ok(conn) => conn,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(pacing.poll);
                continue;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                // EMFILE/ENFILE fail on every call until descriptors free up.
                warn!(error = %e, backoff_ms = pacing.backoff.as_millis() as u64, "accept failed");
                thread::sleep(pacing.backoff);
                continue;
            }
        };

        // Some platforms hand out sockets that inherit the listener's mode.
        if let Err(e) = stream.set_nonblocking(false) {
            warn!(%peer, error = %e, "dropping connection that cannot be made blocking");
            continue;
        }

        match Channel::new(stream, channel_cfg) {
            Ok(channel) => {
                let replaced = registry.insert(peer.ip(), channel).is_some();
                debug!(%peer, replaced, "session registered");
            }
            Err(e) => warn!(%peer, error = %e, "failed to set up channel"),
        }
    }

    debug!("accept loop exited");
}
