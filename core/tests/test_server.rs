// Server lifecycle and session registration over loopback TCP.

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
    use std::thread;
    use std::time::{Duration, Instant};

    use netkit_core::channel::Channel;
    use netkit_core::config::{ChannelConfig, ServerConfig};
    use netkit_core::crypto::SessionKey;
    use netkit_core::server::{Server, ServerError, ServerState, SessionRegistry};

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    /// Route the accept loop's tracing output to the test harness.
    /// `RUST_LOG=netkit_core=debug cargo test` to see it.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn channel_config() -> ChannelConfig {
        ChannelConfig::new(SessionKey::from_bytes([0x42; 32]))
            .with_timeout(Some(Duration::from_secs(5)))
    }

    fn server_config() -> ServerConfig {
        let any_port: SocketAddr = "127.0.0.1:0".parse().unwrap();
        ServerConfig::new(any_port, channel_config()).with_grace(Duration::from_millis(500))
    }

    fn connect(server: &Server) -> Channel<TcpStream> {
        let stream = TcpStream::connect(server.local_addr().unwrap()).unwrap();
        Channel::new(stream, &channel_config()).unwrap()
    }

    /// Poll until the accept loop has registered `peer`.
    fn wait_for(registry: &SessionRegistry, peer: &IpAddr) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if registry.contains(peer) {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    // ✅ 1. Accepted connection shows up under the client IP and talks both ways
    #[test]
    fn accepted_connection_is_registered() -> anyhow::Result<()> {
        init_tracing();
        let mut server = Server::start(server_config())?;
        assert_eq!(server.state(), ServerState::Listening);
        assert_ne!(server.local_addr().map(|a| a.port()), Some(0));

        let mut client = connect(&server);
        let registry = server.registry();
        assert!(wait_for(&registry, &LOCALHOST));

        let session = registry
            .get(&LOCALHOST)
            .ok_or_else(|| anyhow::anyhow!("no session for {LOCALHOST}"))?;
        client.send(b"hello server")?;
        assert_eq!(session.lock().receive()?, b"hello server");

        session.lock().send(b"hello client")?;
        assert_eq!(client.receive()?, b"hello client");

        server.stop()?;
        Ok(())
    }

    // ✅ 2. Registered channels survive stop
    #[test]
    fn stop_leaves_sessions_open() {
        init_tracing();
        let mut server = Server::start(server_config()).unwrap();
        let mut client = connect(&server);
        let registry = server.registry();
        assert!(wait_for(&registry, &LOCALHOST));

        server.stop().unwrap();
        assert_eq!(server.state(), ServerState::Stopped);

        let session = registry.get(&LOCALHOST).unwrap();
        client.send(b"still here").unwrap();
        assert_eq!(session.lock().receive().unwrap(), b"still here");
    }

    // ✅ 3. stop is idempotent and the port stops accepting
    #[test]
    fn stop_is_idempotent() {
        let mut server = Server::start(server_config()).unwrap();
        let addr = server.local_addr().unwrap();

        let started = Instant::now();
        server.stop().unwrap();
        server.stop().unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));

        assert!(TcpStream::connect(addr).is_err());
        assert!(server.registry().is_empty());
    }

    // ✅ 3b. Even a near-zero grace delay leaves the port closed once stop returns
    #[test]
    fn short_grace_still_closes_port() {
        let cfg = server_config().with_grace(Duration::from_millis(1));
        let mut server = Server::start(cfg).unwrap();
        let addr = server.local_addr().unwrap();

        server.stop().unwrap();
        assert!(TcpStream::connect(addr).is_err());
        assert!(server.registry().is_empty());
    }

    // ❌ 4. Out-of-order lifecycle calls
    #[test]
    fn invalid_transitions_are_rejected() {
        let mut server = Server::new(server_config()).unwrap();
        assert_eq!(server.state(), ServerState::Uninitialized);

        assert!(matches!(
            server.listen(),
            Err(ServerError::InvalidState { op: "listen", state: ServerState::Uninitialized })
        ));
        assert!(matches!(server.stop(), Err(ServerError::InvalidState { op: "stop", .. })));

        server.bind().unwrap();
        assert_eq!(server.state(), ServerState::Initialized);
        assert!(matches!(server.bind(), Err(ServerError::InvalidState { op: "bind", .. })));

        server.listen().unwrap();
        assert!(matches!(server.listen(), Err(ServerError::InvalidState { .. })));

        server.stop().unwrap();
        assert!(matches!(server.bind(), Err(ServerError::InvalidState { .. })));
        assert!(matches!(server.listen(), Err(ServerError::InvalidState { .. })));
    }

    // ✅ 5. Bound but never listened: stop just releases the socket
    #[test]
    fn stop_without_listen() {
        let mut server = Server::new(server_config()).unwrap();
        let addr = server.bind().unwrap();
        server.stop().unwrap();
        assert_eq!(server.state(), ServerState::Stopped);
        assert!(TcpStream::connect(addr).is_err());
    }

    // ✅ 6. Caller-supplied registry is the one that gets filled
    #[test]
    fn shared_registry_is_filled() {
        let registry = SessionRegistry::new();
        let mut server = Server::with_registry(server_config(), registry.clone()).unwrap();
        server.bind().unwrap();
        server.listen().unwrap();

        let _client = connect(&server);
        assert!(wait_for(&registry, &LOCALHOST));
        assert_eq!(registry.peers(), vec![LOCALHOST]);

        let removed = registry.remove(&LOCALHOST);
        assert!(removed.is_some());
        assert!(registry.is_empty());
    }

    // ✅ 7. A second connection from the same IP replaces the first
    #[test]
    fn reconnect_replaces_entry() {
        init_tracing();
        let mut server = Server::start(server_config()).unwrap();
        let registry = server.registry();

        let mut first = connect(&server);
        assert!(wait_for(&registry, &LOCALHOST));
        let first_session = registry.get(&LOCALHOST).unwrap();

        let mut second = connect(&server);
        let deadline = Instant::now() + Duration::from_secs(5);
        let second_session = loop {
            let current = registry.get(&LOCALHOST).unwrap();
            if !std::sync::Arc::ptr_eq(&current, &first_session) || Instant::now() > deadline {
                break current;
            }
            thread::sleep(Duration::from_millis(10));
        };
        assert!(!std::sync::Arc::ptr_eq(&second_session, &first_session));
        assert_eq!(registry.len(), 1);

        second.send(b"from second").unwrap();
        assert_eq!(second_session.lock().receive().unwrap(), b"from second");

        // The replaced channel is still usable by whoever holds it.
        first.send(b"from first").unwrap();
        assert_eq!(first_session.lock().receive().unwrap(), b"from first");

        server.stop().unwrap();
    }

    // ❌ 8. Invalid channel settings fail at construction
    #[test]
    fn invalid_config_is_rejected() {
        let cfg = ServerConfig::new(
            "127.0.0.1:0".parse().unwrap(),
            channel_config().with_chunk_size(0),
        );
        assert!(matches!(Server::new(cfg), Err(ServerError::Config(_))));
    }

    #[test]
    fn clear_returns_entries() {
        let mut server = Server::start(server_config()).unwrap();
        let _client = connect(&server);
        let registry = server.registry();
        assert!(wait_for(&registry, &LOCALHOST));

        let drained = registry.clear();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].0, LOCALHOST);
        for (_, session) in drained {
            session.lock().close().unwrap();
        }
        assert!(registry.is_empty());
        server.stop().unwrap();
    }
}
