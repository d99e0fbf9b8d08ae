use std::time::Duration;

/// Default read increment for `Channel::receive`.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Upper bound on a single length-prefixed frame body (16 MiB).
/// Checked against the header before any allocation happens.
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Width of the big-endian length header in length-prefixed mode.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Delimiter used by the legacy delimiter-terminated wire mode.
pub const DEFAULT_DELIMITER: &[u8] = b"<end_of_bytes>";

/// Bind address used when none is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:7878";

/// How long `Server::stop` waits for the accept loop to exit.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(500);

/// Sleep between accept polls when no connection is pending.
pub const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Sleep after a failed accept (EMFILE and friends) before trying again.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(200);

/// Cipher suite identifiers.
pub mod cipher_ids {
    pub const AES256_GCM: u16        = 0x0001;
    pub const CHACHA20_POLY1305: u16 = 0x0002;
}

/// HKDF `info` label binding derived keys to this protocol.
pub const KDF_INFO_CHANNEL: &[u8] = b"netkit/channel/v1";

/// Environment variables read by `config::*::from_env`.
pub mod env {
    pub const KEY: &str = "NETKIT_KEY";
    pub const SECRET: &str = "NETKIT_SECRET";
    pub const CIPHER: &str = "NETKIT_CIPHER";
    pub const CHUNK_SIZE: &str = "NETKIT_CHUNK_SIZE";
    pub const MAX_BUFFER: &str = "NETKIT_MAX_BUFFER";
    pub const BIND: &str = "NETKIT_BIND";
    pub const GRACE_MS: &str = "NETKIT_GRACE_MS";
}
