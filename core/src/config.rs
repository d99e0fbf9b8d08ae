//! config.rs
//! Channel and server configuration.
//!
//! Key material has no default. A config without a key cannot be built, and
//! `from_env` fails with `ConfigError::MissingKey` instead of falling back to a
//! shared secret.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{env, DEFAULT_BIND, DEFAULT_CHUNK_SIZE, DEFAULT_GRACE, DEFAULT_MAX_FRAME_LEN};
use crate::crypto::{CipherSuite, CryptoError, SessionKey};
use crate::framing::{FrameError, FramingMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no key material: set {} (64 hex chars) or {}", env::KEY, env::SECRET)]
    MissingKey,

    #[error("invalid key material: {0}")]
    InvalidKey(#[from] CryptoError),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid framing: {0}")]
    Framing(#[from] FrameError),
}

/// Per-channel settings.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub key: SessionKey,
    pub cipher: CipherSuite,
    pub framing: FramingMode,
    /// Read increment used by `Channel::receive`.
    pub chunk_size: usize,
    /// Receive buffer bound; `None` is unbounded.
    pub max_buffer: Option<usize>,
    /// Largest frame body accepted or produced.
    pub max_frame_len: usize,
    /// Read/write timeout applied when the channel is built.
    pub timeout: Option<Duration>,
}

impl ChannelConfig {
    pub fn new(key: SessionKey) -> Self {
        Self {
            key,
            cipher: CipherSuite::default(),
            framing: FramingMode::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_buffer: None,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            timeout: None,
        }
    }

    pub fn with_cipher(mut self, cipher: CipherSuite) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn with_framing(mut self, framing: FramingMode) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_buffer(mut self, max_buffer: Option<usize>) -> Self {
        self.max_buffer = max_buffer;
        self
    }

    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.framing.validate()?;
        if self.chunk_size == 0 {
            return Err(invalid(env::CHUNK_SIZE, "0", "must be at least 1"));
        }
        if self.max_frame_len == 0 {
            return Err(invalid("max_frame_len", "0", "must be at least 1"));
        }
        if self.max_buffer == Some(0) {
            return Err(invalid(env::MAX_BUFFER, "0", "must be at least 1"));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(invalid("timeout", "0", "zero timeouts are rejected by the OS"));
        }
        Ok(())
    }

    /// Build from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Recognised: `NETKIT_KEY` (hex, wins over `NETKIT_SECRET`), `NETKIT_SECRET`
    /// (HKDF-derived), `NETKIT_CIPHER`, `NETKIT_CHUNK_SIZE`, `NETKIT_MAX_BUFFER`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = match (lookup(env::KEY), lookup(env::SECRET)) {
            (Some(hex_key), _) => SessionKey::from_hex(&hex_key)?,
            (None, Some(secret)) => SessionKey::derive(secret.as_bytes(), None)?,
            (None, None) => return Err(ConfigError::MissingKey),
        };

        let mut cfg = Self::new(key);
        if let Some(raw) = lookup(env::CIPHER) {
            cfg.cipher = CipherSuite::from_name(&raw)
                .map_err(|e| invalid(env::CIPHER, &raw, &e.to_string()))?;
        }
        if let Some(raw) = lookup(env::CHUNK_SIZE) {
            cfg.chunk_size = parse_var(env::CHUNK_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(env::MAX_BUFFER) {
            cfg.max_buffer = Some(parse_var(env::MAX_BUFFER, &raw)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

/// Listener settings plus the config every accepted channel gets.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Wait for the accept loop to exit before the listener is dropped.
    pub grace: Duration,
    pub channel: ChannelConfig,
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr, channel: ChannelConfig) -> Self {
        Self {
            bind_addr,
            grace: DEFAULT_GRACE,
            channel,
        }
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.channel.validate()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Channel variables plus `NETKIT_BIND` and `NETKIT_GRACE_MS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let channel = ChannelConfig::from_lookup(&lookup)?;

        let bind_raw = lookup(env::BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = parse_var(env::BIND, &bind_raw)?;

        let mut cfg = Self::new(bind_addr, channel);
        if let Some(raw) = lookup(env::GRACE_MS) {
            cfg.grace = Duration::from_millis(parse_var(env::GRACE_MS, &raw)?);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_var<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| invalid(name, raw, &e.to_string()))
}
