use std::fmt;
use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ChannelConfig;
use crate::crypto::AeadImpl;
use crate::framing::{encode_frame, FrameDecoder, FramingMode};
use crate::telemetry::ChannelCounters;
use crate::utils::is_peer_closed;

use super::transport::Transport;
use super::types::ChannelError;

/// Message-oriented encrypted pipe over a [`Transport`].
pub struct Channel<S: Transport> {
    stream: S,
    aead: AeadImpl,
    decoder: FrameDecoder,
    chunk_size: usize,
    max_buffer: Option<usize>,
    max_frame_len: usize,
    closed: bool,
    counters: ChannelCounters,
}

impl<S: Transport> Channel<S> {
    /// Wrap `stream`. Validates `config`, builds the cipher and applies the
    /// configured timeout.
    pub fn new(stream: S, config: &ChannelConfig) -> Result<Self, ChannelError> {
        config.validate()?;
        let aead = AeadImpl::new(config.cipher, &config.key).map_err(ChannelError::Encryption)?;
        if config.timeout.is_some() {
            stream.set_timeouts(config.timeout)?;
        }

        Ok(Self {
            stream,
            aead,
            decoder: FrameDecoder::new(config.framing.clone(), config.max_frame_len),
            chunk_size: config.chunk_size,
            max_buffer: config.max_buffer,
            max_frame_len: config.max_frame_len,
            closed: false,
            counters: ChannelCounters::default(),
        })
    }

    /// Seal `payload`, frame it and write it out.
    ///
    /// Returns the plaintext length. `ConnectionClosed` if the peer hung up
    /// during the write or the channel was closed locally.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize, ChannelError> {
        if self.closed {
            return Err(ChannelError::ConnectionClosed);
        }

        let sealed = self.aead.seal(payload).map_err(ChannelError::Encryption)?;
        let wire = encode_frame(self.decoder.mode(), &sealed, self.max_frame_len)?;

        self.stream
            .write_all(&wire)
            .and_then(|_| self.stream.flush())
            .map_err(map_io)?;

        self.counters.add_sent(payload.len(), wire.len());
        Ok(payload.len())
    }

    /// Serialize `value` as JSON and send it. Returns the serialized length.
    pub fn send_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<usize, ChannelError> {
        let payload = serde_json::to_vec(value)?;
        self.send(&payload)
    }

    /// Receive one message using the configured chunk size and buffer bound.
    pub fn receive(&mut self) -> Result<Vec<u8>, ChannelError> {
        self.receive_with(self.chunk_size, self.max_buffer)
    }

    /// Receive one message, reading `chunk_size` bytes at a time.
    ///
    /// Bytes after the frame stay buffered for the next call. Errors:
    /// - `ConnectionClosed` on a zero-length read before a full frame
    /// - `BufferOverflow` when more than `max_buffer` bytes pile up first
    /// - `Decryption` when the frame fails authentication (frame dropped)
    /// - `Frame` when the stream carries an oversized frame header. Frame
    ///   boundaries are lost at that point, so the channel is closed and
    ///   later calls fail with `ConnectionClosed`.
    pub fn receive_with(
        &mut self,
        chunk_size: usize,
        max_buffer: Option<usize>,
    ) -> Result<Vec<u8>, ChannelError> {
        if self.closed {
            return Err(ChannelError::ConnectionClosed);
        }
        if chunk_size == 0 {
            return Err(io::Error::new(ErrorKind::InvalidInput, "chunk_size must be at least 1").into());
        }

        let mut chunk = vec![0u8; chunk_size];
        loop {
            let next = match self.decoder.next_frame() {
                Ok(next) => next,
                Err(e) => {
                    // Best effort: the frame error is what the caller needs.
                    let _ = self.close();
                    return Err(e.into());
                }
            };
            if let Some((body, wire_len)) = next {
                return match self.aead.open(&body) {
                    Ok(plaintext) => {
                        self.counters.add_received(plaintext.len(), wire_len);
                        Ok(plaintext)
                    }
                    Err(e) => {
                        self.counters.add_decrypt_failure(wire_len);
                        Err(ChannelError::Decryption(e))
                    }
                };
            }

            if let Some(limit) = max_buffer {
                let buffered = self.decoder.buffered();
                if buffered > limit {
                    return Err(ChannelError::BufferOverflow { limit, buffered });
                }
            }

            let n = match self.stream.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io(e)),
            };
            if n == 0 {
                return Err(ChannelError::ConnectionClosed);
            }
            self.decoder.extend(&chunk[..n]);
        }
    }

    /// Receive one message and decode it from JSON.
    pub fn receive_json<T: DeserializeOwned>(&mut self) -> Result<T, ChannelError> {
        let payload = self.receive()?;
        Ok(serde_json::from_slice(&payload)?)
    }

    /// Shut the stream down. Safe to call more than once.
    pub fn close(&mut self) -> Result<(), ChannelError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.decoder.clear();
        match self.stream.shutdown() {
            Err(e) if !is_peer_closed(&e) => Err(e.into()),
            _ => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Read/write deadline for later operations. Expiry surfaces as
    /// `ChannelError::Io` (see [`ChannelError::is_timeout`]).
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<(), ChannelError> {
        Ok(self.stream.set_timeouts(timeout)?)
    }

    pub fn peer_addr(&self) -> Result<SocketAddr, ChannelError> {
        Ok(self.stream.peer_addr()?)
    }

    pub fn framing(&self) -> &FramingMode {
        self.decoder.mode()
    }

    /// Bytes read from the stream but not yet returned as a message.
    pub fn buffered(&self) -> usize {
        self.decoder.buffered()
    }

    /// Snapshot of this channel's counters.
    pub fn telemetry(&self) -> ChannelCounters {
        self.counters.clone()
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Transport> fmt::Debug for Channel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("cipher", &self.aead.suite())
            .field("framing", self.decoder.mode())
            .field("buffered", &self.decoder.buffered())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

fn map_io(e: io::Error) -> ChannelError {
    if is_peer_closed(&e) {
        ChannelError::ConnectionClosed
    } else {
        ChannelError::Io(e)
    }
}
