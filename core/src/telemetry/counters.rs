//! telemetry/counters.rs
//! Per-channel counters.
//!
//! Summary: Collects message counts and byte counts on send/receive.
//! Cheap plain integers: a `Channel` is single-owner, so no atomics.

use std::ops::AddAssign;

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct ChannelCounters {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub bytes_plaintext_sent: u64,
    pub bytes_plaintext_received: u64,
    pub bytes_wire_sent: u64,
    pub bytes_wire_received: u64,
    pub decrypt_failures: u64,
}

impl ChannelCounters {
    /// Record one sent message.
    ///
    /// - `pt_len`: plaintext length handed to `send`
    /// - `wire_len`: bytes written to the stream (framing + nonce + tag included)
    pub fn add_sent(&mut self, pt_len: usize, wire_len: usize) {
        self.messages_sent += 1;
        self.bytes_plaintext_sent += pt_len as u64;
        self.bytes_wire_sent += wire_len as u64;
    }

    /// Record one received and successfully opened message.
    pub fn add_received(&mut self, pt_len: usize, wire_len: usize) {
        self.messages_received += 1;
        self.bytes_plaintext_received += pt_len as u64;
        self.bytes_wire_received += wire_len as u64;
    }

    /// Record a frame that failed authentication. Its wire bytes still count.
    pub fn add_decrypt_failure(&mut self, wire_len: usize) {
        self.decrypt_failures += 1;
        self.bytes_wire_received += wire_len as u64;
    }

    /// Bytes spent on framing and sealing across both directions.
    pub fn overhead_bytes(&self) -> u64 {
        (self.bytes_wire_sent + self.bytes_wire_received)
            .saturating_sub(self.bytes_plaintext_sent + self.bytes_plaintext_received)
    }

    pub fn merge(&mut self, other: &ChannelCounters) {
        self.messages_sent += other.messages_sent;
        self.messages_received += other.messages_received;
        self.bytes_plaintext_sent += other.bytes_plaintext_sent;
        self.bytes_plaintext_received += other.bytes_plaintext_received;
        self.bytes_wire_sent += other.bytes_wire_sent;
        self.bytes_wire_received += other.bytes_wire_received;
        self.decrypt_failures += other.decrypt_failures;
    }
}

impl AddAssign for ChannelCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
