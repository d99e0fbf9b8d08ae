use byteorder::{BigEndian, ByteOrder};
use bytes::{Buf, Bytes, BytesMut};

use crate::constants::LENGTH_PREFIX_LEN;
use crate::framing::types::{FrameError, FramingMode};

/// First index of `needle` in `haystack` at or after `from`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() || haystack.len() - from < needle.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Read the body length from a length-prefixed header.
/// `Ok(None)` when fewer than four bytes are available.
#[inline]
pub fn parse_length_prefix(buf: &[u8], max_frame_len: usize) -> Result<Option<usize>, FrameError> {
    if buf.len() < LENGTH_PREFIX_LEN {
        return Ok(None);
    }
    let len = BigEndian::read_u32(&buf[..LENGTH_PREFIX_LEN]) as usize;
    if len > max_frame_len {
        return Err(FrameError::TooLarge { len, max: max_frame_len });
    }
    Ok(Some(len))
}

/// Incremental frame decoder.
///
/// Bytes go in with [`FrameDecoder::extend`]; complete frame bodies come out of
/// [`FrameDecoder::next_frame`]. Whatever follows a frame stays buffered for
/// the next call.
///
/// Invariant: after `next_frame` returns `Ok(None)` the buffer is empty or holds
/// a prefix that does not yet contain a complete frame.
#[derive(Debug)]
pub struct FrameDecoder {
    mode: FramingMode,
    max_frame_len: usize,
    buf: BytesMut,
    // Delimited mode: offset before which the delimiter is known to be absent.
    scanned: usize,
}

impl FrameDecoder {
    pub fn new(mode: FramingMode, max_frame_len: usize) -> Self {
        Self {
            mode,
            max_frame_len,
            buf: BytesMut::new(),
            scanned: 0,
        }
    }

    pub fn mode(&self) -> &FramingMode {
        &self.mode
    }

    /// Bytes held but not yet returned as a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.scanned = 0;
    }

    /// Pop the next complete frame body, if one is buffered.
    ///
    /// Returns `(body, wire_len)` where `wire_len` includes the framing bytes.
    pub fn next_frame(&mut self) -> Result<Option<(Bytes, usize)>, FrameError> {
        match &self.mode {
            FramingMode::LengthPrefixed => {
                let Some(len) = parse_length_prefix(&self.buf, self.max_frame_len)? else {
                    return Ok(None);
                };
                let wire_len = LENGTH_PREFIX_LEN + len;
                if self.buf.len() < wire_len {
                    self.buf.reserve(wire_len - self.buf.len());
                    return Ok(None);
                }
                self.buf.advance(LENGTH_PREFIX_LEN);
                let body = self.buf.split_to(len).freeze();
                Ok(Some((body, wire_len)))
            }
            FramingMode::Delimited(delimiter) => {
                if delimiter.is_empty() {
                    return Err(FrameError::EmptyDelimiter);
                }
                let dlen = delimiter.len();
                match find_subsequence(&self.buf, delimiter, self.scanned) {
                    Some(at) => {
                        let body = self.buf.split_to(at).freeze();
                        self.buf.advance(dlen);
                        self.scanned = 0;
                        Ok(Some((body, at + dlen)))
                    }
                    None => {
                        // A delimiter may still straddle the tail; rescan its last dlen-1 bytes.
                        self.scanned = self.buf.len().saturating_sub(dlen - 1);
                        Ok(None)
                    }
                }
            }
        }
    }
}
