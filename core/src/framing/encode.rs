use byteorder::{BigEndian, ByteOrder};

use crate::constants::LENGTH_PREFIX_LEN;
use crate::framing::decode::find_subsequence;
use crate::framing::types::{FrameError, FramingMode};

/// Encode one sealed message into its wire frame.
///
/// Layout (length-prefixed):
///
/// ```text
/// [ body_len (4, big-endian) ]
/// [ body (N) ]
/// ```
///
/// Layout (delimited):
///
/// ```text
/// [ body (N) ]
/// [ delimiter ]
/// ```
///
/// In delimited mode a body that already contains the delimiter is rejected
/// rather than sent, since the peer would cut it short.
pub fn encode_frame(
    mode: &FramingMode,
    body: &[u8],
    max_frame_len: usize,
) -> Result<Vec<u8>, FrameError> {
    if body.len() > max_frame_len {
        return Err(FrameError::TooLarge { len: body.len(), max: max_frame_len });
    }

    match mode {
        FramingMode::LengthPrefixed => {
            let len = u32::try_from(body.len())
                .map_err(|_| FrameError::TooLarge { len: body.len(), max: u32::MAX as usize })?;

            let mut header = [0u8; LENGTH_PREFIX_LEN];
            BigEndian::write_u32(&mut header, len);

            let mut out = Vec::with_capacity(LENGTH_PREFIX_LEN + body.len());
            out.extend_from_slice(&header);
            out.extend_from_slice(body);
            Ok(out)
        }
        FramingMode::Delimited(delimiter) => {
            if delimiter.is_empty() {
                return Err(FrameError::EmptyDelimiter);
            }
            if let Some(offset) = find_subsequence(body, delimiter, 0) {
                return Err(FrameError::DelimiterCollision { offset });
            }

            let mut out = Vec::with_capacity(body.len() + delimiter.len());
            out.extend_from_slice(body);
            out.extend_from_slice(delimiter);
            Ok(out)
        }
    }
}
