//! Wire framing for channel messages.
//!
//! Responsibilities:
//! - Define the framing modes and their errors
//! - Encode sealed messages into wire frames
//! - Incrementally decode frames out of a byte stream
//!
//! Non-responsibilities:
//! - Cryptography
//! - IO

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{FramingMode, FrameError};
pub use encode::encode_frame;
pub use decode::{FrameDecoder, find_subsequence, parse_length_prefix};
