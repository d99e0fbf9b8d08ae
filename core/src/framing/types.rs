use thiserror::Error;

use crate::constants::DEFAULT_DELIMITER;

/// How message boundaries are marked on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FramingMode {
    /// `u32 big-endian length || body`. Exact, never ambiguous.
    #[default]
    LengthPrefixed,
    /// `body || delimiter`. Legacy interop mode; split on the first delimiter.
    Delimited(Vec<u8>),
}

impl FramingMode {
    /// Delimited mode with the stock `<end_of_bytes>` tag.
    pub fn legacy() -> Self {
        FramingMode::Delimited(DEFAULT_DELIMITER.to_vec())
    }

    pub fn validate(&self) -> Result<(), FrameError> {
        match self {
            FramingMode::Delimited(d) if d.is_empty() => Err(FrameError::EmptyDelimiter),
            _ => Ok(()),
        }
    }

    /// Wire bytes this mode adds to every frame body.
    pub fn overhead(&self) -> usize {
        match self {
            FramingMode::LengthPrefixed => crate::constants::LENGTH_PREFIX_LEN,
            FramingMode::Delimited(d) => d.len(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Body length exceeds the configured frame limit.
    #[error("frame too large: {len} bytes exceeds limit of {max}")]
    TooLarge { len: usize, max: usize },

    /// Delimited mode configured with an empty delimiter.
    #[error("delimiter must not be empty")]
    EmptyDelimiter,

    /// Body contains the delimiter, so the receiver would split it early.
    #[error("frame body contains the delimiter at offset {offset}")]
    DelimiterCollision { offset: usize },
}
