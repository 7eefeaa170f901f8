//! Error types for bifrost.
//!
//! Construction-time failures (`Config`, `Decode`, `RequiredFieldMissing`)
//! and conversation-time failures (`ToolInvocation`, `Engine`, `Io`) share
//! one top-level [`BifrostError`]. Every variant is fatal to the caller: the
//! assembler never exposes a partial profile and the conversation loop never
//! retries or substitutes text.

use thiserror::Error;

use crate::records::RecordKind;

/// Errors raised while reading a serialized configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The stream ended before a field could be read.
    #[error("record truncated: needed {needed} byte(s), {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A declared element count was negative.
    #[error("negative element count: {0}")]
    NegativeCount(i32),

    /// A declared element count cannot fit in what is left of the stream.
    #[error("element count {count} exceeds the {remaining} remaining byte(s)")]
    CountExceedsRemaining { count: usize, remaining: usize },

    /// A string payload was not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// The gender byte is outside the known ordinals.
    #[error("unknown gender ordinal: {0}")]
    UnknownGender(u8),

    /// A variable-length string prefix ran past five bytes or above `i32::MAX`.
    #[error("string length prefix is malformed")]
    LengthPrefixOverflow,

    /// Bytes were left over after a complete record.
    #[error("{0} trailing byte(s) after record")]
    TrailingBytes(usize),
}

/// Errors raised by a codon codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The text length does not split into whole bytes.
    #[error("codon text length {0} is not a whole number of encoded bytes")]
    InvalidLength(usize),

    /// A codon is not part of the data alphabet.
    #[error("codon '{codon}' at position {position} is not a data codon")]
    UnknownCodon { position: usize, codon: String },
}

/// Top-level error for bifrost.
#[derive(Debug, Error)]
pub enum BifrostError {
    /// Empty or malformed genome text, or an unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A genome segment decoded to bytes that are not a valid record.
    #[error("failed to decode {kind} record: {source}")]
    Decode {
        kind: RecordKind,
        #[source]
        source: DecodeError,
    },

    /// A required record was absent after framing.
    #[error("required record missing: {0}")]
    RequiredFieldMissing(RecordKind),

    /// A registered tool failed, or a command named a tool that is not registered.
    #[error("tool '{tool}' failed: {message}")]
    ToolInvocation { tool: String, message: String },

    /// The inference engine failed before or during a stream.
    #[error("inference engine error: {0}")]
    Engine(String),

    /// Console read or write failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CodecError> for BifrostError {
    fn from(err: CodecError) -> Self {
        BifrostError::Config(format!("malformed genome text: {}", err))
    }
}

impl From<reqwest::Error> for BifrostError {
    fn from(err: reqwest::Error) -> Self {
        BifrostError::Engine(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BifrostError>;
