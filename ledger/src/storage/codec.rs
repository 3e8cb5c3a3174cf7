//! On-disk serialization codec.
//!
//! A thin, explicit wrapper over bincode so that every persistence path
//! shares one encode/decode contract: zero-length input is rejected up
//! front, and a failed decode never partially populates the target.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors raised by the codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Decoding zero-length input. Distinguished from malformed input
    /// because an empty value usually means a missing or truncated record.
    #[error("cannot decode an empty byte string")]
    DecodeEmpty,

    /// Encoding failed.
    #[error("encoding failed: {0}")]
    Encode(bincode::Error),

    /// Decoding failed on malformed input.
    #[error("decoding failed: {0}")]
    Decode(bincode::Error),
}

/// Encode a record to bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(value).map_err(CodecError::Encode)
}

/// Decode a record from bytes.
///
/// # Errors
///
/// [`CodecError::DecodeEmpty`] on zero-length input,
/// [`CodecError::Decode`] on malformed input.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::DecodeEmpty);
    }
    bincode::deserialize(bytes).map_err(CodecError::Decode)
}
