//! # Wire Codec
//!
//! Every payload crossing a topic (batches, chain data, resolver requests)
//! is encoded with the same bincode configuration. Decoding is strict:
//! empty input, trailing bytes and oversize payloads are all failures.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entities::{sha256, Hash};
use crate::errors::CodecError;

/// Upper bound on a single encoded payload.
pub const MAX_ENCODED_SIZE: u64 = 16 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_ENCODED_SIZE)
        .with_little_endian()
        .with_varint_encoding()
        .reject_trailing_bytes()
}

/// Encode a value into its wire form.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    options()
        .serialize(value)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a value from its wire form.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    options()
        .deserialize(bytes)
        .map_err(|e| CodecError::Decode(e.to_string()))
}

/// Content hash of a value: SHA-256 over its wire encoding.
pub fn hash_of<T: Serialize>(value: &T) -> Result<Hash, CodecError> {
    Ok(sha256(&encode(value)?))
}
