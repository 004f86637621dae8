//! Envelope transport codec (hex text wrapping protobuf).
//!
//! Decoding is panic-free: a bad hex body surfaces as `PlexError::Decode`, a
//! bad protobuf layout as `PlexError::Parse`. Encoding an in-memory envelope
//! cannot fail.

use prost::Message;

use crate::error::Result;
use crate::protocol::envelope::Envelope;

/// Byte form written back to the HTTP caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseEncoding {
    /// Lowercase hex ASCII (same form as the request body).
    #[default]
    Hex,
    /// Raw protobuf bytes.
    Raw,
}

/// Decode a hex transport body into an envelope.
pub fn decode(body: &[u8]) -> Result<Envelope> {
    let raw = hex::decode(body)?;
    decode_raw(&raw)
}

/// Decode raw protobuf bytes into an envelope.
pub fn decode_raw(raw: &[u8]) -> Result<Envelope> {
    Ok(Envelope::decode(raw)?)
}

/// Encode an envelope into its hex transport form.
pub fn encode(env: &Envelope) -> Vec<u8> {
    hex::encode(encode_raw(env)).into_bytes()
}

/// Encode an envelope into raw protobuf bytes.
pub fn encode_raw(env: &Envelope) -> Vec<u8> {
    env.encode_to_vec()
}

/// Encode using the selected response form.
pub fn encode_as(env: &Envelope, encoding: ResponseEncoding) -> Vec<u8> {
    match encoding {
        ResponseEncoding::Hex => encode(env),
        ResponseEncoding::Raw => encode_raw(env),
    }
}
