//! JSON codec for persisted location documents.

use crate::models::LocationDataDocument;

#[derive(Debug, thiserror::Error)]
#[error("failed to encode location document: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Stored bytes are not a well-formed location document
#[derive(Debug, thiserror::Error)]
#[error("failed to decode location document: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

pub fn encode(document: &LocationDataDocument) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(document)?)
}

pub fn decode(bytes: &[u8]) -> Result<LocationDataDocument, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}
