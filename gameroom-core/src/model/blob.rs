use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque session-negotiation payload: an offer/answer descriptor or an ICE
/// candidate. Carried verbatim between peers — neither the codec nor the
/// broker looks inside. Whether the content is a *usable* descriptor is
/// decided by the transport layer when it is applied, and may fail there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalBlob(serde_json::Value);

#[derive(Debug, Error)]
#[error("invalid connection blob: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

impl SignalBlob {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Serialize for transmission or for a copy-paste handshake box.
    pub fn encode(&self) -> String {
        self.0.to_string()
    }

    /// Structural parse only. `decode(encode(b)) == b` for every blob.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for SignalBlob {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
