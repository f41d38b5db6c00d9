//! Identity proof documents.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{ProofFetchError, VerificationError};

/// A signed claim that an identity controls an address.
///
/// `payload` is kept as the exact string that was signed; it is only
/// parsed after the signature has been checked against those bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProofDocument {
    pub payload: String,
    /// Hex-encoded 65-byte recoverable signature, `0x` prefix optional.
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProofPayload {
    pub ethereum_address: String,
    pub github_username: String,
}

impl ProofDocument {
    pub fn payload(&self) -> Result<ProofPayload, VerificationError> {
        serde_json::from_str(&self.payload)
            .map_err(|e| VerificationError::MalformedProof(format!("payload: {}", e)))
    }

    /// Parses the raw `{payload, signature}` JSON file.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProofFetchError> {
        serde_json::from_slice(bytes).map_err(|e| ProofFetchError::Envelope(e.to_string()))
    }

    /// Decodes the base64 `content` field of a contents-API response.
    /// Line breaks inside the encoding are ignored.
    pub fn from_base64(content: &str) -> Result<Self, ProofFetchError> {
        let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| ProofFetchError::Envelope(format!("base64: {}", e)))?;
        Self::from_json(&bytes)
    }
}

/// The contents-API response wrapping a proof file.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentsEnvelope {
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ContentsEnvelope {
    pub fn into_document(self) -> Result<ProofDocument, ProofFetchError> {
        match self.encoding.as_deref() {
            None | Some("base64") => ProofDocument::from_base64(&self.content),
            Some(other) => Err(ProofFetchError::Envelope(format!("unsupported encoding '{}'", other))),
        }
    }
}

/// Accepts either a bare proof document or a contents-API envelope.
pub fn parse_any(bytes: &[u8]) -> Result<ProofDocument, ProofFetchError> {
    if let Ok(doc) = ProofDocument::from_json(bytes) {
        return Ok(doc);
    }
    serde_json::from_slice::<ContentsEnvelope>(bytes)
        .map_err(|e| ProofFetchError::Envelope(e.to_string()))?
        .into_document()
}
