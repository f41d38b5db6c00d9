//! Proof verification.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alloy_primitives::Signature;

use crate::error::VerificationError;
use crate::proof::ProofDocument;
use crate::types::id::{Address, Identity};

/// Checks that `doc` proves `claimed` controls the address it names.
///
/// The signer is recovered from `doc.signature` over the exact payload
/// bytes, using the Ethereum signed-message prefix. Two conditions must
/// hold, checked in this order:
/// - the recovered signer is the payload's `ethereumAddress`
///   ([`VerificationError::SignatureMismatch`] otherwise);
/// - the payload's `githubUsername` is `claimed`
///   ([`VerificationError::IdentityMismatch`] otherwise), so one user's
///   proof cannot be replayed for another identity.
pub fn verify(claimed: &Identity, doc: &ProofDocument) -> Result<Address, VerificationError> {
    let payload = doc.payload()?;

    let signature = decode_signature(&doc.signature)?;
    let recovered: Address = signature
        .recover_address_from_msg(doc.payload.as_bytes())
        .map_err(|e| VerificationError::MalformedProof(format!("signature: {}", e)))?
        .into();

    let claimed_address: Address = payload
        .ethereum_address
        .parse()
        .map_err(VerificationError::MalformedProof)?;

    if recovered != claimed_address {
        return Err(VerificationError::SignatureMismatch {
            recovered: recovered.canonical(),
            claimed: payload.ethereum_address,
        });
    }

    if payload.github_username != claimed.as_str() {
        return Err(VerificationError::IdentityMismatch {
            claimed: claimed.to_string(),
            proven: payload.github_username,
        });
    }

    Ok(claimed_address)
}

fn decode_signature(raw: &str) -> Result<Signature, VerificationError> {
    let trimmed = raw.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(hex_part)
        .map_err(|e| VerificationError::MalformedProof(format!("signature hex: {}", e)))?;
    Signature::try_from(bytes.as_slice())
        .map_err(|e| VerificationError::MalformedProof(format!("signature bytes: {}", e)))
}
