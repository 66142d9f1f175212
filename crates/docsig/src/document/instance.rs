//! An owning identity paired with the payload it signs.

use serde::Serialize;

use crate::error::Result;
use crate::identity::{Identity, PublicIdentity};
use crate::json;
use crate::jws::JsonSignature;

use super::payload::Payload;
use super::signed::{DocumentVerification, SignedDocument};

/// Convenience aggregate for signing a payload as its owner.
#[derive(Debug, Clone)]
pub struct Instance {
    pub owner: Identity,
    pub payload: Payload,
}

/// Serialized form of an instance. Only the owner's public half is written.
#[derive(Serialize)]
struct InstanceView<'a> {
    owner: PublicIdentity,
    payload: &'a Payload,
}

impl Instance {
    pub fn new(owner: Identity, payload: Payload) -> Self {
        Self { owner, payload }
    }

    /// Replace the payload with one parsed from JSON.
    pub fn set_payload_from_json(&mut self, json: &[u8]) -> Result<()> {
        self.payload = Payload::from_json(json)?;
        Ok(())
    }

    /// Sign the payload with the owner's key.
    pub fn sign(&mut self) -> Result<()> {
        self.payload.sign(&self.owner)
    }

    /// Verify every signature on the payload.
    pub fn verify(&self) -> Result<bool> {
        self.payload.verify()
    }

    /// Verify and report each signature.
    pub fn verify_detailed(&self) -> Result<DocumentVerification> {
        self.payload.verify_detailed()
    }

    /// True when the payload verifies and the owner is among its signers.
    pub fn signed_by_owner(&self) -> Result<bool> {
        let result = self.payload.verify_detailed()?;
        Ok(result.is_valid
            && result
                .signatures
                .iter()
                .any(|check| &check.signer == self.owner.id()))
    }

    /// The signature envelope rebuilt from the payload.
    pub fn proper_jws(&self) -> Result<JsonSignature> {
        self.payload.proper_jws()
    }

    /// Serialize as `{"owner": {"id", "jwk"}, "payload": ...}`.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        json::to_document_json(&InstanceView {
            owner: self.owner.to_public(),
            payload: &self.payload,
        })
    }
}
