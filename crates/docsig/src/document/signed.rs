//! Sign and verify documents that carry their own signatures.
//!
//! A signed document serializes as its business members followed by a
//! `signatures` array. Signing covers the document serialized without that
//! array; verification serializes the whole document and cuts it back to
//! the signed bytes using the format recorded in each protected header.
//! Any change to a member after signing therefore breaks every signature.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{IdentityError, Result};
use crate::identity::Identity;
use crate::json;
use crate::jws::{JsonSignature, JwsEnvelope, SignatureCheck, SignatureEntry};

/// Member name that holds the signatures.
pub const SIGNATURES_KEY: &str = "signatures";

/// Result of verifying a document.
#[derive(Debug, Clone)]
pub struct DocumentVerification {
    pub signatures: Vec<SignatureCheck>,
    /// True only when every signature is valid.
    pub is_valid: bool,
    /// Microseconds since Unix epoch.
    pub verified_at: u64,
}

/// A JSON document with an embedded `signatures` member.
///
/// Implementors must serialize the signatures as the last member, named
/// [`SIGNATURES_KEY`], and omit it when empty.
pub trait SignedDocument: Serialize + Clone {
    fn signatures(&self) -> &[SignatureEntry];

    fn signatures_mut(&mut self) -> &mut Vec<SignatureEntry>;

    /// The bytes a signature covers: the document without signatures.
    fn unsigned_json(&self) -> Result<Vec<u8>> {
        let mut unsigned = self.clone();
        unsigned.signatures_mut().clear();
        json::to_document_json(&unsigned)
    }

    /// The document with its signatures inlined.
    fn signed_json(&self) -> Result<Vec<u8>> {
        json::to_document_json(self)
    }

    /// Append a signature by `identity`.
    ///
    /// Existing signatures are kept; each covers the same unsigned bytes.
    fn sign(&mut self, identity: &Identity) -> Result<()> {
        let content = self.unsigned_json()?;
        let mut jws = JsonSignature::new(&content)?;
        let private_key = identity
            .private_key()
            .map_err(|e| IdentityError::SigningFailed(format!("unusable private key: {e}")))?;
        jws.sign(&private_key, identity.public_jwk())?;
        self.signatures_mut().extend(jws.into_signatures());
        debug!("document signed by {}", identity.id());
        Ok(())
    }

    /// Rebuild the signature envelope from the document.
    fn proper_jws(&self) -> Result<JsonSignature> {
        if self.signatures().is_empty() {
            return Err(IdentityError::VerificationError(
                "document carries no signatures".into(),
            ));
        }
        JsonSignature::parse_pretty(&self.signed_json()?, SIGNATURES_KEY)
    }

    /// Check every signature and report each outcome.
    fn verify_detailed(&self) -> Result<DocumentVerification> {
        let signatures = self.proper_jws()?.verify()?;
        let is_valid = !signatures.is_empty() && signatures.iter().all(|c| c.valid);
        debug!(
            "verified {} signature(s): {}",
            signatures.len(),
            if is_valid { "valid" } else { "invalid" }
        );
        Ok(DocumentVerification {
            signatures,
            is_valid,
            verified_at: crate::time::now_micros(),
        })
    }

    /// `Ok(true)` only if every signature verifies.
    ///
    /// `Ok(false)` means the document was tampered with or signed by a
    /// different key; `Err` means validity could not be determined.
    fn verify(&self) -> Result<bool> {
        Ok(self.verify_detailed()?.is_valid)
    }

    /// The detached JWS JSON envelope for this document.
    fn to_jws(&self) -> Result<JwsEnvelope> {
        Ok(self.proper_jws()?.to_envelope())
    }

    /// Rebuild a document from a JWS envelope, re-attaching its signatures.
    fn from_jws(envelope: &JwsEnvelope) -> Result<Self>
    where
        Self: DeserializeOwned,
    {
        let jws = JsonSignature::from_envelope(envelope)?;
        let mut document: Self = serde_json::from_slice(&jws.payload_bytes()?)
            .map_err(|e| IdentityError::SerializationError(format!("envelope payload: {e}")))?;
        *document.signatures_mut() = jws.into_signatures();
        Ok(document)
    }
}

impl JwsEnvelope {
    /// Rebuild the document this envelope was made from.
    pub fn to_document<T>(&self) -> Result<T>
    where
        T: SignedDocument + DeserializeOwned,
    {
        T::from_jws(self)
    }
}
