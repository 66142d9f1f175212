//! JWS signature entries and headers.

use serde::{Deserialize, Serialize};

use crate::crypto::encoding::{b64url_decode, b64url_encode};
use crate::crypto::jwk::RsaPublicJwk;
use crate::error::{IdentityError, Result};

/// Unprotected per-signature header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsHeader {
    /// Signer public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwk: Option<RsaPublicJwk>,
    pub alg: String,
    /// Certificate chain, standard base64 DER. Carried but not used to
    /// resolve keys.
    #[serde(rename = "x5c", default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<String>>,
}

/// One signature over a JWS payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub header: JwsHeader,
    /// base64url signature bytes.
    pub signature: String,
    /// base64url JSON of the [`ProtectedHeader`].
    pub protected: String,
}

/// Signed header.
///
/// `format_length` and `format_tail` record how the payload ends, so that
/// a document carrying its signatures inline can be cut back to the exact
/// bytes that were signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    pub format_length: usize,
    /// base64url of the payload bytes after `format_length`.
    pub format_tail: String,
    /// RFC 3339 signing time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl ProtectedHeader {
    /// Serialize and base64url-encode.
    pub fn encode(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| IdentityError::SerializationError(e.to_string()))?;
        Ok(b64url_encode(bytes))
    }

    /// Decode a `protected` value.
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = b64url_decode(encoded).map_err(|e| {
            IdentityError::VerificationError(format!("protected header is not base64url: {e}"))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            IdentityError::VerificationError(format!("unparseable protected header: {e}"))
        })
    }

    /// Decode `format_tail`.
    pub fn tail_bytes(&self) -> Result<Vec<u8>> {
        b64url_decode(&self.format_tail).map_err(|e| {
            IdentityError::VerificationError(format!("format tail is not base64url: {e}"))
        })
    }
}
