//! JSON signatures over JSON object payloads.
//!
//! A [`JsonSignature`] holds a payload and the signatures over it. It can be
//! written two ways:
//!
//! - as a JWS JSON envelope, `{"payload": <b64url>, "signatures": [...]}`
//!   ([`JsonSignature::to_envelope`] / [`JsonSignature::from_envelope`]);
//! - as a "pretty" signature, where the payload object itself gains a
//!   sibling member holding the signatures
//!   ([`JsonSignature::pretty_signature`] / [`JsonSignature::parse_pretty`]).
//!
//! Every signature covers `protected || "." || payload`. The protected
//! header records where the payload's closing brace sits, which is what
//! lets the pretty form be cut back to the signed bytes.

use log::{debug, warn};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};

use crate::crypto::encoding::{b64url_decode, b64url_encode};
use crate::crypto::jwk::RsaPublicJwk;
use crate::crypto::signing::{self, JwsAlgorithm};
use crate::error::{IdentityError, Result};
use crate::identity::{jwk_thumbprint, IdentityId};
use crate::json;

use super::header::{JwsHeader, ProtectedHeader, SignatureEntry};

/// Outcome of checking one signature entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCheck {
    /// Thumbprint id of the key that was checked.
    pub signer: IdentityId,
    pub algorithm: JwsAlgorithm,
    pub valid: bool,
}

/// JWS JSON serialization with a detached-able payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsEnvelope {
    /// base64url payload bytes.
    pub payload: String,
    pub signatures: Vec<SignatureEntry>,
}

impl JwsEnvelope {
    /// Serialize the envelope.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| IdentityError::SerializationError(e.to_string()))
    }

    /// Parse an envelope.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| IdentityError::VerificationError(format!("malformed JWS envelope: {e}")))
    }

    /// Decode the payload bytes.
    pub fn payload_bytes(&self) -> Result<Vec<u8>> {
        b64url_decode(&self.payload).map_err(|e| {
            IdentityError::VerificationError(format!("payload is not base64url: {e}"))
        })
    }
}

/// A payload and its signatures.
#[derive(Debug, Clone)]
pub struct JsonSignature {
    payload: String,
    signatures: Vec<SignatureEntry>,
    indent: String,
    format_length: usize,
    format_tail: Vec<u8>,
}

/// Offset just past the last significant byte before the closing brace.
fn format_length(content: &[u8]) -> Result<usize> {
    let invalid =
        |reason: &str| IdentityError::SerializationError(format!("invalid JSON content: {reason}"));
    let close = content
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .ok_or_else(|| invalid("empty"))?;
    if content[close] != b'}' {
        return Err(invalid("not a JSON object"));
    }
    let last = content[..close]
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .ok_or_else(|| invalid("no opening brace"))?;
    if content[last] == b',' {
        return Err(invalid("trailing comma"));
    }
    Ok(last + 1)
}

impl JsonSignature {
    /// Prepare to sign `content`, which must be a JSON object.
    pub fn new(content: &[u8]) -> Result<Self> {
        serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(content).map_err(
            |e| IdentityError::SerializationError(format!("content is not a JSON object: {e}")),
        )?;
        let format_length = format_length(content)?;
        Ok(Self {
            payload: b64url_encode(content),
            signatures: Vec::new(),
            indent: json::detect_indent(content),
            format_length,
            format_tail: content[format_length..].to_vec(),
        })
    }

    /// base64url payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Decoded payload bytes.
    pub fn payload_bytes(&self) -> Result<Vec<u8>> {
        b64url_decode(&self.payload).map_err(|e| {
            IdentityError::VerificationError(format!("payload is not base64url: {e}"))
        })
    }

    /// Signatures collected so far.
    pub fn signatures(&self) -> &[SignatureEntry] {
        &self.signatures
    }

    /// Take the signatures.
    pub fn into_signatures(self) -> Vec<SignatureEntry> {
        self.signatures
    }

    /// Byte length of the payload up to its closing whitespace and brace.
    pub fn format_length(&self) -> usize {
        self.format_length
    }

    fn signing_input(&self, protected: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(protected.len() + 1 + self.payload.len());
        buf.extend_from_slice(protected.as_bytes());
        buf.push(b'.');
        buf.extend_from_slice(self.payload.as_bytes());
        buf
    }

    /// Add an RS256 signature made with `private_key`, embedding
    /// `public_jwk` in the header.
    pub fn sign(&mut self, private_key: &RsaPrivateKey, public_jwk: &RsaPublicJwk) -> Result<()> {
        let alg = JwsAlgorithm::Rs256;
        let protected = ProtectedHeader {
            alg: Some(alg.as_str().to_string()),
            kid: public_jwk.kid.clone(),
            format_length: self.format_length,
            format_tail: b64url_encode(&self.format_tail),
            time: Some(crate::time::now_rfc3339()),
        }
        .encode()?;

        let signature =
            signing::sign_to_base64url(private_key, alg, &self.signing_input(&protected))?;

        self.signatures.push(SignatureEntry {
            header: JwsHeader {
                jwk: Some(public_jwk.clone()),
                alg: alg.as_str().to_string(),
                chain: None,
            },
            signature,
            protected,
        });
        debug!(
            "added {alg} signature #{} over {}-byte payload",
            self.signatures.len(),
            self.format_length + self.format_tail.len()
        );
        Ok(())
    }

    /// Check every signature.
    ///
    /// Errors mean validity cannot be determined (no signatures, malformed
    /// encodings, unknown algorithm, unusable key). A signature that simply
    /// does not match is reported as `valid: false`.
    pub fn verify(&self) -> Result<Vec<SignatureCheck>> {
        if self.signatures.is_empty() {
            return Err(IdentityError::VerificationError(
                "no signatures to verify".into(),
            ));
        }
        self.signatures
            .iter()
            .map(|entry| self.verify_entry(entry))
            .collect()
    }

    fn verify_entry(&self, entry: &SignatureEntry) -> Result<SignatureCheck> {
        let protected = ProtectedHeader::decode(&entry.protected)?;
        let algorithm: JwsAlgorithm = entry.header.alg.parse()?;

        let public_jwk = resolve_key(&entry.header)?;
        let public_key = public_jwk.to_public_key().map_err(|e| {
            IdentityError::VerificationError(format!("embedded key is unusable: {e}"))
        })?;
        let signer = jwk_thumbprint(public_jwk)
            .map_err(|e| IdentityError::VerificationError(e.to_string()))?;

        let alg_matches = protected
            .alg
            .as_deref()
            .map_or(true, |alg| alg == entry.header.alg);
        let valid = alg_matches
            && signing::verify_from_base64url(
                &public_key,
                algorithm,
                &self.signing_input(&entry.protected),
                &entry.signature,
            )?;

        if !valid {
            warn!("signature by {signer} does not verify");
        }
        Ok(SignatureCheck {
            signer,
            algorithm,
            valid,
        })
    }

    /// The JWS JSON serialization.
    pub fn to_envelope(&self) -> JwsEnvelope {
        JwsEnvelope {
            payload: self.payload.clone(),
            signatures: self.signatures.clone(),
        }
    }

    /// Read a JWS JSON envelope.
    ///
    /// Every protected header must describe the payload's actual ending.
    pub fn from_envelope(envelope: &JwsEnvelope) -> Result<Self> {
        let content = envelope.payload_bytes()?;
        let mut js = Self::new(&content).map_err(|e| {
            IdentityError::VerificationError(format!("envelope payload: {e}"))
        })?;
        for entry in &envelope.signatures {
            let protected = ProtectedHeader::decode(&entry.protected)?;
            if protected.format_length != js.format_length
                || protected.tail_bytes()? != js.format_tail
            {
                return Err(IdentityError::VerificationError(
                    "protected header format does not match payload".into(),
                ));
            }
        }
        // Keep the payload exactly as received; it is what was signed.
        js.payload = envelope.payload.clone();
        js.signatures = envelope.signatures.clone();
        Ok(js)
    }

    /// Write the payload with the signatures inlined as the member
    /// `signature_key`.
    pub fn pretty_signature(&self, signature_key: &str) -> Result<Vec<u8>> {
        if self.signatures.is_empty() {
            return Err(IdentityError::SerializationError(
                "no signatures to embed".into(),
            ));
        }
        let payload = self.payload_bytes()?;
        let head = payload.get(..self.format_length).ok_or_else(|| {
            IdentityError::SerializationError("format length exceeds payload".into())
        })?;

        let marshalled = if self.indent.is_empty() {
            serde_json::to_vec(&self.signatures)
                .map_err(|e| IdentityError::SerializationError(e.to_string()))?
        } else {
            let nested = json::to_indented_json(&self.signatures, self.indent.as_bytes())?;
            let mut shifted = Vec::with_capacity(nested.len());
            for &b in &nested {
                shifted.push(b);
                if b == b'\n' {
                    shifted.extend_from_slice(self.indent.as_bytes());
                }
            }
            shifted
        };
        let key = serde_json::to_string(signature_key)
            .map_err(|e| IdentityError::SerializationError(e.to_string()))?;

        let mut out = Vec::with_capacity(head.len() + marshalled.len() + key.len() + 16);
        out.extend_from_slice(head);
        if head.last() != Some(&b'{') {
            out.push(b',');
        }
        if self.indent.is_empty() {
            out.extend_from_slice(key.as_bytes());
            out.push(b':');
        } else {
            out.push(b'\n');
            out.extend_from_slice(self.indent.as_bytes());
            out.extend_from_slice(key.as_bytes());
            out.extend_from_slice(b": ");
        }
        out.extend_from_slice(&marshalled);
        out.extend_from_slice(&self.format_tail);
        Ok(out)
    }

    /// Read a document whose signatures are inlined as `signature_key`.
    ///
    /// The signed payload is rebuilt as `content[..formatLength]` followed
    /// by `formatTail`; all signatures must agree on both.
    pub fn parse_pretty(content: &[u8], signature_key: &str) -> Result<Self> {
        let mut object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(content).map_err(|e| {
                IdentityError::VerificationError(format!("document is not a JSON object: {e}"))
            })?;
        let blocks = object.remove(signature_key).ok_or_else(|| {
            IdentityError::VerificationError(format!("missing `{signature_key}` member"))
        })?;
        let signatures: Vec<SignatureEntry> = serde_json::from_value(blocks).map_err(|e| {
            IdentityError::VerificationError(format!("malformed signature entries: {e}"))
        })?;

        let mut format: Option<(usize, Vec<u8>)> = None;
        for entry in &signatures {
            let protected = ProtectedHeader::decode(&entry.protected)?;
            let tail = protected.tail_bytes()?;
            match &format {
                None => format = Some((protected.format_length, tail)),
                Some((length, _)) if *length != protected.format_length => {
                    return Err(IdentityError::VerificationError(
                        "conflicting format length".into(),
                    ));
                }
                Some((_, existing)) if *existing != tail => {
                    return Err(IdentityError::VerificationError(
                        "conflicting format tail".into(),
                    ));
                }
                Some(_) => {}
            }
        }
        let Some((format_length, format_tail)) = format else {
            return Err(IdentityError::VerificationError(
                "no signatures to verify".into(),
            ));
        };

        let head = content.get(..format_length).ok_or_else(|| {
            IdentityError::VerificationError("format length exceeds document".into())
        })?;
        let mut formatted = Vec::with_capacity(format_length + format_tail.len());
        formatted.extend_from_slice(head);
        formatted.extend_from_slice(&format_tail);

        Ok(Self {
            payload: b64url_encode(&formatted),
            signatures,
            indent: json::detect_indent(&formatted),
            format_length,
            format_tail,
        })
    }
}

/// Find the verification key of an entry.
fn resolve_key(header: &JwsHeader) -> Result<&RsaPublicJwk> {
    match (&header.jwk, &header.chain) {
        (Some(jwk), _) => Ok(jwk),
        (None, Some(chain)) if !chain.is_empty() => Err(IdentityError::VerificationError(
            "certificate chain key resolution is not supported".into(),
        )),
        _ => Err(IdentityError::VerificationError(
            "signature header carries no public key".into(),
        )),
    }
}
