//! RSASSA-PKCS1-v1_5 signing and verification.
//!
//! Provides a simple API for signing arbitrary messages and verifying
//! signatures against known public keys, keyed by JWS algorithm name.

use std::fmt;
use std::str::FromStr;

use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

use crate::crypto::encoding::{b64url_decode, b64url_encode};
use crate::error::{IdentityError, Result};

/// JWS `alg` values supported for RSA keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JwsAlgorithm {
    Rs256,
    Rs384,
    Rs512,
}

impl JwsAlgorithm {
    /// Return the registered JWS algorithm name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
        }
    }
}

impl fmt::Display for JwsAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JwsAlgorithm {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RS256" => Ok(Self::Rs256),
            "RS384" => Ok(Self::Rs384),
            "RS512" => Ok(Self::Rs512),
            other => Err(IdentityError::VerificationError(format!(
                "unsupported signature algorithm: {other}"
            ))),
        }
    }
}

/// Sign a message with an RSA private key.
///
/// Returns the raw signature bytes (modulus length).
pub fn sign(private_key: &RsaPrivateKey, alg: JwsAlgorithm, message: &[u8]) -> Result<Vec<u8>> {
    let key = private_key.clone();
    let signature = match alg {
        JwsAlgorithm::Rs256 => SigningKey::<Sha256>::new(key).try_sign(message),
        JwsAlgorithm::Rs384 => SigningKey::<Sha384>::new(key).try_sign(message),
        JwsAlgorithm::Rs512 => SigningKey::<Sha512>::new(key).try_sign(message),
    }
    .map_err(|e| IdentityError::SigningFailed(format!("{alg} signing failed: {e}")))?;
    Ok(signature.to_vec())
}

/// Verify an RSA signature against a public key and message.
///
/// Returns `false` for a signature that does not match; this is an
/// outcome, not an error.
pub fn verify(
    public_key: &RsaPublicKey,
    alg: JwsAlgorithm,
    message: &[u8],
    signature: &[u8],
) -> bool {
    let Ok(signature) = Signature::try_from(signature) else {
        return false;
    };
    let key = public_key.clone();
    match alg {
        JwsAlgorithm::Rs256 => VerifyingKey::<Sha256>::new(key)
            .verify(message, &signature)
            .is_ok(),
        JwsAlgorithm::Rs384 => VerifyingKey::<Sha384>::new(key)
            .verify(message, &signature)
            .is_ok(),
        JwsAlgorithm::Rs512 => VerifyingKey::<Sha512>::new(key)
            .verify(message, &signature)
            .is_ok(),
    }
}

/// Sign a message and return the signature as base64url.
pub fn sign_to_base64url(
    private_key: &RsaPrivateKey,
    alg: JwsAlgorithm,
    message: &[u8],
) -> Result<String> {
    Ok(b64url_encode(sign(private_key, alg, message)?))
}

/// Verify a base64url-encoded signature.
///
/// Malformed base64 is an error; a well-formed signature that does not
/// verify is `Ok(false)`.
pub fn verify_from_base64url(
    public_key: &RsaPublicKey,
    alg: JwsAlgorithm,
    message: &[u8],
    signature_b64: &str,
) -> Result<bool> {
    let sig_bytes = b64url_decode(signature_b64).map_err(|e| {
        IdentityError::VerificationError(format!("invalid base64url signature: {e}"))
    })?;
    Ok(verify(public_key, alg, message, &sig_bytes))
}
