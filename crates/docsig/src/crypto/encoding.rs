//! JOSE base64url helpers.
//!
//! JOSE encodes binary values and big integers as base64url without
//! padding. Padded input is rejected, so each value has one encoding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::BigUint;

use crate::error::{IdentityError, Result};

/// Encode bytes as unpadded base64url.
pub fn b64url_encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url.
pub fn b64url_decode(encoded: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(encoded)
}

/// Encode an unsigned big integer as big-endian base64url.
pub fn biguint_to_b64url(value: &BigUint) -> String {
    b64url_encode(value.to_bytes_be())
}

/// Decode a JWK integer member. `member` names the field in error messages.
pub fn b64url_to_biguint(encoded: &str, member: &str) -> Result<BigUint> {
    if encoded.is_empty() {
        return Err(IdentityError::InvalidKey(format!(
            "JWK member `{member}` is empty"
        )));
    }
    let bytes = b64url_decode(encoded).map_err(|e| {
        IdentityError::InvalidKey(format!("JWK member `{member}` is not base64url: {e}"))
    })?;
    Ok(BigUint::from_bytes_be(&bytes))
}
