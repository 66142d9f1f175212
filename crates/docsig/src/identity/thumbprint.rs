//! JWK Thumbprint (RFC 7638) identifiers.
//!
//! The identifier of an identity is the SHA-256 digest of the canonical
//! JSON of the required RSA public members, hex encoded. Only `e`, `kty`
//! and `n` participate; every other member of the key is ignored.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::crypto::jwk::{RsaPublicJwk, KTY_RSA};
use crate::error::{IdentityError, Result};

use super::identity::IdentityId;

/// Required members of an RSA public key, in lexicographic order.
#[derive(Serialize)]
struct RequiredMembers<'a> {
    e: &'a str,
    kty: &'a str,
    n: &'a str,
}

/// The exact bytes that are hashed: compact JSON, no whitespace.
pub fn canonical_members(jwk: &RsaPublicJwk) -> Result<Vec<u8>> {
    if jwk.kty != KTY_RSA {
        return Err(IdentityError::InvalidKey(format!(
            "cannot thumbprint key type `{}`",
            jwk.kty
        )));
    }
    if jwk.n.is_empty() || jwk.e.is_empty() {
        return Err(IdentityError::InvalidKey(
            "RSA key is missing `n` or `e`".into(),
        ));
    }
    serde_json::to_vec(&RequiredMembers {
        e: &jwk.e,
        kty: &jwk.kty,
        n: &jwk.n,
    })
    .map_err(|e| IdentityError::SerializationError(e.to_string()))
}

/// Compute the lowercase hex SHA-256 JWK Thumbprint of a public key.
pub fn jwk_thumbprint(jwk: &RsaPublicJwk) -> Result<IdentityId> {
    let canonical = canonical_members(jwk)?;
    Ok(IdentityId(hex::encode(Sha256::digest(&canonical))))
}
