//! Identity: an RSA key pair whose id is derived from the public key.
//!
//! The public key IS the identity. The private key proves ownership.
//! An identity is immutable once created; deserializing one re-derives
//! the id and rejects records that do not hold together.

use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::crypto::jwk::{RsaPrivateJwk, RsaPublicJwk};
use crate::error::{IdentityError, Result};

use super::thumbprint::jwk_thumbprint;

/// Unique identifier for an identity.
///
/// Format: 64 lowercase hex characters, the SHA-256 JWK Thumbprint of the
/// public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityId(pub String);

impl IdentityId {
    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A signing identity holding both halves of its key.
///
/// Serialized as `{"id": ..., "_jwk": <private JWK>, "jwk": <public JWK>}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "IdentityRecord")]
pub struct Identity {
    id: IdentityId,
    #[serde(rename = "_jwk")]
    private_jwk: RsaPrivateJwk,
    #[serde(rename = "jwk")]
    public_jwk: RsaPublicJwk,
}

/// Unchecked wire form of an identity.
#[derive(Deserialize)]
struct IdentityRecord {
    id: IdentityId,
    #[serde(rename = "_jwk")]
    private_jwk: RsaPrivateJwk,
    #[serde(rename = "jwk")]
    public_jwk: RsaPublicJwk,
}

impl TryFrom<IdentityRecord> for Identity {
    type Error = IdentityError;

    fn try_from(record: IdentityRecord) -> Result<Self> {
        record.private_jwk.to_private_key()?;
        let identity = Identity::from_parts(record.private_jwk, record.public_jwk)?;
        if identity.id != record.id {
            return Err(IdentityError::InvalidKey(format!(
                "identity id {} does not match public key thumbprint {}",
                record.id, identity.id
            )));
        }
        Ok(identity)
    }
}

impl Identity {
    /// Assemble an identity from its key halves, deriving the id.
    ///
    /// The two halves must describe the same key.
    pub fn from_parts(private_jwk: RsaPrivateJwk, public_jwk: RsaPublicJwk) -> Result<Self> {
        if private_jwk.kty != public_jwk.kty
            || private_jwk.n != public_jwk.n
            || private_jwk.e != public_jwk.e
        {
            return Err(IdentityError::InvalidKey(
                "private and public JWK describe different keys".into(),
            ));
        }
        let id = jwk_thumbprint(&public_jwk)?;
        Ok(Self {
            id,
            private_jwk,
            public_jwk,
        })
    }

    /// Return the identity id (derived from the public key).
    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    /// Return the public key in JWK form.
    pub fn public_jwk(&self) -> &RsaPublicJwk {
        &self.public_jwk
    }

    /// Return the private key in JWK form.
    pub fn private_jwk(&self) -> &RsaPrivateJwk {
        &self.private_jwk
    }

    /// Decode the private key for signing.
    pub fn private_key(&self) -> Result<RsaPrivateKey> {
        self.private_jwk.to_private_key()
    }

    /// Decode the public key for verification.
    pub fn public_key(&self) -> Result<RsaPublicKey> {
        self.public_jwk.to_public_key()
    }

    /// Modulus size in bits.
    pub fn key_bits(&self) -> Result<usize> {
        Ok(self.public_key()?.size() * 8)
    }

    /// The shareable half of this identity.
    pub fn to_public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id.clone(),
            jwk: self.public_jwk.clone(),
        }
    }
}

/// Public view of an identity (no private key material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
    pub id: IdentityId,
    pub jwk: RsaPublicJwk,
}

impl PublicIdentity {
    /// Check that `id` is the thumbprint of `jwk`.
    pub fn verify_id(&self) -> Result<()> {
        let derived = jwk_thumbprint(&self.jwk)?;
        if derived != self.id {
            return Err(IdentityError::InvalidKey(format!(
                "identity id {} does not match public key thumbprint {derived}",
                self.id
            )));
        }
        Ok(())
    }
}
