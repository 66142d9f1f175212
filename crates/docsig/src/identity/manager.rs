//! Identity creation and key interchange.

use log::debug;

use crate::crypto::jwk::{RsaPrivateJwk, RsaPublicJwk};
use crate::crypto::keys::{RsaKeyPair, DEFAULT_KEY_BITS};
use crate::error::{IdentityError, Result};

use super::identity::{Identity, IdentityId};
use super::thumbprint::jwk_thumbprint;

/// Creates identities and exposes their key material in JWK form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityManager {
    key_bits: usize,
}

impl Default for IdentityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityManager {
    /// A manager producing 2048-bit RSA identities.
    pub fn new() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
        }
    }

    /// A manager producing identities with a `bits`-bit modulus.
    ///
    /// Sizes outside 2048..=4096 are rejected when [`create`](Self::create)
    /// runs.
    pub fn with_key_bits(bits: usize) -> Self {
        Self { key_bits: bits }
    }

    /// Configured modulus size.
    pub fn key_bits(&self) -> usize {
        self.key_bits
    }

    /// Generate a fresh key pair and derive its identity.
    ///
    /// This blocks for the duration of RSA key generation.
    pub fn create(&self) -> Result<Identity> {
        let key_pair = RsaKeyPair::generate(self.key_bits)?;
        let public = RsaPublicJwk::from_public_key(key_pair.public_key());
        let id = jwk_thumbprint(&public)?;
        let private_jwk = RsaPrivateJwk::from_private_key(key_pair.private_key())
            .map_err(|e| IdentityError::KeyGenerationFailed(e.to_string()))?
            .with_kid(id.as_str());
        let identity = Identity::from_parts(private_jwk, public.with_kid(id.as_str()))?;
        debug!(
            "created identity {} ({}-bit RSA)",
            identity.id(),
            key_pair.modulus_bits()
        );
        Ok(identity)
    }

    /// Compute the JWK Thumbprint id of a public key.
    ///
    /// Only `kty`, `e` and `n` are hashed, so any party holding the public
    /// key alone can reproduce the id.
    pub fn thumbprint(public_jwk: &RsaPublicJwk) -> Result<IdentityId> {
        jwk_thumbprint(public_jwk)
    }

    /// Serialize the private key as JWK JSON.
    pub fn export_private(identity: &Identity) -> Result<Vec<u8>> {
        identity.private_jwk().to_json()
    }

    /// Serialize the public key as JWK JSON.
    pub fn export_public(identity: &Identity) -> Result<Vec<u8>> {
        identity.public_jwk().to_json()
    }

    /// Serialize the whole identity record (`id`, `_jwk`, `jwk`).
    pub fn export_identity(identity: &Identity) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(identity)
            .map_err(|e| IdentityError::SerializationError(e.to_string()))
    }

    /// Parse an identity record produced by
    /// [`export_identity`](Self::export_identity).
    pub fn import(bytes: &[u8]) -> Result<Identity> {
        serde_json::from_slice(bytes)
            .map_err(|e| IdentityError::SerializationError(format!("invalid identity: {e}")))
    }

    /// Rebuild an identity from an exported private JWK.
    pub fn import_private(bytes: &[u8]) -> Result<Identity> {
        let private_jwk: RsaPrivateJwk = serde_json::from_slice(bytes)
            .map_err(|e| IdentityError::SerializationError(format!("invalid private JWK: {e}")))?;
        private_jwk.to_private_key()?;
        let public_jwk = private_jwk.to_public();
        Identity::from_parts(private_jwk, public_jwk)
    }
}
