//! RSA key pair generation.
//!
//! RSA is used for identity keys and document signatures. The private key
//! is zeroized on drop by the `rsa` crate.

use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::{IdentityError, Result};

/// Modulus size used when none is configured.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Smallest modulus accepted for new identities.
pub const MIN_KEY_BITS: usize = 2048;

/// Largest modulus `RsaPublicKey` will load (`RsaPublicKey::MAX_SIZE`).
pub const MAX_KEY_BITS: usize = 4096;

/// An RSA key pair for signing operations.
pub struct RsaKeyPair {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl RsaKeyPair {
    /// Generate a new random RSA key pair with a `bits`-bit modulus.
    ///
    /// Fails if `bits` is outside [`MIN_KEY_BITS`]..=[`MAX_KEY_BITS`] or the
    /// primitive cannot produce a key. Never falls back to a placeholder key.
    pub fn generate(bits: usize) -> Result<Self> {
        if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&bits) {
            return Err(IdentityError::KeyGenerationFailed(format!(
                "RSA modulus must be {MIN_KEY_BITS} to {MAX_KEY_BITS} bits, got {bits}"
            )));
        }
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), bits)
            .map_err(|e| IdentityError::KeyGenerationFailed(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Wrap an existing private key.
    pub fn from_private_key(private_key: RsaPrivateKey) -> Self {
        let public_key = private_key.to_public_key();
        Self {
            private_key,
            public_key,
        }
    }

    /// Return a reference to the private key.
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// Return the public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Modulus size in bits.
    pub fn modulus_bits(&self) -> usize {
        self.public_key.size() * 8
    }
}
