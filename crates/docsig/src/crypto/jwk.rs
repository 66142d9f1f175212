//! RSA JSON Web Keys (RFC 7517 / RFC 7518 section 6.3).
//!
//! Keys are structured records with the RSA members named explicitly.
//! Members this crate does not recognize are kept in `extra` so that a key
//! survives a parse/serialize round trip unchanged.

use std::collections::BTreeMap;
use std::fmt;

use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::encoding::{b64url_to_biguint, biguint_to_b64url};
use crate::error::{IdentityError, Result};

/// `kty` value for RSA keys.
pub const KTY_RSA: &str = "RSA";

fn check_kty(kty: &str) -> Result<()> {
    if kty != KTY_RSA {
        return Err(IdentityError::InvalidKey(format!(
            "unsupported key type `{kty}`, expected `{KTY_RSA}`"
        )));
    }
    Ok(())
}

/// Public half of an RSA key in JWK form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublicJwk {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    pub n: String,
    pub e: String,
    /// Unrecognized members (`alg`, `use`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RsaPublicJwk {
    /// Encode a public key.
    pub fn from_public_key(key: &RsaPublicKey) -> Self {
        Self {
            kty: KTY_RSA.to_string(),
            kid: None,
            n: biguint_to_b64url(key.n()),
            e: biguint_to_b64url(key.e()),
            extra: BTreeMap::new(),
        }
    }

    /// Set the key id.
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Decode into a usable public key.
    pub fn to_public_key(&self) -> Result<RsaPublicKey> {
        check_kty(&self.kty)?;
        let n = b64url_to_biguint(&self.n, "n")?;
        let e = b64url_to_biguint(&self.e, "e")?;
        RsaPublicKey::new(n, e).map_err(|e| IdentityError::InvalidKey(e.to_string()))
    }

    /// Parse from JWK JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let jwk: Self = serde_json::from_slice(bytes)
            .map_err(|e| IdentityError::SerializationError(format!("invalid public JWK: {e}")))?;
        check_kty(&jwk.kty)?;
        Ok(jwk)
    }

    /// Serialize to JWK JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| IdentityError::SerializationError(e.to_string()))
    }
}

/// Private RSA key in JWK form (two-prime keys only).
///
/// Private members are zeroized on drop and never printed by `Debug`.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivateJwk {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    pub n: String,
    pub e: String,
    pub d: String,
    pub p: String,
    pub q: String,
    pub dp: String,
    pub dq: String,
    pub qi: String,
    #[serde(flatten)]
    #[zeroize(skip)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RsaPrivateJwk {
    /// Encode a private key, including its CRT parameters.
    pub fn from_private_key(key: &RsaPrivateKey) -> Result<Self> {
        let [p, q] = key.primes() else {
            return Err(IdentityError::InvalidKey(
                "only two-prime RSA keys can be encoded as JWK".into(),
            ));
        };
        let missing = |member: &str| {
            IdentityError::InvalidKey(format!("private key has no precomputed `{member}`"))
        };
        let dp = key.dp().ok_or_else(|| missing("dp"))?;
        let dq = key.dq().ok_or_else(|| missing("dq"))?;
        let qi = key.crt_coefficient().ok_or_else(|| missing("qi"))?;

        Ok(Self {
            kty: KTY_RSA.to_string(),
            kid: None,
            n: biguint_to_b64url(key.n()),
            e: biguint_to_b64url(key.e()),
            d: biguint_to_b64url(key.d()),
            p: biguint_to_b64url(p),
            q: biguint_to_b64url(q),
            dp: biguint_to_b64url(dp),
            dq: biguint_to_b64url(dq),
            qi: biguint_to_b64url(&qi),
            extra: BTreeMap::new(),
        })
    }

    /// Set the key id.
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Decode into a usable private key. The key is validated.
    pub fn to_private_key(&self) -> Result<RsaPrivateKey> {
        check_kty(&self.kty)?;
        let n = b64url_to_biguint(&self.n, "n")?;
        let e = b64url_to_biguint(&self.e, "e")?;
        let d = b64url_to_biguint(&self.d, "d")?;
        let p = b64url_to_biguint(&self.p, "p")?;
        let q = b64url_to_biguint(&self.q, "q")?;
        let key = RsaPrivateKey::from_components(n, e, d, vec![p, q])
            .map_err(|e| IdentityError::InvalidKey(e.to_string()))?;
        key.validate()
            .map_err(|e| IdentityError::InvalidKey(e.to_string()))?;
        Ok(key)
    }

    /// The public members of this key. Extension members are not copied.
    pub fn to_public(&self) -> RsaPublicJwk {
        RsaPublicJwk {
            kty: self.kty.clone(),
            kid: self.kid.clone(),
            n: self.n.clone(),
            e: self.e.clone(),
            extra: BTreeMap::new(),
        }
    }

    /// Serialize to JWK JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| IdentityError::SerializationError(e.to_string()))
    }
}

impl fmt::Debug for RsaPrivateJwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateJwk")
            .field("kty", &self.kty)
            .field("kid", &self.kid)
            .field("n", &self.n)
            .field("e", &self.e)
            .finish_non_exhaustive()
    }
}
