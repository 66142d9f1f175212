//! Cryptographic primitives for docsig.
//!
//! This module provides:
//! - RSA key pair generation
//! - RSASSA-PKCS1-v1_5 signing and verification (RS256/RS384/RS512)
//! - Structured RSA JSON Web Keys
//! - base64url encoding as used by JOSE

pub mod encoding;
pub mod jwk;
pub mod keys;
pub mod signing;

pub use jwk::{RsaPrivateJwk, RsaPublicJwk};
pub use keys::RsaKeyPair;
pub use signing::JwsAlgorithm;
