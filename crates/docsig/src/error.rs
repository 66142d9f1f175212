//! Error types for docsig.
//!
//! All errors are strongly typed and propagated without panicking.
//! Private key material is never included in error messages.
//!
//! A signature that fails to verify is not an error: verification returns
//! `Ok(false)` for it. `VerificationError` means validity could not be
//! determined at all.

/// Error types covering identity, signing and verification operations.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Verification error: {0}")]
    VerificationError(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, IdentityError>;
