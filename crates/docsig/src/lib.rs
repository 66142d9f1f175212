//! docsig: self-signed JSON documents backed by RSA identities.
//!
//! Provides RSA identities whose ids are JWK thumbprints, JSON Web
//! Signatures embedded in the documents they cover, and tamper-evident
//! verification of those documents.

pub mod crypto;
pub mod document;
pub mod error;
pub mod identity;
pub mod json;
pub mod jws;
pub mod time;


// Re-export primary types
pub use error::{IdentityError, Result};
pub use identity::{Identity, IdentityId, IdentityManager, PublicIdentity};

// Re-export document types
pub use document::{DocumentVerification, Instance, Payload, SignedDocument};

// Re-export signature and key types
pub use crypto::{RsaPrivateJwk, RsaPublicJwk};
pub use jws::{JsonSignature, JwsEnvelope, SignatureCheck, SignatureEntry};
