//! Signed business documents.
//!
//! [`Payload`] is the document type; [`SignedDocument`] supplies signing
//! and verification for any serializable type that embeds its signatures.
//! [`Instance`] pairs a payload with the identity that owns it.

pub mod instance;
pub mod payload;
pub mod signed;

pub use instance::Instance;
pub use payload::{App, Payload, PermissionSet, Permissions, Version};
pub use signed::{DocumentVerification, SignedDocument, SIGNATURES_KEY};
