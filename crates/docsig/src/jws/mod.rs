//! JSON Web Signatures over JSON documents.

pub mod header;
pub mod signature;

pub use header::{JwsHeader, ProtectedHeader, SignatureEntry};
pub use signature::{JsonSignature, JwsEnvelope, SignatureCheck};
