//! Identity management: creation, thumbprint ids, key interchange.
//!
//! The identity module provides [`IdentityManager`], which creates RSA
//! identities, and [`Identity`], the key pair plus its derived id.

#[allow(clippy::module_inception)]
pub mod identity;
pub mod manager;
pub mod thumbprint;

pub use identity::{Identity, IdentityId, PublicIdentity};
pub use manager::IdentityManager;
pub use thumbprint::jwk_thumbprint;
