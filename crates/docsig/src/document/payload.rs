//! The business document protected by signatures.
//!
//! Member order in the serialized form follows field declaration order and
//! is part of the signing contract: reordering fields here invalidates
//! every existing signature.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};
use crate::jws::SignatureEntry;

use super::signed::SignedDocument;

/// A versioned record with per-identity permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    pub id: String,
    pub owner: String,
    pub permissions: Permissions,
    pub schema: String,
    pub version: Version,
    /// Must stay the last member.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<SignatureEntry>,
}

/// Access rules for a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    /// Keyed by identity id.
    pub identities: BTreeMap<String, PermissionSet>,
    pub public: bool,
}

/// What one identity may do with a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSet {
    pub archive: bool,
    pub modify: bool,
    pub remove: bool,
}

/// Version metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    pub app: App,
    pub created: u64,
    pub id: String,
    pub message: String,
    pub received: u64,
    pub removed: u64,
    pub updated: u64,
}

/// The application that wrote a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    pub name: String,
    pub url: String,
    pub version: String,
}

impl Permissions {
    /// Grant `set` to `identity_id`, replacing any previous grant.
    pub fn grant(&mut self, identity_id: impl Into<String>, set: PermissionSet) {
        self.identities.insert(identity_id.into(), set);
    }

    /// Permissions held by `identity_id`, if any.
    pub fn get(&self, identity_id: &str) -> Option<&PermissionSet> {
        self.identities.get(identity_id)
    }
}

impl Payload {
    /// Parse a payload from JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| IdentityError::SerializationError(format!("invalid payload: {e}")))
    }

    /// Serialize in the signed document form, signatures included.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        self.signed_json()
    }

    /// Whether any signature is attached.
    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }
}

impl SignedDocument for Payload {
    fn signatures(&self) -> &[SignatureEntry] {
        &self.signatures
    }

    fn signatures_mut(&mut self) -> &mut Vec<SignatureEntry> {
        &mut self.signatures
    }
}
