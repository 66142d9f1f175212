//! Edge case tests: key sizes, thumbprint stability, malformed key
//! material and unusual payloads.

use docsig::crypto::{RsaPrivateJwk, RsaPublicJwk};
use docsig::document::{Payload, SignedDocument};
use docsig::identity::{jwk_thumbprint, IdentityManager};
use docsig::IdentityError;

// === Key generation ===

#[test]
fn edge_undersized_key_rejected() {
    let result = IdentityManager::with_key_bits(1024).create();
    assert!(matches!(result, Err(IdentityError::KeyGenerationFailed(_))));
}

#[test]
fn edge_oversized_key_rejected() {
    // Keys above 4096 bits could sign but never be loaded for verification.
    let result = IdentityManager::with_key_bits(4160).create();
    assert!(matches!(result, Err(IdentityError::KeyGenerationFailed(_))));
}

#[test]
fn edge_larger_key_supported() {
    let identity = IdentityManager::with_key_bits(3072).create().unwrap();
    assert_eq!(identity.key_bits().unwrap(), 3072);

    let mut payload = Payload::default();
    payload.sign(&identity).unwrap();
    assert!(payload.verify().unwrap());
}

// === Thumbprints ===

#[test]
fn edge_thumbprint_ignores_optional_members() {
    let identity = IdentityManager::new().create().unwrap();
    let mut value = serde_json::to_value(identity.public_jwk()).unwrap();
    value["alg"] = "RS256".into();
    value["use"] = "sig".into();
    value["x-custom"] = serde_json::json!({"nested": [1, 2, 3]});
    value["kid"] = "something-else".into();
    let decorated: RsaPublicJwk = serde_json::from_value(value).unwrap();

    assert_eq!(&jwk_thumbprint(&decorated).unwrap(), identity.id());
}

#[test]
fn edge_thumbprint_from_private_jwk_json() {
    let identity = IdentityManager::new().create().unwrap();
    let private_json = IdentityManager::export_private(&identity).unwrap();
    // Parsing a private JWK as public keeps private members out of the hash
    let as_public = RsaPublicJwk::from_json(&private_json).unwrap();
    assert_eq!(&jwk_thumbprint(&as_public).unwrap(), identity.id());
}

#[test]
fn edge_thumbprint_is_lowercase_hex() {
    let identity = IdentityManager::new().create().unwrap();
    let id = identity.id().as_str();
    assert_eq!(id.len(), 64);
    assert!(id.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn edge_non_rsa_jwk_rejected() {
    let result = RsaPublicJwk::from_json(br#"{"kty": "EC", "crv": "P-256", "x": "a", "y": "b"}"#);
    assert!(result.is_err());
}

// === Malformed key material ===

#[test]
fn edge_invalid_base64_modulus_rejected() {
    let identity = IdentityManager::new().create().unwrap();
    let mut jwk = identity.public_jwk().clone();
    jwk.n = "not*base64".into();
    assert!(matches!(jwk.to_public_key(), Err(IdentityError::InvalidKey(_))));
}

#[test]
fn edge_inconsistent_private_jwk_rejected() {
    let identity = IdentityManager::new().create().unwrap();
    let other = IdentityManager::new().create().unwrap();

    let mut value = serde_json::to_value(identity.private_jwk()).unwrap();
    value["d"] = serde_json::to_value(other.private_jwk()).unwrap()["d"].clone();
    let broken: RsaPrivateJwk = serde_json::from_value(value).unwrap();
    assert!(broken.to_private_key().is_err());

    let bytes = serde_json::to_vec(&broken).unwrap();
    assert!(IdentityManager::import_private(&bytes).is_err());
}

#[test]
fn edge_private_jwk_debug_is_redacted() {
    let identity = IdentityManager::new().create().unwrap();
    let debug = format!("{:?}", identity.private_jwk());
    assert!(!debug.contains(&identity.private_jwk().d));
}

// === Payloads ===

#[test]
fn edge_empty_payload_signs_and_verifies() {
    let identity = IdentityManager::new().create().unwrap();
    let mut payload = Payload::default();
    payload.sign(&identity).unwrap();
    assert!(payload.verify().unwrap());
}

#[test]
fn edge_unicode_payload_signs_and_verifies() {
    let identity = IdentityManager::new().create().unwrap();
    let mut payload = Payload::from_json(
        r#"{"id": "ünïcødé-✓", "version": {"message": "line\nbreak \"quoted\" 日本語"}}"#
            .as_bytes(),
    )
    .unwrap();
    payload.sign(&identity).unwrap();
    assert!(payload.verify().unwrap());

    let reloaded = Payload::from_json(&payload.to_json().unwrap()).unwrap();
    assert!(reloaded.verify().unwrap());
}

#[test]
fn edge_unsigned_payload_verify_is_error() {
    assert!(matches!(
        Payload::default().verify(),
        Err(IdentityError::VerificationError(_))
    ));
}
