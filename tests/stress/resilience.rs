//! Resilience tests: corrupted files, tampered signatures and envelopes.

use docsig::document::{Payload, SignedDocument};
use docsig::identity::{Identity, IdentityManager};
use docsig::{IdentityError, JwsEnvelope};

fn signed() -> (Identity, Payload) {
    let identity = IdentityManager::new().create().unwrap();
    let mut payload =
        Payload::from_json(br#"{"id": "resilience", "owner": "me", "schema": "s"}"#).unwrap();
    payload.sign(&identity).unwrap();
    (identity, payload)
}

#[test]
fn resilience_corrupted_identity_file_detected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("identity.json");

    let identity = IdentityManager::new().create().unwrap();
    std::fs::write(&path, IdentityManager::export_identity(&identity).unwrap()).unwrap();

    let mut data = std::fs::read(&path).unwrap();
    for item in data.iter_mut().take(50).skip(40) {
        *item ^= 0xFF;
    }
    std::fs::write(&path, data).unwrap();

    let result = IdentityManager::import(&std::fs::read(&path).unwrap());
    assert!(result.is_err(), "Corrupted file should fail to load");
}

#[test]
fn resilience_identity_with_wrong_id_rejected() {
    let identity = IdentityManager::new().create().unwrap();
    let mut value = serde_json::to_value(&identity).expect("identity should serialize");
    value["id"] = "0".repeat(64).into();
    let bytes = serde_json::to_vec(&value).unwrap();
    assert!(IdentityManager::import(&bytes).is_err());
}

#[test]
fn resilience_identity_with_foreign_private_exponent_rejected() {
    let identity = IdentityManager::new().create().unwrap();
    let other = IdentityManager::new().create().unwrap();

    let mut value = serde_json::to_value(&identity).unwrap();
    value["_jwk"]["d"] = serde_json::to_value(&other).unwrap()["_jwk"]["d"].clone();
    let bytes = serde_json::to_vec(&value).unwrap();

    assert!(matches!(
        IdentityManager::import(&bytes),
        Err(IdentityError::SerializationError(_))
    ));
}

#[test]
fn resilience_flipped_signature_byte_fails() {
    let (_, mut payload) = signed();
    let mut signature = payload.signatures[0].signature.clone().into_bytes();
    signature[10] = if signature[10] == b'A' { b'B' } else { b'A' };
    payload.signatures[0].signature = String::from_utf8(signature).unwrap();
    assert!(!payload.verify().unwrap());
}

#[test]
fn resilience_garbage_signature_is_error() {
    let (_, mut payload) = signed();
    payload.signatures[0].signature = "***".into();
    assert!(matches!(
        payload.verify(),
        Err(IdentityError::VerificationError(_))
    ));
}

#[test]
fn resilience_missing_key_is_error() {
    let (_, mut payload) = signed();
    payload.signatures[0].header.jwk = None;
    assert!(payload.verify().is_err());
}

#[test]
fn resilience_tampered_envelope_payload_fails() {
    let (_, payload) = signed();
    let envelope = payload.to_jws().unwrap();

    let mut content = envelope.payload_bytes().unwrap();
    let text = String::from_utf8(content.clone()).unwrap();
    content = text.replace("resilience", "resilienc3").into_bytes();
    let forged = JwsEnvelope {
        payload: docsig::crypto::encoding::b64url_encode(&content),
        signatures: envelope.signatures.clone(),
    };

    match Payload::from_jws(&forged) {
        Ok(document) => assert!(!document.verify().unwrap()),
        Err(e) => assert!(matches!(e, IdentityError::VerificationError(_))),
    }
}

#[test]
fn resilience_truncated_document_rejected() {
    let (_, payload) = signed();
    let json = payload.to_json().unwrap();
    let truncated = &json[..json.len() / 2];
    assert!(matches!(
        Payload::from_json(truncated),
        Err(IdentityError::SerializationError(_))
    ));
}

#[test]
fn resilience_reordered_document_still_verifies() {
    // Stored whitespace is irrelevant; verification re-serializes.
    let (_, payload) = signed();
    let value: serde_json::Value = serde_json::from_slice(&payload.to_json().unwrap()).unwrap();
    let compact = serde_json::to_vec(&value).unwrap();
    let reloaded = Payload::from_json(&compact).unwrap();
    assert!(reloaded.verify().unwrap());
}
