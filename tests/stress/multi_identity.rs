//! Stress test: several identities sign the same payload; every signature
//! must verify and be attributed to the right signer.

use std::collections::HashSet;

use docsig::document::{Payload, SignedDocument};
use docsig::identity::{Identity, IdentityManager};

const IDENTITY_COUNT: usize = 6;

fn identities(n: usize) -> Vec<Identity> {
    let manager = IdentityManager::new();
    (0..n)
        .map(|_| manager.create().expect("identity creation should succeed"))
        .collect()
}

fn payload() -> Payload {
    Payload::from_json(br#"{"id": "multi", "owner": "team", "schema": "s"}"#).unwrap()
}

#[test]
fn stress_identity_ids_are_unique() {
    let ids: HashSet<_> = identities(IDENTITY_COUNT)
        .iter()
        .map(|identity| identity.id().clone())
        .collect();
    assert_eq!(ids.len(), IDENTITY_COUNT);
}

#[test]
fn stress_many_signers_on_one_payload() {
    let signers = identities(IDENTITY_COUNT);
    let mut document = payload();
    for signer in &signers {
        document.sign(signer).expect("signing should succeed");
    }
    assert_eq!(document.signatures.len(), IDENTITY_COUNT);

    let result = document.verify_detailed().unwrap();
    assert!(result.is_valid);
    for (check, signer) in result.signatures.iter().zip(&signers) {
        assert!(check.valid);
        assert_eq!(&check.signer, signer.id());
    }

    // Survives serialization
    let reloaded = Payload::from_json(&document.to_json().unwrap()).unwrap();
    assert!(reloaded.verify().unwrap());
}

#[test]
fn stress_swapped_keys_between_signers_fail() {
    let signers = identities(2);
    let mut document = payload();
    document.sign(&signers[0]).unwrap();
    document.sign(&signers[1]).unwrap();

    let first = document.signatures[0].header.jwk.clone();
    let second = document.signatures[1].header.jwk.clone();
    document.signatures[0].header.jwk = second;
    document.signatures[1].header.jwk = first;

    let result = document.verify_detailed().unwrap();
    assert!(!result.is_valid);
    assert!(result.signatures.iter().all(|check| !check.valid));
}
