//! Sign Document — create an identity, sign a payload, detect tampering.
//!
//! Run with:
//!   cargo run --example sign_document -p docsig

use docsig::document::{PermissionSet, SignedDocument};
use docsig::{IdentityManager, Payload};

fn main() -> docsig::Result<()> {
    // ── 1. Create an identity ───────────────────────────────────────────────
    //
    // The id is the SHA-256 JWK Thumbprint of the public key.
    let identity = IdentityManager::new().create()?;
    println!("Identity created");
    println!("  ID: {}", identity.id());
    println!();

    // ── 2. Build and sign a payload ─────────────────────────────────────────
    let mut payload = Payload {
        id: "example-document".into(),
        owner: identity.id().to_string(),
        schema: "example.schema".into(),
        ..Payload::default()
    };
    payload.permissions.grant(
        identity.id().as_str(),
        PermissionSet {
            archive: true,
            modify: true,
            remove: false,
        },
    );
    payload.version.message = "first version".into();

    payload.sign(&identity)?;
    println!("Signed document:");
    println!("{}", String::from_utf8_lossy(&payload.to_json()?));
    println!();

    // ── 3. Verify ───────────────────────────────────────────────────────────
    let result = payload.verify_detailed()?;
    for check in &result.signatures {
        println!("  {} by {}: {}", check.algorithm, check.signer, check.valid);
    }
    println!("Document valid: {}", result.is_valid);

    // ── 4. Tamper ───────────────────────────────────────────────────────────
    payload.version.message = "edited after signing".into();
    println!("Valid after edit: {}", payload.verify()?);

    Ok(())
}
