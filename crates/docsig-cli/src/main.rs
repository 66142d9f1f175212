//! docsig CLI — `docsig` command.
//!
//! Creates RSA identities, signs JSON documents with them, and verifies
//! signed documents.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use docsig::crypto::RsaPublicJwk;
use docsig::identity::jwk_thumbprint;
use docsig::time::micros_to_rfc3339;
use docsig::{DocumentVerification, Identity, IdentityManager, Instance, Payload, SignedDocument};

/// Payload signed by `docsig demo`.
const DEMO_PAYLOAD: &str = r#"{
    "id": "6bf77fce-1275-4ac1-9e0b-81c7580bb2ee",
    "owner": "dd92ad1e-a7f6-46e7-8357-eb2a056ebc9b",
    "permissions": {
        "identities": {
            "de999afe-f9fe-48f2-9828-c078e146f47d": {
                "archive": true,
                "modify": false,
                "remove": false
            },
            "b24bee83-c797-4fb3-a79a-df1e97104fcd": {
                "archive": true,
                "modify": false,
                "remove": false
            }
        },
        "public": false
    },
    "schema": "dummy.schema.ink",
    "version": {
        "app": {
            "name": "random-app",
            "url": "https://random-app",
            "version": "1.0.0"
        },
        "created": 123456789,
        "id": "e58185f4-4e78-4f4d-a224-9666f8940f43",
        "message": "commit message",
        "received": 123456789,
        "removed": 123456789,
        "updated": 123456789
    }
}"#;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {what} {}", path.display()))
}

fn load_identity(path: &Path) -> Result<Identity> {
    let bytes = read_file(path, "identity file")?;
    IdentityManager::import(&bytes).context("failed to load identity")
}

fn load_document(path: &Path) -> Result<Payload> {
    let bytes = read_file(path, "document")?;
    Payload::from_json(&bytes).context("failed to parse document")
}

fn write_output(out: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{}", String::from_utf8_lossy(bytes));
            Ok(())
        }
    }
}

fn print_verification(result: &DocumentVerification) {
    println!("Signatures ({}):", result.signatures.len());
    for (i, check) in result.signatures.iter().enumerate() {
        println!(
            "  [{}] {} {} — {}",
            i + 1,
            check.algorithm,
            check.signer,
            if check.valid { "valid" } else { "INVALID" }
        );
    }
    println!("  Verified at: {}", micros_to_rfc3339(result.verified_at));
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// docsig CLI — sign JSON documents with RSA identities.
#[derive(Parser, Debug)]
#[command(
    name = "docsig",
    about = "docsig CLI",
    version,
    long_about = "docsig — self-signed JSON documents\n\nCreate RSA identities identified by their JWK thumbprint, embed\nJSON Web Signatures in documents, and verify them."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new identity and write it to a file
    Init {
        /// Destination file for the identity record
        #[arg(long)]
        out: PathBuf,
    },

    /// Display identity information
    Show {
        /// Identity file
        #[arg(long)]
        identity: PathBuf,
    },

    /// Print the JWK thumbprint of a key
    Thumbprint {
        /// JWK file (public or private)
        #[arg(long)]
        jwk: PathBuf,
    },

    /// Sign a JSON payload
    Sign {
        /// Identity file of the signer
        #[arg(long)]
        identity: PathBuf,

        /// Payload JSON file
        #[arg(long)]
        payload: PathBuf,

        /// Write the signed document here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Verify every signature on a signed document
    Verify {
        /// Signed document file
        #[arg(long)]
        document: PathBuf,
    },

    /// Print the JWS JSON envelope of a signed document
    Envelope {
        /// Signed document file
        #[arg(long)]
        document: PathBuf,
    },

    /// Sign the built-in demo payload and show tamper detection
    Demo,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = match cli.command {
        Commands::Init { out } => cmd_init(&out, verbose),
        Commands::Show { identity } => cmd_show(&identity, verbose),
        Commands::Thumbprint { jwk } => cmd_thumbprint(&jwk),
        Commands::Sign {
            identity,
            payload,
            out,
        } => cmd_sign(&identity, &payload, out.as_deref(), verbose),
        Commands::Verify { document } => cmd_verify(&document, verbose),
        Commands::Envelope { document } => cmd_envelope(&document),
        Commands::Demo => cmd_demo(verbose),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

fn cmd_init(out: &Path, verbose: bool) -> Result<()> {
    if out.exists() {
        return Err(anyhow!("identity file {} already exists", out.display()));
    }

    let identity = IdentityManager::new()
        .create()
        .context("failed to create identity")?;
    let record = IdentityManager::export_identity(&identity)?;
    std::fs::write(out, record).with_context(|| format!("failed to write {}", out.display()))?;

    println!("Created identity");
    println!("  ID:   {}", identity.id());
    println!("  File: {}", out.display());

    if verbose {
        let public = IdentityManager::export_public(&identity)?;
        println!("  Public JWK: {}", String::from_utf8_lossy(&public));
    }

    Ok(())
}

fn cmd_show(path: &Path, verbose: bool) -> Result<()> {
    let identity = load_identity(path)?;
    let public = identity.to_public();

    println!("Identity: {}", path.display());
    println!("  ID:        {}", identity.id());
    println!("  Key type:  {}", public.jwk.kty);
    println!("  Key size:  {} bits", identity.key_bits()?);
    if let Some(ref kid) = public.jwk.kid {
        println!("  Key ID:    {kid}");
    }

    match public.verify_id() {
        Ok(()) => println!("  Thumbprint: matches"),
        Err(e) => println!("  Thumbprint: MISMATCH ({e})"),
    }

    if verbose {
        println!("  Exponent:  {}", public.jwk.e);
        println!("  Modulus:   {}", public.jwk.n);
    }

    Ok(())
}

fn cmd_thumbprint(path: &Path) -> Result<()> {
    let bytes = read_file(path, "JWK")?;
    let jwk = RsaPublicJwk::from_json(&bytes).context("failed to parse JWK")?;
    let id = jwk_thumbprint(&jwk)?;
    println!("{id}");
    Ok(())
}

fn cmd_sign(
    identity_path: &Path,
    payload_path: &Path,
    out: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let identity = load_identity(identity_path)?;
    let mut payload = load_document(payload_path)?;

    payload.sign(&identity).context("failed to sign payload")?;
    debug!(
        "payload {} now carries {} signature(s)",
        payload.id,
        payload.signatures.len()
    );

    write_output(out, &payload.to_json()?)?;

    if let Some(path) = out {
        eprintln!("Signed by {}", identity.id());
        eprintln!("  Output: {}", path.display());
        if verbose {
            eprintln!("  Signatures: {}", payload.signatures.len());
        }
    }

    Ok(())
}

fn cmd_verify(path: &Path, verbose: bool) -> Result<()> {
    let document = load_document(path)?;
    if !document.is_signed() {
        return Err(anyhow!("{} carries no signatures", path.display()));
    }
    let result = document
        .verify_detailed()
        .context("failed to verify document")?;

    if verbose || !result.is_valid {
        print_verification(&result);
    }

    if result.is_valid {
        println!("Document: valid");
        Ok(())
    } else {
        Err(anyhow!("document signatures do not verify"))
    }
}

fn cmd_envelope(path: &Path) -> Result<()> {
    let document = load_document(path)?;
    let envelope = document.to_jws().context("failed to build envelope")?;
    write_output(None, &envelope.to_json()?)
}

fn cmd_demo(verbose: bool) -> Result<()> {
    let owner = IdentityManager::new()
        .create()
        .context("failed to create identity")?;
    println!("Identity: {}", owner.id());

    let mut instance = Instance::new(owner, Payload::default());
    instance.set_payload_from_json(DEMO_PAYLOAD.as_bytes())?;
    instance.sign()?;

    if verbose {
        println!("{}", String::from_utf8_lossy(&instance.to_json()?));
    }

    let result = instance.verify_detailed()?;
    print_verification(&result);
    println!("Signed document verifies: {}", result.is_valid);

    instance.payload.id = "1".into();
    println!("After changing id to \"1\": {}", instance.verify()?);

    Ok(())
}
