//! faucet-cli — Command-line interface for the Handshake faucet tool.
//!
//! Generates deterministic faucet credentials, protects private keys on
//! disk behind a passphrase, and provides address, multisig, and envelope
//! utilities over the engine crates.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use faucet_core::keyring::KeyRing;
use faucet_core::network::Network;
use faucet_wallet::{
    create_multisig, is_valid_address, protect, read_bundle_file, recover, write_bundle_file,
    EnvelopeEncryptor, FaucetOptions, FaucetTool, Language,
};

/// Handshake faucet tool.
#[derive(Parser)]
#[command(name = "faucet-cli")]
#[command(version, about = "Deterministic credentials for Handshake faucets.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a full set of faucet credentials.
    New(NewArgs),
    /// Generate a random keypair and save it passphrase-encrypted.
    Keygen(KeygenArgs),
    /// Recover a key from an encrypted bundle file.
    Recover(RecoverArgs),
    /// Validate an address for a network.
    Validate(ValidateArgs),
    /// Build an m-of-n multisig address.
    Multisig(MultisigArgs),
    /// Envelope-encrypt a string for the faucet operator.
    Encrypt(EncryptArgs),
}

#[derive(Args)]
struct NewArgs {
    /// Network (main, testnet, regtest, simnet).
    #[arg(short, long, default_value = "main")]
    network: String,

    /// Mnemonic language.
    #[arg(short, long, default_value = "english")]
    language: String,

    /// Entropy bits (128-512, multiple of 32).
    #[arg(short, long, default_value = "256")]
    bits: usize,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct KeygenArgs {
    /// Output file for the encrypted key bundle.
    #[arg(short, long, default_value = "key.enc")]
    out: PathBuf,

    /// Network (main, testnet, regtest, simnet).
    #[arg(short, long, default_value = "main")]
    network: String,
}

#[derive(Args)]
struct RecoverArgs {
    /// Encrypted key bundle file.
    #[arg(short, long, default_value = "key.enc")]
    file: PathBuf,

    /// Network (main, testnet, regtest, simnet).
    #[arg(short, long, default_value = "main")]
    network: String,
}

#[derive(Args)]
struct ValidateArgs {
    /// The address to check.
    address: String,

    /// Network (main, testnet, regtest, simnet).
    #[arg(short, long, default_value = "main")]
    network: String,
}

#[derive(Args)]
struct MultisigArgs {
    /// Signature threshold m.
    #[arg(short, long)]
    m: usize,

    /// Network (main, testnet, regtest, simnet).
    #[arg(short, long, default_value = "main")]
    network: String,

    /// Hex-encoded compressed public keys, in spending order.
    #[arg(required = true, num_args = 1..)]
    pubkeys: Vec<String>,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct EncryptArgs {
    /// The text to encrypt (typically an address).
    text: String,

    /// Recipient X25519 public key, hex (default: the operator key).
    #[arg(short, long)]
    recipient: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New(args) => cmd_new(args),
        Commands::Keygen(args) => cmd_keygen(args),
        Commands::Recover(args) => cmd_recover(args),
        Commands::Validate(args) => cmd_validate(args),
        Commands::Multisig(args) => cmd_multisig(args),
        Commands::Encrypt(args) => cmd_encrypt(args),
    }
}

/// Generate and print a full credential set.
fn cmd_new(args: NewArgs) -> Result<()> {
    let options = FaucetOptions {
        network: parse_network(&args.network)?,
        language: parse_language(&args.language)?,
        bits: args.bits,
    };
    let tool = FaucetTool::new(options).context("Failed to generate credentials")?;

    if args.json {
        let summary = tool.summary().context("Failed to summarize credentials")?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\n=== FAUCET CREDENTIALS ===");
    println!("Network: {}", tool.network());
    println!("Address: {}", tool.address().encode());
    println!("\nSEED PHRASE (BACKUP THIS):");
    println!("  {}", tool.phrase());
    println!("\nPublic key:  {}", tool.public_key_hex());
    println!("Private key: {}", tool.private_key_wif()?);
    println!("Account xpub: {}", tool.account_xpub());
    println!("\nWARNING: This seed phrase will NOT be shown again.");
    println!("Anyone with the phrase or private key can spend from this address.");
    Ok(())
}

/// Generate a random keypair and persist it under a passphrase.
fn cmd_keygen(args: KeygenArgs) -> Result<()> {
    let network = parse_network(&args.network)?;

    // Checked before prompting so a typed passphrase is never wasted on a
    // doomed write; the write itself re-checks atomically.
    if args.out.exists() {
        bail!(
            "Key file already exists: {} (refusing to overwrite)",
            args.out.display()
        );
    }

    let passphrase = prompt_password("Enter passphrase (15+ characters)")?;
    let confirm = prompt_password("Confirm passphrase")?;
    if passphrase != confirm {
        bail!("Passphrases do not match");
    }

    let ring = KeyRing::generate();
    let secret = ring.secret_bytes().context("Key ring has no secret")?;
    let bundle = protect(&secret, &passphrase).context("Failed to encrypt key")?;
    write_bundle_file(&args.out, &bundle).context("Failed to save key bundle")?;

    println!("\n=== KEY SAVED ===");
    println!("File: {}", args.out.display());
    println!("Network: {network}");
    println!("Address: {}", ring.to_address(network).encode());
    println!("Public key: {}", hex::encode(ring.public_key_bytes()));
    Ok(())
}

/// Decrypt a saved bundle and print the recovered key.
fn cmd_recover(args: RecoverArgs) -> Result<()> {
    let network = parse_network(&args.network)?;
    let bundle = read_bundle_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let passphrase = prompt_password("Enter passphrase")?;
    let secret = recover(&bundle, &passphrase).context("Failed to decrypt (check passphrase)")?;

    let bytes: [u8; 32] = secret
        .as_slice()
        .try_into()
        .context("Bundle does not hold a 32-byte key")?;
    let ring = KeyRing::from_secret_bytes(&bytes).context("Recovered key is invalid")?;

    println!("\n=== KEY RECOVERED ===");
    println!("Network: {network}");
    println!("Address: {}", ring.to_address(network).encode());
    println!("Private key: {}", ring.to_wif(network)?);
    Ok(())
}

/// Validate an address; the exit status reflects the result.
fn cmd_validate(args: ValidateArgs) -> Result<()> {
    let network = parse_network(&args.network)?;
    if is_valid_address(network, &args.address) {
        println!("valid");
        Ok(())
    } else {
        println!("invalid");
        std::process::exit(1);
    }
}

/// Build and print an m-of-n multisig address.
fn cmd_multisig(args: MultisigArgs) -> Result<()> {
    let network = parse_network(&args.network)?;
    let summary = create_multisig(network, args.m, &args.pubkeys)
        .context("Failed to build multisig script")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\n=== MULTISIG ADDRESS ===");
    println!("Network: {network}");
    println!("Policy: {}-of-{}", summary.m, summary.n);
    println!("Address: {}", summary.address);
    println!("Redeem script: {}", summary.redeem_script);
    Ok(())
}

/// Envelope-encrypt a string and print the armored result.
fn cmd_encrypt(args: EncryptArgs) -> Result<()> {
    let encryptor = match args.recipient {
        Some(text) => {
            let bytes = hex::decode(&text).context("Recipient key is not hex")?;
            let key: [u8; 32] = bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("Recipient key must be 32 bytes (64 hex chars)"))?;
            EnvelopeEncryptor::new(key)
        }
        None => EnvelopeEncryptor::default(),
    };
    let armored = encryptor
        .encrypt(&args.text)
        .context("Envelope encryption failed")?;
    print!("{armored}");
    Ok(())
}

/// Prompt for a passphrase securely (no echo).
fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(format!("{}: ", prompt)).context("Failed to read passphrase")
}

/// Parse a network name.
fn parse_network(s: &str) -> Result<Network> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid network: {s} (main, testnet, regtest, simnet)"))
}

/// Parse a mnemonic language name.
fn parse_language(s: &str) -> Result<Language> {
    s.parse().map_err(|_| {
        anyhow::anyhow!(
            "Invalid language: {s} (english, spanish, french, italian, japanese, korean, \
             chinese-simplified, chinese-traditional)"
        )
    })
}
