//! # faucet-wallet — deterministic faucet credentials.
//!
//! Turns entropy into spendable Handshake credentials: BIP-39 mnemonics,
//! BIP-32 derivation along the fixed faucet path, passphrase protection of
//! key material at rest, and armored envelope encryption of addresses for
//! confidential display.
//!
//! # Modules
//!
//! - [`error`] — `WalletError` enum
//! - [`mnemonic`] — entropy ↔ phrase ↔ seed
//! - [`hd`] — extended keys and path derivation
//! - [`protector`] — passphrase-encrypted key bundles and their file format
//! - [`envelope`] — hybrid encryption for the faucet operator
//! - [`faucet`] — one-shot credential composition

pub mod envelope;
pub mod error;
pub mod faucet;
pub mod hd;
pub mod mnemonic;
pub mod protector;

// Re-exports for convenient access
pub use envelope::{EnvelopeEncryptor, DEFAULT_OPERATOR_KEY};
pub use error::WalletError;
pub use faucet::{
    create_multisig, is_valid_address, is_valid_pubkey, FaucetOptions, FaucetTool,
    GenerationSummary, MultisigSummary,
};
pub use hd::{ExtendedKey, BIP44_PURPOSE, HARDENED_OFFSET};
pub use mnemonic::{Language, Mnemonic, Seed};
pub use protector::{
    protect, read_bundle_file, recover, write_bundle_file, EncryptedKeyBundle,
    MIN_PASSPHRASE_CHARS,
};
