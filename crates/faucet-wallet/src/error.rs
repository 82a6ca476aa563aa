//! Wallet error types.

use faucet_core::error::{AddressError, KeyError, ScriptError};
use thiserror::Error;

/// Errors that can occur in faucet wallet operations.
#[derive(Error, Debug)]
pub enum WalletError {
    /// Entropy bit length outside [128, 512] or not a multiple of 32.
    #[error("invalid entropy bits: {0} (must be 128-512 in steps of 32)")]
    InvalidEntropyBits(usize),

    /// Unrecognized mnemonic language name.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// A word in the phrase is not in the dictionary.
    #[error("unknown word: {0}")]
    UnknownWord(String),

    /// Phrase words decode but the checksum bits do not match.
    #[error("bad mnemonic checksum")]
    BadChecksum,

    /// Phrase word count is not a multiple of 3 in [12, 48].
    #[error("bad word count: {0}")]
    BadWordCount(usize),

    /// Master key seed outside the accepted 16-64 byte range.
    #[error("invalid seed length: {0} bytes")]
    InvalidSeedLength(usize),

    /// Hardened derivation was requested from a public-only parent.
    #[error("hardened derivation requires a private parent key")]
    HardenedFromPublic,

    /// Caller-supplied child index at or above 2^31.
    #[error("child index out of range: {0}")]
    IndexOutOfRange(u32),

    /// Derived tweak or child key fell outside the valid field.
    #[error("derived child key is invalid")]
    InvalidChildKey,

    /// Derivation would exceed the maximum key depth.
    #[error("derivation depth exceeded")]
    DepthExceeded,

    /// Passphrase shorter than the required minimum.
    #[error("passphrase too short: {length} < {min} characters")]
    WeakPassphrase {
        /// Characters supplied.
        length: usize,
        /// Characters required.
        min: usize,
    },

    /// Refusing to overwrite an existing key bundle file.
    #[error("key file already exists: {0}")]
    KeyFileExists(String),

    /// Symmetric encryption failure.
    #[error("encryption: {0}")]
    Encryption(String),

    /// Wrong passphrase or tampered bundle (GCM tag mismatch).
    #[error("decryption failed: wrong passphrase or corrupted bundle")]
    Decryption,

    /// Bundle text does not parse as `salt:iv:ciphertext`.
    #[error("malformed key bundle: {0}")]
    MalformedBundle(String),

    /// Hybrid envelope encryption failure.
    #[error("envelope encryption: {0}")]
    Envelope(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Address error from faucet-core.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Key error from faucet-core.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Script error from faucet-core.
    #[error(transparent)]
    Script(#[from] ScriptError),
}
