//! Passphrase protection of key material for disk persistence.
//!
//! The symmetric key comes from PBKDF2-HMAC-SHA256 with a fixed round count
//! and output length; both are a cross-version compatibility contract and
//! must not change without a migration path. Encryption is AES-256-GCM with
//! a 16-byte nonce, so a wrong passphrase or a tampered bundle fails
//! deterministically on the authentication tag.
//!
//! # File format
//! ```text
//! salt:iv:ciphertext
//! ```
//! Three lowercase-hex fields: 16-byte salt, 16-byte IV, then the
//! ciphertext with the GCM tag at its tail.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::error::WalletError;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length in bytes (the bundle's "IV" field).
pub const IV_LEN: usize = 16;

/// GCM authentication tag length in bytes.
const TAG_LEN: usize = 16;

/// PBKDF2 round count. Compatibility contract; do not change.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Derived symmetric key length in bytes. Compatibility contract.
const KEY_LEN: usize = 32;

/// Minimum passphrase length in Unicode scalar values.
pub const MIN_PASSPHRASE_CHARS: usize = 15;

/// AES-256-GCM parameterized with the 16-byte bundle nonce.
type BundleCipher = AesGcm<Aes256, U16>;

/// An encrypted key bundle: the only entity this tool persists to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedKeyBundle {
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
}

impl EncryptedKeyBundle {
    /// The KDF salt.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// The cipher nonce.
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Ciphertext with the trailing authentication tag.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl fmt::Display for EncryptedKeyBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.salt),
            hex::encode(self.iv),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedKeyBundle {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() != 3 {
            return Err(WalletError::MalformedBundle(format!(
                "expected salt:iv:ciphertext, got {} fields",
                fields.len()
            )));
        }
        let salt_bytes = hex::decode(fields[0])
            .map_err(|_| WalletError::MalformedBundle("salt is not hex".into()))?;
        let iv_bytes = hex::decode(fields[1])
            .map_err(|_| WalletError::MalformedBundle("iv is not hex".into()))?;
        let ciphertext = hex::decode(fields[2])
            .map_err(|_| WalletError::MalformedBundle("ciphertext is not hex".into()))?;

        let salt: [u8; SALT_LEN] = salt_bytes.try_into().map_err(|_| {
            WalletError::MalformedBundle(format!("salt must be {SALT_LEN} bytes"))
        })?;
        let iv: [u8; IV_LEN] = iv_bytes
            .try_into()
            .map_err(|_| WalletError::MalformedBundle(format!("iv must be {IV_LEN} bytes")))?;
        if ciphertext.len() < TAG_LEN {
            return Err(WalletError::MalformedBundle(format!(
                "ciphertext shorter than the {TAG_LEN}-byte tag"
            )));
        }
        Ok(Self {
            salt,
            iv,
            ciphertext,
        })
    }
}

/// Encrypt key material under a passphrase.
///
/// The passphrase must be at least [`MIN_PASSPHRASE_CHARS`] characters;
/// the check runs before any randomness is consumed, so a rejected call
/// has no side effects. Every call draws a fresh salt and IV.
pub fn protect(key: &[u8], passphrase: &str) -> Result<EncryptedKeyBundle, WalletError> {
    let length = passphrase.chars().count();
    if length < MIN_PASSPHRASE_CHARS {
        return Err(WalletError::WeakPassphrase {
            length,
            min: MIN_PASSPHRASE_CHARS,
        });
    }

    use rand::RngCore;
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    rand::rngs::OsRng.fill_bytes(&mut iv);

    let derived = derive_key(passphrase, &salt);
    let cipher = BundleCipher::new_from_slice(&*derived)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::<U16>::from_slice(&iv), key)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;

    Ok(EncryptedKeyBundle {
        salt,
        iv,
        ciphertext,
    })
}

/// Decrypt a bundle back into the original key material.
///
/// Fails with [`WalletError::Decryption`] when the passphrase is wrong or
/// the bundle was tampered with.
pub fn recover(
    bundle: &EncryptedKeyBundle,
    passphrase: &str,
) -> Result<Zeroizing<Vec<u8>>, WalletError> {
    let derived = derive_key(passphrase, &bundle.salt);
    let cipher = BundleCipher::new_from_slice(&*derived)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;
    cipher
        .decrypt(Nonce::<U16>::from_slice(&bundle.iv), bundle.ciphertext.as_ref())
        .map(Zeroizing::new)
        .map_err(|_| WalletError::Decryption)
}

/// Write a bundle to `path`, refusing to overwrite an existing file.
///
/// Uses create-new semantics: the existence check and the creation are one
/// atomic operation, and a conflict fails with
/// [`WalletError::KeyFileExists`] before any bytes are written.
pub fn write_bundle_file(path: &Path, bundle: &EncryptedKeyBundle) -> Result<(), WalletError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => {
                WalletError::KeyFileExists(path.display().to_string())
            }
            _ => WalletError::Io(e),
        })?;
    file.write_all(bundle.to_string().as_bytes())?;
    file.write_all(b"\n")?;
    tracing::debug!(path = %path.display(), "key bundle written");
    Ok(())
}

/// Read and parse a bundle file written by [`write_bundle_file`].
pub fn read_bundle_file(path: &Path) -> Result<EncryptedKeyBundle, WalletError> {
    let text = fs::read_to_string(path)?;
    text.trim().parse()
}

/// PBKDF2-HMAC-SHA256 passphrase stretching. Parameters are fixed.
fn derive_key(passphrase: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ROUNDS, key.as_mut());
    key
}
