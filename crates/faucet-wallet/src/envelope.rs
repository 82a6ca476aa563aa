//! Armored hybrid encryption of display strings for the faucet operator.
//!
//! Each call generates a fresh ephemeral X25519 keypair, agrees a shared
//! secret with the recipient key, stretches it through HKDF-SHA256, and
//! seals the plaintext with AES-256-GCM. Output is base64 armor between
//! BEGIN/END marker lines. Two encryptions of the same plaintext never
//! match; no decrypt capability is exposed outside of tests.
//!
//! # Payload layout (before armoring)
//! ```text
//! ephemeral_pubkey (32) || nonce (12) || ciphertext + auth_tag
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::WalletError;

/// The faucet operator's published X25519 public key, the default
/// envelope recipient.
pub const DEFAULT_OPERATOR_KEY: [u8; 32] = [
    0x95, 0xfe, 0x66, 0x7f, 0x92, 0x48, 0xd9, 0xd0, 0xb5, 0xab, 0x1a, 0x93, 0x1f, 0xc0, 0xdb,
    0x1b, 0x17, 0x57, 0x76, 0xa3, 0x7a, 0x70, 0x42, 0xbc, 0x19, 0x50, 0x86, 0xc6, 0xa6, 0x1b,
    0x9b, 0x62,
];

/// HKDF domain-separation string for envelope session keys.
const HKDF_INFO: &[u8] = b"hns-faucet-envelope-v1";

const ARMOR_BEGIN: &str = "-----BEGIN HNS FAUCET MESSAGE-----";
const ARMOR_END: &str = "-----END HNS FAUCET MESSAGE-----";

/// Base64 line width inside the armor.
const ARMOR_COLUMNS: usize = 64;

const NONCE_LEN: usize = 12;

/// Envelope encryptor bound to a recipient public key.
///
/// The recipient is an explicit configuration value; [`Default`] supplies
/// the compiled-in operator key.
#[derive(Clone, Debug)]
pub struct EnvelopeEncryptor {
    recipient: x25519_dalek::PublicKey,
}

impl EnvelopeEncryptor {
    /// Create an encryptor for an explicit recipient key.
    pub fn new(recipient_public_key: [u8; 32]) -> Self {
        Self {
            recipient: x25519_dalek::PublicKey::from(recipient_public_key),
        }
    }

    /// The recipient public key bytes.
    pub fn recipient_public_key(&self) -> [u8; 32] {
        *self.recipient.as_bytes()
    }

    /// Encrypt a plaintext string into an armored envelope.
    ///
    /// Non-deterministic by design: a fresh ephemeral key and nonce per
    /// call mean identical plaintexts produce unrelated ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, WalletError> {
        let ephemeral = x25519_dalek::StaticSecret::random_from_rng(rand::rngs::OsRng);
        let ephemeral_public = x25519_dalek::PublicKey::from(&ephemeral);
        let shared = ephemeral.diffie_hellman(&self.recipient);
        if !shared.was_contributory() {
            return Err(WalletError::Envelope(
                "recipient key is a low-order point".into(),
            ));
        }

        let session = session_key(
            shared.as_bytes(),
            ephemeral_public.as_bytes(),
            self.recipient.as_bytes(),
        )?;
        let cipher = Aes256Gcm::new_from_slice(session.as_ref())
            .map_err(|e| WalletError::Envelope(e.to_string()))?;

        use rand::RngCore;
        let mut nonce = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| WalletError::Envelope(e.to_string()))?;

        let mut payload = Vec::with_capacity(32 + NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(ephemeral_public.as_bytes());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(armor(&payload))
    }
}

impl Default for EnvelopeEncryptor {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATOR_KEY)
    }
}

/// HKDF-SHA256 over the shared secret, salted with both public keys.
fn session_key(
    shared: &[u8; 32],
    ephemeral_public: &[u8; 32],
    recipient_public: &[u8; 32],
) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let mut salt = [0u8; 64];
    salt[..32].copy_from_slice(ephemeral_public);
    salt[32..].copy_from_slice(recipient_public);

    let hkdf = Hkdf::<Sha256>::new(Some(&salt), shared);
    let mut key = Zeroizing::new([0u8; 32]);
    hkdf.expand(HKDF_INFO, key.as_mut())
        .map_err(|e| WalletError::Envelope(e.to_string()))?;
    Ok(key)
}

/// Wrap a payload in base64 armor with BEGIN/END marker lines.
fn armor(payload: &[u8]) -> String {
    let encoded = BASE64.encode(payload);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / ARMOR_COLUMNS + 72);
    out.push_str(ARMOR_BEGIN);
    out.push('\n');
    let mut start = 0;
    while start < encoded.len() {
        let end = usize::min(start + ARMOR_COLUMNS, encoded.len());
        out.push_str(&encoded[start..end]);
        out.push('\n');
        start = end;
    }
    out.push_str(ARMOR_END);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test-only inverse of [`EnvelopeEncryptor::encrypt`].
    fn open(armored: &str, recipient_secret: &x25519_dalek::StaticSecret) -> Vec<u8> {
        let payload = dearmor(armored);
        let (ephemeral_bytes, rest) = payload.split_at(32);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let mut ephemeral = [0u8; 32];
        ephemeral.copy_from_slice(ephemeral_bytes);
        let ephemeral_public = x25519_dalek::PublicKey::from(ephemeral);
        let recipient_public = x25519_dalek::PublicKey::from(recipient_secret);
        let shared = recipient_secret.diffie_hellman(&ephemeral_public);

        let session = session_key(
            shared.as_bytes(),
            ephemeral_public.as_bytes(),
            recipient_public.as_bytes(),
        )
        .unwrap();
        let cipher = Aes256Gcm::new_from_slice(session.as_ref()).unwrap();
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .expect("envelope should open with the matching secret")
    }

    fn dearmor(armored: &str) -> Vec<u8> {
        let body: String = armored
            .lines()
            .filter(|line| !line.starts_with("-----"))
            .collect();
        BASE64.decode(body).unwrap()
    }

    fn recipient() -> (x25519_dalek::StaticSecret, [u8; 32]) {
        let secret = x25519_dalek::StaticSecret::random_from_rng(rand::rngs::OsRng);
        let public = *x25519_dalek::PublicKey::from(&secret).as_bytes();
        (secret, public)
    }

    // --- Framing ---

    #[test]
    fn armor_has_begin_and_end_lines() {
        let armored = EnvelopeEncryptor::default()
            .encrypt("hs1q5400uxwpr3w6ydc2wsc0hd9jfqz7nqkkgzfvmd")
            .unwrap();
        let lines: Vec<&str> = armored.lines().collect();
        assert_eq!(lines.first(), Some(&ARMOR_BEGIN));
        assert_eq!(lines.last(), Some(&ARMOR_END));
        for line in &lines[1..lines.len() - 1] {
            assert!(line.len() <= ARMOR_COLUMNS);
        }
    }

    #[test]
    fn armor_body_is_base64_payload() {
        let armored = EnvelopeEncryptor::default().encrypt("hello").unwrap();
        let payload = dearmor(&armored);
        // ephemeral key + nonce + plaintext + tag
        assert_eq!(payload.len(), 32 + NONCE_LEN + 5 + 16);
    }

    // --- Encryption ---

    #[test]
    fn same_plaintext_encrypts_differently() {
        let encryptor = EnvelopeEncryptor::default();
        let a = encryptor.encrypt("hs1qsame").unwrap();
        let b = encryptor.encrypt("hs1qsame").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn recipient_can_open() {
        let (secret, public) = recipient();
        let encryptor = EnvelopeEncryptor::new(public);
        let armored = encryptor
            .encrypt("ts1qg8dy6k7cqy6fvun5rzhjrfqj5gaqyuekpcgadk")
            .unwrap();
        let plaintext = open(&armored, &secret);
        assert_eq!(plaintext, b"ts1qg8dy6k7cqy6fvun5rzhjrfqj5gaqyuekpcgadk");
    }

    #[test]
    fn wrong_recipient_cannot_open() {
        let (_, public) = recipient();
        let (other_secret, _) = recipient();
        let armored = EnvelopeEncryptor::new(public).encrypt("secret").unwrap();

        let payload = dearmor(&armored);
        let (ephemeral_bytes, rest) = payload.split_at(32);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
        let mut ephemeral = [0u8; 32];
        ephemeral.copy_from_slice(ephemeral_bytes);
        let shared = other_secret.diffie_hellman(&x25519_dalek::PublicKey::from(ephemeral));
        let session = session_key(
            shared.as_bytes(),
            &ephemeral,
            x25519_dalek::PublicKey::from(&other_secret).as_bytes(),
        )
        .unwrap();
        let cipher = Aes256Gcm::new_from_slice(session.as_ref()).unwrap();
        assert!(cipher.decrypt(Nonce::from_slice(nonce), ciphertext).is_err());
    }

    #[test]
    fn empty_plaintext_still_seals() {
        let (secret, public) = recipient();
        let armored = EnvelopeEncryptor::new(public).encrypt("").unwrap();
        assert_eq!(open(&armored, &secret), b"");
    }

    // --- Configuration ---

    #[test]
    fn default_uses_operator_key() {
        let encryptor = EnvelopeEncryptor::default();
        assert_eq!(encryptor.recipient_public_key(), DEFAULT_OPERATOR_KEY);
    }

    #[test]
    fn explicit_recipient_overrides_default() {
        let (_, public) = recipient();
        let encryptor = EnvelopeEncryptor::new(public);
        assert_eq!(encryptor.recipient_public_key(), public);
        assert_ne!(encryptor.recipient_public_key(), DEFAULT_OPERATOR_KEY);
    }

    #[test]
    fn low_order_recipient_is_rejected() {
        // The all-zero point yields a non-contributory exchange.
        let encryptor = EnvelopeEncryptor::new([0u8; 32]);
        let err = encryptor.encrypt("anything").unwrap_err();
        assert!(matches!(err, WalletError::Envelope(_)));
    }
}
