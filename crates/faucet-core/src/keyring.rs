//! secp256k1 key rings for faucet credentials.
//!
//! A [`KeyRing`] wraps a secp256k1 keypair (or a public key alone) and
//! produces the serialized forms the faucet hands out: compressed public-key
//! bytes, the BLAKE2b pubkey hash, pay-to-pubkey-hash addresses, and
//! WIF-encoded secrets.
//!
//! Only compressed (33-byte SEC1) public keys are accepted or emitted;
//! uncompressed keys have no place in address derivation.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

use crate::address::{Address, blake2b160};
use crate::error::KeyError;
use crate::network::Network;

/// Length of a compressed SEC1 public key.
pub const PUBKEY_LEN: usize = 33;

/// WIF payload length: prefix + 32-byte secret + compressed flag.
const WIF_PAYLOAD_LEN: usize = 34;

/// A secp256k1 key ring: a public key with an optional private half.
///
/// Rings built with [`KeyRing::generate`] or [`KeyRing::from_secret_bytes`]
/// can export their secret (WIF, raw bytes); rings built with
/// [`KeyRing::from_public`] are watch-only and refuse those operations.
#[derive(Clone)]
pub struct KeyRing {
    secret: Option<k256::SecretKey>,
    public: k256::PublicKey,
}

impl KeyRing {
    /// Generate a random key ring using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let secret = k256::SecretKey::random(&mut csprng);
        let public = secret.public_key();
        Self {
            secret: Some(secret),
            public,
        }
    }

    /// Create a key ring from 32-byte secret key material.
    ///
    /// Fails if the bytes are zero or not below the curve order.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, KeyError> {
        let secret =
            k256::SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        let public = secret.public_key();
        Ok(Self {
            secret: Some(secret),
            public,
        })
    }

    /// Create a watch-only key ring from a compressed public key.
    pub fn from_public(bytes: &[u8; PUBKEY_LEN]) -> Result<Self, KeyError> {
        let public =
            k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self {
            secret: None,
            public,
        })
    }

    /// True if `bytes` is a well-formed compressed public key on the curve.
    pub fn validate_public_key(bytes: &[u8]) -> bool {
        bytes.len() == PUBKEY_LEN && k256::PublicKey::from_sec1_bytes(bytes).is_ok()
    }

    /// The compressed public key (33 bytes).
    pub fn public_key_bytes(&self) -> [u8; PUBKEY_LEN] {
        let point = self.public.to_encoded_point(true);
        let mut out = [0u8; PUBKEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// The BLAKE2b-160 hash of the compressed public key.
    pub fn public_key_hash(&self) -> [u8; 20] {
        blake2b160(&self.public_key_bytes())
    }

    /// Get the raw secret key bytes (32 bytes). Handle with care.
    pub fn secret_bytes(&self) -> Result<[u8; 32], KeyError> {
        let secret = self.secret.as_ref().ok_or(KeyError::MissingPrivateKey)?;
        Ok(secret.to_bytes().into())
    }

    /// The pay-to-pubkey-hash address for this key on `network`.
    pub fn to_address(&self, network: Network) -> Address {
        Address::from_pubkey_hash(self.public_key_hash(), network)
    }

    /// Encode the secret key in WIF: base58check of
    /// `prefix || secret || 0x01`, with the prefix byte set by the network.
    pub fn to_wif(&self, network: Network) -> Result<String, KeyError> {
        let secret = self.secret.as_ref().ok_or(KeyError::MissingPrivateKey)?;
        let mut payload = Zeroizing::new(Vec::with_capacity(WIF_PAYLOAD_LEN));
        payload.push(network.wif_prefix());
        payload.extend_from_slice(&secret.to_bytes());
        payload.push(0x01); // compressed-key flag
        Ok(base58check(&payload))
    }

    /// Decode a WIF string for `network` back into a key ring.
    pub fn from_wif(s: &str, network: Network) -> Result<Self, KeyError> {
        let data = Zeroizing::new(
            bs58::decode(s)
                .into_vec()
                .map_err(|_| KeyError::InvalidPrivateKey)?,
        );
        if data.len() != WIF_PAYLOAD_LEN + 4 {
            return Err(KeyError::InvalidPrivateKey);
        }
        let (payload, checksum) = data.split_at(WIF_PAYLOAD_LEN);
        if sha256d(payload)[..4] != *checksum {
            return Err(KeyError::InvalidPrivateKey);
        }
        if payload[0] != network.wif_prefix() || payload[33] != 0x01 {
            return Err(KeyError::InvalidPrivateKey);
        }
        let secret =
            k256::SecretKey::from_slice(&payload[1..33]).map_err(|_| KeyError::InvalidPrivateKey)?;
        let public = secret.public_key();
        Ok(Self {
            secret: Some(secret),
            public,
        })
    }
}

impl fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRing")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

/// Double SHA-256, the checksum hash for base58check payloads.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Base58check-encode a payload: base58 of `payload || sha256d(payload)[..4]`.
///
/// Shared by WIF and extended-key serialization.
pub fn base58check(payload: &[u8]) -> String {
    let checksum = sha256d(payload);
    let mut data = Vec::with_capacity(payload.len() + 4);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum[..4]);
    bs58::encode(data).into_string()
}
