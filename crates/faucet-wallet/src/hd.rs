//! BIP-32 hierarchical derivation over secp256k1.
//!
//! An [`ExtendedKey`] carries a private or public key, a chain code, and
//! the positional metadata (depth, parent fingerprint, child index) the
//! extended-key serialization format requires. Derivation is pure: the same
//! (seed, path) always produces byte-identical keys, and an invalid tweak
//! fails outright rather than silently retrying the next index.

use hmac::{Hmac, Mac};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, ProjectivePoint, Scalar};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

use faucet_core::keyring::{base58check, KeyRing, PUBKEY_LEN};
use faucet_core::network::Network;

use crate::error::WalletError;

/// First hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// BIP-44 purpose index used by the faucet derivation path.
pub const BIP44_PURPOSE: u32 = 44;

/// HMAC key for master-key generation, fixed by BIP-32.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

type HmacSha512 = Hmac<Sha512>;

/// An extended key: secp256k1 key material plus chain code and position.
///
/// Keys derived from a seed are private; [`ExtendedKey::to_public`] neuters
/// a key for watch-only use. Hardened derivation requires the private half.
#[derive(Clone)]
pub struct ExtendedKey {
    secret: Option<k256::SecretKey>,
    public: k256::PublicKey,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: u32,
}

impl ExtendedKey {
    /// Derive the master key from seed bytes (depth 0, private).
    ///
    /// HMAC-SHA512 with key `"Bitcoin seed"`; the left half becomes the
    /// master secret, the right half the chain code. Fails with
    /// [`WalletError::InvalidChildKey`] in the astronomically unlikely case
    /// the left half is not a valid field element.
    pub fn master_from_seed(seed: &[u8]) -> Result<Self, WalletError> {
        if seed.len() < 16 || seed.len() > 64 {
            return Err(WalletError::InvalidSeedLength(seed.len()));
        }
        let i = Zeroizing::new(hmac_sha512(MASTER_HMAC_KEY, seed));
        let secret = k256::SecretKey::from_slice(&i[..32])
            .map_err(|_| WalletError::InvalidChildKey)?;
        let public = secret.public_key();
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);
        Ok(Self {
            secret: Some(secret),
            public,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: 0,
        })
    }

    /// Derive the child key at `index`.
    ///
    /// `index` must be below 2^31; hardened indices are offset internally.
    /// Hardened derivation from a public-only parent fails with
    /// [`WalletError::HardenedFromPublic`]. An out-of-field tweak or a
    /// zero/infinity child fails with [`WalletError::InvalidChildKey`].
    pub fn derive(&self, index: u32, hardened: bool) -> Result<Self, WalletError> {
        if index >= HARDENED_OFFSET {
            return Err(WalletError::IndexOutOfRange(index));
        }
        let depth = self
            .depth
            .checked_add(1)
            .ok_or(WalletError::DepthExceeded)?;
        let child_index = if hardened {
            index | HARDENED_OFFSET
        } else {
            index
        };

        let mut data = Zeroizing::new(Vec::with_capacity(37));
        if hardened {
            let secret = self
                .secret
                .as_ref()
                .ok_or(WalletError::HardenedFromPublic)?;
            data.push(0);
            data.extend_from_slice(&secret.to_bytes());
        } else {
            data.extend_from_slice(&self.public_key_bytes());
        }
        data.extend_from_slice(&child_index.to_be_bytes());

        let i = Zeroizing::new(hmac_sha512(&self.chain_code, &data));
        let tweak = Option::<Scalar>::from(Scalar::from_repr(*FieldBytes::from_slice(&i[..32])))
            .ok_or(WalletError::InvalidChildKey)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        let (secret, public) = match &self.secret {
            Some(parent) => {
                let child_scalar = tweak + *parent.to_nonzero_scalar();
                let child = k256::SecretKey::from_bytes(&child_scalar.to_repr())
                    .map_err(|_| WalletError::InvalidChildKey)?;
                let public = child.public_key();
                (Some(child), public)
            }
            None => {
                let point = ProjectivePoint::from(*self.public.as_affine())
                    + ProjectivePoint::GENERATOR * tweak;
                let public = k256::PublicKey::from_affine(point.to_affine())
                    .map_err(|_| WalletError::InvalidChildKey)?;
                (None, public)
            }
        };

        Ok(Self {
            secret,
            public,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_index,
        })
    }

    /// Derive the BIP-44 account key: `m/purpose'/coin_type'/account'`.
    pub fn derive_account(
        &self,
        purpose: u32,
        coin_type: u32,
        account: u32,
    ) -> Result<Self, WalletError> {
        self.derive(purpose, true)?
            .derive(coin_type, true)?
            .derive(account, true)
    }

    /// Neuter to a public-only key with identical metadata.
    pub fn to_public(&self) -> Self {
        Self {
            secret: None,
            public: self.public,
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
        }
    }

    /// True if the private half is present.
    pub fn is_private(&self) -> bool {
        self.secret.is_some()
    }

    /// Depth in the derivation tree (0 for the master key).
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The offset-adjusted child index this key was derived at.
    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    /// First 4 bytes of HASH160 of the parent's compressed public key.
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// This key's own fingerprint: HASH160 of the compressed pubkey.
    pub fn fingerprint(&self) -> [u8; 4] {
        let digest = hash160(&self.public_key_bytes());
        [digest[0], digest[1], digest[2], digest[3]]
    }

    /// The compressed public key (33 bytes).
    pub fn public_key_bytes(&self) -> [u8; PUBKEY_LEN] {
        let point = self.public.to_encoded_point(true);
        let mut out = [0u8; PUBKEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// The raw secret key bytes, if the private half is present.
    pub fn secret_bytes(&self) -> Result<[u8; 32], WalletError> {
        let secret = self
            .secret
            .as_ref()
            .ok_or(WalletError::HardenedFromPublic)?;
        Ok(secret.to_bytes().into())
    }

    /// A [`KeyRing`] over this key, signing-capable when private.
    pub fn key_ring(&self) -> Result<KeyRing, WalletError> {
        match &self.secret {
            Some(secret) => {
                let bytes = Zeroizing::new(<[u8; 32]>::from(secret.to_bytes()));
                Ok(KeyRing::from_secret_bytes(&bytes)?)
            }
            None => Ok(KeyRing::from_public(&self.public_key_bytes())?),
        }
    }

    /// Serialize the public half as a base58check extended public key.
    ///
    /// Layout: version(4) || depth || parent_fingerprint(4) ||
    /// child_index(4, BE) || chain_code(32) || compressed_pubkey(33), with
    /// version bytes chosen per network ("xpub" on main).
    pub fn to_xpub(&self, network: Network) -> String {
        let mut payload = Vec::with_capacity(78);
        payload.extend_from_slice(&network.xpub_version().to_be_bytes());
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_index.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.extend_from_slice(&self.public_key_bytes());
        base58check(&payload)
    }
}

impl Drop for ExtendedKey {
    fn drop(&mut self) {
        // SecretKey zeroizes itself; the chain code is ours to wipe.
        self.chain_code.zeroize();
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("private", &self.secret.is_some())
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// HASH160: RIPEMD-160 of SHA-256, the BIP-32 fingerprint hash.
fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}
