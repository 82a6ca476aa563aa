//! Address encoding for Handshake networks.
//!
//! Addresses use Bech32 encoding ([BIP-173]) with two-letter human-readable
//! prefixes: `hs` (main), `ts` (testnet), `rs` (regtest), `ss` (simnet).
//!
//! Each address encodes a version (0..=31) and a payload. Version 0 payloads
//! are either a 20-byte BLAKE2b pubkey hash or a 32-byte SHA3 script hash.
//! The Bech32 checksum guarantees detection of up to 4 character errors.
//!
//! [BIP-173]: https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki

use blake2::digest::consts::U20;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;
use crate::network::Network;

/// Bech32 checksum constant (BIP-173).
const BECH32_CONST: u32 = 1;

/// Bech32 character set for encoding 5-bit values.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Address version for pubkey-hash and script-hash payloads.
pub const ADDRESS_VERSION: u8 = 0;

/// Highest encodable address version (one 5-bit character).
pub const MAX_ADDRESS_VERSION: u8 = 31;

/// Smallest and largest allowed payload sizes in bytes.
pub const MIN_PAYLOAD_LEN: usize = 2;
pub const MAX_PAYLOAD_LEN: usize = 40;

/// BLAKE2b with a 160-bit digest, the pubkey-hash function for addresses.
type Blake2b160 = Blake2b<U20>;

/// Hash a compressed public key to its 20-byte address payload.
pub fn blake2b160(data: &[u8]) -> [u8; 20] {
    let digest = Blake2b160::digest(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

/// A Handshake address encoding a versioned payload with Bech32.
///
/// Human-readable form is `hs1...` on main (`ts1`/`rs1`/`ss1` on the other
/// networks). Internally stores the network, version, and payload bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    network: Network,
    version: u8,
    hash: Vec<u8>,
}

impl Address {
    /// Create an address from a raw versioned payload.
    ///
    /// The version must fit in one 5-bit group and the payload in
    /// [`MIN_PAYLOAD_LEN`], [`MAX_PAYLOAD_LEN`]. Version 0 payloads must be
    /// exactly 20 (pubkey hash) or 32 (script hash) bytes.
    pub fn new(network: Network, version: u8, hash: &[u8]) -> Result<Self, AddressError> {
        if version > MAX_ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion(version));
        }
        if hash.len() < MIN_PAYLOAD_LEN || hash.len() > MAX_PAYLOAD_LEN {
            return Err(AddressError::InvalidLength);
        }
        if version == 0 && hash.len() != 20 && hash.len() != 32 {
            return Err(AddressError::InvalidLength);
        }
        Ok(Self {
            network,
            version,
            hash: hash.to_vec(),
        })
    }

    /// Create a version-0 address from a 20-byte pubkey hash.
    pub fn from_pubkey_hash(hash: [u8; 20], network: Network) -> Self {
        Self {
            network,
            version: ADDRESS_VERSION,
            hash: hash.to_vec(),
        }
    }

    /// Create a version-0 address from a 33-byte compressed public key.
    pub fn from_public_key(pubkey: &[u8; 33], network: Network) -> Self {
        Self::from_pubkey_hash(blake2b160(pubkey), network)
    }

    /// Create a version-0 address from a 32-byte script hash.
    pub fn from_script_hash(hash: [u8; 32], network: Network) -> Self {
        Self {
            network,
            version: ADDRESS_VERSION,
            hash: hash.to_vec(),
        }
    }

    /// The payload bytes encoded in this address.
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// The network this address belongs to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The address version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// True if the payload is a 20-byte pubkey hash.
    pub fn is_pubkey_hash(&self) -> bool {
        self.version == 0 && self.hash.len() == 20
    }

    /// True if the payload is a 32-byte script hash.
    pub fn is_script_hash(&self) -> bool {
        self.version == 0 && self.hash.len() == 32
    }

    /// Encode this address as a Bech32 string.
    pub fn encode(&self) -> String {
        let hrp = self.network.hrp();
        // Convert payload bytes from 8-bit to 5-bit groups
        let data_5bit = convert_bits(&self.hash, 8, 5, true)
            .expect("byte payload always converts to 5-bit groups");

        // Prepend version as a single 5-bit group
        let mut payload = Vec::with_capacity(1 + data_5bit.len());
        payload.push(self.version);
        payload.extend_from_slice(&data_5bit);

        let checksum = bech32_create_checksum(hrp, &payload);

        let mut result = String::with_capacity(hrp.len() + 1 + payload.len() + 6);
        result.push_str(hrp);
        result.push('1');
        for &d in &payload {
            result.push(CHARSET[d as usize] as char);
        }
        for &d in &checksum {
            result.push(CHARSET[d as usize] as char);
        }
        result
    }

    /// Decode a Bech32 address string.
    pub fn decode(s: &str) -> Result<Self, AddressError> {
        // Reject mixed case (Bech32 spec: all alpha chars must be same case)
        let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            return Err(AddressError::MixedCase);
        }

        let s_lower = s.to_ascii_lowercase();

        // Find the last '1' separator
        let sep_pos = s_lower.rfind('1').ok_or(AddressError::MissingSeparator)?;

        if sep_pos == 0 {
            return Err(AddressError::InvalidHrp);
        }
        // Need at least 6 checksum chars + 1 version char after separator
        if sep_pos + 8 > s_lower.len() {
            return Err(AddressError::InvalidLength);
        }

        let hrp = &s_lower[..sep_pos];
        let data_part = &s_lower[sep_pos + 1..];

        // Decode characters from the Bech32 charset
        let mut data = Vec::with_capacity(data_part.len());
        for c in data_part.chars() {
            let pos = CHARSET
                .iter()
                .position(|&ch| ch as char == c)
                .ok_or(AddressError::InvalidCharacter(c))?;
            data.push(pos as u8);
        }

        // Verify the Bech32 checksum
        if !bech32_verify_checksum(hrp, &data) {
            return Err(AddressError::InvalidChecksum);
        }

        // Remove 6-char checksum
        let payload = &data[..data.len() - 6];

        if payload.is_empty() {
            return Err(AddressError::InvalidLength);
        }

        // First group is the version; one 5-bit group is always <= 31
        let version = payload[0];

        // Convert remaining 5-bit data back to 8-bit
        let hash = convert_bits(&payload[1..], 5, 8, false)
            .ok_or(AddressError::InvalidPadding)?;

        if hash.len() < MIN_PAYLOAD_LEN || hash.len() > MAX_PAYLOAD_LEN {
            return Err(AddressError::InvalidLength);
        }
        if version == 0 && hash.len() != 20 && hash.len() != 32 {
            return Err(AddressError::InvalidLength);
        }

        let network = Network::from_hrp(hrp)?;

        Ok(Self {
            network,
            version,
            hash,
        })
    }

    /// True only if `s` is a well-formed address AND belongs to `network`.
    ///
    /// A valid testnet address is not a valid main address; prefix mismatch
    /// fails validation even when the checksum verifies.
    pub fn is_valid(network: Network, s: &str) -> bool {
        match Self::decode(s) {
            Ok(addr) => addr.network == network,
            Err(_) => false,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}

// --- Bech32 internals ---

/// Compute the Bech32 polymod over a sequence of 5-bit values.
fn bech32_polymod(values: &[u8]) -> u32 {
    const GEN: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
    let mut chk: u32 = 1;
    for &v in values {
        let b = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (v as u32);
        for (i, &g) in GEN.iter().enumerate() {
            if (b >> i) & 1 != 0 {
                chk ^= g;
            }
        }
    }
    chk
}

/// Expand the HRP for Bech32 checksum computation.
fn bech32_hrp_expand(hrp: &str) -> Vec<u8> {
    let mut ret = Vec::with_capacity(hrp.len() * 2 + 1);
    for c in hrp.bytes() {
        ret.push(c >> 5);
    }
    ret.push(0);
    for c in hrp.bytes() {
        ret.push(c & 31);
    }
    ret
}

/// Create the 6-value Bech32 checksum for the given HRP and data.
fn bech32_create_checksum(hrp: &str, data: &[u8]) -> Vec<u8> {
    let mut values = bech32_hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let polymod = bech32_polymod(&values) ^ BECH32_CONST;
    (0..6)
        .map(|i| ((polymod >> (5 * (5 - i))) & 31) as u8)
        .collect()
}

/// Verify the Bech32 checksum for the given HRP and data (including checksum).
fn bech32_verify_checksum(hrp: &str, data: &[u8]) -> bool {
    let mut values = bech32_hrp_expand(hrp);
    values.extend_from_slice(data);
    bech32_polymod(&values) == BECH32_CONST
}

/// Convert between bit widths (e.g. 8-bit bytes to 5-bit Bech32 groups).
fn convert_bits(data: &[u8], from_bits: u32, to_bits: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut ret = Vec::new();
    let maxv = (1u32 << to_bits) - 1;
    for &value in data {
        let v = value as u32;
        if v >> from_bits != 0 {
            return None;
        }
        acc = (acc << from_bits) | v;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            ret.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad {
        if bits > 0 {
            ret.push(((acc << (to_bits - bits)) & maxv) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & maxv) != 0 {
        return None;
    }
    Some(ret)
}
