//! Multisig redeem scripts.
//!
//! Builds the canonical m-of-n CHECKMULTISIG redeem script: a small-integer
//! opcode for m, a direct 33-byte push per public key, a small-integer opcode
//! for n, then OP_CHECKMULTISIG. The SHA3-256 hash of the serialized script
//! is the payload of a version-0 script-hash address.
//!
//! Key order is preserved exactly as supplied by the caller; reordering the
//! keys produces a different script and a different address.

use sha3::{Digest, Sha3_256};

use crate::address::Address;
use crate::error::ScriptError;
use crate::keyring::{KeyRing, PUBKEY_LEN};
use crate::network::Network;

const OP_CHECKMULTISIG: u8 = 0xae;

/// Maximum serialized script size accepted as script-hash witness data.
pub const MAX_SCRIPT_PUSH: usize = 520;

/// Largest key count a CHECKMULTISIG script may carry.
pub const MAX_MULTISIG_KEYS: usize = 16;

/// Small-integer opcodes: OP_1 (0x51) through OP_16 (0x60) encode 1..=16.
fn small_int_op(value: usize) -> u8 {
    0x50 + value as u8
}

/// An m-of-n multisig redeem script over compressed secp256k1 keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigScript {
    m: usize,
    pubkeys: Vec<[u8; PUBKEY_LEN]>,
}

impl MultisigScript {
    /// Build an m-of-n script from compressed public keys.
    ///
    /// Requires `1 <= m <= n <= 16` and every key to be a well-formed point
    /// on the curve. The threshold is checked before the keys.
    pub fn new(m: usize, pubkeys: &[[u8; PUBKEY_LEN]]) -> Result<Self, ScriptError> {
        let n = pubkeys.len();
        if m < 1 || m > n || n > MAX_MULTISIG_KEYS {
            return Err(ScriptError::InvalidThreshold { m, n });
        }
        for (i, key) in pubkeys.iter().enumerate() {
            if !KeyRing::validate_public_key(key) {
                return Err(ScriptError::InvalidPubkey(i));
            }
        }
        Ok(Self {
            m,
            pubkeys: pubkeys.to_vec(),
        })
    }

    /// The signature threshold.
    pub fn m(&self) -> usize {
        self.m
    }

    /// The number of keys.
    pub fn n(&self) -> usize {
        self.pubkeys.len()
    }

    /// The keys in caller-supplied order.
    pub fn pubkeys(&self) -> &[[u8; PUBKEY_LEN]] {
        &self.pubkeys
    }

    /// Serialize to canonical script bytes.
    ///
    /// Fails with [`ScriptError::ScriptTooLarge`] when the encoding exceeds
    /// [`MAX_SCRIPT_PUSH`] bytes; 16 compressed keys serialize to 547 bytes,
    /// so the largest pushable script holds 15 keys.
    pub fn serialize(&self) -> Result<Vec<u8>, ScriptError> {
        let n = self.pubkeys.len();
        let size = 3 + n * (1 + PUBKEY_LEN);
        if size > MAX_SCRIPT_PUSH {
            return Err(ScriptError::ScriptTooLarge {
                size,
                max: MAX_SCRIPT_PUSH,
            });
        }
        let mut script = Vec::with_capacity(size);
        script.push(small_int_op(self.m));
        for key in &self.pubkeys {
            script.push(PUBKEY_LEN as u8); // direct push of 33 bytes
            script.extend_from_slice(key);
        }
        script.push(small_int_op(n));
        script.push(OP_CHECKMULTISIG);
        Ok(script)
    }

    /// SHA3-256 hash of the serialized script.
    pub fn script_hash(&self) -> Result<[u8; 32], ScriptError> {
        let script = self.serialize()?;
        Ok(Sha3_256::digest(&script).into())
    }

    /// The script-hash address for this script on `network`.
    pub fn to_address(&self, network: Network) -> Result<Address, ScriptError> {
        Ok(Address::from_script_hash(self.script_hash()?, network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBKEY_A: &str = "02e43e541306e77af21c9e94681f83366aa7b4bcea8fd41fa7dc65d2677187c441";
    const PUBKEY_B: &str = "0213981f357b96b0527f9c99c75df49390cb36a424c5bf959704377b40f0594629";
    // The generator point tripled, a convenient third valid key.
    const PUBKEY_C: &str = "02f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9";

    const SCRIPT_1OF2: &str = "512102e43e541306e77af21c9e94681f83366aa7b4bcea8fd41fa7dc65d267\
                               7187c441210213981f357b96b0527f9c99c75df49390cb36a424c5bf959704\
                               377b40f059462952ae";
    const ADDR_1OF2_MAIN: &str = "hs1qzfvdzj28su2luq9g5ldr2lemjsu0ek3patluxzs66verj9jdm2ussay43q";
    const ADDR_1OF2_TESTNET: &str = "ts1qzfvdzj28su2luq9g5ldr2lemjsu0ek3patluxzs66verj9jdm2usvt9fw5";
    const ADDR_2OF3_MAIN: &str = "hs1ql5a87tjy6q7qar8ng5v3jvthhf7x6mr3jxatvjz5pldj6z6p2nlshg44gv";

    fn key(hex_str: &str) -> [u8; 33] {
        let bytes = hex::decode(hex_str).unwrap();
        let mut out = [0u8; 33];
        out.copy_from_slice(&bytes);
        out
    }

    // Distinct valid keys derived from small secrets.
    fn test_keys(count: usize) -> Vec<[u8; 33]> {
        (1..=count as u8)
            .map(|i| {
                let mut secret = [0u8; 32];
                secret[31] = i;
                KeyRing::from_secret_bytes(&secret)
                    .unwrap()
                    .public_key_bytes()
            })
            .collect()
    }

    // --- Construction ---

    #[test]
    fn builds_one_of_two() {
        let script = MultisigScript::new(1, &[key(PUBKEY_A), key(PUBKEY_B)]).unwrap();
        assert_eq!(script.m(), 1);
        assert_eq!(script.n(), 2);
        assert_eq!(script.pubkeys()[0], key(PUBKEY_A));
    }

    #[test]
    fn rejects_zero_threshold() {
        let err = MultisigScript::new(0, &[key(PUBKEY_A)]).unwrap_err();
        assert_eq!(err, ScriptError::InvalidThreshold { m: 0, n: 1 });
    }

    #[test]
    fn rejects_threshold_above_key_count() {
        let err = MultisigScript::new(3, &[key(PUBKEY_A), key(PUBKEY_B)]).unwrap_err();
        assert_eq!(err, ScriptError::InvalidThreshold { m: 3, n: 2 });
    }

    #[test]
    fn rejects_empty_key_set() {
        let err = MultisigScript::new(1, &[]).unwrap_err();
        assert_eq!(err, ScriptError::InvalidThreshold { m: 1, n: 0 });
    }

    #[test]
    fn rejects_seventeen_keys() {
        let keys = test_keys(17);
        let err = MultisigScript::new(2, &keys).unwrap_err();
        assert_eq!(err, ScriptError::InvalidThreshold { m: 2, n: 17 });
    }

    #[test]
    fn rejects_off_curve_key_with_index() {
        let mut bad = key(PUBKEY_B);
        bad[0] = 0x05;
        let err = MultisigScript::new(1, &[key(PUBKEY_A), bad]).unwrap_err();
        assert_eq!(err, ScriptError::InvalidPubkey(1));
    }

    #[test]
    fn threshold_checked_before_keys() {
        // Both the threshold and the key are invalid; the threshold wins.
        let bad = [0x05u8; 33];
        let err = MultisigScript::new(0, &[bad]).unwrap_err();
        assert_eq!(err, ScriptError::InvalidThreshold { m: 0, n: 1 });
    }

    // --- Serialization ---

    #[test]
    fn serialize_golden_one_of_two() {
        let script = MultisigScript::new(1, &[key(PUBKEY_A), key(PUBKEY_B)]).unwrap();
        let bytes = script.serialize().unwrap();
        assert_eq!(hex::encode(&bytes), SCRIPT_1OF2);
        assert_eq!(bytes.len(), 71);
    }

    #[test]
    fn serialize_structure() {
        let keys = test_keys(3);
        let bytes = MultisigScript::new(2, &keys).unwrap().serialize().unwrap();
        assert_eq!(bytes[0], 0x52); // OP_2
        assert_eq!(bytes[1], 0x21); // push 33 bytes
        assert_eq!(bytes[bytes.len() - 2], 0x53); // OP_3
        assert_eq!(bytes[bytes.len() - 1], 0xae); // OP_CHECKMULTISIG
        assert_eq!(bytes.len(), 3 + 3 * 34);
    }

    #[test]
    fn serialize_fifteen_keys_fits() {
        let keys = test_keys(15);
        let bytes = MultisigScript::new(8, &keys).unwrap().serialize().unwrap();
        assert_eq!(bytes.len(), 513);
    }

    #[test]
    fn serialize_sixteen_keys_too_large() {
        let keys = test_keys(16);
        let script = MultisigScript::new(8, &keys).unwrap();
        let err = script.serialize().unwrap_err();
        assert_eq!(err, ScriptError::ScriptTooLarge { size: 547, max: 520 });
    }

    // --- Addresses ---

    #[test]
    fn address_golden_one_of_two() {
        let script = MultisigScript::new(1, &[key(PUBKEY_A), key(PUBKEY_B)]).unwrap();
        assert_eq!(
            script.to_address(Network::Main).unwrap().encode(),
            ADDR_1OF2_MAIN
        );
        assert_eq!(
            script.to_address(Network::Testnet).unwrap().encode(),
            ADDR_1OF2_TESTNET
        );
    }

    #[test]
    fn address_golden_two_of_three() {
        let script =
            MultisigScript::new(2, &[key(PUBKEY_A), key(PUBKEY_B), key(PUBKEY_C)]).unwrap();
        assert_eq!(
            script.to_address(Network::Main).unwrap().encode(),
            ADDR_2OF3_MAIN
        );
    }

    #[test]
    fn address_is_script_hash_form() {
        let script = MultisigScript::new(1, &[key(PUBKEY_A), key(PUBKEY_B)]).unwrap();
        let addr = script.to_address(Network::Main).unwrap();
        assert!(addr.is_script_hash());
        assert_eq!(addr.hash(), script.script_hash().unwrap());
    }

    #[test]
    fn key_order_changes_address() {
        let forward = MultisigScript::new(1, &[key(PUBKEY_A), key(PUBKEY_B)]).unwrap();
        let reversed = MultisigScript::new(1, &[key(PUBKEY_B), key(PUBKEY_A)]).unwrap();
        assert_ne!(forward.serialize().unwrap(), reversed.serialize().unwrap());
        assert_ne!(
            forward.to_address(Network::Main).unwrap(),
            reversed.to_address(Network::Main).unwrap()
        );
    }

    #[test]
    fn sixteen_keys_cannot_produce_address() {
        let keys = test_keys(16);
        let script = MultisigScript::new(16, &keys).unwrap();
        assert!(script.to_address(Network::Main).is_err());
    }

    #[test]
    fn same_inputs_same_address() {
        let keys = [key(PUBKEY_A), key(PUBKEY_B)];
        let a1 = MultisigScript::new(2, &keys).unwrap().to_address(Network::Main).unwrap();
        let a2 = MultisigScript::new(2, &keys).unwrap().to_address(Network::Main).unwrap();
        assert_eq!(a1, a2);
    }
}
