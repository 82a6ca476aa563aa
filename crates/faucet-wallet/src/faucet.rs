//! Faucet credential composition.
//!
//! A [`FaucetTool`] ties the pipeline together: mnemonic, seed, the fixed
//! BIP-44 path `m/44'/coin'/0'/0/0`, and the resulting key ring and
//! address. The hop policy is a reproducibility contract: the same phrase
//! on the same network always lands on the same address.

use serde::Serialize;

use faucet_core::address::Address;
use faucet_core::keyring::KeyRing;
use faucet_core::network::Network;
use faucet_core::script::MultisigScript;

use crate::error::WalletError;
use crate::hd::{ExtendedKey, BIP44_PURPOSE};
use crate::mnemonic::{Language, Mnemonic};

/// Options for credential generation.
#[derive(Clone, Copy, Debug)]
pub struct FaucetOptions {
    /// Target network (default: main).
    pub network: Network,
    /// Mnemonic dictionary (default: english).
    pub language: Language,
    /// Entropy bits for the generated mnemonic (default: 256).
    pub bits: usize,
}

impl Default for FaucetOptions {
    fn default() -> Self {
        Self {
            network: Network::Main,
            language: Language::English,
            bits: 256,
        }
    }
}

/// JSON-friendly snapshot of generated credentials.
#[derive(Clone, Debug, Serialize)]
pub struct GenerationSummary {
    /// Target network.
    pub network: Network,
    /// The receive address.
    pub address: String,
    /// The recovery phrase.
    pub phrase: String,
    /// Compressed public key, hex.
    pub public_key: String,
    /// WIF-encoded private key.
    pub private_key: String,
    /// Account-level extended public key.
    pub account_xpub: String,
}

/// Result of building an m-of-n multisig address.
#[derive(Clone, Debug, Serialize)]
pub struct MultisigSummary {
    /// Signature threshold.
    pub m: usize,
    /// Number of keys.
    pub n: usize,
    /// The keys in caller-supplied order, hex.
    pub pubkeys: Vec<String>,
    /// The script-hash address.
    pub address: String,
    /// Serialized redeem script, hex.
    pub redeem_script: String,
}

/// One-shot faucet credential generator.
#[derive(Debug)]
pub struct FaucetTool {
    network: Network,
    mnemonic: Mnemonic,
    account: ExtendedKey,
    ring: KeyRing,
    address: Address,
}

impl FaucetTool {
    /// Generate fresh credentials from OS entropy.
    pub fn new(options: FaucetOptions) -> Result<Self, WalletError> {
        let mnemonic = Mnemonic::generate(options.bits, options.language)?;
        Self::from_mnemonic(mnemonic, options.network)
    }

    /// Rebuild credentials from an existing mnemonic.
    ///
    /// Derives `m/44'/coin'/0'/0/0` with an empty seed passphrase; the
    /// coin type follows the network.
    pub fn from_mnemonic(mnemonic: Mnemonic, network: Network) -> Result<Self, WalletError> {
        let seed = mnemonic.to_seed("");
        let master = ExtendedKey::master_from_seed(seed.as_bytes())?;
        let account = master.derive_account(BIP44_PURPOSE, network.coin_type(), 0)?;
        let leaf = account.derive(0, false)?.derive(0, false)?;
        let ring = leaf.key_ring()?;
        let address = ring.to_address(network);
        tracing::info!(network = %network, address = %address, "faucet credentials derived");
        Ok(Self {
            network,
            mnemonic,
            account,
            ring,
            address,
        })
    }

    /// The target network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The receive address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The recovery phrase.
    pub fn phrase(&self) -> String {
        self.mnemonic.phrase()
    }

    /// Compressed public key of the leaf, hex-encoded.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.ring.public_key_bytes())
    }

    /// WIF encoding of the leaf private key.
    pub fn private_key_wif(&self) -> Result<String, WalletError> {
        Ok(self.ring.to_wif(self.network)?)
    }

    /// Raw secret key bytes of the leaf.
    pub fn secret_bytes(&self) -> Result<[u8; 32], WalletError> {
        Ok(self.ring.secret_bytes()?)
    }

    /// Extended public key of the account node `m/44'/coin'/0'`.
    pub fn account_xpub(&self) -> String {
        self.account.to_public().to_xpub(self.network)
    }

    /// Everything the faucet UI displays, in one serializable struct.
    pub fn summary(&self) -> Result<GenerationSummary, WalletError> {
        Ok(GenerationSummary {
            network: self.network,
            address: self.address.encode(),
            phrase: self.phrase(),
            public_key: self.public_key_hex(),
            private_key: self.private_key_wif()?,
            account_xpub: self.account_xpub(),
        })
    }
}

/// Build an m-of-n multisig address from hex-encoded compressed pubkeys.
///
/// Key order is preserved; a malformed key fails with the index of the
/// offending entry.
pub fn create_multisig(
    network: Network,
    m: usize,
    pubkeys_hex: &[String],
) -> Result<MultisigSummary, WalletError> {
    use faucet_core::error::ScriptError;
    use faucet_core::keyring::PUBKEY_LEN;

    let mut pubkeys = Vec::with_capacity(pubkeys_hex.len());
    for (i, text) in pubkeys_hex.iter().enumerate() {
        let bytes = hex::decode(text).map_err(|_| ScriptError::InvalidPubkey(i))?;
        let key: [u8; PUBKEY_LEN] = bytes
            .try_into()
            .map_err(|_| ScriptError::InvalidPubkey(i))?;
        pubkeys.push(key);
    }

    let script = MultisigScript::new(m, &pubkeys)?;
    let address = script.to_address(network)?;
    let redeem_script = hex::encode(script.serialize()?);
    Ok(MultisigSummary {
        m,
        n: pubkeys.len(),
        pubkeys: pubkeys_hex.to_vec(),
        address: address.encode(),
        redeem_script,
    })
}

/// True if `text` is a valid address for `network`.
pub fn is_valid_address(network: Network, text: &str) -> bool {
    Address::is_valid(network, text)
}

/// True if `text` is 66 hex characters of a compressed on-curve pubkey.
pub fn is_valid_pubkey(text: &str) -> bool {
    match hex::decode(text) {
        Ok(bytes) => KeyRing::validate_public_key(&bytes),
        Err(_) => false,
    }
}
