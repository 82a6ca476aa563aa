//! Handshake network parameters.
//!
//! Each network carries the constants address and key serialization depend
//! on: the bech32 human-readable prefix, the BIP-44 coin type, the WIF
//! private-key prefix byte, and the BIP-32 extended-public-key version bytes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// Network identifier determining address prefixes and key serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet (HRP: "hs", addresses start with `hs1`).
    Main,
    /// Testnet (HRP: "ts", addresses start with `ts1`).
    Testnet,
    /// Regression-test network (HRP: "rs").
    Regtest,
    /// Simulation network (HRP: "ss").
    Simnet,
}

impl Network {
    /// All supported networks, in canonical order.
    pub const ALL: [Network; 4] = [
        Network::Main,
        Network::Testnet,
        Network::Regtest,
        Network::Simnet,
    ];

    /// Human-readable prefix for this network.
    pub fn hrp(&self) -> &'static str {
        match self {
            Network::Main => "hs",
            Network::Testnet => "ts",
            Network::Regtest => "rs",
            Network::Simnet => "ss",
        }
    }

    /// Look up network from a human-readable prefix.
    pub fn from_hrp(hrp: &str) -> Result<Self, AddressError> {
        match hrp {
            "hs" => Ok(Network::Main),
            "ts" => Ok(Network::Testnet),
            "rs" => Ok(Network::Regtest),
            "ss" => Ok(Network::Simnet),
            _ => Err(AddressError::UnknownNetwork(hrp.to_string())),
        }
    }

    /// BIP-44 coin type used in the derivation path.
    pub fn coin_type(&self) -> u32 {
        match self {
            Network::Main => 5353,
            Network::Testnet => 5354,
            Network::Regtest => 5355,
            Network::Simnet => 5356,
        }
    }

    /// WIF private-key prefix byte.
    pub fn wif_prefix(&self) -> u8 {
        match self {
            Network::Main => 0x80,
            Network::Testnet => 0xef,
            Network::Regtest => 0x5a,
            Network::Simnet => 0x64,
        }
    }

    /// BIP-32 version bytes for extended public keys ("xpub"-style).
    pub fn xpub_version(&self) -> u32 {
        match self {
            Network::Main => 0x0488b21e,
            Network::Testnet => 0x043587cf,
            Network::Regtest => 0xeab4fa05,
            Network::Simnet => 0x0420bd3a,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Main => "main",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
            Network::Simnet => "simnet",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Network {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Network::Main),
            "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            "simnet" => Ok(Network::Simnet),
            _ => Err(AddressError::UnknownNetwork(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- HRP ---

    #[test]
    fn hrp_per_network() {
        assert_eq!(Network::Main.hrp(), "hs");
        assert_eq!(Network::Testnet.hrp(), "ts");
        assert_eq!(Network::Regtest.hrp(), "rs");
        assert_eq!(Network::Simnet.hrp(), "ss");
    }

    #[test]
    fn from_hrp_roundtrip() {
        for net in Network::ALL {
            assert_eq!(Network::from_hrp(net.hrp()).unwrap(), net);
        }
    }

    #[test]
    fn from_hrp_unknown() {
        assert_eq!(
            Network::from_hrp("bc").unwrap_err(),
            AddressError::UnknownNetwork("bc".into())
        );
    }

    // --- Constants ---

    #[test]
    fn coin_types_are_distinct_and_sequential() {
        assert_eq!(Network::Main.coin_type(), 5353);
        assert_eq!(Network::Testnet.coin_type(), 5354);
        assert_eq!(Network::Regtest.coin_type(), 5355);
        assert_eq!(Network::Simnet.coin_type(), 5356);
    }

    #[test]
    fn wif_prefixes() {
        assert_eq!(Network::Main.wif_prefix(), 0x80);
        assert_eq!(Network::Testnet.wif_prefix(), 0xef);
        assert_eq!(Network::Regtest.wif_prefix(), 0x5a);
        assert_eq!(Network::Simnet.wif_prefix(), 0x64);
    }

    #[test]
    fn xpub_version_main_is_bitcoin_compatible() {
        assert_eq!(Network::Main.xpub_version(), 0x0488b21e);
    }

    // --- Display / FromStr ---

    #[test]
    fn display_and_parse_roundtrip() {
        for net in Network::ALL {
            assert_eq!(net.to_string().parse::<Network>().unwrap(), net);
        }
    }

    #[test]
    fn parse_rejects_unknown_name() {
        assert!("mainnet".parse::<Network>().is_err());
        assert!("".parse::<Network>().is_err());
    }

    // --- Serde ---

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Network::Regtest).unwrap();
        assert_eq!(json, "\"regtest\"");
        let back: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Network::Regtest);
    }
}
