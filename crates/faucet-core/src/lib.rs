//! # faucet-core
//! Handshake primitives for the faucet tool: networks, bech32 addresses,
//! secp256k1 key rings, and multisig redeem scripts.

pub mod address;
pub mod error;
pub mod keyring;
pub mod network;
pub mod script;
