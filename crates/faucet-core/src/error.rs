//! Error types for the core Handshake primitives.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("missing separator")] MissingSeparator,
    #[error("invalid HRP")] InvalidHrp,
    #[error("unknown network: {0}")] UnknownNetwork(String),
    #[error("invalid character: {0}")] InvalidCharacter(char),
    #[error("mixed case")] MixedCase,
    #[error("invalid checksum")] InvalidChecksum,
    #[error("invalid version: {0}")] InvalidVersion(u8),
    #[error("invalid padding bits")] InvalidPadding,
    #[error("invalid length")] InvalidLength,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid public key")] InvalidPublicKey,
    #[error("invalid private key")] InvalidPrivateKey,
    #[error("key ring holds no private key")] MissingPrivateKey,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("invalid threshold: {m} of {n}")] InvalidThreshold { m: usize, n: usize },
    #[error("invalid public key at index {0}")] InvalidPubkey(usize),
    #[error("script too large: {size} > {max}")] ScriptTooLarge { size: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)] Address(#[from] AddressError),
    #[error(transparent)] Key(#[from] KeyError),
    #[error(transparent)] Script(#[from] ScriptError),
}
