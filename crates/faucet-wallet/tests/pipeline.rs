//! Cross-module pipeline vectors: entropy → phrase → seed → path → address.
//!
//! Golden values are cross-computed from the BIP-39 reference vectors and
//! an independent implementation of the derivation chain.

use faucet_core::network::Network;
use faucet_wallet::{
    create_multisig, is_valid_address, protect, recover, ExtendedKey, FaucetTool, Language,
    Mnemonic, BIP44_PURPOSE,
};
use proptest::prelude::*;

const ABANDON_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon \
                          abandon abandon abandon about";
const ABANDON_12_SEED: &str = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
                               9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4";

const MAIN_ADDR: &str = "hs1q5400uxwpr3w6ydc2wsc0hd9jfqz7nqkkgzfvmd";
const MAIN_WIF: &str = "KzhBaTUaaTKDAE2S1EjqHAdLNwxyjUYZPvQs3kfXb4UrBbrmqu4p";
const MAIN_XPUB: &str = "xpub6DBMpym6PM3qe7Ug7BwG6zo7dinMMjpk8nmb73czsjkzPTzfQ1d5ZvqDea4uNmMVv\
                         1Y9DT6v17GuDL1x2km9FQuKqWMdnrDfRiDNrG1nTMr";
const TESTNET_ADDR: &str = "ts1qg8dy6k7cqy6fvun5rzhjrfqj5gaqyuekpcgadk";
const TESTNET_WIF: &str = "cV4dFRWE2EpBZKgZuoMUNxyACfUDkZtTymgVMKR1o1nQjRCrYM9n";

const PUBKEY_A: &str = "02e43e541306e77af21c9e94681f83366aa7b4bcea8fd41fa7dc65d2677187c441";
const PUBKEY_B: &str = "0213981f357b96b0527f9c99c75df49390cb36a424c5bf959704377b40f0594629";
const ADDR_1OF2_MAIN: &str = "hs1qzfvdzj28su2luq9g5ldr2lemjsu0ek3patluxzs66verj9jdm2ussay43q";

fn abandon_tool(network: Network) -> FaucetTool {
    let mnemonic = Mnemonic::parse(ABANDON_12, Language::English).unwrap();
    FaucetTool::from_mnemonic(mnemonic, network).unwrap()
}

#[test]
fn phrase_to_seed_golden() {
    let mnemonic = Mnemonic::parse(ABANDON_12, Language::English).unwrap();
    assert_eq!(mnemonic.entropy(), &[0u8; 16]);
    assert_eq!(hex::encode(mnemonic.to_seed("").as_bytes()), ABANDON_12_SEED);
}

#[test]
fn seed_to_leaf_golden_main() {
    let seed = Mnemonic::parse(ABANDON_12, Language::English)
        .unwrap()
        .to_seed("");
    let leaf = ExtendedKey::master_from_seed(seed.as_bytes())
        .unwrap()
        .derive_account(BIP44_PURPOSE, Network::Main.coin_type(), 0)
        .unwrap()
        .derive(0, false)
        .unwrap()
        .derive(0, false)
        .unwrap();
    let ring = leaf.key_ring().unwrap();
    assert_eq!(ring.to_address(Network::Main).encode(), MAIN_ADDR);
    assert_eq!(ring.to_wif(Network::Main).unwrap(), MAIN_WIF);
}

#[test]
fn full_tool_golden_main() {
    let tool = abandon_tool(Network::Main);
    assert_eq!(tool.address().encode(), MAIN_ADDR);
    assert_eq!(tool.private_key_wif().unwrap(), MAIN_WIF);
    assert_eq!(tool.account_xpub(), MAIN_XPUB);
    assert_eq!(tool.phrase(), ABANDON_12);
}

#[test]
fn full_tool_golden_testnet() {
    let tool = abandon_tool(Network::Testnet);
    assert_eq!(tool.address().encode(), TESTNET_ADDR);
    assert_eq!(tool.private_key_wif().unwrap(), TESTNET_WIF);
    assert!(tool.account_xpub().starts_with("tpub"));
}

#[test]
fn addresses_validate_only_on_their_network() {
    for (addr, home) in [(MAIN_ADDR, Network::Main), (TESTNET_ADDR, Network::Testnet)] {
        for network in Network::ALL {
            assert_eq!(is_valid_address(network, addr), network == home);
        }
    }
}

#[test]
fn spec_scenario_main_address_vector() {
    // A known mainnet address validates for main and nothing else.
    let addr = "hs1q9m5ftltrsqgg3tw6j68qnnugssp4umrsqwhjvd";
    assert!(is_valid_address(Network::Main, addr));
    assert!(!is_valid_address(Network::Testnet, addr));
}

#[test]
fn multisig_pipeline_golden() {
    let keys = vec![PUBKEY_A.to_string(), PUBKEY_B.to_string()];
    let summary = create_multisig(Network::Main, 1, &keys).unwrap();
    assert_eq!(summary.address, ADDR_1OF2_MAIN);
    assert!(summary.redeem_script.len() / 2 <= 520);
    assert!(is_valid_address(Network::Main, &summary.address));
}

#[test]
fn derived_secret_survives_protection_roundtrip() {
    let tool = abandon_tool(Network::Main);
    let secret = tool.secret_bytes().unwrap();
    let bundle = protect(&secret, "a sufficiently long passphrase").unwrap();
    let recovered = recover(&bundle, "a sufficiently long passphrase").unwrap();
    assert_eq!(recovered.as_slice(), &secret);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn mnemonic_roundtrip_any_size(step in 0usize..13, lang_index in 0usize..8) {
        let bits = 128 + step * 32;
        let language = Language::ALL[lang_index];
        let mnemonic = Mnemonic::generate(bits, language).unwrap();
        prop_assert_eq!(mnemonic.word_count(), bits / 32 * 3);
        let parsed = Mnemonic::parse(&mnemonic.phrase(), language).unwrap();
        prop_assert_eq!(parsed.entropy(), mnemonic.entropy());
        let parsed_seed = parsed.to_seed("pw");
        let mnemonic_seed = mnemonic.to_seed("pw");
        prop_assert_eq!(parsed_seed.as_bytes(), mnemonic_seed.as_bytes());
    }

    #[test]
    fn derivation_is_pure(index in 0u32..1000, hardened in any::<bool>()) {
        let seed = Mnemonic::parse(ABANDON_12, Language::English).unwrap().to_seed("");
        let master = ExtendedKey::master_from_seed(seed.as_bytes()).unwrap();
        let a = master.derive(index, hardened).unwrap();
        let b = master.derive(index, hardened).unwrap();
        prop_assert_eq!(a.secret_bytes().unwrap(), b.secret_bytes().unwrap());
        prop_assert_eq!(a.public_key_bytes(), b.public_key_bytes());
    }
}
