//! BIP-39 mnemonic generation, parsing, and seed stretching.
//!
//! Entropy of 128-512 bits (in steps of 32) maps to a phrase of 12-48
//! dictionary words carrying an entropy/32-bit SHA-256 checksum. The common
//! BIP-39 ceiling is 256 bits; above that the checksum rule generalizes
//! unchanged. Seed stretching is PBKDF2-HMAC-SHA512 over the phrase text
//! with salt `"mnemonic" + passphrase`, 2048 rounds, 64-byte output.
//!
//! Dictionaries come from the `bip39` crate word lists; phrases are always
//! rebuilt from dictionary entries, so any input spelling the same words
//! yields the same canonical text and the same seed.

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WalletError;

/// Smallest accepted entropy size in bits.
pub const MIN_ENTROPY_BITS: usize = 128;

/// Largest accepted entropy size in bits.
pub const MAX_ENTROPY_BITS: usize = 512;

/// PBKDF2 round count for seed stretching, fixed by BIP-39.
const SEED_ROUNDS: u32 = 2048;

/// Stretched seed length in bytes.
pub const SEED_LEN: usize = 64;

/// Supported mnemonic dictionaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    /// Simplified Chinese.
    ChineseSimplified,
    /// Traditional Chinese.
    ChineseTraditional,
    /// English (the default).
    English,
    /// French.
    French,
    /// Italian.
    Italian,
    /// Japanese; phrases join with U+3000 (ideographic space).
    Japanese,
    /// Korean.
    Korean,
    /// Spanish.
    Spanish,
}

impl Language {
    /// All supported languages, in canonical order.
    pub const ALL: [Language; 8] = [
        Language::ChineseSimplified,
        Language::ChineseTraditional,
        Language::English,
        Language::French,
        Language::Italian,
        Language::Japanese,
        Language::Korean,
        Language::Spanish,
    ];

    /// The 2048-word dictionary for this language.
    fn word_list(self) -> &'static [&'static str; 2048] {
        self.as_bip39().word_list()
    }

    /// The separator placed between phrase words.
    fn separator(self) -> char {
        match self {
            Language::Japanese => '\u{3000}',
            _ => ' ',
        }
    }

    fn as_bip39(self) -> bip39::Language {
        match self {
            Language::ChineseSimplified => bip39::Language::SimplifiedChinese,
            Language::ChineseTraditional => bip39::Language::TraditionalChinese,
            Language::English => bip39::Language::English,
            Language::French => bip39::Language::French,
            Language::Italian => bip39::Language::Italian,
            Language::Japanese => bip39::Language::Japanese,
            Language::Korean => bip39::Language::Korean,
            Language::Spanish => bip39::Language::Spanish,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::ChineseSimplified => "chinese-simplified",
            Language::ChineseTraditional => "chinese-traditional",
            Language::English => "english",
            Language::French => "french",
            Language::Italian => "italian",
            Language::Japanese => "japanese",
            Language::Korean => "korean",
            Language::Spanish => "spanish",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Language {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chinese-simplified" => Ok(Language::ChineseSimplified),
            "chinese-traditional" => Ok(Language::ChineseTraditional),
            "english" => Ok(Language::English),
            "french" => Ok(Language::French),
            "italian" => Ok(Language::Italian),
            "japanese" => Ok(Language::Japanese),
            "korean" => Ok(Language::Korean),
            "spanish" => Ok(Language::Spanish),
            _ => Err(WalletError::UnknownLanguage(s.to_string())),
        }
    }
}

/// A 64-byte stretched seed, the root of hierarchical derivation.
///
/// Zeroized on drop; `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    bytes: [u8; SEED_LEN],
}

impl Seed {
    /// Create a seed from raw bytes.
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self { bytes }
    }

    /// Get the raw seed bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.bytes
    }
}

impl Clone for Seed {
    fn clone(&self) -> Self {
        Self { bytes: self.bytes }
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed").field("bytes", &"[REDACTED]").finish()
    }
}

/// A mnemonic phrase: entropy plus its dictionary language.
///
/// Entropy is zeroized on drop; the phrase text is recomputed from the
/// dictionary on demand rather than stored.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic {
    entropy: Vec<u8>,
    #[zeroize(skip)]
    language: Language,
}

impl Mnemonic {
    /// Generate a mnemonic from fresh OS entropy.
    ///
    /// `bits` must be in [128, 512] and a multiple of 32.
    pub fn generate(bits: usize, language: Language) -> Result<Self, WalletError> {
        check_entropy_bits(bits)?;
        use rand::RngCore;
        let mut entropy = vec![0u8; bits / 8];
        rand::rngs::OsRng.fill_bytes(&mut entropy);
        Ok(Self { entropy, language })
    }

    /// Wrap existing entropy bytes as a mnemonic.
    pub fn from_entropy(entropy: &[u8], language: Language) -> Result<Self, WalletError> {
        check_entropy_bits(entropy.len() * 8)?;
        Ok(Self {
            entropy: entropy.to_vec(),
            language,
        })
    }

    /// Parse a phrase back into its entropy, verifying the checksum.
    ///
    /// Splits on any Unicode whitespace. An out-of-dictionary word fails
    /// with [`WalletError::UnknownWord`]; a word count outside [12, 48] or
    /// not a multiple of 3 fails with [`WalletError::BadWordCount`]; valid
    /// words with mismatched checksum bits fail with
    /// [`WalletError::BadChecksum`].
    pub fn parse(phrase: &str, language: Language) -> Result<Self, WalletError> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        let count = words.len();
        if count < 12 || count > 48 || count % 3 != 0 {
            return Err(WalletError::BadWordCount(count));
        }

        let list = language.word_list();
        let mut indices = Vec::with_capacity(count);
        for word in &words {
            let index = list
                .iter()
                .position(|w| w == word)
                .ok_or_else(|| WalletError::UnknownWord(word.to_string()))?;
            indices.push(index as u16);
        }

        // 33 bits of phrase encode 32 bits of entropy.
        let total_bits = indices.len() * 11;
        let ent_bits = total_bits * 32 / 33;
        let cs_bits = total_bits - ent_bits;

        let mut bits = Vec::with_capacity(total_bits);
        for index in &indices {
            for shift in (0..11).rev() {
                bits.push(index >> shift & 1 == 1);
            }
        }

        let mut entropy = vec![0u8; ent_bits / 8];
        for (i, bit) in bits[..ent_bits].iter().enumerate() {
            if *bit {
                entropy[i / 8] |= 1 << (7 - i % 8);
            }
        }

        let digest = Sha256::digest(&entropy);
        for i in 0..cs_bits {
            let expected = digest[i / 8] >> (7 - i % 8) & 1 == 1;
            if bits[ent_bits + i] != expected {
                entropy.zeroize();
                return Err(WalletError::BadChecksum);
            }
        }

        Ok(Self { entropy, language })
    }

    /// The dictionary language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// The raw entropy bytes.
    pub fn entropy(&self) -> &[u8] {
        &self.entropy
    }

    /// Number of words in the phrase: entropy bits / 32 * 3.
    pub fn word_count(&self) -> usize {
        self.entropy.len() * 3 / 4
    }

    /// The phrase words in order.
    pub fn words(&self) -> Vec<&'static str> {
        let list = self.language.word_list();
        self.word_indices()
            .into_iter()
            .map(|i| list[i as usize])
            .collect()
    }

    /// The canonical phrase text.
    ///
    /// Words join with an ASCII space, or U+3000 for Japanese.
    pub fn phrase(&self) -> String {
        let separator = self.language.separator();
        let mut out = String::new();
        for (i, word) in self.words().iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.push_str(word);
        }
        out
    }

    /// Stretch the phrase into a 64-byte seed.
    ///
    /// PBKDF2-HMAC-SHA512 over the canonical phrase with salt
    /// `"mnemonic" + passphrase`, 2048 rounds. Never fails for a
    /// well-formed mnemonic; the same (phrase, passphrase) always yields
    /// the same seed.
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        let mut phrase = self.phrase();
        let mut salt = String::with_capacity(8 + passphrase.len());
        salt.push_str("mnemonic");
        salt.push_str(passphrase);

        let mut bytes = [0u8; SEED_LEN];
        pbkdf2_hmac::<Sha512>(phrase.as_bytes(), salt.as_bytes(), SEED_ROUNDS, &mut bytes);
        phrase.zeroize();
        salt.zeroize();
        Seed::from_bytes(bytes)
    }

    /// 11-bit dictionary indices for entropy plus checksum bits.
    fn word_indices(&self) -> Vec<u16> {
        let ent_bits = self.entropy.len() * 8;
        let cs_bits = ent_bits / 32;
        let digest = Sha256::digest(&self.entropy);

        let mut bits = Vec::with_capacity(ent_bits + cs_bits);
        for byte in &self.entropy {
            for shift in (0..8).rev() {
                bits.push(byte >> shift & 1 == 1);
            }
        }
        for i in 0..cs_bits {
            bits.push(digest[i / 8] >> (7 - i % 8) & 1 == 1);
        }

        bits.chunks(11)
            .map(|chunk| chunk.iter().fold(0u16, |acc, &b| acc << 1 | b as u16))
            .collect()
    }
}

impl Clone for Mnemonic {
    fn clone(&self) -> Self {
        Self {
            entropy: self.entropy.clone(),
            language: self.language,
        }
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("language", &self.language)
            .field("word_count", &self.word_count())
            .field("entropy", &"[REDACTED]")
            .finish()
    }
}

fn check_entropy_bits(bits: usize) -> Result<(), WalletError> {
    if bits < MIN_ENTROPY_BITS || bits > MAX_ENTROPY_BITS || bits % 32 != 0 {
        return Err(WalletError::InvalidEntropyBits(bits));
    }
    Ok(())
}
