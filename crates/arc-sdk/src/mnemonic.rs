//! 25-word account mnemonics
//!
//! A 32-byte ed25519 seed is split into 24 little-endian 11-bit groups, each
//! mapped to a word of the BIP-39 English list. The 25th word is a checksum:
//! the first 11 bits of SHA-512/256 over the seed.

use arc_crypto::sha512_256;
use bip39::Language;
use zeroize::Zeroize;

use crate::SdkError;

/// Words in a mnemonic, checksum included
pub const MNEMONIC_LEN: usize = 25;

/// Seed length in bytes
pub const SEED_LEN: usize = 32;

const BITS_PER_WORD: u32 = 11;
const WORD_MASK: u32 = 0x7ff;

/// Encode a seed as 25 words
pub fn from_seed(seed: &[u8; SEED_LEN]) -> String {
    let wordlist = Language::English.word_list();
    let mut words: Vec<&str> = to_u11(seed)
        .into_iter()
        .map(|index| wordlist[index as usize])
        .collect();
    words.push(wordlist[checksum_index(seed) as usize]);
    words.join(" ")
}

/// Decode 25 words into the seed they encode
pub fn to_seed(mnemonic: &str) -> Result<[u8; SEED_LEN], SdkError> {
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    if words.len() != MNEMONIC_LEN {
        return Err(SdkError::InvalidMnemonic(format!(
            "expected {} words, got {}",
            MNEMONIC_LEN,
            words.len()
        )));
    }

    let indices = words
        .iter()
        .map(|word| word_index(word))
        .collect::<Result<Vec<u16>, SdkError>>()?;

    let (checksum_word, key_words) = indices
        .split_last()
        .ok_or_else(|| SdkError::InvalidMnemonic("empty mnemonic".to_string()))?;

    let mut bytes = from_u11(key_words);
    // 24 words carry 264 bits: 32 key bytes plus one zero byte
    if bytes.len() != SEED_LEN + 1 || bytes[SEED_LEN] != 0 {
        bytes.zeroize();
        return Err(SdkError::InvalidMnemonic("malformed key words".to_string()));
    }

    let mut seed = [0u8; SEED_LEN];
    seed.copy_from_slice(&bytes[..SEED_LEN]);
    bytes.zeroize();

    if checksum_index(&seed) != *checksum_word {
        seed.zeroize();
        return Err(SdkError::InvalidMnemonic("checksum mismatch".to_string()));
    }
    Ok(seed)
}

fn word_index(word: &str) -> Result<u16, SdkError> {
    let lowered = word.to_lowercase();
    Language::English
        .word_list()
        .iter()
        .position(|w| *w == lowered)
        .map(|i| i as u16)
        .ok_or_else(|| SdkError::InvalidMnemonic(format!("unknown word: {}", word)))
}

fn checksum_index(seed: &[u8]) -> u16 {
    let hash = sha512_256(seed);
    to_u11(&hash.as_bytes()[..2])[0]
}

/// Little-endian repacking of bytes into 11-bit groups
fn to_u11(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / BITS_PER_WORD as usize + 1);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in bytes {
        buffer |= u32::from(byte) << bits;
        bits += 8;
        if bits >= BITS_PER_WORD {
            out.push((buffer & WORD_MASK) as u16);
            buffer >>= BITS_PER_WORD;
            bits -= BITS_PER_WORD;
        }
    }
    if bits > 0 {
        out.push((buffer & WORD_MASK) as u16);
    }
    out
}

/// Inverse of [`to_u11`]
fn from_u11(groups: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(groups.len() * BITS_PER_WORD as usize / 8 + 1);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &group in groups {
        buffer |= u32::from(group) << bits;
        bits += BITS_PER_WORD;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let seed = [0x5au8; SEED_LEN];
        let phrase = from_seed(&seed);
        assert_eq!(phrase.split(' ').count(), MNEMONIC_LEN);
        assert_eq!(to_seed(&phrase).unwrap(), seed);
    }

    #[test]
    fn test_zero_seed_words() {
        let phrase = from_seed(&[0u8; SEED_LEN]);
        let words: Vec<&str> = phrase.split(' ').collect();
        assert!(words[..24].iter().all(|w| *w == "abandon"));
        assert_eq!(words[24], "invest");
        assert_eq!(to_seed(&phrase).unwrap(), [0u8; SEED_LEN]);
    }

    #[test]
    fn test_u11_packing() {
        assert_eq!(to_u11(&[0xff, 0x07]), vec![0x7ff, 0]);
        assert_eq!(from_u11(&[0x7ff, 0]), vec![0xff, 0x07, 0x00]);
        assert_eq!(to_u11(&[0u8; 32]).len(), 24);
    }

    #[test]
    fn test_wrong_word_count() {
        assert!(matches!(to_seed("abandon abandon"), Err(SdkError::InvalidMnemonic(_))));
    }

    #[test]
    fn test_unknown_word() {
        let mut words: Vec<String> = from_seed(&[1u8; SEED_LEN])
            .split(' ')
            .map(str::to_string)
            .collect();
        words[3] = "notaword".to_string();
        assert!(matches!(
            to_seed(&words.join(" ")),
            Err(SdkError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_checksum_mismatch() {
        let phrase = from_seed(&[7u8; SEED_LEN]);
        let mut words: Vec<&str> = phrase.split(' ').collect();
        let last = words[24];
        words[24] = if last == "zoo" { "abandon" } else { "zoo" };
        assert!(matches!(
            to_seed(&words.join(" ")),
            Err(SdkError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_case_and_whitespace_tolerated() {
        let seed = [9u8; SEED_LEN];
        let phrase = from_seed(&seed).to_uppercase().replace(' ', "  \n");
        assert_eq!(to_seed(&phrase).unwrap(), seed);
    }
}
