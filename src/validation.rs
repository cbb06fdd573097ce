// File: src/validation.rs
//! Input checks run before any generation.

use crate::error::{InflectError, Result};

/// The phonemic inventory, each letter with the native spellings it stands
/// for. Vowels written as diacritics are given by name.
pub const PHONEMIC_ALPHABET: [(char, &[&str]); 29] = [
    ('b', &["ب"]),
    ('p', &["پ"]),
    ('f', &["ف"]),
    ('v', &["و"]),
    ('t', &["ت", "ط"]),
    ('d', &["د"]),
    ('s', &["س", "ص", "ث"]),
    ('z', &["ز", "ض", "ظ", "ذ"]),
    ('ʃ', &["ش"]),
    ('ʒ', &["ژ"]),
    ('ʤ', &["ج"]),
    ('ʧ', &["چ"]),
    ('c', &["ک"]),
    ('Ɉ', &["گ"]),
    ('x', &["خ"]),
    ('G', &["ق", "غ"]),
    ('h', &["ه", "ح"]),
    ('ʔ', &["ع", "همزه"]),
    ('m', &["م"]),
    ('n', &["ن"]),
    ('r', &["ر"]),
    ('l', &["ل"]),
    ('j', &["ی"]),
    ('ɒ', &["آ", "ا"]),
    ('u', &["او"]),
    ('i', &["ی"]),
    ('æ', &["فتحه"]),
    ('e', &["کسره"]),
    ('o', &["ضمه"]),
];

pub fn is_phonemic_letter(letter: char) -> bool {
    PHONEMIC_ALPHABET.iter().any(|&(l, _)| l == letter)
}

/// Rejects a transcription containing any letter outside the inventory,
/// reporting the first offender.
pub fn validate_phonemic(transcription: &str) -> Result<()> {
    match transcription.chars().find(|&c| !is_phonemic_letter(c)) {
        Some(letter) => Err(InflectError::InvalidPhonemic { letter }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_inventory_letters() {
        assert!(validate_phonemic("ræGsidæn").is_ok());
        assert!(validate_phonemic("ʔɒmædæn").is_ok());
        assert!(validate_phonemic("").is_ok());
    }

    #[test]
    fn reports_first_foreign_letter() {
        assert!(matches!(
            validate_phonemic("raqs"),
            Err(InflectError::InvalidPhonemic { letter: 'a' })
        ));
        assert!(matches!(
            validate_phonemic("ræft æn"),
            Err(InflectError::InvalidPhonemic { letter: ' ' })
        ));
    }

    #[test]
    fn inventory_has_no_duplicates() {
        let mut letters: Vec<char> = PHONEMIC_ALPHABET.iter().map(|&(l, _)| l).collect();
        letters.sort_unstable();
        letters.dedup();
        assert_eq!(letters.len(), PHONEMIC_ALPHABET.len());
    }
}
