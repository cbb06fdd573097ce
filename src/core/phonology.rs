// File: src/core/phonology.rs
//! Prefix allomorphy, separator placement and hiatus resolution at morpheme
//! boundaries.

use crate::core::types::Script;
use crate::error::{InflectError, TableError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ZWNJ: &str = "\u{200c}";

const LONG_A: char = 'آ';
const ALEF: char = 'ا';
const YEH: char = 'ی';
const GLIDE: char = 'j';
const GLOTTAL_STOP: char = 'ʔ';
const PHONEMIC_VOWELS: &str = "ɒæoeiu";

/// The separator a caller chooses for native-script morpheme boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    None,
    Space,
    #[default]
    Zwnj,
}

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::None => "",
            Separator::Space => " ",
            Separator::Zwnj => ZWNJ,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Separator::None => "none",
            Separator::Space => "space",
            Separator::Zwnj => "zwnj",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the literal characters as well as their names.
impl FromStr for Separator {
    type Err = InflectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Separator::None),
            " " | "space" => Ok(Separator::Space),
            ZWNJ | "zwnj" => Ok(Separator::Zwnj),
            other => Err(InflectError::InvalidSeparator(other.to_string())),
        }
    }
}

/// What goes between prefix and stem, between a participle and its ending,
/// and between the words of a compound tense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gaps {
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub word: &'static str,
}

impl Gaps {
    pub fn new(separator: Separator, script: Script) -> Self {
        match (script, separator) {
            (Script::Phonemic, _) => Gaps { prefix: "", suffix: "", word: " " },
            (Script::Native, Separator::Space) => Gaps { prefix: " ", suffix: " ", word: " " },
            (Script::Native, Separator::Zwnj) => Gaps { prefix: ZWNJ, suffix: ZWNJ, word: ZWNJ },
            // A bare juxtaposition across a suffix or word boundary would fuse
            // letters that must stay apart.
            (Script::Native, Separator::None) => Gaps { prefix: "", suffix: ZWNJ, word: ZWNJ },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixKind {
    Bare,
    Continuous,
    NegativeContinuous,
    Subjunctive,
    Negative,
}

impl PrefixKind {
    const ALL: [PrefixKind; 5] = [
        PrefixKind::Bare,
        PrefixKind::Continuous,
        PrefixKind::NegativeContinuous,
        PrefixKind::Subjunctive,
        PrefixKind::Negative,
    ];
}

/// A verbal prefix in a given script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    kind: PrefixKind,
    script: Script,
}

impl Prefix {
    pub const fn new(kind: PrefixKind, script: Script) -> Self {
        Self { kind, script }
    }

    /// Resolves a prefix surface from table data to its rule set.
    pub fn parse(surface: &str, script: Script) -> Result<Self, TableError> {
        PrefixKind::ALL
            .into_iter()
            .map(|kind| Prefix::new(kind, script))
            .find(|prefix| prefix.surface() == surface)
            .ok_or_else(|| TableError::UnknownPrefix {
                surface: surface.to_string(),
                script,
            })
    }

    pub fn kind(self) -> PrefixKind {
        self.kind
    }

    pub fn surface(self) -> &'static str {
        match (self.script, self.kind) {
            (_, PrefixKind::Bare) => "",
            (Script::Native, PrefixKind::Continuous) => "می",
            (Script::Native, PrefixKind::NegativeContinuous) => "نمی",
            (Script::Native, PrefixKind::Subjunctive) => "ب",
            (Script::Native, PrefixKind::Negative) => "ن",
            (Script::Phonemic, PrefixKind::Continuous) => "mi",
            (Script::Phonemic, PrefixKind::NegativeContinuous) => "nemi",
            (Script::Phonemic, PrefixKind::Subjunctive) => "be",
            (Script::Phonemic, PrefixKind::Negative) => "næ",
        }
    }

    /// Attaches the prefix to `stem`. `gap` is the prefix separator; only the
    /// native continuous prefixes are ever written apart from their stem.
    pub fn apply(self, stem: &str, gap: &str) -> String {
        let prefix = self.surface();
        match (self.script, self.kind) {
            (_, PrefixKind::Bare) => stem.to_string(),
            (Script::Native, PrefixKind::Continuous | PrefixKind::NegativeContinuous) => {
                if !gap.is_empty() {
                    format!("{prefix}{gap}{stem}")
                } else if let Some(rest) = stem.strip_prefix(LONG_A) {
                    format!("{prefix}{ALEF}{rest}")
                } else if let Some(rest) = stem.strip_prefix(ALEF) {
                    format!("{prefix}{rest}")
                } else {
                    format!("{prefix}{stem}")
                }
            }
            (Script::Native, PrefixKind::Subjunctive | PrefixKind::Negative) => {
                if let Some(rest) = stem.strip_prefix(LONG_A) {
                    format!("{prefix}{YEH}{ALEF}{rest}")
                } else if stem.starts_with("ای") {
                    format!("{prefix}{stem}")
                } else if let Some(rest) = stem.strip_prefix(ALEF) {
                    format!("{prefix}{YEH}{rest}")
                } else {
                    format!("{prefix}{stem}")
                }
            }
            (Script::Phonemic, kind) => {
                // `be` raises to `bi` in front of the glide.
                let host = match kind {
                    PrefixKind::Subjunctive => "bi",
                    _ => prefix,
                };
                match vowel_onset(stem) {
                    Some(Onset::Glottal(rest)) => format!("{host}{GLIDE}{rest}"),
                    Some(Onset::Vowel) => format!("{host}{GLIDE}{stem}"),
                    None => format!("{prefix}{stem}"),
                }
            }
        }
    }
}

enum Onset<'a> {
    /// Glottal stop followed by a vowel; holds the stem after the stop.
    Glottal(&'a str),
    Vowel,
}

fn is_phonemic_vowel(c: char) -> bool {
    PHONEMIC_VOWELS.contains(c)
}

fn vowel_onset(stem: &str) -> Option<Onset<'_>> {
    let mut chars = stem.chars();
    match (chars.next(), chars.next()) {
        (Some(GLOTTAL_STOP), Some(next)) if is_phonemic_vowel(next) => {
            Some(Onset::Glottal(&stem[GLOTTAL_STOP.len_utf8()..]))
        }
        (Some(first), _) if is_phonemic_vowel(first) => Some(Onset::Vowel),
        _ => None,
    }
}

/// Present stems ending in a vowel take a glide before person endings.
/// Native `و` is left alone: it spells a consonant as often as a vowel, so
/// vocalic-`و` stems are listed with their glide in the irregular table.
pub fn with_glide(stem: &str, script: Script) -> String {
    let last = stem.chars().last();
    match (script, last) {
        (Script::Native, Some(ALEF | LONG_A)) => format!("{stem}{YEH}"),
        (Script::Phonemic, Some('ɒ' | 'u' | 'i')) => format!("{stem}{GLIDE}"),
        _ => stem.to_string(),
    }
}

/// Drops the final grapheme, as when `bude` contracts to `bud`.
pub fn contract(word: &str) -> &str {
    match word.char_indices().last() {
        Some((index, _)) => &word[..index],
        None => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(kind: PrefixKind) -> Prefix {
        Prefix::new(kind, Script::Native)
    }

    fn phonemic(kind: PrefixKind) -> Prefix {
        Prefix::new(kind, Script::Phonemic)
    }

    #[test]
    fn separator_parses_literals_and_names() {
        assert_eq!("".parse::<Separator>().unwrap(), Separator::None);
        assert_eq!(" ".parse::<Separator>().unwrap(), Separator::Space);
        assert_eq!("\u{200c}".parse::<Separator>().unwrap(), Separator::Zwnj);
        assert_eq!("zwnj".parse::<Separator>().unwrap(), Separator::Zwnj);
        assert!(matches!(
            "-".parse::<Separator>(),
            Err(InflectError::InvalidSeparator(s)) if s == "-"
        ));
    }

    #[test]
    fn gaps_follow_script_and_separator() {
        assert_eq!(
            Gaps::new(Separator::Space, Script::Phonemic),
            Gaps { prefix: "", suffix: "", word: " " }
        );
        assert_eq!(
            Gaps::new(Separator::None, Script::Native),
            Gaps { prefix: "", suffix: ZWNJ, word: ZWNJ }
        );
    }

    #[test]
    fn bare_prefix_leaves_stem() {
        assert_eq!(native(PrefixKind::Bare).apply("رفت", ZWNJ), "رفت");
        assert_eq!(phonemic(PrefixKind::Bare).apply("ʔɒmæd", ""), "ʔɒmæd");
    }

    #[test]
    fn native_continuous_uses_visible_separator() {
        assert_eq!(native(PrefixKind::Continuous).apply("رو", ZWNJ), "می\u{200c}رو");
        assert_eq!(native(PrefixKind::NegativeContinuous).apply("آ", " "), "نمی آ");
    }

    #[test]
    fn native_continuous_without_separator_adjusts_initial_alef() {
        let mi = native(PrefixKind::Continuous);
        assert_eq!(mi.apply("آمد", ""), "میامد");
        assert_eq!(mi.apply("افت", ""), "میفت");
        assert_eq!(mi.apply("رو", ""), "میرو");
    }

    #[test]
    fn native_subjunctive_inserts_glide() {
        let be = native(PrefixKind::Subjunctive);
        assert_eq!(be.apply("آی", ""), "بیای");
        assert_eq!(be.apply("ایست", ""), "بایست");
        assert_eq!(be.apply("افت", ""), "بیفت");
        assert_eq!(be.apply("رو", ""), "برو");
        assert_eq!(native(PrefixKind::Negative).apply("آمد", ""), "نیامد");
    }

    #[test]
    fn phonemic_continuous_resolves_hiatus() {
        let mi = phonemic(PrefixKind::Continuous);
        assert_eq!(mi.apply("ʔɒj", ""), "mijɒj");
        assert_eq!(mi.apply("ɒræm", ""), "mijɒræm");
        assert_eq!(mi.apply("ræv", ""), "miræv");
    }

    #[test]
    fn phonemic_subjunctive_and_negative_resolve_hiatus() {
        assert_eq!(phonemic(PrefixKind::Subjunctive).apply("ʔɒj", ""), "bijɒj");
        assert_eq!(phonemic(PrefixKind::Subjunctive).apply("ræv", ""), "beræv");
        assert_eq!(phonemic(PrefixKind::Negative).apply("ʔoftɒd", ""), "næjoftɒd");
        assert_eq!(phonemic(PrefixKind::Negative).apply("ræft", ""), "næræft");
    }

    #[test]
    fn unknown_prefix_surface_is_rejected() {
        assert_eq!(
            Prefix::parse("می", Script::Native).unwrap().kind(),
            PrefixKind::Continuous
        );
        assert_eq!(
            Prefix::parse("می", Script::Phonemic),
            Err(TableError::UnknownPrefix { surface: "می".into(), script: Script::Phonemic })
        );
    }

    #[test]
    fn vowel_final_present_stems_take_glide() {
        assert_eq!(with_glide("آ", Script::Native), "آی");
        assert_eq!(with_glide("رو", Script::Native), "رو");
        assert_eq!(with_glide("ʔɒ", Script::Phonemic), "ʔɒj");
        assert_eq!(with_glide("ræv", Script::Phonemic), "ræv");
    }

    #[test]
    fn contract_drops_one_grapheme() {
        assert_eq!(contract("bude"), "bud");
        assert_eq!(contract("بوده"), "بود");
        assert_eq!(contract(""), "");
    }
}
