// File: src/core/stems.rs
//! Stem resolution: irregular lookup first, then derivation of the eight stem
//! fields from the citation word and its optional phonemic transcription.

use crate::core::tables::{IrregularEntry, Tables};
use crate::core::types::{
    Formality, LexicalAspect, OneOrMany, Regularity, Script, TenseStems, Transitivity, VerbProfile,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

// The patterns are literals; failing to compile them is a programming error.
static NATIVE_ALTERNATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w{2,}ان)ی?د?ن?$").expect("valid native alternative pattern"));
static NATIVE_REGULAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)(?:یدن?)?$").expect("valid native regular pattern"));
static PHONEMIC_ALTERNATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+[ɒuiæeo]?[bpfvtdszʃʒʤʧcɈxGhʔmnrlj]{1,3}ɒn)i?d?(?:æn)?$")
        .expect("valid phonemic alternative pattern")
});
static PHONEMIC_REGULAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)(?:id(?:æn)?)?$").expect("valid phonemic regular pattern"));

/// How a word was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'t> {
    /// A listed irregular verb, returned without derivation.
    Irregular(&'t IrregularEntry),
    Derived(VerbProfile),
}

/// Stems derived for one script.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Derivation {
    regularity: Regularity,
    formal: TenseStems,
    informal: TenseStems,
}

/// Script-specific spelling of the derivation rules.
struct Rules {
    alternative: &'static LazyLock<Regex>,
    regular: &'static LazyLock<Regex>,
    /// Formal present ending of an Alternative stem and its informal form.
    long_ending: &'static str,
    short_ending: &'static str,
    short_past: &'static str,
    long_past: &'static str,
    vowels: &'static str,
    /// Past suffix after a vowel-final Regular stem.
    hiatus_past: &'static str,
}

static NATIVE: Rules = Rules {
    alternative: &NATIVE_ALTERNATIVE,
    regular: &NATIVE_REGULAR,
    long_ending: "ان",
    short_ending: "ون",
    short_past: "د",
    long_past: "ید",
    vowels: "اوی",
    hiatus_past: "ئید",
};

static PHONEMIC: Rules = Rules {
    alternative: &PHONEMIC_ALTERNATIVE,
    regular: &PHONEMIC_REGULAR,
    long_ending: "ɒn",
    short_ending: "un",
    short_past: "d",
    long_past: "id",
    vowels: "æɒouie",
    hiatus_past: "ʔid",
};

impl Rules {
    fn for_script(script: Script) -> &'static Rules {
        match script {
            Script::Native => &NATIVE,
            Script::Phonemic => &PHONEMIC,
        }
    }

    fn capture<'w>(pattern: &Regex, word: &'w str) -> Option<&'w str> {
        pattern
            .captures(word)
            .and_then(|caps| caps.get(1))
            .map(|stem| stem.as_str())
    }

    fn dual_past(&self, present: &str) -> OneOrMany {
        OneOrMany::Many(vec![
            format!("{present}{}", self.short_past),
            format!("{present}{}", self.long_past),
        ])
    }

    fn derive(&self, word: &str) -> Option<Derivation> {
        if let Some(stem) = Self::capture(self.alternative, word) {
            let root = stem.strip_suffix(self.long_ending).unwrap_or(stem);
            let informal = format!("{root}{}", self.short_ending);
            return Some(Derivation {
                regularity: Regularity::Alternative,
                formal: TenseStems {
                    present: OneOrMany::from(stem),
                    past: self.dual_past(stem),
                },
                informal: TenseStems {
                    past: self.dual_past(&informal),
                    present: OneOrMany::One(informal),
                },
            });
        }
        let stem = Self::capture(self.regular, word)?;
        let suffix = match stem.chars().last() {
            Some(last) if self.vowels.contains(last) => self.hiatus_past,
            _ => self.long_past,
        };
        let stems = TenseStems {
            present: OneOrMany::from(stem),
            past: OneOrMany::One(format!("{stem}{suffix}")),
        };
        Some(Derivation {
            regularity: Regularity::Regular,
            formal: stems.clone(),
            informal: stems,
        })
    }
}

/// Looks `word` up among the irregular verbs, or derives a stem-only profile.
pub fn resolve<'t>(tables: &'t Tables, word: &str, phonemic: Option<&str>) -> Resolved<'t> {
    if let Some(entry) = tables.lookup(word) {
        return Resolved::Irregular(entry);
    }
    Resolved::Derived(derive(word, phonemic))
}

/// Derives the stems of a non-irregular verb. Unmatched input leaves the
/// stems of that script empty.
pub fn derive(word: &str, phonemic: Option<&str>) -> VerbProfile {
    let mut profile = VerbProfile::new(word);
    match Rules::for_script(Script::Native).derive(word) {
        Some(native) => fill(&mut profile, Script::Native, native),
        None => warn!(word, "no native derivation pattern matched"),
    }

    if let Some(transcription) = phonemic.filter(|p| !p.is_empty()) {
        match Rules::for_script(Script::Phonemic).derive(transcription) {
            Some(derived)
                if profile.regularity.is_some_and(|r| r != derived.regularity) =>
            {
                warn!(
                    word,
                    transcription,
                    native = ?profile.regularity,
                    phonemic = ?derived.regularity,
                    "phonemic form classifies differently from the native word; phonemic stems left empty"
                );
            }
            Some(derived) => fill(&mut profile, Script::Phonemic, derived),
            None => warn!(word, transcription, "no phonemic derivation pattern matched"),
        }
    }
    debug!(word, regularity = ?profile.regularity, "stems derived");
    profile
}

fn fill(profile: &mut VerbProfile, script: Script, derivation: Derivation) {
    if derivation.regularity == Regularity::Alternative {
        profile.transitivity = Transitivity::Transitive;
        profile.lexical_aspect = LexicalAspect::Action;
        profile.past_dual = true;
    }
    profile.regularity = Some(derivation.regularity);
    profile.stems[Formality::Formal][script] = derivation.formal;
    profile.stems[Formality::Informal][script] = derivation.informal;
}
