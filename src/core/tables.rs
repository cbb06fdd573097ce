// File: src/core/tables.rs
//! Conjugation, auxiliary and irregular-verb tables.
//!
//! The JSON data is compiled into the binary, parsed and validated once on
//! first use, and then shared read-only by every generation call. The
//! auxiliary forms are not stored: they are read off the generated paradigms
//! of the irregular verbs "to be", "to have" and "to want".

use crate::core::builder::Form;
use crate::core::engine::Generator;
use crate::core::phonology::{Prefix, Separator};
use crate::core::types::{
    AuxiliaryRole, ByFormality, ByPolarity, ByScript, Category, Formality, Inflection,
    LexicalAspect, Paradigm, Polarity, Regularity, Script, StemTable, Tense, Transitivity,
    VerbProfile,
};
use crate::error::TableError;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::info;

const CONJUGATIONS_JSON: &str = include_str!("../../data/conjugations.json");
const IRREGULARS_JSON: &str = include_str!("../../data/irregulars.json");

static TABLES: LazyLock<Result<Tables, TableError>> =
    LazyLock::new(|| Tables::from_json(CONJUGATIONS_JSON, IRREGULARS_JSON));

#[derive(Deserialize)]
struct RawPrefixes {
    continuous: String,
    negative: String,
    subjunctive: String,
}

#[derive(Deserialize)]
struct RawSet {
    prefixes: ByPolarity<RawPrefixes>,
    present: Inflection,
    past: Inflection,
    perfect: Inflection,
    imperative: Inflection,
    participle: String,
    auxiliary_participle: String,
}

#[derive(Deserialize)]
struct RawIrregular {
    citation: String,
    #[serde(default)]
    auxiliary: Option<AuxiliaryRole>,
    #[serde(default)]
    transitivity: Transitivity,
    #[serde(default)]
    lexical_aspect: LexicalAspect,
    present_dual: bool,
    past_dual: bool,
    stems: StemTable,
    #[serde(default)]
    overrides: Vec<Override>,
}

/// The negative, continuous and subjunctive prefixes of one polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefixes {
    pub continuous: Prefix,
    pub negative: Prefix,
    pub subjunctive: Prefix,
}

/// Conjugated forms of "to be", "to have" and "to want" that other verbs'
/// compound tenses are built on, taken from the affirmative branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auxiliaries {
    /// "to be", past simple
    pub perfect: Form,
    /// "to be", present subjunctive
    pub subjunctive: Form,
    /// "to have", present simple
    pub progressive_present: Form,
    /// "to have", past simple
    pub progressive_past: Form,
    /// "to want", present simple
    pub future: Form,
}

impl Auxiliaries {
    /// Stand-in used while the auxiliary verbs themselves are generated.
    /// Their simple tenses never consult it.
    fn unresolved() -> Self {
        let blank = Form::uniform("");
        Self {
            perfect: blank.clone(),
            subjunctive: blank.clone(),
            progressive_present: blank.clone(),
            progressive_past: blank.clone(),
            future: blank,
        }
    }
}

/// Everything the generator needs for one (formality, script) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConjugationSet {
    pub prefixes: ByPolarity<Prefixes>,
    pub present: Form,
    pub past: Form,
    pub perfect: Form,
    pub imperative: Form,
    pub participle: String,
    pub auxiliary_participle: String,
    pub auxiliaries: Auxiliaries,
}

pub type ConjugationTable = ByFormality<ByScript<ConjugationSet>>;

/// Replacement cells for one coordinate of an irregular verb's paradigm.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Override {
    pub formality: Formality,
    pub script: Script,
    pub polarity: Polarity,
    pub tense: Tense,
    pub category: Category,
    pub cells: Inflection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrregularEntry {
    pub profile: VerbProfile,
    /// Auxiliaries carry a paradigm generated at load time.
    pub auxiliary: Option<AuxiliaryRole>,
    pub overrides: Vec<Override>,
}

#[derive(Debug)]
pub struct Tables {
    conjugations: ConjugationTable,
    irregulars: Vec<IrregularEntry>,
    index: HashMap<String, usize>,
}

impl Tables {
    /// The process-wide tables built from the bundled data.
    pub fn global() -> Result<&'static Tables, TableError> {
        TABLES.as_ref().map_err(Clone::clone)
    }

    pub fn from_json(conjugations: &str, irregulars: &str) -> Result<Self, TableError> {
        let raw: ByFormality<ByScript<RawSet>> =
            serde_json::from_str(conjugations).map_err(|e| TableError::Parse {
                table: "conjugation",
                message: e.to_string(),
            })?;
        let mut conjugations = raw.try_map(|formality, scripts| {
            scripts.try_map(|script, set| freeze_set(set, formality, script))
        })?;

        let raw: Vec<RawIrregular> =
            serde_json::from_str(irregulars).map_err(|e| TableError::Parse {
                table: "irregular verb",
                message: e.to_string(),
            })?;
        let mut entries = Vec::with_capacity(raw.len());
        for raw in raw {
            let entry = IrregularEntry {
                profile: VerbProfile {
                    citation: raw.citation,
                    regularity: Some(Regularity::Irregular),
                    transitivity: raw.transitivity,
                    lexical_aspect: raw.lexical_aspect,
                    present_dual: raw.present_dual,
                    past_dual: raw.past_dual,
                    stems: raw.stems,
                    paradigm: None,
                },
                auxiliary: raw.auxiliary,
                overrides: raw.overrides,
            };
            if !entry.profile.duals_consistent() {
                return Err(TableError::DualMismatch {
                    verb: entry.profile.citation,
                });
            }
            entries.push(entry);
        }

        let auxiliaries = resolve_auxiliaries(&conjugations, &entries)?;
        for formality in Formality::ALL {
            for script in Script::ALL {
                conjugations[formality][script].auxiliaries = auxiliaries[formality][script].clone();
            }
        }
        let generator = Generator::new(&conjugations, Separator::default());
        for entry in entries.iter_mut().filter(|e| e.auxiliary.is_some()) {
            entry.profile = generator.inflect_irregular(entry);
        }

        let index = build_index(&entries);
        info!(
            irregulars = entries.len(),
            keys = index.len(),
            "conjugation and irregular-verb tables loaded"
        );
        Ok(Self {
            conjugations,
            irregulars: entries,
            index,
        })
    }

    pub fn conjugations(&self) -> &ConjugationTable {
        &self.conjugations
    }

    pub fn irregulars(&self) -> &[IrregularEntry] {
        &self.irregulars
    }

    /// Finds the irregular verb whose citation form or native stem (any
    /// variant of a dual stem) is `word`. Earlier entries win.
    pub fn lookup(&self, word: &str) -> Option<&IrregularEntry> {
        self.index.get(word).map(|&i| &self.irregulars[i])
    }
}

fn build_index(entries: &[IrregularEntry]) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (i, entry) in entries.iter().enumerate() {
        let profile = &entry.profile;
        let stems = Formality::ALL.into_iter().flat_map(move |formality| {
            let native = &profile.stems[formality][Script::Native];
            native.present.variants().iter().chain(native.past.variants())
        });
        for key in std::iter::once(&profile.citation).chain(stems) {
            if !key.is_empty() {
                index.entry(key.clone()).or_insert(i);
            }
        }
    }
    index
}

fn freeze_set(raw: RawSet, formality: Formality, script: Script) -> Result<ConjugationSet, TableError> {
    let label = |name: &str| format!("{formality:?}/{script:?} {name}");
    let form = |name: &str, cells: &Inflection| Form::from_inflection(&label(name), cells);
    let prefixes = raw.prefixes.try_map(|_, p| {
        Ok::<_, TableError>(Prefixes {
            continuous: Prefix::parse(&p.continuous, script)?,
            negative: Prefix::parse(&p.negative, script)?,
            subjunctive: Prefix::parse(&p.subjunctive, script)?,
        })
    })?;
    Ok(ConjugationSet {
        prefixes,
        present: form("present", &raw.present)?,
        past: form("past", &raw.past)?,
        perfect: form("perfect", &raw.perfect)?,
        imperative: form("imperative", &raw.imperative)?,
        participle: raw.participle,
        auxiliary_participle: raw.auxiliary_participle,
        auxiliaries: Auxiliaries::unresolved(),
    })
}

/// Generates "to be", "to have" and "to want" against a table without
/// auxiliaries and reads the auxiliary forms off their affirmative branches.
/// Only simple and subjunctive tenses are read and none of them use an
/// auxiliary, so one pass is enough.
fn resolve_auxiliaries(
    conjugations: &ConjugationTable,
    entries: &[IrregularEntry],
) -> Result<ByFormality<ByScript<Auxiliaries>>, TableError> {
    let generator = Generator::new(conjugations, Separator::default());
    let paradigm = |role: AuxiliaryRole| -> Result<Paradigm, TableError> {
        entries
            .iter()
            .find(|e| e.auxiliary == Some(role))
            .and_then(|e| generator.inflect_irregular(e).paradigm)
            .ok_or(TableError::MissingAuxiliary { role })
    };
    let be = paradigm(AuxiliaryRole::Be)?;
    let have = paradigm(AuxiliaryRole::Have)?;
    let want = paradigm(AuxiliaryRole::Want)?;

    ByFormality::<ByScript<()>>::default().try_map(|formality, scripts| {
        scripts.try_map(|script, ()| -> Result<Auxiliaries, TableError> {
            let pick = |role: AuxiliaryRole,
                        source: &Paradigm,
                        tense: Tense,
                        category: Category|
             -> Result<Form, TableError> {
                let cells = source[formality][script][Polarity::Affirmative]
                    .get(tense, category)
                    .ok_or(TableError::MissingAuxiliary { role })?;
                Form::from_inflection(&format!("{formality:?}/{script:?} {role:?} auxiliary"), cells)
            };
            Ok(Auxiliaries {
                perfect: pick(AuxiliaryRole::Be, &be, Tense::Past, Category::Simple)?,
                subjunctive: pick(AuxiliaryRole::Be, &be, Tense::Present, Category::Subjunctive)?,
                progressive_present: pick(AuxiliaryRole::Have, &have, Tense::Present, Category::Simple)?,
                progressive_past: pick(AuxiliaryRole::Have, &have, Tense::Past, Category::Simple)?,
                future: pick(AuxiliaryRole::Want, &want, Tense::Present, Category::Simple)?,
            })
        })
    })
}
