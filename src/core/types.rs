// src/core/types.rs
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    Formal,
    Informal,
}

impl Formality {
    pub const ALL: [Formality; 2] = [Formality::Formal, Formality::Informal];
}

/// Native Persian orthography or the Latin-based phonemic transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Native,
    Phonemic,
}

impl Script {
    pub const ALL: [Script; 2] = [Script::Native, Script::Phonemic];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Affirmative,
    Negative,
}

impl Polarity {
    pub const ALL: [Polarity; 2] = [Polarity::Affirmative, Polarity::Negative];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    Present,
    Past,
    Future,
}

/// Tense-aspect-mood category inside a tense branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Simple,
    Continuous,
    Subjunctive,
    Progressive,
    Perfect,
    PerfectPast,
    PerfectSubjunctive,
    Imperative,
}

/// One of the six person/number slots. Ordering follows the conventional
/// paradigm layout: singular before plural, first person first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Person {
    #[serde(rename = "s1")]
    S1,
    #[serde(rename = "s2")]
    S2,
    #[serde(rename = "s3")]
    S3,
    #[serde(rename = "p1")]
    P1,
    #[serde(rename = "p2")]
    P2,
    #[serde(rename = "p3")]
    P3,
}

impl Person {
    pub const ALL: [Person; 6] = [
        Person::S1,
        Person::S2,
        Person::S3,
        Person::P1,
        Person::P2,
        Person::P3,
    ];

    /// The imperative only exists in the second person.
    pub const IMPERATIVE: [Person; 2] = [Person::S2, Person::P2];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regularity {
    Regular,
    /// Two historically distinct past-stem families (`-d` and `-id`).
    Alternative,
    Irregular,
}

/// The part an auxiliary verb plays in other verbs' compound tenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuxiliaryRole {
    /// "to be": perfect and subjunctive tenses
    Be,
    /// "to have": progressive tenses
    Have,
    /// "to want": future tense
    Want,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transitivity {
    Transitive,
    Intransitive,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LexicalAspect {
    Action,
    Accomplishment,
    Achievement,
    State,
    #[default]
    Unknown,
}

macro_rules! keyed_pair {
    ($name:ident, $key:ident, $first:ident => $a:ident, $second:ident => $b:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
        pub struct $name<T> {
            pub $a: T,
            pub $b: T,
        }

        impl<T> $name<T> {
            pub fn try_map<U, E>(
                self,
                mut f: impl FnMut($key, T) -> Result<U, E>,
            ) -> Result<$name<U>, E> {
                Ok($name {
                    $a: f($key::$first, self.$a)?,
                    $b: f($key::$second, self.$b)?,
                })
            }
        }

        impl<T> Index<$key> for $name<T> {
            type Output = T;

            fn index(&self, key: $key) -> &T {
                match key {
                    $key::$first => &self.$a,
                    $key::$second => &self.$b,
                }
            }
        }

        impl<T> IndexMut<$key> for $name<T> {
            fn index_mut(&mut self, key: $key) -> &mut T {
                match key {
                    $key::$first => &mut self.$a,
                    $key::$second => &mut self.$b,
                }
            }
        }
    };
}

keyed_pair!(ByFormality, Formality, Formal => formal, Informal => informal);
keyed_pair!(ByScript, Script, Native => native, Phonemic => phonemic);
keyed_pair!(ByPolarity, Polarity, Affirmative => affirmative, Negative => negative);

/// A stem field or a surface cell: a single string, or an ordered list of
/// variants when a verb carries two historically valid forms.
///
/// Human-readable formats (JSON) write `One` as a bare string; binary formats
/// always write a sequence so they never need self-describing input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Collapses a variant list: one entry becomes a scalar, none is `None`.
    pub fn from_variants(mut variants: Vec<String>) -> Option<Self> {
        match variants.len() {
            0 => None,
            1 => variants.pop().map(OneOrMany::One),
            _ => Some(OneOrMany::Many(variants)),
        }
    }

    pub fn variants(&self) -> &[String] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    /// An empty scalar marks a stem that was never derived.
    pub fn is_absent(&self) -> bool {
        matches!(self, OneOrMany::One(value) if value.is_empty())
    }
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::One(String::new())
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl Serialize for OneOrMany {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OneOrMany::One(value) if serializer.is_human_readable() => {
                serializer.serialize_str(value)
            }
            _ => self.variants().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for OneOrMany {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }

        if deserializer.is_human_readable() {
            Ok(match Repr::deserialize(deserializer)? {
                Repr::One(value) => OneOrMany::One(value),
                Repr::Many(values) => OneOrMany::Many(values),
            })
        } else {
            let mut values = Vec::<String>::deserialize(deserializer)?;
            Ok(if values.len() == 1 {
                OneOrMany::One(values.remove(0))
            } else {
                OneOrMany::Many(values)
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TenseStems {
    pub present: OneOrMany,
    pub past: OneOrMany,
}

/// The eight stem fields, one per formality × script × tense.
pub type StemTable = ByFormality<ByScript<TenseStems>>;

/// Everything known about one verb: its classification, its stems and,
/// once generated, its full paradigm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbProfile {
    pub citation: String,
    /// `None` when neither derivation pattern matched the input.
    pub regularity: Option<Regularity>,
    pub transitivity: Transitivity,
    pub lexical_aspect: LexicalAspect,
    pub present_dual: bool,
    pub past_dual: bool,
    pub stems: StemTable,
    pub paradigm: Option<Paradigm>,
}

impl VerbProfile {
    pub fn new(citation: &str) -> Self {
        Self {
            citation: citation.to_string(),
            regularity: None,
            transitivity: Transitivity::Unknown,
            lexical_aspect: LexicalAspect::Unknown,
            present_dual: false,
            past_dual: false,
            stems: StemTable::default(),
            paradigm: None,
        }
    }

    pub fn present_stems(&self, formality: Formality, script: Script) -> &[String] {
        self.stems[formality][script].present.variants()
    }

    pub fn past_stems(&self, formality: Formality, script: Script) -> &[String] {
        self.stems[formality][script].past.variants()
    }

    /// A dual flag requires a variant list in every populated field of that
    /// tense, and a list is only allowed under the flag.
    pub fn duals_consistent(&self) -> bool {
        let agrees = |field: &OneOrMany, dual: bool| field.is_absent() || field.is_many() == dual;
        Formality::ALL.iter().all(|&formality| {
            Script::ALL.iter().all(|&script| {
                let stems = &self.stems[formality][script];
                agrees(&stems.present, self.present_dual) && agrees(&stems.past, self.past_dual)
            })
        })
    }
}

/// Person/number cells of one category. The imperative holds only `s2`/`p2`.
pub type Inflection = BTreeMap<Person, OneOrMany>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PresentTenses {
    pub simple: Option<Inflection>,
    pub continuous: Option<Inflection>,
    pub subjunctive: Option<Inflection>,
    pub progressive: Option<Inflection>,
    pub perfect: Option<Inflection>,
    pub perfect_past: Option<Inflection>,
    pub imperative: Option<Inflection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PastTenses {
    pub simple: Option<Inflection>,
    pub continuous: Option<Inflection>,
    pub subjunctive: Option<Inflection>,
    pub progressive: Option<Inflection>,
    pub perfect: Option<Inflection>,
    pub perfect_subjunctive: Option<Inflection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FutureTenses {
    pub simple: Option<Inflection>,
}

/// All tenses of one (formality, script, polarity) coordinate. A tense is
/// `None` when the stems it is built from are missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Branch {
    pub present: Option<PresentTenses>,
    pub past: Option<PastTenses>,
    pub future: Option<FutureTenses>,
}

impl Branch {
    pub fn get(&self, tense: Tense, category: Category) -> Option<&Inflection> {
        match (tense, category) {
            (Tense::Present, category) => {
                let present = self.present.as_ref()?;
                match category {
                    Category::Simple => present.simple.as_ref(),
                    Category::Continuous => present.continuous.as_ref(),
                    Category::Subjunctive => present.subjunctive.as_ref(),
                    Category::Progressive => present.progressive.as_ref(),
                    Category::Perfect => present.perfect.as_ref(),
                    Category::PerfectPast => present.perfect_past.as_ref(),
                    Category::Imperative => present.imperative.as_ref(),
                    Category::PerfectSubjunctive => None,
                }
            }
            (Tense::Past, category) => {
                let past = self.past.as_ref()?;
                match category {
                    Category::Simple => past.simple.as_ref(),
                    Category::Continuous => past.continuous.as_ref(),
                    Category::Subjunctive => past.subjunctive.as_ref(),
                    Category::Progressive => past.progressive.as_ref(),
                    Category::Perfect => past.perfect.as_ref(),
                    Category::PerfectSubjunctive => past.perfect_subjunctive.as_ref(),
                    Category::PerfectPast | Category::Imperative => None,
                }
            }
            (Tense::Future, Category::Simple) => self.future.as_ref()?.simple.as_ref(),
            (Tense::Future, _) => None,
        }
    }

    /// The slot for a category, or `None` when the tense is absent or has no
    /// such category.
    pub fn slot_mut(&mut self, tense: Tense, category: Category) -> Option<&mut Option<Inflection>> {
        match tense {
            Tense::Present => {
                let present = self.present.as_mut()?;
                match category {
                    Category::Simple => Some(&mut present.simple),
                    Category::Continuous => Some(&mut present.continuous),
                    Category::Subjunctive => Some(&mut present.subjunctive),
                    Category::Progressive => Some(&mut present.progressive),
                    Category::Perfect => Some(&mut present.perfect),
                    Category::PerfectPast => Some(&mut present.perfect_past),
                    Category::Imperative => Some(&mut present.imperative),
                    Category::PerfectSubjunctive => None,
                }
            }
            Tense::Past => {
                let past = self.past.as_mut()?;
                match category {
                    Category::Simple => Some(&mut past.simple),
                    Category::Continuous => Some(&mut past.continuous),
                    Category::Subjunctive => Some(&mut past.subjunctive),
                    Category::Progressive => Some(&mut past.progressive),
                    Category::Perfect => Some(&mut past.perfect),
                    Category::PerfectSubjunctive => Some(&mut past.perfect_subjunctive),
                    Category::PerfectPast | Category::Imperative => None,
                }
            }
            Tense::Future => match category {
                Category::Simple => Some(&mut self.future.as_mut()?.simple),
                _ => None,
            },
        }
    }
}

/// formality → script → polarity → tense branch.
pub type Paradigm = ByFormality<ByScript<ByPolarity<Branch>>>;
