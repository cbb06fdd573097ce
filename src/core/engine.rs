// File: src/core/engine.rs
use crate::compose;
use crate::core::builder::{accumulate, Form};
use crate::core::phonology::{contract, with_glide, Gaps, Separator};
use crate::core::stems::{resolve, Resolved};
use crate::core::tables::{ConjugationTable, IrregularEntry, Override, Tables};
use crate::core::types::{
    Branch, Formality, FutureTenses, Inflection, Paradigm, PastTenses, Person, Polarity,
    PresentTenses, Script, VerbProfile,
};
use crate::error::Result;
use crate::validation::validate_phonemic;
use tracing::{debug, trace, warn};

/// Builds the full paradigm of a verb: every combination of formality,
/// script and polarity, each with its present, past and future tenses.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'t> {
    conjugations: &'t ConjugationTable,
    separator: Separator,
}

/// Present-tense categories while stem variants are still being added.
#[derive(Default)]
struct PresentForms {
    simple: Option<Form>,
    continuous: Option<Form>,
    subjunctive: Option<Form>,
    progressive: Option<Form>,
    perfect: Option<Form>,
    perfect_past: Option<Form>,
    imperative: Option<Form>,
}

impl PresentForms {
    fn finish(self) -> PresentTenses {
        PresentTenses {
            simple: collapse(self.simple, &Person::ALL),
            continuous: collapse(self.continuous, &Person::ALL),
            subjunctive: collapse(self.subjunctive, &Person::ALL),
            progressive: collapse(self.progressive, &Person::ALL),
            perfect: collapse(self.perfect, &Person::ALL),
            perfect_past: collapse(self.perfect_past, &Person::ALL),
            imperative: collapse(self.imperative, &Person::IMPERATIVE),
        }
    }
}

#[derive(Default)]
struct PastForms {
    simple: Option<Form>,
    continuous: Option<Form>,
    subjunctive: Option<Form>,
    progressive: Option<Form>,
    perfect: Option<Form>,
    perfect_subjunctive: Option<Form>,
}

impl PastForms {
    fn finish(self) -> PastTenses {
        PastTenses {
            simple: collapse(self.simple, &Person::ALL),
            continuous: collapse(self.continuous, &Person::ALL),
            subjunctive: collapse(self.subjunctive, &Person::ALL),
            progressive: collapse(self.progressive, &Person::ALL),
            perfect: collapse(self.perfect, &Person::ALL),
            perfect_subjunctive: collapse(self.perfect_subjunctive, &Person::ALL),
        }
    }
}

fn collapse(form: Option<Form>, persons: &[Person]) -> Option<Inflection> {
    form.map(|form| form.to_inflection(persons))
}

impl<'t> Generator<'t> {
    pub fn new(conjugations: &'t ConjugationTable, separator: Separator) -> Self {
        Self {
            conjugations,
            separator,
        }
    }

    /// Attaches the paradigm to `profile`. A profile that already carries one
    /// is returned unchanged.
    pub fn inflect(&self, mut profile: VerbProfile) -> VerbProfile {
        if profile.paradigm.is_some() {
            return profile;
        }
        profile.paradigm = Some(self.paradigm(&profile));
        profile
    }

    /// Generates an irregular verb's paradigm and applies its overrides.
    /// Entries whose paradigm was generated at load time come back as-is.
    pub fn inflect_irregular(&self, entry: &IrregularEntry) -> VerbProfile {
        if entry.profile.paradigm.is_some() {
            return entry.profile.clone();
        }
        let mut paradigm = self.paradigm(&entry.profile);
        apply_overrides(&mut paradigm, &entry.overrides);
        VerbProfile {
            paradigm: Some(paradigm),
            ..entry.profile.clone()
        }
    }

    pub fn paradigm(&self, profile: &VerbProfile) -> Paradigm {
        let mut paradigm = Paradigm::default();
        for formality in Formality::ALL {
            for script in Script::ALL {
                for polarity in Polarity::ALL {
                    paradigm[formality][script][polarity] =
                        self.branch(profile, formality, script, polarity);
                }
            }
        }
        paradigm
    }

    fn branch(
        &self,
        profile: &VerbProfile,
        formality: Formality,
        script: Script,
        polarity: Polarity,
    ) -> Branch {
        let set = &self.conjugations[formality][script];
        let aux = &set.auxiliaries;
        let prefixes = set.prefixes[polarity];
        let gaps = Gaps::new(self.separator, script);
        let affirmative = polarity == Polarity::Affirmative;

        let mut present = PresentForms::default();
        let mut present_missing = false;
        for stem in profile.present_stems(formality, script) {
            if stem.is_empty() {
                present_missing = true;
                break;
            }
            let stem = with_glide(stem, script);
            let simple_stem = prefixes.negative.apply(&stem, gaps.prefix);
            let subjunctive_stem = prefixes.subjunctive.apply(&stem, gaps.prefix);
            let continuous_stem = prefixes.continuous.apply(&stem, gaps.prefix);

            let simple = compose!(&simple_stem, &set.present);
            // Informal native speech uses the present simple as its present perfect.
            if (formality, script) == (Formality::Informal, Script::Native) {
                accumulate(&mut present.perfect, simple.clone());
            }
            accumulate(&mut present.simple, simple);
            accumulate(&mut present.subjunctive, compose!(&subjunctive_stem, &set.present));
            accumulate(&mut present.imperative, compose!(&subjunctive_stem, &set.imperative));
            let continuous = compose!(&continuous_stem, &set.present);
            if affirmative {
                accumulate(
                    &mut present.progressive,
                    compose!(&aux.progressive_present, gaps.word, &continuous),
                );
            }
            accumulate(&mut present.continuous, continuous);
        }

        let mut past = PastForms::default();
        let mut future = None;
        let mut past_missing = false;
        for stem in profile.past_stems(formality, script) {
            if stem.is_empty() {
                past_missing = true;
                break;
            }
            let simple_stem = prefixes.negative.apply(stem, gaps.prefix);
            let continuous_stem = prefixes.continuous.apply(stem, gaps.prefix);
            let participle = format!("{simple_stem}{}", set.participle);

            accumulate(&mut past.simple, compose!(&simple_stem, &set.past));
            accumulate(&mut past.subjunctive, compose!(&participle, gaps.word, &aux.subjunctive));
            accumulate(
                &mut past.perfect_subjunctive,
                compose!(
                    &participle,
                    gaps.word,
                    &set.auxiliary_participle,
                    gaps.word,
                    &aux.subjunctive
                ),
            );
            let continuous = compose!(&continuous_stem, &set.past);
            if affirmative {
                accumulate(
                    &mut past.progressive,
                    compose!(&aux.progressive_past, gaps.word, &continuous),
                );
            }
            accumulate(&mut past.continuous, continuous);
            let perfect = compose!(&participle, gaps.word, &aux.perfect);

            match (formality, script) {
                (Formality::Formal, _) => {
                    accumulate(
                        &mut present.perfect_past,
                        compose!(
                            &participle,
                            gaps.word,
                            &set.auxiliary_participle,
                            gaps.suffix,
                            &set.perfect
                        ),
                    );
                    accumulate(&mut present.perfect, compose!(&participle, gaps.suffix, &set.perfect));
                    accumulate(
                        &mut future,
                        compose!(prefixes.negative.surface(), &aux.future, gaps.word, stem),
                    );
                }
                (Formality::Informal, Script::Native) => {
                    accumulate(&mut present.perfect_past, perfect.clone());
                }
                (Formality::Informal, Script::Phonemic) => {
                    accumulate(
                        &mut present.perfect_past,
                        compose!(
                            &participle,
                            gaps.word,
                            contract(&set.auxiliary_participle),
                            gaps.suffix,
                            &set.perfect
                        ),
                    );
                    accumulate(&mut present.perfect, compose!(&participle, gaps.suffix, &set.perfect));
                }
            }
            accumulate(&mut past.perfect, perfect);
        }

        trace!(
            verb = %profile.citation,
            ?formality,
            ?script,
            ?polarity,
            present_missing,
            past_missing,
            "branch generated"
        );
        Branch {
            present: (!present_missing).then(|| present.finish()),
            past: (!past_missing).then(|| past.finish()),
            future: (!past_missing).then(|| FutureTenses {
                simple: collapse(future, &Person::ALL),
            }),
        }
    }
}

fn apply_overrides(paradigm: &mut Paradigm, overrides: &[Override]) {
    for o in overrides {
        let branch = &mut paradigm[o.formality][o.script][o.polarity];
        match branch.slot_mut(o.tense, o.category) {
            Some(slot) => *slot = Some(o.cells.clone()),
            None => warn!(
                formality = ?o.formality,
                script = ?o.script,
                tense = ?o.tense,
                category = ?o.category,
                "override targets a tense that was not generated"
            ),
        }
    }
}

/// Resolves `word` (and its optional phonemic transcription) to a verb and
/// generates its paradigm with the bundled tables.
pub fn profile(word: &str, phonemic: Option<&str>, separator: Separator) -> Result<VerbProfile> {
    profile_with(Tables::global()?, word, phonemic, separator)
}

pub fn profile_with(
    tables: &Tables,
    word: &str,
    phonemic: Option<&str>,
    separator: Separator,
) -> Result<VerbProfile> {
    if let Some(phonemic) = phonemic {
        validate_phonemic(phonemic)?;
    }
    let generator = Generator::new(tables.conjugations(), separator);
    Ok(match resolve(tables, word, phonemic) {
        Resolved::Irregular(entry) => {
            debug!(word, citation = %entry.profile.citation, "irregular verb");
            generator.inflect_irregular(entry)
        }
        Resolved::Derived(profile) => generator.inflect(profile),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::phonology::ZWNJ;
    use crate::core::types::{Category, OneOrMany, Tense};
    use pretty_assertions::assert_eq;

    fn cell(
        verb: &VerbProfile,
        (formality, script, polarity): (Formality, Script, Polarity),
        tense: Tense,
        category: Category,
        person: Person,
    ) -> OneOrMany {
        verb.paradigm.as_ref().unwrap()[formality][script][polarity]
            .get(tense, category)
            .unwrap()[&person]
            .clone()
    }

    const FORMAL_NATIVE: (Formality, Script, Polarity) =
        (Formality::Formal, Script::Native, Polarity::Affirmative);

    #[test]
    fn regular_present_simple_juxtaposes_stem_and_ending() {
        let verb = profile("رقص", Some("ræGs"), Separator::Zwnj).unwrap();
        assert_eq!(
            cell(&verb, FORMAL_NATIVE, Tense::Present, Category::Simple, Person::S1),
            OneOrMany::from("رقصم")
        );
        assert_eq!(
            cell(&verb, FORMAL_NATIVE, Tense::Past, Category::Simple, Person::S3),
            OneOrMany::from("رقصید")
        );
    }

    #[test]
    fn negative_continuous_uses_separator() {
        let verb = profile("رقص", None, Separator::Zwnj).unwrap();
        let negative = (Formality::Formal, Script::Native, Polarity::Negative);
        assert_eq!(
            cell(&verb, negative, Tense::Present, Category::Continuous, Person::S1),
            OneOrMany::One(format!("نمی{ZWNJ}رقصم"))
        );
        assert_eq!(
            cell(&verb, negative, Tense::Present, Category::Simple, Person::S1),
            OneOrMany::from("نرقصم")
        );
    }

    #[test]
    fn formal_future_negates_the_auxiliary_only() {
        let verb = profile("رفتن", Some("ræftæn"), Separator::Space).unwrap();
        let negative = (Formality::Formal, Script::Phonemic, Polarity::Negative);
        assert_eq!(
            cell(&verb, negative, Tense::Future, Category::Simple, Person::S1),
            OneOrMany::from("næxɒhæm ræft")
        );
        assert_eq!(
            cell(&verb, FORMAL_NATIVE, Tense::Future, Category::Simple, Person::P3),
            OneOrMany::from("خواهند رفت")
        );
    }

    #[test]
    fn informal_has_no_future() {
        let verb = profile("رفتن", None, Separator::Zwnj).unwrap();
        let branch = &verb.paradigm.as_ref().unwrap()[Formality::Informal][Script::Native]
            [Polarity::Affirmative];
        assert_eq!(branch.future, Some(FutureTenses { simple: None }));
    }

    #[test]
    fn progressive_is_affirmative_only() {
        let verb = profile("رفتن", None, Separator::Zwnj).unwrap();
        let paradigm = verb.paradigm.as_ref().unwrap();
        let negative = &paradigm[Formality::Formal][Script::Native][Polarity::Negative];
        assert!(negative.get(Tense::Present, Category::Progressive).is_none());
        assert!(negative.get(Tense::Past, Category::Progressive).is_none());
        assert_eq!(
            cell(&verb, FORMAL_NATIVE, Tense::Present, Category::Progressive, Person::S1),
            OneOrMany::One(format!("دارم{ZWNJ}می{ZWNJ}روم"))
        );
    }

    #[test]
    fn perfect_tenses_build_on_the_participle() {
        let verb = profile("رفتن", Some("ræftæn"), Separator::Space).unwrap();
        assert_eq!(
            cell(&verb, FORMAL_NATIVE, Tense::Present, Category::Perfect, Person::S1),
            OneOrMany::from("رفته ام")
        );
        assert_eq!(
            cell(&verb, FORMAL_NATIVE, Tense::Past, Category::Perfect, Person::S1),
            OneOrMany::from("رفته بودم")
        );
        assert_eq!(
            cell(&verb, FORMAL_NATIVE, Tense::Past, Category::PerfectSubjunctive, Person::S1),
            OneOrMany::from("رفته بوده باشم")
        );
        let informal_phonemic = (Formality::Informal, Script::Phonemic, Polarity::Affirmative);
        assert_eq!(
            cell(&verb, informal_phonemic, Tense::Present, Category::PerfectPast, Person::S1),
            OneOrMany::from("ræfte budæm")
        );
    }

    #[test]
    fn informal_native_present_perfect_is_the_present_simple() {
        let verb = profile("رساندن", Some("resɒndæn"), Separator::Zwnj).unwrap();
        let paradigm = verb.paradigm.as_ref().unwrap();
        for polarity in Polarity::ALL {
            let branch = &paradigm[Formality::Informal][Script::Native][polarity];
            assert_eq!(
                branch.get(Tense::Present, Category::Perfect),
                branch.get(Tense::Present, Category::Simple)
            );
        }
        let informal_phonemic = (Formality::Informal, Script::Phonemic, Polarity::Affirmative);
        assert_eq!(
            cell(&verb, informal_phonemic, Tense::Present, Category::Perfect, Person::S1),
            OneOrMany::Many(vec!["resundeæm".into(), "resunideæm".into()])
        );
    }

    #[test]
    fn imperative_has_second_person_only() {
        let verb = profile("رفتن", None, Separator::Zwnj).unwrap();
        let imperative = verb.paradigm.as_ref().unwrap()[Formality::Formal][Script::Native]
            [Polarity::Affirmative]
            .get(Tense::Present, Category::Imperative)
            .unwrap()
            .clone();
        assert_eq!(imperative.keys().copied().collect::<Vec<_>>(), vec![Person::S2, Person::P2]);
        assert_eq!(imperative[&Person::S2], OneOrMany::from("برو"));
        assert_eq!(imperative[&Person::P2], OneOrMany::from("بروید"));
    }

    #[test]
    fn inflect_is_idempotent() {
        let tables = Tables::global().unwrap();
        let generator = Generator::new(tables.conjugations(), Separator::Zwnj);
        let mut seed = VerbProfile::new("رقص");
        seed.stems.formal.native.present = "رقص".into();
        seed.stems.formal.native.past = "رقصید".into();
        let once = generator.inflect(seed);
        let twice = generator.inflect(once.clone());
        assert_eq!(once, twice);
        let other = Generator::new(tables.conjugations(), Separator::Space);
        assert_eq!(other.inflect(once.clone()), once);
    }

    #[test]
    fn missing_stems_null_every_tense_of_that_script() {
        let verb = profile("رقص", None, Separator::Zwnj).unwrap();
        let paradigm = verb.paradigm.as_ref().unwrap();
        for formality in Formality::ALL {
            for polarity in Polarity::ALL {
                assert_eq!(paradigm[formality][Script::Phonemic][polarity], Branch::default());
            }
        }
    }

    #[test]
    fn bad_phonemic_letter_aborts_before_generation() {
        assert!(matches!(
            profile("رقص", Some("raqs"), Separator::Zwnj),
            Err(crate::error::InflectError::InvalidPhonemic { letter: 'a' })
        ));
    }
}
