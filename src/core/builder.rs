// File: src/core/builder.rs
//! Composes constant segments and person/number forms into six-cell forms.
//!
//! Every cell of a [`Form`] is a non-empty ordered list of surface variants.
//! [`build`] takes the Cartesian product of the variants of every form part,
//! keeping constant segments in place, so a dual stem or a dual auxiliary
//! surfaces as several variants of the same cell. Lists only collapse to a
//! scalar at the output boundary ([`Form::to_inflection`]).

use crate::core::types::{Inflection, OneOrMany, Person};
use crate::error::TableError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    cells: [Vec<String>; 6],
}

impl Form {
    /// The same text in all six cells.
    pub fn uniform(text: &str) -> Self {
        Self {
            cells: Person::ALL.map(|_| vec![text.to_string()]),
        }
    }

    /// Reads a six-cell table; every person must be present with at least one
    /// variant.
    pub fn from_inflection(table: &str, cells: &Inflection) -> Result<Self, TableError> {
        let mut form = Form::uniform("");
        for person in Person::ALL {
            let value = cells.get(&person).ok_or_else(|| TableError::MissingCell {
                table: table.to_string(),
                person,
            })?;
            if value.variants().is_empty() {
                return Err(TableError::EmptyCell {
                    table: table.to_string(),
                    person,
                });
            }
            form.cells[person.index()] = value.variants().to_vec();
        }
        Ok(form)
    }

    pub fn cell(&self, person: Person) -> &[String] {
        &self.cells[person.index()]
    }

    /// Appends the variants of `other` cell by cell.
    pub fn extend(&mut self, other: Form) {
        for (cell, variants) in self.cells.iter_mut().zip(other.cells) {
            cell.extend(variants);
        }
    }

    /// Restricts the form to `persons` and collapses single-variant cells.
    pub fn to_inflection(&self, persons: &[Person]) -> Inflection {
        persons
            .iter()
            .filter_map(|&person| {
                OneOrMany::from_variants(self.cell(person).to_vec()).map(|value| (person, value))
            })
            .collect()
    }
}

/// One argument to [`build`].
#[derive(Debug, Clone, Copy)]
pub enum Part<'a> {
    Text(&'a str),
    Cells(&'a Form),
}

impl<'a> From<&'a str> for Part<'a> {
    fn from(text: &'a str) -> Self {
        Part::Text(text)
    }
}

impl<'a> From<&'a String> for Part<'a> {
    fn from(text: &'a String) -> Self {
        Part::Text(text)
    }
}

impl<'a> From<&'a Form> for Part<'a> {
    fn from(form: &'a Form) -> Self {
        Part::Cells(form)
    }
}

pub fn build(parts: &[Part<'_>]) -> Form {
    let cells = Person::ALL.map(|person| {
        parts.iter().fold(vec![String::new()], |heads, part| match part {
            Part::Text(text) => heads
                .into_iter()
                .map(|mut head| {
                    head.push_str(text);
                    head
                })
                .collect(),
            Part::Cells(form) => heads
                .iter()
                .flat_map(|head| {
                    form.cell(person)
                        .iter()
                        .map(move |variant| format!("{head}{variant}"))
                })
                .collect(),
        })
    });
    Form { cells }
}

/// `compose!(stem, gaps.word, &aux)` builds a [`Form`] from any mix of string
/// and form parts.
#[macro_export]
macro_rules! compose {
    ($($part:expr),+ $(,)?) => {
        $crate::core::builder::build(&[$($crate::core::builder::Part::from($part)),+])
    };
}

/// Adds a form to an accumulating category, merging variants cell by cell.
pub fn accumulate(slot: &mut Option<Form>, form: Form) {
    match slot {
        Some(existing) => existing.extend(form),
        None => *slot = Some(form),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn endings(values: [&str; 6]) -> Form {
        let cells: Inflection = Person::ALL
            .into_iter()
            .zip(values)
            .map(|(person, value)| (person, OneOrMany::from(value)))
            .collect();
        Form::from_inflection("test", &cells).unwrap()
    }

    #[test]
    fn constants_and_cells_interleave_in_order() {
        let suffixes = endings(["æm", "i", "æd", "im", "id", "ænd"]);
        let form = crate::compose!("mi", "ræv", &suffixes);
        assert_eq!(form.cell(Person::S1), ["mirævæm"]);
        assert_eq!(form.cell(Person::P3), ["mirævænd"]);
    }

    #[test]
    fn list_cells_expand_as_cartesian_product() {
        let mut first = Form::uniform("a");
        first.extend(Form::uniform("b"));
        let mut second = Form::uniform("x");
        second.extend(Form::uniform("y"));
        let form = build(&[Part::from(&first), Part::from("-"), Part::from(&second)]);
        assert_eq!(form.cell(Person::S2), ["a-x", "a-y", "b-x", "b-y"]);
    }

    #[test]
    fn single_variant_collapses_to_scalar() {
        let form = crate::compose!("x", &Form::uniform("y"));
        let cells = form.to_inflection(&Person::ALL);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[&Person::S1], OneOrMany::One("xy".into()));
    }

    #[test]
    fn accumulated_variants_stay_in_order_without_dedup() {
        let mut slot = None;
        accumulate(&mut slot, Form::uniform("d"));
        accumulate(&mut slot, Form::uniform("id"));
        accumulate(&mut slot, Form::uniform("d"));
        let cells = slot.unwrap().to_inflection(&Person::IMPERATIVE);
        assert_eq!(cells.len(), 2);
        assert_eq!(
            cells[&Person::P2],
            OneOrMany::Many(vec!["d".into(), "id".into(), "d".into()])
        );
    }

    #[test]
    fn missing_person_is_a_table_error() {
        let mut cells = Inflection::new();
        cells.insert(Person::S1, OneOrMany::from("م"));
        assert_eq!(
            Form::from_inflection("present", &cells),
            Err(TableError::MissingCell { table: "present".into(), person: Person::S2 })
        );
    }
}
