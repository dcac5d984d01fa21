//! Guesses and the guess codec
//!
//! Raw player input arrives as a [`GuessInput`], which states explicitly
//! whether it is one flat run of values or already split into sections.
//! [`GuessCodec`] checks input against a [`GuessTable`] and turns accepted
//! input into an immutable [`Guess`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::GuessTable;
use crate::value::Value;

/// Why a guess does not fit a table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuessRejection {
    #[error("expected {expected} section(s), got {found}")]
    SectionCount { expected: usize, found: usize },

    #[error("section {section} needs {expected} value(s), got {found}")]
    SectionLength {
        section: usize,
        expected: usize,
        found: usize,
    },

    #[error("{value} is not eligible for slot {slot} of section {section}")]
    NotEligible {
        section: usize,
        slot: usize,
        value: Value,
    },

    #[error("{value} repeats in section {section} (slot {slot})")]
    Repeated {
        section: usize,
        slot: usize,
        value: Value,
    },

    #[error("flat guess needs {expected} value(s), got {found}")]
    FlatLength { expected: usize, found: usize },
}

/// Unvalidated guess data, tagged with its shape
///
/// In config files a list of lists decodes as `Sectioned` and a list of
/// scalars as `Flat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GuessInput {
    Sectioned(Vec<Vec<Value>>),
    Flat(Vec<Value>),
}

impl GuessInput {
    pub fn flat<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        GuessInput::Flat(values.into_iter().map(Into::into).collect())
    }

    pub fn sectioned<T, S>(sections: impl IntoIterator<Item = S>) -> Self
    where
        T: Into<Value>,
        S: IntoIterator<Item = T>,
    {
        GuessInput::Sectioned(
            sections
                .into_iter()
                .map(|s| s.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

impl From<Guess> for GuessInput {
    fn from(guess: Guess) -> Self {
        GuessInput::Sectioned(guess.sections)
    }
}

/// A guess accepted against some table: one value per slot, grouped by section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Guess {
    sections: Vec<Vec<Value>>,
}

impl Guess {
    /// Only the codec and draw sources produce guesses
    pub(crate) fn from_checked(sections: Vec<Vec<Value>>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Vec<Value>] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&[Value]> {
        self.sections.get(index).map(Vec::as_slice)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// All values in table order
    pub fn flatten(&self) -> Vec<Value> {
        self.sections.iter().flatten().cloned().collect()
    }
}

impl std::fmt::Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            let parts: Vec<String> = section.iter().map(Value::to_string).collect();
            f.write_str(&parts.join(" "))?;
        }
        Ok(())
    }
}

/// Validation and normalization of guesses against a table
pub struct GuessCodec;

impl GuessCodec {
    /// Check a sectioned guess, reporting the first problem found
    ///
    /// Section and slot order matter. Repeats are checked pairwise against
    /// earlier values of the same section.
    pub fn check(sections: &[Vec<Value>], table: &GuessTable) -> Result<(), GuessRejection> {
        if sections.len() != table.section_count() {
            return Err(GuessRejection::SectionCount {
                expected: table.section_count(),
                found: sections.len(),
            });
        }

        for (i, (values, section)) in sections.iter().zip(table.sections()).enumerate() {
            if values.len() != section.len() {
                return Err(GuessRejection::SectionLength {
                    section: i,
                    expected: section.len(),
                    found: values.len(),
                });
            }

            for (j, (value, slot)) in values.iter().zip(section.slots()).enumerate() {
                if !slot.contains(value) {
                    return Err(GuessRejection::NotEligible {
                        section: i,
                        slot: j,
                        value: value.clone(),
                    });
                }
                if values[..j].contains(value) {
                    return Err(GuessRejection::Repeated {
                        section: i,
                        slot: j,
                        value: value.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// `true` when the guess fits the table; never panics
    pub fn validate(input: &GuessInput, table: &GuessTable) -> bool {
        match input {
            GuessInput::Sectioned(sections) => Self::check(sections, table).is_ok(),
            GuessInput::Flat(_) => false,
        }
    }

    /// Split a flat guess into sections, slot-count-many values per section
    ///
    /// Sectioned input is returned unchanged. The result is not validated.
    pub fn normalize(input: &GuessInput, table: &GuessTable) -> Result<Vec<Vec<Value>>, GuessRejection> {
        let flat = match input {
            GuessInput::Sectioned(sections) => return Ok(sections.clone()),
            GuessInput::Flat(flat) => flat,
        };

        let expected = table.total_slots();
        if flat.len() != expected {
            return Err(GuessRejection::FlatLength {
                expected,
                found: flat.len(),
            });
        }

        let mut cursor = 0;
        let sections = table
            .sections()
            .iter()
            .map(|section| {
                let chunk = flat[cursor..cursor + section.len()].to_vec();
                cursor += section.len();
                chunk
            })
            .collect();
        Ok(sections)
    }

    /// Accept a raw guess: validate as given, otherwise normalize and validate again
    pub fn accept(input: &GuessInput, table: &GuessTable) -> Result<Guess, GuessRejection> {
        if let GuessInput::Sectioned(sections) = input {
            Self::check(sections, table)?;
            return Ok(Guess::from_checked(sections.clone()));
        }

        let sections = Self::normalize(input, table)?;
        Self::check(&sections, table)?;
        Ok(Guess::from_checked(sections))
    }
}
