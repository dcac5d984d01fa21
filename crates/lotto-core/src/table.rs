//! Guess table: the lottery's number universe
//!
//! A table is an ordered list of sections, each section an ordered list of
//! slots, each slot a set of eligible values. Tables are validated once at
//! construction and never change afterwards.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::{LottoError, LottoResult};
use crate::value::{Value, ValueKind};

/// One position of a section and the values it accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Slot {
    values: Vec<Value>,
}

impl Slot {
    /// Create a slot; duplicate values collapse, first occurrence wins
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        Self { values: unique }
    }

    /// Integer slot covering `range`
    pub fn range(range: RangeInclusive<i64>) -> Self {
        Self {
            values: range.map(Value::Int).collect(),
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An independently scored group of slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Section {
    slots: Vec<Slot>,
}

impl Section {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    /// Section where every slot shares the same eligible set
    pub fn uniform(slot_count: usize, values: impl IntoIterator<Item = Value>) -> Self {
        let slot = Slot::new(values);
        Self {
            slots: vec![slot; slot_count],
        }
    }

    /// "Pick `slot_count` distinct numbers from `range`"
    pub fn range(slot_count: usize, range: RangeInclusive<i64>) -> Self {
        Self {
            slots: vec![Slot::range(range); slot_count],
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The complete number universe of a lottery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GuessTable {
    sections: Vec<Section>,
}

impl GuessTable {
    /// Build and validate a table
    ///
    /// Fails when the table, a section or a slot is empty, when integer and
    /// string values are mixed, or when some slot can run out of values
    /// because earlier slots of its section already took them all.
    pub fn new(sections: Vec<Section>) -> LottoResult<Self> {
        if sections.is_empty() {
            return Err(LottoError::EmptyTable);
        }

        let mut kind: Option<ValueKind> = None;
        for (s, section) in sections.iter().enumerate() {
            if section.is_empty() {
                return Err(LottoError::EmptySection { section: s });
            }
            for (j, slot) in section.slots.iter().enumerate() {
                if slot.is_empty() {
                    return Err(LottoError::EmptySlot { section: s, slot: j });
                }
                for value in slot.values() {
                    match kind {
                        None => kind = Some(value.kind()),
                        Some(k) if k != value.kind() => return Err(LottoError::MixedValueKinds),
                        Some(_) => {}
                    }
                }

                if can_exhaust(&section.slots[..j], slot) {
                    return Err(LottoError::UnsatisfiableSlot { section: s, slot: j });
                }
            }
        }

        let table = Self { sections };
        log::debug!(
            "Guess table ready: {} section(s), slot counts {:?}",
            table.sections.len(),
            table.slot_counts()
        );
        Ok(table)
    }

    /// Single-section table
    pub fn single(section: Section) -> LottoResult<Self> {
        Self::new(vec![section])
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of slots in every section, in order
    pub fn slot_counts(&self) -> Vec<usize> {
        self.sections.iter().map(Section::len).collect()
    }

    /// Length a flat guess must have
    pub fn total_slots(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STARVATION CHECK
// ═══════════════════════════════════════════════════════════════════════════════

/// `true` when `earlier` slots can hold every value of `slot` at the same time
///
/// Each earlier slot holds one value, so this is a bipartite matching of
/// `slot`'s values onto distinct earlier slots (augmenting paths). The earlier
/// slots themselves already passed this check, so any such matching extends to
/// a full distinct pick of the prefix and is reachable by the sampler.
fn can_exhaust(earlier: &[Slot], slot: &Slot) -> bool {
    if earlier.len() < slot.len() {
        return false;
    }

    // holder[e] = index of the value of `slot` matched to earlier slot `e`
    let mut holder: Vec<Option<usize>> = vec![None; earlier.len()];
    for v in 0..slot.len() {
        let mut visited = vec![false; earlier.len()];
        if !augment(v, slot.values(), earlier, &mut holder, &mut visited) {
            return false;
        }
    }
    true
}

fn augment(v: usize, values: &[Value], earlier: &[Slot], holder: &mut [Option<usize>], visited: &mut [bool]) -> bool {
    for (e, candidate) in earlier.iter().enumerate() {
        if visited[e] || !candidate.contains(&values[v]) {
            continue;
        }
        visited[e] = true;
        let free = match holder[e] {
            None => true,
            Some(other) => augment(other, values, earlier, holder, visited),
        };
        if free {
            holder[e] = Some(v);
            return true;
        }
    }
    false
}
