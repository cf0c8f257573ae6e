use std::fmt;

use serde::Serialize;

use crate::models::FoodRecord;

/// One of the three daily meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    /// Resolve a slot label (Korean label or English word, case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "아침" | "breakfast" => Some(MealSlot::Breakfast),
            "점심" | "lunch" => Some(MealSlot::Lunch),
            "저녁" | "dinner" => Some(MealSlot::Dinner),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog record placed in the plan.
///
/// Entries created by the matcher carry their meal slot and the suggested name
/// that produced the match; entries added while rebalancing carry neither.
#[derive(Debug, Clone)]
pub struct SelectionEntry<'c> {
    pub record: &'c FoodRecord,
    pub slot: Option<MealSlot>,
    pub suggested_name: Option<String>,
}

impl<'c> SelectionEntry<'c> {
    pub fn matched(record: &'c FoodRecord, slot: MealSlot, suggested_name: String) -> Self {
        Self {
            record,
            slot: Some(slot),
            suggested_name: Some(suggested_name),
        }
    }

    pub fn added(record: &'c FoodRecord) -> Self {
        Self {
            record,
            slot: None,
            suggested_name: None,
        }
    }
}

/// Ordered multiset of catalog records. The same record may appear more than once.
#[derive(Debug, Clone, Default)]
pub struct Selection<'c> {
    entries: Vec<SelectionEntry<'c>>,
}

impl<'c> Selection<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: SelectionEntry<'c>) {
        self.entries.push(entry);
    }

    /// Remove the entry at `index`, keeping the order of the rest.
    pub fn remove(&mut self, index: usize) -> Option<SelectionEntry<'c>> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[SelectionEntry<'c>] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &'c FoodRecord> + '_ {
        self.entries.iter().map(|e| e.record)
    }

    /// Whether a record with exactly this name is already selected.
    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.record.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'c> FromIterator<SelectionEntry<'c>> for Selection<'c> {
    fn from_iter<I: IntoIterator<Item = SelectionEntry<'c>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
