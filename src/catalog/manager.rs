use std::collections::HashMap;

use crate::models::{Category, FoodRecord};

/// Read-only nutrition table.
///
/// Records keep their load order, which decides first-match lookups and
/// candidate evaluation order. Safe to share across independent plan runs.
#[derive(Debug, Clone, Default)]
pub struct NutritionCatalog {
    records: Vec<FoodRecord>,
    /// Exact name -> position in `records`.
    index: HashMap<String, usize>,
}

impl NutritionCatalog {
    /// Build a catalog; a repeated name keeps its first occurrence.
    pub fn new(records: Vec<FoodRecord>) -> Self {
        let mut kept = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        for record in records {
            if index.contains_key(&record.name) {
                continue;
            }
            index.insert(record.name.clone(), kept.len());
            kept.push(record);
        }
        Self {
            records: kept,
            index,
        }
    }

    /// Exact (case-sensitive) name lookup.
    pub fn get(&self, name: &str) -> Option<&FoodRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// First record, in catalog order, whose name contains `key` ignoring case.
    pub fn first_containing(&self, key: &str) -> Option<&FoodRecord> {
        let key = key.to_lowercase();
        self.records
            .iter()
            .find(|r| r.name.to_lowercase().contains(&key))
    }

    pub fn records(&self) -> &[FoodRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoodRecord> {
        self.records.iter()
    }

    /// Count of records per category.
    pub fn category_counts(&self) -> HashMap<Category, usize> {
        let mut counts = HashMap::new();
        for record in &self.records {
            *counts.entry(record.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<FoodRecord> for NutritionCatalog {
    fn from_iter<I: IntoIterator<Item = FoodRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
