//! Per-attribute seen/saved counters and the survival ratios derived from them.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::numbers::{ratio, round_tenths};

/// Attribute name with its survival ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    pub ratio: f64,
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.1}", self.name, round_tenths(self.ratio))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitCount {
    pub name: String,
    pub seen: u64,
    pub saved: u64,
}

/// Counters keyed by attribute, remembering the order attributes were first seen.
#[derive(Debug, Clone, Default)]
pub struct TraitTally {
    entries: Vec<TraitCount>,
    index: HashMap<String, usize>,
}

impl TraitTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence, crediting it as saved when `saved` is set.
    pub fn record(&mut self, name: &str, saved: bool) {
        self.add(name, 1, u64::from(saved));
    }

    /// Add arbitrary seen/saved amounts; registers the key even for zero amounts.
    pub fn add(&mut self, name: &str, seen: u64, saved: u64) {
        let entry = self.entry_mut(name);
        entry.seen = entry.seen.saturating_add(seen);
        entry.saved = entry.saved.saturating_add(saved);
    }

    fn entry_mut(&mut self, name: &str) -> &mut TraitCount {
        let idx = if let Some(&idx) = self.index.get(name) {
            idx
        } else {
            let idx = self.entries.len();
            self.index.insert(name.to_string(), idx);
            self.entries.push(TraitCount {
                name: name.to_string(),
                seen: 0,
                saved: 0,
            });
            idx
        };
        &mut self.entries[idx]
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TraitCount> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraitCount> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ratios sorted descending; equal ratios keep discovery order.
    #[must_use]
    pub fn survival_ratios(&self) -> Vec<Trait> {
        let mut traits: Vec<Trait> = self
            .entries
            .iter()
            .map(|count| Trait {
                name: count.name.clone(),
                ratio: ratio(count.saved, count.seen),
            })
            .collect();
        traits.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
        traits
    }
}

impl<'a> IntoIterator for &'a TraitTally {
    type Item = &'a TraitCount;
    type IntoIter = std::slice::Iter<'a, TraitCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
