//! # Quantity Ledger
//!
//! Ordered "quantity of named thing" accumulator used for every cost
//! breakdown the engine produces.
//!
//! Entries keep first-seen order. Merging sums matching names and appends
//! the rest, so a breakdown reads in the order its parts were discovered.

use std::fmt;

/// One ledger line.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerEntry {
    /// Accumulated quantity.
    pub quantity: f64,
    /// Name of the thing counted.
    pub name: String,
}

/// Ordered name -> quantity accumulator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuantityLedger {
    entries: Vec<LedgerEntry>,
}

impl QuantityLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger holding a single line.
    #[must_use]
    pub fn single(quantity: f64, name: impl Into<String>) -> Self {
        let mut ledger = Self::new();
        ledger.add(quantity, name);
        ledger
    }

    /// Adds a quantity, summing into an existing line of the same name.
    pub fn add(&mut self, quantity: f64, name: impl Into<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.quantity += quantity,
            None => self.entries.push(LedgerEntry { quantity, name }),
        }
    }

    /// Merges another ledger into this one.
    ///
    /// Matching names are summed once; unmatched names are appended in the
    /// other ledger's order.
    pub fn merge(&mut self, other: &Self) {
        for entry in &other.entries {
            self.add(entry.quantity, entry.name.as_str());
        }
    }

    /// Returns a copy with every quantity multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|entry| LedgerEntry {
                    quantity: entry.quantity * factor,
                    name: entry.name.clone(),
                })
                .collect(),
        }
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates lines in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    /// Quantity recorded under a name, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, name: &str) -> f64 {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map_or(0.0, |entry| entry.quantity)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> f64 {
        self.entries.iter().map(|entry| entry.quantity).sum()
    }

    /// Values the ledger with a unit price function.
    pub fn value(&self, mut price: impl FnMut(&str) -> f64) -> f64 {
        self.entries.iter().map(|entry| entry.quantity * price(&entry.name)).sum()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a QuantityLedger {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for QuantityLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:.2} {}", entry.quantity, entry.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ledger: &QuantityLedger) -> Vec<&str> {
        ledger.iter().map(|entry| entry.name.as_str()).collect()
    }

    #[test]
    fn test_add_sums_matching_names() {
        let mut ledger = QuantityLedger::new();
        ledger.add(2.0, "Ore");
        ledger.add(1.0, "Coal");
        ledger.add(3.0, "Ore");
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.quantity_of("Ore"), 5.0);
        assert_eq!(names(&ledger), vec!["Ore", "Coal"]);
    }

    #[test]
    fn test_merge_preserves_first_seen_order() {
        let mut left = QuantityLedger::new();
        left.add(1.0, "A");
        left.add(2.0, "B");
        let mut right = QuantityLedger::new();
        right.add(5.0, "C");
        right.add(3.0, "B");
        right.add(7.0, "D");

        left.merge(&right);
        assert_eq!(names(&left), vec!["A", "B", "C", "D"]);
        assert_eq!(left.quantity_of("A"), 1.0);
        assert_eq!(left.quantity_of("B"), 5.0);
        assert_eq!(left.quantity_of("C"), 5.0);
        // The merged-in ledger is untouched
        assert_eq!(right.quantity_of("B"), 3.0);
    }

    #[test]
    fn test_scaled_is_a_copy() {
        let ledger = QuantityLedger::single(4.0, "Ore");
        let doubled = ledger.scaled(2.0);
        assert_eq!(doubled.quantity_of("Ore"), 8.0);
        assert_eq!(ledger.quantity_of("Ore"), 4.0);
    }

    #[test]
    fn test_value_and_clear() {
        let mut ledger = QuantityLedger::single(4.0, "Ore");
        ledger.add(2.0, "Coal");
        let cost = ledger.value(|name| if name == "Ore" { 10.0 } else { 5.0 });
        assert_eq!(cost, 50.0);
        assert_eq!(ledger.total_quantity(), 6.0);
        assert_eq!(ledger.to_string(), "4.00 Ore, 2.00 Coal");

        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.value(|_| 1.0), 0.0);
    }
}
