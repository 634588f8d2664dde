//! # Product Summary Accumulator
//!
//! The consolidation core: folds a day's ledger rows into per-product
//! totals plus day-level counters.
//!
//! ## Why an Explicit Accumulator?
//! The per-product mapping is not an ad-hoc `HashMap` because two things
//! matter beyond lookup:
//!
//! 1. **Order**: presentation iterates products in first-seen order (the
//!    order they appear in the day's sale data), so entries keep their
//!    insertion sequence.
//! 2. **Merge**: `merge` is associative and commutative over the multiset of
//!    line items processed, so a recomputation can be split and recombined
//!    in any grouping without changing the result.
//!
//! ## Known Ambiguity
//! Aggregation is keyed by product *name*: two distinct catalog products
//! sharing a name merge under that name. Preserved on purpose; see
//! DESIGN.md.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product Totals
// =============================================================================

/// Accumulated quantity and amount for one product name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTotals {
    pub quantity: i64,
    pub total_cents: i64,
}

impl ProductTotals {
    /// Returns the accumulated amount as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Product Summary
// =============================================================================

/// One persisted entry of a product summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub name: String,
    pub quantity: i64,
    pub total_cents: i64,
}

/// Ordered per-product-name accumulator.
///
/// Keeps entries in first-seen order while supporting O(1) lookup by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSummary {
    entries: Vec<SummaryEntry>,
    index: HashMap<String, usize>,
}

impl ProductSummary {
    /// Creates an empty summary.
    pub fn new() -> Self {
        ProductSummary::default()
    }

    /// Adds a line's worth of quantity and amount under `name`.
    ///
    /// A new name is appended; an existing name accumulates in place.
    pub fn add(&mut self, name: &str, quantity: i64, subtotal: Money) {
        match self.index.get(name) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.quantity += quantity;
                entry.total_cents += subtotal.cents();
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(SummaryEntry {
                    name: name.to_string(),
                    quantity,
                    total_cents: subtotal.cents(),
                });
            }
        }
    }

    /// Merges another summary into this one.
    ///
    /// Associative and commutative over the underlying line items; only the
    /// entry order depends on which operand came first.
    pub fn merge(&mut self, other: &ProductSummary) {
        for entry in &other.entries {
            self.add(&entry.name, entry.quantity, Money::from_cents(entry.total_cents));
        }
    }

    /// Looks up the totals for a product name.
    pub fn get(&self, name: &str) -> Option<ProductTotals> {
        self.index.get(name).map(|&i| ProductTotals {
            quantity: self.entries[i].quantity,
            total_cents: self.entries[i].total_cents,
        })
    }

    /// Iterates entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &SummaryEntry> {
        self.entries.iter()
    }

    /// Number of distinct product names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the summary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in first-seen order (the persisted representation).
    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    /// Rebuilds a summary from persisted entries, preserving their order.
    pub fn from_entries(entries: Vec<SummaryEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        ProductSummary { entries, index }
    }
}

// =============================================================================
// Daily Consolidation
// =============================================================================

/// One ledger row feeding the daily consolidation: a finalized sale's line
/// item joined to its product name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DayLine {
    pub sale_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub subtotal_cents: i64,
}

/// The result of folding one day's ledger rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayTotals {
    pub product_summary: ProductSummary,
    pub total_cents: i64,
    pub total_item_count: i64,
    pub sale_count: i64,
}

/// Folds a day's line rows into per-product and day-level totals.
///
/// Pure function of its input: callers fetch the finalized rows for a date
/// and pass them here. Rows must arrive grouped however the caller likes -
/// sale_count is the number of distinct sale ids, independent of order.
pub fn consolidate_day(lines: &[DayLine]) -> DayTotals {
    let mut totals = DayTotals::default();
    let mut seen_sales: HashMap<i64, ()> = HashMap::new();

    for line in lines {
        totals
            .product_summary
            .add(&line.product_name, line.quantity, Money::from_cents(line.subtotal_cents));
        totals.total_cents += line.subtotal_cents;
        totals.total_item_count += line.quantity;
        seen_sales.insert(line.sale_id, ());
    }

    totals.sale_count = seen_sales.len() as i64;
    totals
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(sale_id: i64, name: &str, quantity: i64, subtotal_cents: i64) -> DayLine {
        DayLine {
            sale_id,
            product_name: name.to_string(),
            quantity,
            subtotal_cents,
        }
    }

    #[test]
    fn test_add_accumulates_by_name() {
        let mut summary = ProductSummary::new();
        summary.add("parafuso", 15, Money::from_cents(225));
        summary.add("parafuso", 5, Money::from_cents(75));

        let totals = summary.get("parafuso").unwrap();
        assert_eq!(totals.quantity, 20);
        assert_eq!(totals.total_cents, 300);
        assert_eq!(summary.len(), 1);
    }

    #[test]
    fn test_first_seen_order_is_kept() {
        let mut summary = ProductSummary::new();
        summary.add("porca", 1, Money::from_cents(10));
        summary.add("arruela", 2, Money::from_cents(20));
        summary.add("porca", 3, Money::from_cents(30));

        let names: Vec<&str> = summary.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["porca", "arruela"]);
    }

    #[test]
    fn test_merge_matches_sequential_adds() {
        let mut left = ProductSummary::new();
        left.add("porca", 1, Money::from_cents(10));
        left.add("arruela", 2, Money::from_cents(20));

        let mut right = ProductSummary::new();
        right.add("arruela", 3, Money::from_cents(30));
        right.add("parafuso", 4, Money::from_cents(40));

        let mut merged = left.clone();
        merged.merge(&right);

        assert_eq!(merged.get("porca").unwrap().quantity, 1);
        assert_eq!(merged.get("arruela").unwrap().quantity, 5);
        assert_eq!(merged.get("arruela").unwrap().total_cents, 50);
        assert_eq!(merged.get("parafuso").unwrap().quantity, 4);

        // Commutative over totals (order of entries may differ).
        let mut reversed = right.clone();
        reversed.merge(&left);
        for entry in merged.iter() {
            assert_eq!(reversed.get(&entry.name), merged.get(&entry.name));
        }
    }

    #[test]
    fn test_entries_roundtrip() {
        let mut summary = ProductSummary::new();
        summary.add("porca", 1, Money::from_cents(10));
        summary.add("arruela", 2, Money::from_cents(20));

        let rebuilt = ProductSummary::from_entries(summary.entries().to_vec());
        assert_eq!(rebuilt, summary);
    }

    #[test]
    fn test_consolidate_day_counts_distinct_sales() {
        let lines = vec![
            line(1, "parafuso", 15, 225),
            line(1, "porca", 2, 30),
            line(2, "parafuso", 10, 150),
        ];

        let totals = consolidate_day(&lines);
        assert_eq!(totals.sale_count, 2);
        assert_eq!(totals.total_item_count, 27);
        assert_eq!(totals.total_cents, 405);
        assert_eq!(totals.product_summary.get("parafuso").unwrap().quantity, 25);
        assert_eq!(totals.product_summary.get("porca").unwrap().total_cents, 30);
    }

    #[test]
    fn test_consolidate_day_empty() {
        let totals = consolidate_day(&[]);
        assert_eq!(totals, DayTotals::default());
    }

    #[test]
    fn test_name_collision_merges_distinct_products() {
        // Two catalog products named "prego" land in one entry. Known
        // ambiguity, preserved.
        let lines = vec![line(1, "prego", 1, 100), line(2, "prego", 2, 50)];
        let totals = consolidate_day(&lines);
        assert_eq!(totals.product_summary.len(), 1);
        assert_eq!(totals.product_summary.get("prego").unwrap().quantity, 3);
    }
}
