//! # Domain Types
//!
//! Core domain types used throughout the caderno register.
//!
//! ## Type Hierarchy
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                                │
//! │                                                                      │
//! │  Catalog          Ledger                    Derived (rebuildable)    │
//! │  ─────────        ──────────────────        ─────────────────────    │
//! │  Product          Sale                      DailyReport              │
//! │   stock, price     timestamp, total          per-date aggregate      │
//! │   cumulative      SaleLineItem              MonthlyReport            │
//! │   sold             price SNAPSHOT            per-month rollup        │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `SaleLineItem.unit_price_cents` is copied from the product at sale time.
//! Historical reports must reflect the price at the moment of sale even if
//! the catalog price changes later.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::summary::ProductSummary;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// `stock_quantity` is never negative; it is decremented only through a
/// finalized sale, which also increments `cumulative_sold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit price in centavos.
    pub price_cents: i64,
    /// Units currently on hand.
    pub stock_quantity: i64,
    /// Units sold over the product's lifetime.
    pub cumulative_sold: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && quantity <= self.stock_quantity
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale transaction. Immutable once finalized.
///
/// `total_cents` equals the sum of the line-item subtotals; it is computed
/// at finalization and never updated independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    /// UTC instant of finalization.
    pub timestamp: DateTime<Utc>,
    /// Local calendar date stamped at finalization. Daily reports bucket by
    /// this column, so bucketing never shifts with the UTC offset.
    pub sale_date: NaiveDate,
    pub total_cents: i64,
    pub finalized: bool,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// A line item in a sale. Uses the snapshot pattern for the unit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price in centavos at time of sale (frozen).
    pub unit_price_cents: i64,
    /// quantity x unit_price, in centavos.
    pub subtotal_cents: i64,
}

impl SaleLineItem {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Finalization Request/Response
// =============================================================================

/// One requested line of a sale being finalized: which product, how many.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
}

/// What the finalizer returns on success.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizedSale {
    pub sale_id: i64,
    pub total_cents: i64,
    pub timestamp: DateTime<Utc>,
}

impl FinalizedSale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Daily Report
// =============================================================================

/// The materialized aggregate for one calendar date.
///
/// Rebuildable at any time from the finalized sales of that date. A report
/// with `sale_count == 0` is a valid, persisted "no sales" report - distinct
/// from "not yet computed".
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total_cents: i64,
    /// Sum of quantities across all line items of the day.
    pub total_item_count: i64,
    pub sale_count: i64,
    /// Per-product quantities and amounts, first-seen order.
    pub product_summary: ProductSummary,
    /// When this aggregate was (re)computed; drives the freshness check.
    pub generated_at: DateTime<Utc>,
}

impl DailyReport {
    /// An all-zero report for a date with no sales.
    pub fn empty(date: NaiveDate, generated_at: DateTime<Utc>) -> Self {
        DailyReport {
            date,
            total_cents: 0,
            total_item_count: 0,
            sale_count: 0,
            product_summary: ProductSummary::new(),
            generated_at,
        }
    }

    /// Returns the day total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Whether the day recorded at least one sale.
    #[inline]
    pub fn has_sales(&self) -> bool {
        self.sale_count > 0
    }
}

// =============================================================================
// Monthly Report
// =============================================================================

/// The rollup over one (year, month), derived from whatever daily reports
/// exist for the month's calendar days.
///
/// `days_with_sales` counts existing daily report *rows*, which may include
/// zero-sale days that were once materialized. That mirrors the behavior
/// report consumers already depend on; see DESIGN.md.
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub total_cents: i64,
    pub days_with_sales: i64,
    pub generated_at: DateTime<Utc>,
    /// The daily reports that were consolidated, ordered by date.
    pub days: Vec<DailyReport>,
}

impl MonthlyReport {
    /// Returns the month total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
