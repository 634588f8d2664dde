//! # Report Consolidator
//!
//! The core of the register: derives the materialized daily and monthly
//! reports from the sales ledger.
//!
//! ## Cache-Aside Daily Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_or_build_daily(date)                                               │
//! │                                                                         │
//! │   load(date) ──► hit & fresh? ──yes──► return stored report             │
//! │                      │                                                  │
//! │                     no (missing, or generated_at older than 1h)         │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │   rebuild: select day's finalized line rows (joined to product names)   │
//! │            fold through ProductSummary (consolidate_day)                │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │   store: upsert keyed by date (concurrent rebuilds collapse onto        │
//! │          one row), stamp generated_at = now                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A zero-sale day still materializes a report with zeroed fields, so "no
//! sales" is distinguishable from "not yet computed".
//!
//! ## Monthly Rollups
//! Monthly reports have no staleness window: every call rebuilds from
//! whatever daily reports currently exist for the month's calendar days.
//! `days_with_sales` counts existing daily *rows*, zero-sale rows included
//! (see DESIGN.md).

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use caderno_core::{
    calendar, consolidate_day, Clock, CoreError, DailyReport, MonthlyReport,
    FRESHNESS_WINDOW_SECS,
};
use caderno_db::Database;

use crate::error::RegisterResult;

/// Consolidates ledger rows into daily and monthly reports.
///
/// Cheap to clone; clones share the database pool and the clock.
#[derive(Clone)]
pub struct ReportConsolidator {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl ReportConsolidator {
    /// Creates a consolidator over a database with an injected clock.
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        ReportConsolidator { db, clock }
    }

    /// The injected clock (also used by the batch runner to resolve
    /// relative targets).
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // =========================================================================
    // Daily
    // =========================================================================

    /// Returns the daily report for `date`, rebuilding it when missing or
    /// older than the freshness window.
    pub async fn get_or_build_daily(&self, date: NaiveDate) -> RegisterResult<DailyReport> {
        if let Some(existing) = self.db.reports().load_daily(date).await? {
            if !self.is_stale(&existing) {
                debug!(%date, "Daily report is fresh, serving stored row");
                return Ok(existing);
            }
        }

        self.rebuild_daily(date).await
    }

    /// Whether a stored daily report has outlived the freshness window.
    fn is_stale(&self, report: &DailyReport) -> bool {
        let age = self.clock.now() - report.generated_at;
        age > Duration::seconds(FRESHNESS_WINDOW_SECS)
    }

    /// Unconditionally recomputes and stores the daily report for `date`.
    ///
    /// The upsert keyed by date is the concurrency boundary: two racing
    /// rebuilds collapse onto one row, last writer wins, both writers were
    /// computing from the same ledger.
    pub async fn rebuild_daily(&self, date: NaiveDate) -> RegisterResult<DailyReport> {
        let lines = self.db.reports().day_lines(date).await?;
        let totals = consolidate_day(&lines);

        let report = DailyReport {
            date,
            total_cents: totals.total_cents,
            total_item_count: totals.total_item_count,
            sale_count: totals.sale_count,
            product_summary: totals.product_summary,
            generated_at: self.clock.now(),
        };

        self.db.reports().store_daily(&report).await?;

        info!(
            %date,
            total = %report.total(),
            sale_count = report.sale_count,
            "Daily report rebuilt"
        );

        Ok(report)
    }

    // =========================================================================
    // Monthly
    // =========================================================================

    /// Rebuilds and returns the monthly rollup for (year, month).
    ///
    /// Always rebuilds: consistent with whatever daily reports exist at call
    /// time. Rejects months outside 1-12 with `InvalidMonth`.
    pub async fn get_or_build_monthly(
        &self,
        year: i32,
        month: u32,
    ) -> RegisterResult<MonthlyReport> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidMonth(month).into());
        }

        let (first, last) = calendar::month_bounds(year, month)?;
        let days = self.db.reports().load_dailies_between(first, last).await?;

        let total_cents: i64 = days.iter().map(|d| d.total_cents).sum();
        // Counts rows, not rows with sales. Kept as-is.
        let days_with_sales = days.len() as i64;
        let generated_at = self.clock.now();

        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        self.db
            .reports()
            .store_monthly(year, month, total_cents, days_with_sales, generated_at, &dates)
            .await?;

        info!(
            year,
            month,
            days = days_with_sales,
            total_cents,
            "Monthly report rebuilt"
        );

        Ok(MonthlyReport {
            year,
            month,
            total_cents,
            days_with_sales,
            generated_at,
            days,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
