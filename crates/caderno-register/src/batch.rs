//! # Batch Consolidation
//!
//! Entry point for the external scheduler: resolves a set of targets
//! (explicit dates/months or relative ones like "yesterday") and runs the
//! corresponding consolidations, isolating failures per unit.
//!
//! There is no in-process scheduler. A cron job invokes the
//! `processar_relatorios` binary, which calls [`run_batch`] with the parsed
//! targets; with no arguments the default pair {yesterday, current month}
//! runs, closing out the previous day and keeping the month rollup current.

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{error, info};

use caderno_core::Clock;

use crate::consolidator::ReportConsolidator;
use crate::error::RegisterError;

/// One unit of batch work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchTarget {
    /// Consolidate one explicit date.
    Day(NaiveDate),
    /// Consolidate one explicit month.
    Month { year: i32, month: u32 },
    /// The day before the clock's today.
    Yesterday,
    /// The clock's today.
    Today,
    /// The month containing the clock's today.
    CurrentMonth,
}

impl BatchTarget {
    /// The default batch: close out yesterday, refresh the current month.
    pub fn default_set() -> Vec<BatchTarget> {
        vec![BatchTarget::Yesterday, BatchTarget::CurrentMonth]
    }

    /// Resolves relative targets against the clock.
    fn resolve(self, clock: &dyn Clock) -> ResolvedTarget {
        let today = clock.today();
        match self {
            BatchTarget::Day(date) => ResolvedTarget::Day(date),
            BatchTarget::Yesterday => ResolvedTarget::Day(today - Duration::days(1)),
            BatchTarget::Today => ResolvedTarget::Day(today),
            BatchTarget::Month { year, month } => ResolvedTarget::Month { year, month },
            BatchTarget::CurrentMonth => ResolvedTarget::Month {
                year: today.year(),
                month: today.month(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ResolvedTarget {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
}

impl ResolvedTarget {
    fn label(&self) -> String {
        match self {
            ResolvedTarget::Day(date) => format!("dia {}", date.format("%d/%m/%Y")),
            ResolvedTarget::Month { year, month } => format!("mês {:02}/{}", month, year),
        }
    }
}

/// The outcome of one batch unit.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Human-readable unit label, e.g. `dia 12/08/2025`.
    pub label: String,
    /// Success summary or the unit's error.
    pub result: Result<String, RegisterError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs every target, never stopping at a failing unit.
///
/// Each outcome is logged as it lands; the caller gets the full list for
/// operator reporting.
pub async fn run_batch(
    consolidator: &ReportConsolidator,
    targets: &[BatchTarget],
) -> Vec<BatchOutcome> {
    let mut outcomes = Vec::with_capacity(targets.len());

    for target in targets {
        let resolved = target.resolve(consolidator.clock());
        let label = resolved.label();

        let result = match resolved {
            ResolvedTarget::Day(date) => consolidator
                .get_or_build_daily(date)
                .await
                .map(|report| {
                    format!("{} ({} vendas)", report.total(), report.sale_count)
                }),
            ResolvedTarget::Month { year, month } => consolidator
                .get_or_build_monthly(year, month)
                .await
                .map(|report| {
                    format!("{} ({} dias)", report.total(), report.days_with_sales)
                }),
        };

        match &result {
            Ok(summary) => info!(unit = %label, %summary, "Batch unit consolidated"),
            Err(e) => error!(unit = %label, error = %e, "Batch unit failed"),
        }

        outcomes.push(BatchOutcome { label, result });
    }

    outcomes
}

// =============================================================================
// Unit Tests
// =============================================================================
