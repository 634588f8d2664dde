//! # Report Repository
//!
//! Persistence for the materialized daily and monthly reports.
//!
//! ## Storage Shape
//! - `daily_reports` is keyed by date; the per-product breakdown is a JSON
//!   array column (`product_summary`), kept in first-seen order.
//! - `monthly_reports` is keyed by (year, month); the set of daily reports
//!   it consolidated lives in the `monthly_report_days` link table and is
//!   replaced wholesale on every rebuild.
//!
//! ## Upsert Discipline
//! Both report kinds are written with upserts so concurrent regenerations
//! collapse onto one row instead of failing on a unique constraint.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use caderno_core::summary::SummaryEntry;
use caderno_core::{DailyReport, DayLine, ProductSummary};

use crate::error::{DbError, DbResult};

// =============================================================================
// Row Types
// =============================================================================

/// Raw daily report row; `product_summary` is the JSON column text.
#[derive(Debug, sqlx::FromRow)]
struct DailyReportRow {
    date: NaiveDate,
    total_cents: i64,
    total_item_count: i64,
    sale_count: i64,
    product_summary: String,
    generated_at: DateTime<Utc>,
}

impl DailyReportRow {
    fn into_report(self) -> DbResult<DailyReport> {
        let entries: Vec<SummaryEntry> =
            serde_json::from_str(&self.product_summary).map_err(|e| DbError::CorruptSummary {
                key: self.date.to_string(),
                reason: e.to_string(),
            })?;

        Ok(DailyReport {
            date: self.date,
            total_cents: self.total_cents,
            total_item_count: self.total_item_count,
            sale_count: self.sale_count,
            product_summary: ProductSummary::from_entries(entries),
            generated_at: self.generated_at,
        })
    }
}

/// Persisted monthly rollup header (without the consolidated days).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthlyReportRow {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub total_cents: i64,
    pub days_with_sales: i64,
    pub generated_at: DateTime<Utc>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for report database operations.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    // =========================================================================
    // Daily Reports
    // =========================================================================

    /// Loads the materialized daily report for a date, if one exists.
    pub async fn load_daily(&self, date: NaiveDate) -> DbResult<Option<DailyReport>> {
        let row = sqlx::query_as::<_, DailyReportRow>(
            r#"
            SELECT date, total_cents, total_item_count, sale_count,
                   product_summary, generated_at
            FROM daily_reports
            WHERE date = ?1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DailyReportRow::into_report).transpose()
    }

    /// Stores a daily report, replacing any existing row for the same date.
    pub async fn store_daily(&self, report: &DailyReport) -> DbResult<()> {
        let summary_json =
            serde_json::to_string(report.product_summary.entries()).map_err(|e| {
                DbError::Internal(format!("serializing product summary: {e}"))
            })?;

        debug!(date = %report.date, sale_count = report.sale_count, "Storing daily report");

        sqlx::query(
            r#"
            INSERT INTO daily_reports
                (date, total_cents, total_item_count, sale_count, product_summary, generated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (date) DO UPDATE SET
                total_cents      = excluded.total_cents,
                total_item_count = excluded.total_item_count,
                sale_count       = excluded.sale_count,
                product_summary  = excluded.product_summary,
                generated_at     = excluded.generated_at
            "#,
        )
        .bind(report.date)
        .bind(report.total_cents)
        .bind(report.total_item_count)
        .bind(report.sale_count)
        .bind(summary_json)
        .bind(report.generated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetches the finalized ledger rows for one date: each sale line item
    /// joined to its product name, ordered by sale then line.
    pub async fn day_lines(&self, date: NaiveDate) -> DbResult<Vec<DayLine>> {
        let lines = sqlx::query_as::<_, DayLine>(
            r#"
            SELECT s.id AS sale_id, p.name AS product_name,
                   i.quantity, i.subtotal_cents
            FROM sales s
            INNER JOIN sale_items i ON i.sale_id = s.id
            INNER JOIN products p ON p.id = i.product_id
            WHERE s.sale_date = ?1 AND s.finalized = 1
            ORDER BY s.timestamp, s.id, i.id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Loads all materialized daily reports in a date range (inclusive),
    /// ordered by date.
    pub async fn load_dailies_between(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> DbResult<Vec<DailyReport>> {
        let rows = sqlx::query_as::<_, DailyReportRow>(
            r#"
            SELECT date, total_cents, total_item_count, sale_count,
                   product_summary, generated_at
            FROM daily_reports
            WHERE date >= ?1 AND date <= ?2
            ORDER BY date
            "#,
        )
        .bind(first)
        .bind(last)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DailyReportRow::into_report).collect()
    }

    // =========================================================================
    // Monthly Reports
    // =========================================================================

    /// Loads the persisted monthly rollup header, if one exists.
    pub async fn load_monthly(&self, year: i32, month: u32) -> DbResult<Option<MonthlyReportRow>> {
        let row = sqlx::query_as::<_, MonthlyReportRow>(
            r#"
            SELECT id, year, month, total_cents, days_with_sales, generated_at
            FROM monthly_reports
            WHERE year = ?1 AND month = ?2
            "#,
        )
        .bind(year)
        .bind(month)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Stores a monthly rollup and its link set in one transaction.
    ///
    /// Upserts the (year, month) row, then replaces the link rows pointing at
    /// the consolidated daily reports. Either everything lands or nothing
    /// does; a reader never sees a rollup with a half-replaced link set.
    pub async fn store_monthly(
        &self,
        year: i32,
        month: u32,
        total_cents: i64,
        days_with_sales: i64,
        generated_at: DateTime<Utc>,
        daily_dates: &[NaiveDate],
    ) -> DbResult<()> {
        debug!(year, month, days = daily_dates.len(), "Storing monthly report");

        let mut tx = self.pool.begin().await?;

        let report_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO monthly_reports
                (year, month, total_cents, days_with_sales, generated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (year, month) DO UPDATE SET
                total_cents     = excluded.total_cents,
                days_with_sales = excluded.days_with_sales,
                generated_at    = excluded.generated_at
            RETURNING id
            "#,
        )
        .bind(year)
        .bind(month)
        .bind(total_cents)
        .bind(days_with_sales)
        .bind(generated_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM monthly_report_days WHERE monthly_report_id = ?1")
            .bind(report_id)
            .execute(&mut *tx)
            .await?;

        for date in daily_dates {
            sqlx::query(
                r#"
                INSERT INTO monthly_report_days (monthly_report_id, daily_date)
                VALUES (?1, ?2)
                "#,
            )
            .bind(report_id)
            .bind(date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// The dates a persisted monthly rollup consolidated, ordered.
    pub async fn monthly_day_dates(&self, report_id: i64) -> DbResult<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT daily_date FROM monthly_report_days
            WHERE monthly_report_id = ?1
            ORDER BY daily_date
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use caderno_core::Money;
    use chrono::TimeZone;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn report(date: NaiveDate, total_cents: i64) -> DailyReport {
        let mut summary = ProductSummary::new();
        summary.add("parafuso", 15, Money::from_cents(total_cents));
        DailyReport {
            date,
            total_cents,
            total_item_count: 15,
            sale_count: 1,
            product_summary: summary,
            generated_at: Utc.with_ymd_and_hms(2025, 8, 12, 15, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_store_and_load_daily() {
        let db = test_db().await;
        let date = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();
        let original = report(date, 225);

        db.reports().store_daily(&original).await.unwrap();
        let loaded = db.reports().load_daily(date).await.unwrap().unwrap();

        assert_eq!(loaded, original);
        assert_eq!(loaded.product_summary.get("parafuso").unwrap().quantity, 15);
    }

    #[tokio::test]
    async fn test_daily_upsert_replaces() {
        let db = test_db().await;
        let date = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();

        db.reports().store_daily(&report(date, 225)).await.unwrap();
        db.reports().store_daily(&report(date, 450)).await.unwrap();

        let loaded = db.reports().load_daily(date).await.unwrap().unwrap();
        assert_eq!(loaded.total_cents, 450);
    }

    #[tokio::test]
    async fn test_load_daily_missing() {
        let db = test_db().await;
        let date = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();
        assert!(db.reports().load_daily(date).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_day_lines_only_finalized_on_date() {
        let db = test_db().await;
        let product = db
            .products()
            .insert(NewProduct {
                name: "parafuso".to_string(),
                price_cents: 15,
                stock_quantity: 100,
            })
            .await
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();
        let other = NaiveDate::from_ymd_opt(2025, 8, 13).unwrap();
        let ts = Utc.with_ymd_and_hms(2025, 8, 12, 10, 0, 0).unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let on_date = db.sales().insert_sale(&mut tx, ts, date, 225).await.unwrap();
        db.sales()
            .insert_item(&mut tx, on_date, product.id, 15, 15, 225)
            .await
            .unwrap();
        let off_date = db.sales().insert_sale(&mut tx, ts, other, 30).await.unwrap();
        db.sales()
            .insert_item(&mut tx, off_date, product.id, 2, 15, 30)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let lines = db.reports().day_lines(date).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].sale_id, on_date);
        assert_eq!(lines[0].product_name, "parafuso");
        assert_eq!(lines[0].subtotal_cents, 225);
    }

    #[tokio::test]
    async fn test_monthly_upsert_replaces_link_set() {
        let db = test_db().await;
        let d1 = NaiveDate::from_ymd_opt(2025, 8, 11).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();
        db.reports().store_daily(&report(d1, 100)).await.unwrap();
        db.reports().store_daily(&report(d2, 200)).await.unwrap();

        let generated = Utc.with_ymd_and_hms(2025, 8, 12, 16, 0, 0).unwrap();
        db.reports()
            .store_monthly(2025, 8, 100, 1, generated, &[d1])
            .await
            .unwrap();
        db.reports()
            .store_monthly(2025, 8, 300, 2, generated, &[d1, d2])
            .await
            .unwrap();

        let row = db.reports().load_monthly(2025, 8).await.unwrap().unwrap();
        assert_eq!(row.total_cents, 300);
        assert_eq!(row.days_with_sales, 2);

        let dates = db.reports().monthly_day_dates(row.id).await.unwrap();
        assert_eq!(dates, vec![d1, d2]);
    }

    #[tokio::test]
    async fn test_load_dailies_between() {
        let db = test_db().await;
        let inside = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();
        let outside = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        db.reports().store_daily(&report(inside, 100)).await.unwrap();
        db.reports().store_daily(&report(outside, 200)).await.unwrap();

        let first = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2025, 8, 31).unwrap();
        let dailies = db.reports().load_dailies_between(first, last).await.unwrap();
        assert_eq!(dailies.len(), 1);
        assert_eq!(dailies[0].date, inside);
    }
}
