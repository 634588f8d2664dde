//! # Sale Finalizer
//!
//! Validates and commits a sale against the catalog.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  finalize([{product_id, quantity}, ...])                                 │
//! │                                                                         │
//! │   validate lines (non-empty, bounded, quantity > 0)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   BEGIN                                                                 │
//! │     per line: fetch product ── missing? ──► ProductNotFound, ROLLBACK   │
//! │               check stock   ── short?   ──► InsufficientStock, ROLLBACK │
//! │               snapshot unit price, subtotal = price × qty               │
//! │     insert sale (finalized, total = Σ subtotals)                        │
//! │     per line: insert item; guarded stock decrement ── lost race? ──►    │
//! │               InsufficientStock, ROLLBACK                               │
//! │   COMMIT                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   spawn: regenerate the day's report (best-effort, WARN on failure)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The whole sale is one atomic unit: a failure on any line leaves no sale
//! row and no stock mutation. Report regeneration happens after commit and
//! can never fail the sale.

use std::sync::Arc;

use tracing::{info, warn};

use caderno_core::validation::validate_sale_lines;
use caderno_core::{Clock, CoreError, FinalizedSale, Money, SaleLine};
use caderno_db::Database;

use crate::consolidator::ReportConsolidator;
use crate::error::RegisterResult;

/// Commits sales against the catalog and ledger.
#[derive(Clone)]
pub struct SaleFinalizer {
    db: Database,
    clock: Arc<dyn Clock>,
    consolidator: ReportConsolidator,
}

impl SaleFinalizer {
    /// Creates a finalizer sharing the consolidator's database and clock.
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        let consolidator = ReportConsolidator::new(db.clone(), clock.clone());
        SaleFinalizer {
            db,
            clock,
            consolidator,
        }
    }

    /// Finalizes a sale: one transaction covering the sale row, its line
    /// items, and every stock mutation.
    ///
    /// On success the committed sale's date is queued for best-effort daily
    /// regeneration; a regeneration failure is logged and never surfaces.
    pub async fn finalize(&self, lines: &[SaleLine]) -> RegisterResult<FinalizedSale> {
        validate_sale_lines(lines)?;

        let timestamp = self.clock.now();
        let sale_date = self.clock.today();

        let mut tx = self.db.pool().begin().await.map_err(caderno_db::DbError::from)?;

        // First pass: resolve products, check stock, snapshot prices.
        let mut resolved = Vec::with_capacity(lines.len());
        let mut total = Money::zero();

        for line in lines {
            let product = self
                .db
                .products()
                .fetch(&mut tx, line.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound(line.product_id))?;

            if !product.can_sell(line.quantity) {
                return Err(CoreError::InsufficientStock {
                    product: product.name,
                    available: product.stock_quantity,
                    requested: line.quantity,
                }
                .into());
            }

            let unit_price = product.price();
            let subtotal = unit_price.multiply_quantity(line.quantity);
            total += subtotal;
            resolved.push((product, line.quantity, unit_price, subtotal));
        }

        // Second pass: write the ledger and mutate stock.
        let sale_id = self
            .db
            .sales()
            .insert_sale(&mut tx, timestamp, sale_date, total.cents())
            .await?;

        for (product, quantity, unit_price, subtotal) in &resolved {
            self.db
                .sales()
                .insert_item(
                    &mut tx,
                    sale_id,
                    product.id,
                    *quantity,
                    unit_price.cents(),
                    subtotal.cents(),
                )
                .await?;

            let applied = self
                .db
                .products()
                .apply_sale(&mut tx, product.id, *quantity)
                .await?;
            if !applied {
                // The guarded UPDATE found less stock than the first pass
                // saw. Abort the whole sale.
                return Err(CoreError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.stock_quantity,
                    requested: *quantity,
                }
                .into());
            }
        }

        tx.commit().await.map_err(caderno_db::DbError::from)?;

        info!(
            sale_id,
            total = %total,
            lines = lines.len(),
            %sale_date,
            "Sale finalized"
        );

        // Best-effort: the report catches up on the next read anyway.
        let consolidator = self.consolidator.clone();
        tokio::spawn(async move {
            if let Err(e) = consolidator.get_or_build_daily(sale_date).await {
                warn!(%sale_date, error = %e, "Post-sale daily regeneration failed");
            }
        });

        Ok(FinalizedSale {
            sale_id,
            total_cents: total.cents(),
            timestamp,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use caderno_core::FixedClock;
    use caderno_db::repository::product::NewProduct;
    use caderno_db::DbConfig;
    use chrono::{NaiveDate, TimeZone, Utc};

    async fn setup() -> (Database, SaleFinalizer) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2025, 8, 12, 14, 30, 0).unwrap());
        let finalizer = SaleFinalizer::new(db.clone(), Arc::new(clock));
        (db, finalizer)
    }

    async fn parafuso(db: &Database) -> i64 {
        db.products()
            .insert(NewProduct {
                name: "parafuso".to_string(),
                price_cents: 15,
                stock_quantity: 100,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_finalize_parafuso_sale() {
        let (db, finalizer) = setup().await;
        let product_id = parafuso(&db).await;

        let sale = finalizer
            .finalize(&[SaleLine {
                product_id,
                quantity: 15,
            }])
            .await
            .unwrap();

        // R$ 0.15 × 15 = R$ 2.25
        assert_eq!(sale.total_cents, 225);

        let product = db.products().get_by_id(product_id).await.unwrap();
        assert_eq!(product.stock_quantity, 85);
        assert_eq!(product.cumulative_sold, 15);

        let stored = db.sales().get_by_id(sale.sale_id).await.unwrap();
        assert!(stored.finalized);
        assert_eq!(stored.sale_date, NaiveDate::from_ymd_opt(2025, 8, 12).unwrap());

        let items = db.sales().items_for(sale.sale_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price_cents, 15);
        assert_eq!(items[0].subtotal_cents, 225);
    }

    #[tokio::test]
    async fn test_finalized_sale_flows_into_daily_report() {
        let (db, finalizer) = setup().await;
        let product_id = parafuso(&db).await;

        let sale = finalizer
            .finalize(&[SaleLine {
                product_id,
                quantity: 15,
            }])
            .await
            .unwrap();
        assert_eq!(sale.total_cents, 225);

        let product = db.products().get_by_id(product_id).await.unwrap();
        assert_eq!(product.stock_quantity, 85);
        assert_eq!(product.cumulative_sold, 15);

        // Consolidate the sale's day explicitly rather than relying on the
        // post-commit regeneration task.
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2025, 8, 12, 14, 30, 0).unwrap());
        let consolidator = ReportConsolidator::new(db.clone(), Arc::new(clock));
        let date = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();
        let report = consolidator.get_or_build_daily(date).await.unwrap();

        assert_eq!(report.sale_count, 1);
        assert_eq!(report.total_cents, 225);
        let totals = report.product_summary.get("parafuso").unwrap();
        assert_eq!(totals.quantity, 15);
        assert_eq!(totals.total_cents, 225);
    }

    #[tokio::test]
    async fn test_price_snapshot_survives_catalog_change() {
        let (db, finalizer) = setup().await;
        let product_id = parafuso(&db).await;

        let sale = finalizer
            .finalize(&[SaleLine {
                product_id,
                quantity: 10,
            }])
            .await
            .unwrap();

        // Reprice the catalog after the sale.
        sqlx::query("UPDATE products SET price_cents = 99 WHERE id = ?1")
            .bind(product_id)
            .execute(db.pool())
            .await
            .unwrap();

        let items = db.sales().items_for(sale.sale_id).await.unwrap();
        assert_eq!(items[0].unit_price_cents, 15);
        assert_eq!(items[0].subtotal_cents, 150);
    }

    #[tokio::test]
    async fn test_insufficient_stock_has_no_side_effects() {
        let (db, finalizer) = setup().await;
        let product_id = parafuso(&db).await;

        let err = finalizer
            .finalize(&[SaleLine {
                product_id,
                quantity: 101,
            }])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientStock);
        assert!(err.to_string().contains("parafuso"));

        let product = db.products().get_by_id(product_id).await.unwrap();
        assert_eq!(product.stock_quantity, 100);
        assert_eq!(product.cumulative_sold, 0);

        let sale_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(sale_count, 0);
    }

    #[tokio::test]
    async fn test_failing_line_aborts_whole_sale() {
        let (db, finalizer) = setup().await;
        let ok_id = parafuso(&db).await;
        let short_id = db
            .products()
            .insert(NewProduct {
                name: "porca".to_string(),
                price_cents: 10,
                stock_quantity: 2,
            })
            .await
            .unwrap()
            .id;

        let err = finalizer
            .finalize(&[
                SaleLine {
                    product_id: ok_id,
                    quantity: 5,
                },
                SaleLine {
                    product_id: short_id,
                    quantity: 3,
                },
            ])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientStock);

        // The first line's stock is untouched too.
        let product = db.products().get_by_id(ok_id).await.unwrap();
        assert_eq!(product.stock_quantity, 100);
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let (_, finalizer) = setup().await;
        let err = finalizer
            .finalize(&[SaleLine {
                product_id: 999,
                quantity: 1,
            }])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProductNotFound);
    }

    #[tokio::test]
    async fn test_empty_sale_rejected() {
        let (_, finalizer) = setup().await;
        let err = finalizer.finalize(&[]).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let (db, finalizer) = setup().await;
        let product_id = parafuso(&db).await;
        let err = finalizer
            .finalize(&[SaleLine {
                product_id,
                quantity: 0,
            }])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }
}
