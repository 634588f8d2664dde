//! # Sale Repository
//!
//! Database operations for the sales ledger.
//!
//! ## Ledger Semantics
//! A sale and its line items are written once, inside the finalization
//! transaction, and never updated afterwards. Unit prices on line items are
//! snapshots of the catalog price at the moment of sale.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use caderno_core::{Sale, SaleLineItem};

use crate::error::{DbError, DbResult};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Fetches a sale by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Sale> {
        sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, timestamp, sale_date, total_cents, finalized
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", id.to_string()))
    }

    /// Lists the line items of a sale, in insertion order.
    pub async fn items_for(&self, sale_id: i64) -> DbResult<Vec<SaleLineItem>> {
        let items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Number of finalized sales on a given date.
    pub async fn count_for_date(&self, date: NaiveDate) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM sales WHERE sale_date = ?1 AND finalized = 1
            "#,
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction Participants
    // =========================================================================

    /// Inserts a finalized sale inside a caller-owned transaction and returns
    /// its id.
    pub async fn insert_sale(
        &self,
        conn: &mut SqliteConnection,
        timestamp: DateTime<Utc>,
        sale_date: NaiveDate,
        total_cents: i64,
    ) -> DbResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO sales (timestamp, sale_date, total_cents, finalized)
            VALUES (?1, ?2, ?3, 1)
            "#,
        )
        .bind(timestamp)
        .bind(sale_date)
        .bind(total_cents)
        .execute(conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts one line item inside a caller-owned transaction.
    pub async fn insert_item(
        &self,
        conn: &mut SqliteConnection,
        sale_id: i64,
        product_id: i64,
        quantity: i64,
        unit_price_cents: i64,
        subtotal_cents: i64,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, unit_price_cents, subtotal_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(sale_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price_cents)
        .bind(subtotal_cents)
        .execute(conn)
        .await?;

        Ok(())
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
    use chrono::TimeZone;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
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

        let timestamp = Utc.with_ymd_and_hms(2025, 8, 12, 14, 30, 0).unwrap();
        let sale_date = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let sale_id = db
            .sales()
            .insert_sale(&mut tx, timestamp, sale_date, 225)
            .await
            .unwrap();
        db.sales()
            .insert_item(&mut tx, sale_id, product.id, 15, 15, 225)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let sale = db.sales().get_by_id(sale_id).await.unwrap();
        assert_eq!(sale.total_cents, 225);
        assert_eq!(sale.sale_date, sale_date);
        assert!(sale.finalized);

        let items = db.sales().items_for(sale_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price_cents, 15);
        assert_eq!(items[0].subtotal_cents, 225);

        assert_eq!(db.sales().count_for_date(sale_date).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_item_requires_existing_sale() {
        let db = test_db().await;
        let product = db
            .products()
            .insert(NewProduct {
                name: "porca".to_string(),
                price_cents: 10,
                stock_quantity: 10,
            })
            .await
            .unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let err = db
            .sales()
            .insert_item(&mut tx, 999, product.id, 1, 10, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
