//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Insert and list catalog products
//! - Fetch inside a finalization transaction
//! - Guarded stock decrement (`apply_sale`)
//!
//! ## Stock Invariant
//! `stock_quantity` never goes negative. The decrement carries the guard in
//! the UPDATE itself (`WHERE ... AND stock_quantity >= ?`), so a concurrent
//! writer cannot slip between check and write.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use caderno_core::Product;

use crate::error::{DbError, DbResult};

/// A product about to enter the catalog (no id yet).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock_quantity: i64,
}

/// Aggregate counters over the whole catalog, for the quick-stats panel.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct CatalogStats {
    pub product_count: i64,
    pub units_in_stock: i64,
    pub units_sold: i64,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product into the catalog and returns it with its id.
    pub async fn insert(&self, new: NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, stock_quantity, cumulative_sold, created_at)
            VALUES (?1, ?2, ?3, 0, ?4)
            "#,
        )
        .bind(&new.name)
        .bind(new.price_cents)
        .bind(new.stock_quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Fetches a product by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock_quantity, cumulative_sold, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id.to_string()))
    }

    /// Lists the whole catalog, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock_quantity, cumulative_sold, created_at
            FROM products
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists products with at least one unit on hand, for the register screen.
    pub async fn list_in_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock_quantity, cumulative_sold, created_at
            FROM products
            WHERE stock_quantity > 0
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Aggregate catalog counters in a single query.
    pub async fn stats(&self) -> DbResult<CatalogStats> {
        let stats = sqlx::query_as::<_, CatalogStats>(
            r#"
            SELECT
                COUNT(*)                           AS product_count,
                COALESCE(SUM(stock_quantity), 0)   AS units_in_stock,
                COALESCE(SUM(cumulative_sold), 0)  AS units_sold
            FROM products
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    // =========================================================================
    // Transaction Participants
    // =========================================================================

    /// Fetches a product inside a caller-owned transaction.
    ///
    /// Returns `None` when the id is unknown so the finalizer can raise its
    /// own domain error with the request context.
    pub async fn fetch(&self, conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock_quantity, cumulative_sold, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }

    /// Applies a sale to a product: stock down, cumulative sold up.
    ///
    /// The `stock_quantity >= ?` guard makes the decrement atomic with its
    /// precondition. Returns `false` (zero rows touched) when the product is
    /// gone or the stock no longer covers the quantity, in which case the
    /// caller must roll back.
    pub async fn apply_sale(
        &self,
        conn: &mut SqliteConnection,
        product_id: i64,
        quantity: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?1,
                cumulative_sold = cumulative_sold + ?1
            WHERE id = ?2 AND stock_quantity >= ?1
            "#,
        )
        .bind(quantity)
        .bind(product_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn parafuso() -> NewProduct {
        NewProduct {
            name: "parafuso".to_string(),
            price_cents: 15,
            stock_quantity: 100,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let product = db.products().insert(parafuso()).await.unwrap();

        assert!(product.id > 0);
        assert_eq!(product.name, "parafuso");
        assert_eq!(product.price_cents, 15);
        assert_eq!(product.stock_quantity, 100);
        assert_eq!(product.cumulative_sold, 0);

        let fetched = db.products().get_by_id(product.id).await.unwrap();
        assert_eq!(fetched.name, product.name);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let db = test_db().await;
        let err = db.products().get_by_id(999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_in_stock_excludes_empty() {
        let db = test_db().await;
        db.products().insert(parafuso()).await.unwrap();
        db.products()
            .insert(NewProduct {
                name: "porca".to_string(),
                price_cents: 10,
                stock_quantity: 0,
            })
            .await
            .unwrap();

        let in_stock = db.products().list_in_stock().await.unwrap();
        assert_eq!(in_stock.len(), 1);
        assert_eq!(in_stock[0].name, "parafuso");
    }

    #[tokio::test]
    async fn test_apply_sale_decrements_and_accumulates() {
        let db = test_db().await;
        let product = db.products().insert(parafuso()).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let ok = db
            .products()
            .apply_sale(&mut tx, product.id, 15)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert!(ok);

        let after = db.products().get_by_id(product.id).await.unwrap();
        assert_eq!(after.stock_quantity, 85);
        assert_eq!(after.cumulative_sold, 15);
    }

    #[tokio::test]
    async fn test_apply_sale_refuses_oversell() {
        let db = test_db().await;
        let product = db.products().insert(parafuso()).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let ok = db
            .products()
            .apply_sale(&mut tx, product.id, 101)
            .await
            .unwrap();
        assert!(!ok);
        tx.rollback().await.unwrap();

        let after = db.products().get_by_id(product.id).await.unwrap();
        assert_eq!(after.stock_quantity, 100);
        assert_eq!(after.cumulative_sold, 0);
    }

    #[tokio::test]
    async fn test_stats() {
        let db = test_db().await;
        db.products().insert(parafuso()).await.unwrap();
        db.products()
            .insert(NewProduct {
                name: "porca".to_string(),
                price_cents: 10,
                stock_quantity: 50,
            })
            .await
            .unwrap();

        let stats = db.products().stats().await.unwrap();
        assert_eq!(stats.product_count, 2);
        assert_eq!(stats.units_in_stock, 150);
        assert_eq!(stats.units_sold, 0);
    }
}
