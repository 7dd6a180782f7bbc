// src/db/inventory_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{Sale, SaleDetail, StockEntry, StockEntryDetail},
};

// Histórico de estoque (entradas e vendas). As escritas sempre rodam dentro
// da transação que também altera o saldo do produto.
#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Escrita (transacional)
    // ---

    pub async fn insert_stock_entry<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<StockEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, StockEntry>(
            r#"
            INSERT INTO stock_entries (business_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, business_id, product_id, quantity, added_at
            "#,
        )
        .bind(business_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn insert_sale<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        total: Decimal,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (business_id, product_id, quantity, total)
            VALUES ($1, $2, $3, $4)
            RETURNING id, business_id, product_id, quantity, total, sold_at
            "#,
        )
        .bind(business_id)
        .bind(product_id)
        .bind(quantity)
        .bind(total)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    /// Exclusão lógica de todas as vendas da empresa. O saldo dos produtos não é restaurado.
    pub async fn purge_sales(&self, business_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE sales SET deleted_at = NOW() WHERE business_id = $1 AND deleted_at IS NULL",
        )
        .bind(business_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Leitura
    // ---

    /// Vendas mais recentes primeiro; `limit = None` traz todas.
    pub async fn list_sales(&self, business_id: Uuid, limit: Option<i64>) -> Result<Vec<SaleDetail>, AppError> {
        let sales = sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT s.id, s.product_id, p.name AS product_name, s.quantity, s.total, s.sold_at
            FROM sales s
            JOIN products p ON p.id = s.product_id
            WHERE s.business_id = $1 AND s.deleted_at IS NULL
            ORDER BY s.sold_at DESC
            LIMIT $2
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    pub async fn list_stock_entries(&self, business_id: Uuid) -> Result<Vec<StockEntryDetail>, AppError> {
        let entries = sqlx::query_as::<_, StockEntryDetail>(
            r#"
            SELECT e.id, e.product_id, p.name AS product_name, e.quantity, e.added_at
            FROM stock_entries e
            JOIN products p ON p.id = e.product_id
            WHERE e.business_id = $1 AND e.deleted_at IS NULL
            ORDER BY e.added_at DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn stock_entries_for_product(
        &self,
        business_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<StockEntry>, AppError> {
        let entries = sqlx::query_as::<_, StockEntry>(
            r#"
            SELECT id, business_id, product_id, quantity, added_at
            FROM stock_entries
            WHERE business_id = $1 AND product_id = $2 AND deleted_at IS NULL
            ORDER BY added_at ASC
            "#,
        )
        .bind(business_id)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
