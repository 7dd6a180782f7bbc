// src/db/report_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::report::ReportRow};

// Consultas somente de leitura que alimentam os relatórios. Cada uma devolve
// linhas já no formato final (data, produto, quantidade, preço, total).
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn sales_rows(
        &self,
        business_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ReportRow>, AppError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT TO_CHAR(s.sold_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
                   p.name AS product,
                   s.quantity,
                   p.price,
                   s.total AS total_value
            FROM sales s
            JOIN products p ON p.id = s.product_id
            WHERE s.business_id = $1
              AND s.sold_at BETWEEN $2 AND $3
              AND s.deleted_at IS NULL
            ORDER BY s.sold_at ASC
            "#,
        )
        .bind(business_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn added_stock_rows(
        &self,
        business_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ReportRow>, AppError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT TO_CHAR(e.added_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
                   p.name AS product,
                   e.quantity,
                   p.price,
                   (e.quantity * p.price)::NUMERIC AS total_value
            FROM stock_entries e
            JOIN products p ON p.id = e.product_id
            WHERE e.business_id = $1
              AND e.added_at BETWEEN $2 AND $3
              AND e.deleted_at IS NULL
            ORDER BY e.added_at ASC
            "#,
        )
        .bind(business_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Saldo atual; com `below = Some(n)` traz só os produtos com quantidade < n.
    pub async fn stock_rows(&self, business_id: Uuid, below: Option<i32>) -> Result<Vec<ReportRow>, AppError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT '' AS date,
                   name AS product,
                   quantity,
                   price,
                   (quantity * price)::NUMERIC AS total_value
            FROM products
            WHERE business_id = $1
              AND ($2::INTEGER IS NULL OR quantity < $2)
              AND deleted_at IS NULL
            ORDER BY name ASC
            "#,
        )
        .bind(business_id)
        .bind(below)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
