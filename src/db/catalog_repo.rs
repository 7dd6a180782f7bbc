// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        catalog::{Category, Product},
        inventory::ProductForSale,
    },
};

const PRODUCT_COLUMNS: &str =
    "id, business_id, category_id, name, description, quantity, price, created_at, updated_at";

/// Campos graváveis de um produto.
pub struct ProductFields<'a> {
    pub category_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub quantity: i32,
    pub price: Decimal,
}

// Todas as consultas recebem o business_id e filtram por ele: nenhuma linha
// de outra empresa é visível a partir deste repositório.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Categorias
    // ---

    pub async fn list_categories(&self, business_id: Uuid) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, business_id, name, created_at, updated_at
            FROM categories
            WHERE business_id = $1 AND deleted_at IS NULL
            ORDER BY name ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_category(&self, business_id: Uuid, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, business_id, name, created_at, updated_at
            FROM categories
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    /// Existe outra categoria ativa com o mesmo nome (sem diferenciar caixa)?
    pub async fn category_name_taken(
        &self,
        business_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM categories
                WHERE business_id = $1
                  AND LOWER(name) = LOWER($2)
                  AND ($3::uuid IS NULL OR id <> $3)
                  AND deleted_at IS NULL
            )
            "#,
        )
        .bind(business_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn create_category(&self, business_id: Uuid, name: &str) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (business_id, name)
            VALUES ($1, $2)
            RETURNING id, business_id, name, created_at, updated_at
            "#,
        )
        .bind(business_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::unique_or_db(e, format!("A categoria '{}' já existe.", name)))
    }

    pub async fn rename_category(
        &self,
        business_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = $3, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            RETURNING id, business_id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(business_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::unique_or_db(e, format!("A categoria '{}' já existe.", name)))
    }

    /// Trava a categoria com `FOR UPDATE` (exclusão). Retorna `false` se ela não existe.
    pub async fn lock_category_exclusive<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM categories
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(business_id)
        .fetch_optional(executor)
        .await?;
        Ok(row.is_some())
    }

    /// Trava a categoria com `FOR SHARE`: produtos podem entrar em paralelo,
    /// mas a categoria não pode ser excluída até o fim da transação.
    pub async fn lock_category_shared<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM categories
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            FOR SHARE
            "#,
        )
        .bind(id)
        .bind(business_id)
        .fetch_optional(executor)
        .await?;
        Ok(row.is_some())
    }

    pub async fn count_products_in_category<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        category_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products
            WHERE business_id = $1 AND category_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(business_id)
        .bind(category_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    pub async fn soft_delete_category<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE categories SET deleted_at = NOW()
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(business_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Produtos
    // ---

    pub async fn list_products(&self, business_id: Uuid) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE business_id = $1 AND deleted_at IS NULL
            ORDER BY name ASC
            "#
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn list_products_in_category(
        &self,
        business_id: Uuid,
        category_id: Uuid,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE business_id = $1 AND category_id = $2 AND deleted_at IS NULL
            ORDER BY name ASC
            "#
        ))
        .bind(business_id)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn find_product(&self, business_id: Uuid, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    /// Lê o produto com `FOR UPDATE`. Deve ser chamado dentro de uma transação:
    /// a trava vale até o commit/rollback.
    pub async fn lock_product<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#
        ))
        .bind(id)
        .bind(business_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn product_name_taken<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        category_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM products
                WHERE business_id = $1
                  AND category_id = $2
                  AND LOWER(name) = LOWER($3)
                  AND ($4::uuid IS NULL OR id <> $4)
                  AND deleted_at IS NULL
            )
            "#,
        )
        .bind(business_id)
        .bind(category_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(executor)
        .await?;
        Ok(taken)
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        fields: &ProductFields<'_>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (business_id, category_id, name, description, quantity, price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(business_id)
        .bind(fields.category_id)
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.quantity)
        .bind(fields.price)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            AppError::unique_or_db(e, format!("O produto '{}' já existe nesta categoria.", fields.name))
        })
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        id: Uuid,
        fields: &ProductFields<'_>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET category_id = $3, name = $4, description = $5, quantity = $6, price = $7,
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(business_id)
        .bind(fields.category_id)
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.quantity)
        .bind(fields.price)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            AppError::unique_or_db(e, format!("O produto '{}' já existe nesta categoria.", fields.name))
        })
    }

    /// Soma `delta` ao saldo. O CHECK (quantity >= 0) da tabela barra qualquer
    /// saldo negativo que escape da verificação do serviço.
    pub async fn adjust_quantity<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        id: Uuid,
        delta: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET quantity = quantity + $3, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(business_id)
        .bind(delta)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn soft_delete_product(&self, business_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE products SET deleted_at = NOW()
            WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(business_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Agregados
    // ---

    pub async fn count_products(&self, business_id: Uuid) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE business_id = $1 AND deleted_at IS NULL",
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn count_low_stock(&self, business_id: Uuid, threshold: i32) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products
            WHERE business_id = $1 AND quantity <= $2 AND deleted_at IS NULL
            "#,
        )
        .bind(business_id)
        .bind(threshold)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn low_stock_products(&self, business_id: Uuid, threshold: i32) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE business_id = $1 AND quantity <= $2 AND deleted_at IS NULL
            ORDER BY quantity ASC, name ASC
            "#
        ))
        .bind(business_id)
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn total_value(&self, business_id: Uuid) -> Result<Decimal, AppError> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(price * quantity), 0)::NUMERIC FROM products
            WHERE business_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn products_for_sale(&self, business_id: Uuid) -> Result<Vec<ProductForSale>, AppError> {
        let products = sqlx::query_as::<_, ProductForSale>(
            r#"
            SELECT id, name, price, quantity FROM products
            WHERE business_id = $1 AND deleted_at IS NULL
            ORDER BY name ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }
}
