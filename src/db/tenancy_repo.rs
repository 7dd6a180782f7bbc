// src/db/tenancy_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::tenancy::Business};

#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comparação exata (sensível a maiúsculas/minúsculas).
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            SELECT id, name, password_hash, created_at, updated_at
            FROM businesses
            WHERE name = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(business)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            SELECT id, name, password_hash, created_at, updated_at
            FROM businesses
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(business)
    }

    /// Cria a empresa. O índice único em `name` é a última barreira contra
    /// duas criações simultâneas com o mesmo nome.
    pub async fn create_business<'e, E>(
        &self,
        executor: E,
        name: &str,
        password_hash: &str,
    ) -> Result<Business, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Business>(
            r#"
            INSERT INTO businesses (name, password_hash)
            VALUES ($1, $2)
            RETURNING id, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::unique_or_db(e, format!("A empresa '{}' já existe.", name)))
    }

    pub async fn update_password(&self, business_id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE businesses SET password_hash = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(business_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
