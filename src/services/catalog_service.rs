// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{catalog_repo::ProductFields, CatalogRepository, InventoryRepository},
    models::catalog::{Category, LowStockCount, Product, ProductPayload},
};

/// Nomes são gravados sem espaços nas pontas; a comparação de unicidade
/// (sem diferenciar caixa) fica a cargo do banco.
pub fn normalize_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("O nome é obrigatório.".into()));
    }
    Ok(name.to_string())
}

/// Nome de categoria já aparado, com 2 a 50 caracteres.
pub fn category_name(raw: &str) -> Result<String, AppError> {
    let name = normalize_name(raw)?;
    if !(2..=50).contains(&name.chars().count()) {
        return Err(AppError::InvalidInput(
            "O nome deve ter entre 2 e 50 caracteres.".into(),
        ));
    }
    Ok(name)
}

/// Quanto entra no histórico ao editar o saldo diretamente. Reduções não
/// geram entrada: saídas devem passar pelas vendas.
pub fn restock_delta(old_quantity: i32, new_quantity: i32) -> Option<i32> {
    let delta = new_quantity - old_quantity;
    (delta > 0).then_some(delta)
}

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    inventory_repo: InventoryRepository,
    low_stock_threshold: i32,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(
        catalog_repo: CatalogRepository,
        inventory_repo: InventoryRepository,
        low_stock_threshold: i32,
        pool: PgPool,
    ) -> Self {
        Self { catalog_repo, inventory_repo, low_stock_threshold, pool }
    }

    // ---
    // Categorias
    // ---

    pub async fn list_categories(&self, business_id: Uuid) -> Result<Vec<Category>, AppError> {
        self.catalog_repo.list_categories(business_id).await
    }

    pub async fn get_category(&self, business_id: Uuid, id: Uuid) -> Result<Category, AppError> {
        self.catalog_repo
            .find_category(business_id, id)
            .await?
            .ok_or_else(category_not_found)
    }

    pub async fn create_category(&self, business_id: Uuid, raw_name: &str) -> Result<Category, AppError> {
        let name = category_name(raw_name)?;

        if self.catalog_repo.category_name_taken(business_id, &name, None).await? {
            return Err(AppError::Conflict(format!("A categoria '{}' já existe.", name)));
        }

        let category = self.catalog_repo.create_category(business_id, &name).await?;
        tracing::info!("📁 Categoria '{}' criada na empresa {}", category.name, business_id);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        business_id: Uuid,
        id: Uuid,
        raw_name: &str,
    ) -> Result<Category, AppError> {
        let name = category_name(raw_name)?;

        // Confirma a existência antes da unicidade: id de outra empresa é 404.
        self.get_category(business_id, id).await?;

        if self.catalog_repo.category_name_taken(business_id, &name, Some(id)).await? {
            return Err(AppError::Conflict(format!("A categoria '{}' já existe.", name)));
        }

        self.catalog_repo
            .rename_category(business_id, id, &name)
            .await?
            .ok_or_else(category_not_found)
    }

    /// Contagem e exclusão acontecem com a categoria travada (`FOR UPDATE`);
    /// a criação de produtos trava a mesma linha em modo compartilhado.
    pub async fn delete_category(&self, business_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if !self.catalog_repo.lock_category_exclusive(&mut *tx, business_id, id).await? {
            return Err(category_not_found());
        }

        let dependents = self
            .catalog_repo
            .count_products_in_category(&mut *tx, business_id, id)
            .await?;
        if dependents > 0 {
            return Err(AppError::Conflict(format!(
                "A categoria possui {} produto(s) e não pode ser excluída.",
                dependents
            )));
        }

        self.catalog_repo.soft_delete_category(&mut *tx, business_id, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Categoria {} excluída da empresa {}", id, business_id);
        Ok(())
    }

    pub async fn category_products(&self, business_id: Uuid, category_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.get_category(business_id, category_id).await?;
        self.catalog_repo.list_products_in_category(business_id, category_id).await
    }

    // ---
    // Produtos
    // ---

    pub async fn list_products(&self, business_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.catalog_repo.list_products(business_id).await
    }

    pub async fn get_product(&self, business_id: Uuid, id: Uuid) -> Result<Product, AppError> {
        self.catalog_repo
            .find_product(business_id, id)
            .await?
            .ok_or_else(product_not_found)
    }

    /// Produto e entrada inicial de estoque são gravados na mesma transação.
    pub async fn create_product(&self, business_id: Uuid, payload: &ProductPayload) -> Result<Product, AppError> {
        payload.validate()?;
        let name = normalize_name(&payload.name)?;
        let fields = ProductFields {
            category_id: payload.category_id,
            name: &name,
            description: payload.description.trim(),
            quantity: payload.quantity,
            price: payload.price,
        };

        let mut tx = self.pool.begin().await?;

        if !self
            .catalog_repo
            .lock_category_shared(&mut *tx, business_id, fields.category_id)
            .await?
        {
            return Err(category_not_found());
        }

        if self
            .catalog_repo
            .product_name_taken(&mut *tx, business_id, fields.category_id, &name, None)
            .await?
        {
            return Err(AppError::Conflict(format!("O produto '{}' já existe nesta categoria.", name)));
        }

        let product = self.catalog_repo.create_product(&mut *tx, business_id, &fields).await?;

        if product.quantity > 0 {
            self.inventory_repo
                .insert_stock_entry(&mut *tx, business_id, product.id, product.quantity)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("📦 Produto '{}' criado com {} unidade(s)", product.name, product.quantity);
        Ok(product)
    }

    /// Atualiza o produto com a linha travada. Um aumento de saldo gera uma
    /// entrada de estoque pelo delta, na mesma transação.
    pub async fn update_product(
        &self,
        business_id: Uuid,
        id: Uuid,
        payload: &ProductPayload,
    ) -> Result<Product, AppError> {
        payload.validate()?;
        let name = normalize_name(&payload.name)?;
        let fields = ProductFields {
            category_id: payload.category_id,
            name: &name,
            description: payload.description.trim(),
            quantity: payload.quantity,
            price: payload.price,
        };

        let mut tx = self.pool.begin().await?;

        let current = self
            .catalog_repo
            .lock_product(&mut *tx, business_id, id)
            .await?
            .ok_or_else(product_not_found)?;

        let category_changed = current.category_id != fields.category_id;
        if category_changed
            && !self
                .catalog_repo
                .lock_category_shared(&mut *tx, business_id, fields.category_id)
                .await?
        {
            return Err(category_not_found());
        }

        if (category_changed || current.name != name)
            && self
                .catalog_repo
                .product_name_taken(&mut *tx, business_id, fields.category_id, &name, Some(id))
                .await?
        {
            return Err(AppError::Conflict(format!("O produto '{}' já existe nesta categoria.", name)));
        }

        let updated = self.catalog_repo.update_product(&mut *tx, business_id, id, &fields).await?;

        if let Some(delta) = restock_delta(current.quantity, updated.quantity) {
            self.inventory_repo
                .insert_stock_entry(&mut *tx, business_id, id, delta)
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete_product(&self, business_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if self.catalog_repo.soft_delete_product(business_id, id).await? == 0 {
            return Err(product_not_found());
        }
        tracing::info!("🗑️ Produto {} excluído da empresa {}", id, business_id);
        Ok(())
    }

    // ---
    // Agregados
    // ---

    pub async fn count_products(&self, business_id: Uuid) -> Result<i64, AppError> {
        self.catalog_repo.count_products(business_id).await
    }

    pub async fn low_stock_count(&self, business_id: Uuid) -> Result<LowStockCount, AppError> {
        let low_stock = self
            .catalog_repo
            .count_low_stock(business_id, self.low_stock_threshold)
            .await?;
        Ok(LowStockCount { low_stock, threshold: self.low_stock_threshold })
    }

    pub async fn low_stock_items(&self, business_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.catalog_repo
            .low_stock_products(business_id, self.low_stock_threshold)
            .await
    }

    pub async fn total_value(&self, business_id: Uuid) -> Result<Decimal, AppError> {
        self.catalog_repo.total_value(business_id).await
    }
}

fn category_not_found() -> AppError {
    AppError::NotFound("Categoria não encontrada.".into())
}

fn product_not_found() -> AppError {
    AppError::NotFound("Produto não encontrado.".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_blank_is_rejected() {
        assert_eq!(normalize_name("  Snacks ").unwrap(), "Snacks");
        assert!(matches!(normalize_name("   "), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn category_length_is_checked_after_trimming() {
        assert!(matches!(category_name("  a "), Err(AppError::InvalidInput(_))));
        assert_eq!(category_name("  ab ").unwrap(), "ab");
        assert!(category_name(&format!(" {} ", "x".repeat(50))).is_ok());
        assert!(category_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn only_increases_are_ledgered() {
        assert_eq!(restock_delta(40, 60), Some(20));
        assert_eq!(restock_delta(60, 30), None);
        assert_eq!(restock_delta(30, 30), None);
    }
}
