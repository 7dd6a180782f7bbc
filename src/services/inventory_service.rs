// src/services/inventory_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, InventoryRepository},
    models::{
        catalog::Product,
        inventory::{ProductForSale, Sale, SaleDetail, StockEntry, StockEntryDetail},
    },
};

const RECENT_SALES: i64 = 5;

/// Uma venda não pode deixar o saldo negativo.
pub fn ensure_sufficient(available: i32, requested: i32) -> Result<(), AppError> {
    if requested > available {
        return Err(AppError::InsufficientStock { available, requested });
    }
    Ok(())
}

/// Saldo depois de uma entrada; o saldo é um INTEGER no banco.
pub fn restocked_quantity(available: i32, added: i32) -> Result<i32, AppError> {
    available.checked_add(added).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "A entrada de {} unidade(s) excede o saldo máximo permitido.",
            added
        ))
    })
}

/// Total da venda pelo preço unitário vigente no momento da venda.
/// `sales.total` é NUMERIC(14, 2): até 12 dígitos inteiros.
pub fn sale_total(unit_price: Decimal, quantity: i32) -> Result<Decimal, AppError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .filter(|total| *total < Decimal::from(10_i64.pow(12)))
        .ok_or_else(|| AppError::InvalidInput("O total da venda excede o valor máximo permitido.".into()))
}

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(inventory_repo: InventoryRepository, catalog_repo: CatalogRepository, pool: PgPool) -> Self {
        Self { inventory_repo, catalog_repo, pool }
    }

    /// Registra a venda e baixa o saldo na mesma transação. A linha do produto
    /// fica travada (`FOR UPDATE`) entre a conferência do saldo e a baixa, então
    /// duas vendas simultâneas não enxergam o mesmo saldo.
    pub async fn create_sale(&self, business_id: Uuid, product_id: Uuid, quantity: i32) -> Result<Sale, AppError> {
        if quantity <= 0 {
            return Err(AppError::InvalidInput("A quantidade vendida deve ser maior que zero.".into()));
        }

        let mut tx = self.pool.begin().await?;

        let product = self
            .catalog_repo
            .lock_product(&mut *tx, business_id, product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Produto não encontrado.".into()))?;

        ensure_sufficient(product.quantity, quantity)?;

        let total = sale_total(product.price, quantity)?;
        let sale = self
            .inventory_repo
            .insert_sale(&mut *tx, business_id, product_id, quantity, total)
            .await?;
        self.catalog_repo
            .adjust_quantity(&mut *tx, business_id, product_id, -quantity)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "💰 Venda registrada: {} x '{}' = {} (saldo {})",
            quantity,
            product.name,
            total,
            product.quantity - quantity
        );
        Ok(sale)
    }

    /// Entrada de estoque: soma ao saldo e grava o histórico na mesma transação.
    pub async fn add_stock(&self, business_id: Uuid, product_id: Uuid, quantity: i32) -> Result<Product, AppError> {
        if quantity <= 0 {
            return Err(AppError::InvalidInput("A quantidade adicionada deve ser maior que zero.".into()));
        }

        let mut tx = self.pool.begin().await?;

        let current = self
            .catalog_repo
            .lock_product(&mut *tx, business_id, product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Produto não encontrado.".into()))?;

        restocked_quantity(current.quantity, quantity)?;

        self.inventory_repo
            .insert_stock_entry(&mut *tx, business_id, product_id, quantity)
            .await?;
        let product = self
            .catalog_repo
            .adjust_quantity(&mut *tx, business_id, product_id, quantity)
            .await?;

        tx.commit().await?;

        tracing::info!("📥 Entrada de {} unidade(s) em '{}'", quantity, product.name);
        Ok(product)
    }

    /// Limpa o histórico de vendas da empresa. O saldo dos produtos não volta.
    pub async fn delete_sale_records(&self, business_id: Uuid) -> Result<u64, AppError> {
        let deleted = self.inventory_repo.purge_sales(business_id).await?;
        tracing::info!("🧹 {} venda(s) removida(s) do histórico da empresa {}", deleted, business_id);
        Ok(deleted)
    }

    pub async fn list_sales(&self, business_id: Uuid) -> Result<Vec<SaleDetail>, AppError> {
        self.inventory_repo.list_sales(business_id, None).await
    }

    pub async fn last_sales(&self, business_id: Uuid) -> Result<Vec<SaleDetail>, AppError> {
        self.inventory_repo.list_sales(business_id, Some(RECENT_SALES)).await
    }

    pub async fn products_for_sale(&self, business_id: Uuid) -> Result<Vec<ProductForSale>, AppError> {
        self.catalog_repo.products_for_sale(business_id).await
    }

    pub async fn list_stock_entries(&self, business_id: Uuid) -> Result<Vec<StockEntryDetail>, AppError> {
        self.inventory_repo.list_stock_entries(business_id).await
    }

    pub async fn product_stock_history(&self, business_id: Uuid, product_id: Uuid) -> Result<Vec<StockEntry>, AppError> {
        if self.catalog_repo.find_product(business_id, product_id).await?.is_none() {
            return Err(AppError::NotFound("Produto não encontrado.".into()));
        }
        self.inventory_repo.stock_entries_for_product(business_id, product_id).await
    }
}
