// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- 1. Categorias ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(ignore)]
    pub business_id: Uuid,
    #[schema(example = "Bebidas")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Produtos ---
// `quantity` é o saldo atual e é a fonte da verdade; o histórico fica em
// stock_entries e sales.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub business_id: Uuid,
    pub category_id: Uuid,
    #[schema(example = "Chips")]
    pub name: String,
    pub description: String,
    #[schema(example = 50)]
    pub quantity: i32,
    #[schema(value_type = f64, example = 2.00)]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Agregados do painel de produtos
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCount {
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockCount {
    pub low_stock: i64,
    pub threshold: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValue {
    #[schema(value_type = f64)]
    pub total_value: Decimal,
}

// ---
// Validação Customizada
// ---
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// Limites de `products.price NUMERIC(12, 2)`: até 10 dígitos inteiros e 2 casas.
const PRICE_INTEGER_DIGITS: u32 = 10;
const PRICE_SCALE: u32 = 2;

pub(crate) fn validate_price(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;

    if *val >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
        let mut err = ValidationError::new("range");
        err.message = Some("O preço excede o valor máximo permitido.".into());
        return Err(err);
    }
    if val.normalize().scale() > PRICE_SCALE {
        let mut err = ValidationError::new("scale");
        err.message = Some("O preço aceita no máximo 2 casas decimais.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(length(min = 2, max = 50, message = "O nome deve ter entre 2 e 50 caracteres."))]
    #[schema(example = "Snacks")]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub category_id: Uuid,

    #[validate(length(min = 1, max = 120, message = "O nome é obrigatório."))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64)]
    pub price: Decimal,
}
