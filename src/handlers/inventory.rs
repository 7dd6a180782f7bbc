// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantScope,
    models::{
        catalog::Product,
        inventory::{
            AddStockPayload, ProductForSale, PurgeResult, Sale, SaleDetail, SellPayload, StockEntry,
            StockEntryDetail,
        },
    },
};

// ---
// Vendas
// ---

#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Inventory",
    request_body = SellPayload,
    responses(
        (status = 201, description = "Venda registrada e estoque baixado", body = Sale),
        (status = 404, description = "Produto não encontrado"),
        (status = 422, description = "Estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Json(payload): Json<SellPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sale = app_state
        .inventory_service
        .create_sale(business_id, payload.product_id, payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Inventory",
    responses((status = 200, description = "Histórico de vendas", body = Vec<SaleDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<Vec<SaleDetail>>, AppError> {
    let sales = app_state.inventory_service.list_sales(business_id).await?;
    Ok(Json(sales))
}

#[utoipa::path(
    get,
    path = "/api/sales/last-five",
    tag = "Inventory",
    responses((status = 200, description = "As cinco vendas mais recentes", body = Vec<SaleDetail>)),
    security(("api_jwt" = []))
)]
pub async fn last_five_sales(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<Vec<SaleDetail>>, AppError> {
    let sales = app_state.inventory_service.last_sales(business_id).await?;
    Ok(Json(sales))
}

#[utoipa::path(
    get,
    path = "/api/sales/products",
    tag = "Inventory",
    responses((status = 200, description = "Produtos disponíveis para venda", body = Vec<ProductForSale>)),
    security(("api_jwt" = []))
)]
pub async fn products_for_sale(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<Vec<ProductForSale>>, AppError> {
    let products = app_state.inventory_service.products_for_sale(business_id).await?;
    Ok(Json(products))
}

// Limpa o histórico; o saldo dos produtos não é restaurado.
#[utoipa::path(
    delete,
    path = "/api/sales",
    tag = "Inventory",
    responses((status = 200, description = "Histórico de vendas removido", body = PurgeResult)),
    security(("api_jwt" = []))
)]
pub async fn delete_sale_records(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<PurgeResult>, AppError> {
    let deleted = app_state.inventory_service.delete_sale_records(business_id).await?;
    Ok(Json(PurgeResult { deleted }))
}

// ---
// Entradas de estoque
// ---

#[utoipa::path(
    post,
    path = "/api/products/{id}/stock",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = AddStockPayload,
    responses(
        (status = 201, description = "Entrada registrada; retorna o produto com o novo saldo", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_stock(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .add_stock(business_id, id, payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/stock",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Entradas de estoque do produto", body = Vec<StockEntry>),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn product_stock_history(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StockEntry>>, AppError> {
    let entries = app_state
        .inventory_service
        .product_stock_history(business_id, id)
        .await?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/stock",
    tag = "Inventory",
    responses((status = 200, description = "Todas as entradas de estoque", body = Vec<StockEntryDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_stock_entries(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<Vec<StockEntryDetail>>, AppError> {
    let entries = app_state.inventory_service.list_stock_entries(business_id).await?;
    Ok(Json(entries))
}
