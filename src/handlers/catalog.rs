// src/handlers/catalog.rs

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
    models::catalog::{
        Category, CategoryPayload, InventoryValue, LowStockCount, Product, ProductCount, ProductPayload,
    },
};

// ---
// Categorias
// ---

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Catalog",
    responses((status = 200, description = "Categorias da empresa", body = Vec<Category>)),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = app_state.catalog_service.list_categories(business_id).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Catalog",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 409, description = "Categoria já existe nesta empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state
        .catalog_service
        .create_category(business_id, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_category(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, AppError> {
    let category = app_state.catalog_service.get_category(business_id, id).await?;
    Ok(Json(category))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Categoria renomeada", body = Category),
        (status = 404, description = "Categoria não encontrada"),
        (status = 409, description = "Nome já usado por outra categoria")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    payload.validate()?;

    let category = app_state
        .catalog_service
        .update_category(business_id, id, &payload.name)
        .await?;

    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 204, description = "Categoria excluída"),
        (status = 404, description = "Categoria não encontrada"),
        (status = 409, description = "Categoria ainda possui produtos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.catalog_service.delete_category(business_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/products",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Produtos da categoria", body = Vec<Product>),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn category_products(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = app_state.catalog_service.category_products(business_id, id).await?;
    Ok(Json(products))
}

// ---
// Produtos
// ---

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    responses((status = 200, description = "Produtos da empresa", body = Vec<Product>)),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = app_state.catalog_service.list_products(business_id).await?;
    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Catalog",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Produto criado com a entrada inicial de estoque", body = Product),
        (status = 404, description = "Categoria não encontrada"),
        (status = 409, description = "Produto já existe nesta categoria")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.catalog_service.create_product(business_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = app_state.catalog_service.get_product(business_id, id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto ou categoria não encontrados"),
        (status = 409, description = "Produto já existe nesta categoria")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .update_product(business_id, id, &payload)
        .await?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto excluído"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.catalog_service.delete_product(business_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Indicadores
// ---

#[utoipa::path(
    get,
    path = "/api/products/total",
    tag = "Catalog",
    responses((status = 200, description = "Quantidade de produtos cadastrados", body = ProductCount)),
    security(("api_jwt" = []))
)]
pub async fn count_products(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<ProductCount>, AppError> {
    let total = app_state.catalog_service.count_products(business_id).await?;
    Ok(Json(ProductCount { total }))
}

#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    tag = "Catalog",
    responses((status = 200, description = "Quantidade de produtos com estoque baixo", body = LowStockCount)),
    security(("api_jwt" = []))
)]
pub async fn low_stock_count(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<LowStockCount>, AppError> {
    let count = app_state.catalog_service.low_stock_count(business_id).await?;
    Ok(Json(count))
}

#[utoipa::path(
    get,
    path = "/api/products/low-stock-items",
    tag = "Catalog",
    responses((status = 200, description = "Produtos com estoque baixo", body = Vec<Product>)),
    security(("api_jwt" = []))
)]
pub async fn low_stock_items(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = app_state.catalog_service.low_stock_items(business_id).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/total-value",
    tag = "Catalog",
    responses((status = 200, description = "Valor total do estoque (preço x quantidade)", body = InventoryValue)),
    security(("api_jwt" = []))
)]
pub async fn total_value(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<InventoryValue>, AppError> {
    let total_value = app_state.catalog_service.total_value(business_id).await?;
    Ok(Json(InventoryValue { total_value }))
}
