//! Backend multiempresa de controle de estoque: empresas, usuários,
//! catálogo (categorias e produtos) e o livro-razão de entradas e vendas.

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

/// Monta o router completo da API sobre um estado já construído.
pub fn app_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login));

    // Rotas protegidas: todas passam pelo auth_guard. O escopo de empresa e o
    // papel são exigidos por extratores (TenantScope / RequireRole) em cada handler.
    let protected_routes = Router::new()
        // Empresa
        .route(
            "/business",
            post(handlers::tenancy::create_business).get(handlers::tenancy::my_business),
        )
        .route("/business/login", post(handlers::tenancy::login_business))
        .route(
            "/business/change-password",
            post(handlers::tenancy::change_business_password),
        )
        .route("/businesses/assign", post(handlers::tenancy::assign_user))
        // Usuários
        .route("/users/profile", get(handlers::users::profile))
        .route("/users/business", get(handlers::users::business_users))
        .route("/users/change-password", post(handlers::users::change_password))
        .route("/users/employees", post(handlers::users::create_employee))
        .route("/users/logout", post(handlers::auth::logout))
        .route("/session", get(handlers::auth::session))
        // Categorias
        .route(
            "/categories",
            get(handlers::catalog::list_categories).post(handlers::catalog::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::catalog::get_category)
                .put(handlers::catalog::update_category)
                .delete(handlers::catalog::delete_category),
        )
        .route("/categories/{id}/products", get(handlers::catalog::category_products))
        // Produtos
        .route(
            "/products",
            get(handlers::catalog::list_products).post(handlers::catalog::create_product),
        )
        .route("/products/total", get(handlers::catalog::count_products))
        .route("/products/low-stock", get(handlers::catalog::low_stock_count))
        .route("/products/low-stock-items", get(handlers::catalog::low_stock_items))
        .route("/products/total-value", get(handlers::catalog::total_value))
        .route(
            "/products/{id}",
            get(handlers::catalog::get_product)
                .put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        )
        .route(
            "/products/{id}/stock",
            post(handlers::inventory::add_stock).get(handlers::inventory::product_stock_history),
        )
        .route("/stock", get(handlers::inventory::list_stock_entries))
        // Vendas
        .route(
            "/sales",
            get(handlers::inventory::list_sales)
                .post(handlers::inventory::create_sale)
                .delete(handlers::inventory::delete_sale_records),
        )
        .route("/sales/products", get(handlers::inventory::products_for_sale))
        .route("/sales/last-five", get(handlers::inventory::last_five_sales))
        // Relatórios
        .route("/reports", post(handlers::reports::generate_report))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(cors_layer(&app_state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

// O front-end envia o cookie de sessão: CORS com credenciais exige origem explícita.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("CORS_ORIGIN inválida ('{}'); nenhuma origem externa será aceita", origin);
            layer
        }
    }
}
