// src/config.rs

use anyhow::Context;
use sqlx::PgPool;
use std::{env, sync::Arc};

use crate::{
    db::{BusinessRepository, CatalogRepository, InventoryRepository, ReportRepository, UserRepository},
    services::{
        auth::AuthService, catalog_service::CatalogService, inventory_service::InventoryService,
        report_service::ReportService, tenancy_service::TenantService, token::TokenCodec,
    },
};

/// Configuração do processo, lida uma única vez na inicialização.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub token_ttl_hours: i64,
    pub low_stock_threshold: i32,
    pub db_max_connections: u32,
    pub cors_origin: String,
    pub cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET não pode ser vazio");
        }

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080".to_string())?,
            token_ttl_hours: env_or("TOKEN_TTL_HOURS", 24)?,
            low_stock_threshold: env_or("LOW_STOCK_THRESHOLD", 10)?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5)?,
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:3000".to_string())?,
            cookie_secure: env_or("COOKIE_SECURE", true)?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Valor inválido para {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub token_codec: TokenCodec,
    pub auth_service: AuthService,
    pub tenant_service: TenantService,
    pub catalog_service: CatalogService,
    pub inventory_service: InventoryService,
    pub report_service: ReportService,
}

impl AppState {
    /// Monta o gráfico de dependências sobre uma pool já aberta.
    pub fn new(db_pool: PgPool, config: Config) -> Self {
        let config = Arc::new(config);
        let token_codec = TokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl_hours);

        let user_repo = UserRepository::new(db_pool.clone());
        let business_repo = BusinessRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            business_repo.clone(),
            token_codec.clone(),
            db_pool.clone(),
        );
        let tenant_service = TenantService::new(business_repo, user_repo, token_codec.clone(), db_pool.clone());
        let catalog_service = CatalogService::new(
            catalog_repo.clone(),
            inventory_repo.clone(),
            config.low_stock_threshold,
            db_pool.clone(),
        );
        let inventory_service = InventoryService::new(inventory_repo, catalog_repo, db_pool.clone());
        let report_service = ReportService::new(report_repo, config.low_stock_threshold);

        Self {
            db_pool,
            config,
            token_codec,
            auth_service,
            tenant_service,
            catalog_service,
            inventory_service,
            report_service,
        }
    }
}
