// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Principal};

/// Escopo de empresa da requisição. Vem exclusivamente do business_id do
/// token; sem empresa, nenhuma operação de catálogo ou estoque é aceita.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope(pub Uuid);

impl TryFrom<&Principal> for TenantScope {
    type Error = AppError;

    fn try_from(principal: &Principal) -> Result<Self, Self::Error> {
        principal.business_id.map(TenantScope).ok_or_else(|| {
            AppError::Forbidden("Nenhuma empresa vinculada a este usuário.".into())
        })
    }
}

impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        TenantScope::try_from(&principal)
    }
}
