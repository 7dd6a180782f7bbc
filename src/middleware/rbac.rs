// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Principal, Role},
};

/// Política de autorização: função pura do papel do Principal, sem I/O.
pub fn authorize(principal: &Principal, required: Role) -> Result<(), AppError> {
    if principal.role != required {
        return Err(AppError::Forbidden(format!(
            "Apenas usuários com o papel '{}' podem realizar esta ação.",
            required.as_str()
        )));
    }
    Ok(())
}

/// 1. O Trait que define qual papel uma rota exige
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> Role;
}

/// 2. O Extractor (Guardião). Entrega o Principal já autorizado.
pub struct RequireRole<R: RoleDef>(pub Principal, pub PhantomData<R>);

impl<R, S> FromRequestParts<S> for RequireRole<R>
where
    R: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        authorize(&principal, R::role())?;
        Ok(RequireRole(principal, PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AdminRole;
impl RoleDef for AdminRole {
    fn role() -> Role {
        Role::Admin
    }
}
