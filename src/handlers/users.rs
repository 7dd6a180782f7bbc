// src/handlers/users.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{AdminRole, RequireRole},
        tenancy::TenantScope,
    },
    models::{
        auth::{ChangePasswordPayload, CreateEmployeePayload, Principal, ProfileResponse, User},
        tenancy::BusinessMember,
    },
};

#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    responses((status = 200, description = "Perfil do usuário logado", body = ProfileResponse)),
    security(("api_jwt" = []))
)]
pub async fn profile(
    State(app_state): State<AppState>,
    principal: Principal,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = app_state.auth_service.profile(&principal).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/users/business",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários da empresa", body = Vec<BusinessMember>),
        (status = 403, description = "Usuário sem empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn business_users(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<Vec<BusinessMember>>, AppError> {
    let members = app_state.tenant_service.list_members(business_id).await?;
    Ok(Json(members))
}

#[utoipa::path(
    post,
    path = "/api/users/change-password",
    tag = "Users",
    request_body = ChangePasswordPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 401, description = "Senha atual incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    principal: Principal,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    app_state
        .auth_service
        .change_password(&principal, &payload.old_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/users/employees",
    tag = "Users",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Funcionário criado", body = User),
        (status = 403, description = "Apenas administradores com empresa"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    RequireRole(admin, _): RequireRole<AdminRole>,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    let TenantScope(business_id) = TenantScope::try_from(&admin)?;
    payload.validate()?;

    let employee = app_state
        .auth_service
        .create_employee(business_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}
