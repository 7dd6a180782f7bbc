// src/handlers/tenancy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::auth::session_cookie,
    middleware::{
        rbac::{AdminRole, RequireRole},
        tenancy::TenantScope,
    },
    models::{
        auth::{BusinessSummary, Principal, User},
        tenancy::{
            AssignUserPayload, BusinessSessionResponse, ChangeBusinessPasswordPayload,
            CreateBusinessPayload, LoginBusinessPayload,
        },
    },
};

// Criação da empresa: o token devolvido (e gravado no cookie) já carrega o
// business_id e substitui o anterior.
#[utoipa::path(
    post,
    path = "/api/business",
    tag = "Tenancy",
    request_body = CreateBusinessPayload,
    responses(
        (status = 201, description = "Empresa criada e vinculada ao criador", body = BusinessSessionResponse),
        (status = 403, description = "Apenas administradores"),
        (status = 409, description = "Nome de empresa já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_business(
    State(app_state): State<AppState>,
    RequireRole(principal, _): RequireRole<AdminRole>,
    jar: CookieJar,
    Json(payload): Json<CreateBusinessPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = app_state
        .tenant_service
        .create_business(&principal, &payload.business_name, &payload.password)
        .await?;
    let jar = jar.add(session_cookie(&app_state.config, session.token.clone()));

    Ok((StatusCode::CREATED, jar, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/business/login",
    tag = "Tenancy",
    request_body = LoginBusinessPayload,
    responses(
        (status = 200, description = "Acesso à empresa confirmado", body = BusinessSessionResponse),
        (status = 401, description = "Senha da empresa inválida"),
        (status = 403, description = "Usuário não pertence à empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn login_business(
    State(app_state): State<AppState>,
    principal: Principal,
    jar: CookieJar,
    Json(payload): Json<LoginBusinessPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = app_state
        .tenant_service
        .login_business(&principal, &payload.business_name, &payload.password)
        .await?;
    let jar = jar.add(session_cookie(&app_state.config, session.token.clone()));

    Ok((jar, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/business/change-password",
    tag = "Tenancy",
    request_body = ChangeBusinessPasswordPayload,
    responses(
        (status = 204, description = "Senha da empresa alterada"),
        (status = 401, description = "Senha atual incorreta"),
        (status = 403, description = "Usuário sem empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_business_password(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Json(payload): Json<ChangeBusinessPasswordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    app_state
        .tenant_service
        .change_business_password(
            business_id,
            &payload.old_business_password,
            &payload.new_business_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/business",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Empresa do usuário logado", body = BusinessSummary),
        (status = 403, description = "Usuário sem empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn my_business(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
) -> Result<Json<BusinessSummary>, AppError> {
    let business = app_state.tenant_service.my_business(business_id).await?;
    Ok(Json(business))
}

#[utoipa::path(
    post,
    path = "/api/businesses/assign",
    tag = "Tenancy",
    request_body = AssignUserPayload,
    responses(
        (status = 200, description = "Usuário vinculado à empresa do admin", body = User),
        (status = 403, description = "Apenas administradores com empresa"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_user(
    State(app_state): State<AppState>,
    RequireRole(admin, _): RequireRole<AdminRole>,
    Json(payload): Json<AssignUserPayload>,
) -> Result<Json<User>, AppError> {
    let TenantScope(business_id) = TenantScope::try_from(&admin)?;

    let user = app_state
        .tenant_service
        .assign_user(business_id, payload.user_id)
        .await?;

    Ok(Json(user))
}
