// src/handlers/reports.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantScope,
    models::report::{GenerateReportPayload, Report},
};

#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    request_body = GenerateReportPayload,
    responses(
        (status = 200, description = "Linhas do relatório", body = Report),
        (status = 400, description = "Tipo de relatório ou datas inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_report(
    State(app_state): State<AppState>,
    TenantScope(business_id): TenantScope,
    Json(payload): Json<GenerateReportPayload>,
) -> Result<Json<Report>, AppError> {
    let report = app_state.report_service.generate(business_id, &payload).await?;
    Ok(Json(report))
}
