// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::Role;

// ---
// Business (a "Empresa" / tenant)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    pub name: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Membro de uma empresa (sem dados sensíveis)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMember {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessPayload {
    #[validate(length(min = 1, max = 100, message = "O nome da empresa é obrigatório."))]
    #[schema(example = "Acme")]
    pub business_name: String,

    #[validate(length(min = 1, message = "A senha da empresa é obrigatória."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBusinessPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub business_name: String,

    #[validate(length(min = 1, message = "A senha da empresa é obrigatória."))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserPayload {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBusinessPasswordPayload {
    #[validate(length(min = 1, message = "A senha atual da empresa é obrigatória."))]
    pub old_business_password: String,

    #[validate(length(min = 1, message = "A nova senha da empresa é obrigatória."))]
    pub new_business_password: String,
}

// Resposta das operações que trocam o vínculo com a empresa: o token novo
// carrega o business_id e deve substituir o anterior.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSessionResponse {
    pub token: String,
    pub business: crate::models::auth::BusinessSummary,
}
