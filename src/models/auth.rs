// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use utoipa::ToSchema;

// Papéis de usuário: gravados no Postgres como o enum `user_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::User => "user",
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub business_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // ID do usuário
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<Uuid>,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Identidade autenticada da requisição, derivada do token verificado.
/// Nunca é persistida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub business_id: Option<Uuid>,
    pub role: Role,
    pub email: String,
    pub expires_at: i64,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            business_id: claims.business_id,
            role: claims.role,
            email: claims.email,
            expires_at: claims.exp,
        }
    }
}

// Papéis aceitos no cadastro público. Funcionários só são criados por um admin.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SignupRole {
    Admin,
    #[default]
    User,
}

impl From<SignupRole> for Role {
    fn from(role: SignupRole) -> Self {
        match role {
            SignupRole::Admin => Role::Admin,
            SignupRole::User => Role::User,
        }
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Ana")]
    pub first_name: String,

    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    #[schema(example = "Souza")]
    pub last_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ana@acme.com")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[serde(default)]
    pub role: SignupRole,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "A senha atual é obrigatória."))]
    pub old_password: String,
    #[validate(length(min = 6, message = "A nova senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSummary {
    pub id: Uuid,
    pub name: String,
}

// GET /api/users/profile
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub business: Option<BusinessSummary>,
}

// GET /api/session
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub business_id: Option<Uuid>,
    pub expires_in: i64, // segundos até a expiração do token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_defaults_to_plain_user() {
        let payload: SignupPayload = serde_json::from_str(
            r#"{"firstName":"Ana","lastName":"Souza","email":"ana@acme.com","password":"segredo"}"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(Role::from(payload.role), Role::User);
    }

    #[test]
    fn signup_cannot_ask_for_employee_role() {
        let result: Result<SignupPayload, _> = serde_json::from_str(
            r#"{"firstName":"Ana","lastName":"Souza","email":"ana@acme.com","password":"segredo","role":"employee"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn short_password_and_bad_email_fail_validation() {
        let payload = SignupPayload {
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            email: "nao-e-email".into(),
            password: "123".into(),
            role: SignupRole::User,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn principal_carries_claims() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            business_id: None,
            email: "e@x.com".into(),
            role: Role::Employee,
            iat: 1,
            exp: 2,
        };
        let principal = Principal::from(claims.clone());
        assert_eq!(principal.user_id, claims.sub);
        assert_eq!(principal.business_id, None);
        assert_eq!(principal.expires_at, 2);
    }
}
