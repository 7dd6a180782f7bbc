// src/services/auth.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        password::{hash_password, verify_password},
    },
    db::{BusinessRepository, UserRepository},
    models::auth::{
        BusinessSummary, CreateEmployeePayload, Principal, ProfileResponse, Role, SessionResponse,
        SignupPayload, User,
    },
    services::token::TokenCodec,
};

const INVALID_CREDENTIALS: &str = "E-mail ou senha inválidos.";

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    business_repo: BusinessRepository,
    token_codec: TokenCodec,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        business_repo: BusinessRepository,
        token_codec: TokenCodec,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, business_repo, token_codec, pool }
    }

    /// Cadastro público. A conta nasce sem empresa.
    pub async fn signup(&self, payload: &SignupPayload) -> Result<String, AppError> {
        let hashed_password = hash_password(&payload.password).await?;

        let user = self
            .user_repo
            .create_user(
                &self.pool,
                payload.first_name.trim(),
                payload.last_name.trim(),
                &payload.email,
                &hashed_password,
                Role::from(payload.role),
                None,
            )
            .await?;

        tracing::info!("👤 Novo usuário cadastrado: {} ({})", user.email, user.role.as_str());
        Ok(self.token_codec.issue_for(&user)?)
    }

    /// E-mail inexistente e senha errada produzem o mesmo erro.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthenticated(INVALID_CREDENTIALS.into()))?;

        if !verify_password(password, &user.password_hash).await? {
            tracing::warn!("Tentativa de login com senha inválida para {}", email);
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
        }

        Ok(self.token_codec.issue_for(&user)?)
    }

    async fn current_user(&self, principal: &Principal) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(principal.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Usuário não encontrado.".into()))
    }

    pub async fn profile(&self, principal: &Principal) -> Result<ProfileResponse, AppError> {
        let user = self.current_user(principal).await?;

        let business = match user.business_id {
            Some(business_id) => self
                .business_repo
                .find_by_id(business_id)
                .await?
                .map(|b| BusinessSummary { id: b.id, name: b.name }),
            None => None,
        };

        Ok(ProfileResponse { user, business })
    }

    pub async fn change_password(
        &self,
        principal: &Principal,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.current_user(principal).await?;

        if !verify_password(old_password, &user.password_hash).await? {
            return Err(AppError::Unauthenticated("Senha atual incorreta.".into()));
        }

        let hashed_password = hash_password(new_password).await?;
        self.user_repo.update_password(user.id, &hashed_password).await?;

        tracing::info!("🔑 Senha alterada para o usuário {}", user.id);
        Ok(())
    }

    /// Cria um funcionário já vinculado à empresa do admin.
    pub async fn create_employee(
        &self,
        business_id: Uuid,
        payload: &CreateEmployeePayload,
    ) -> Result<User, AppError> {
        let hashed_password = hash_password(&payload.password).await?;

        let employee = self
            .user_repo
            .create_user(
                &self.pool,
                payload.first_name.trim(),
                payload.last_name.trim(),
                &payload.email,
                &hashed_password,
                Role::Employee,
                Some(business_id),
            )
            .await?;

        tracing::info!("👥 Funcionário {} criado na empresa {}", employee.email, business_id);
        Ok(employee)
    }

    /// Confirma que a conta ainda existe e informa quanto falta para o token expirar.
    pub async fn session(&self, principal: &Principal) -> Result<SessionResponse, AppError> {
        let user = self.current_user(principal).await?;

        Ok(SessionResponse {
            user_id: user.id,
            email: user.email,
            role: principal.role,
            business_id: principal.business_id,
            expires_in: (principal.expires_at - Utc::now().timestamp()).max(0),
        })
    }
}
