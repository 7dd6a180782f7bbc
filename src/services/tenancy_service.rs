// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        password::{hash_password, verify_password},
    },
    db::{BusinessRepository, UserRepository},
    models::{
        auth::{BusinessSummary, Principal, User},
        tenancy::{BusinessMember, BusinessSessionResponse},
    },
    services::token::TokenCodec,
};

#[derive(Clone)]
pub struct TenantService {
    business_repo: BusinessRepository,
    user_repo: UserRepository,
    token_codec: TokenCodec,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl TenantService {
    pub fn new(
        business_repo: BusinessRepository,
        user_repo: UserRepository,
        token_codec: TokenCodec,
        pool: PgPool,
    ) -> Self {
        Self { business_repo, user_repo, token_codec, pool }
    }

    /// Cria a empresa e, na mesma transação, vincula o criador a ela.
    /// Devolve um token novo: o antigo não carrega o business_id.
    pub async fn create_business(
        &self,
        principal: &Principal,
        name: &str,
        password: &str,
    ) -> Result<BusinessSessionResponse, AppError> {
        if self.business_repo.find_by_name(name).await?.is_some() {
            return Err(AppError::Conflict(format!("A empresa '{}' já existe.", name)));
        }

        let hashed_password = hash_password(password).await?;

        let mut tx = self.pool.begin().await?;

        let business = self
            .business_repo
            .create_business(&mut *tx, name, &hashed_password)
            .await?;

        let owner = self
            .user_repo
            .set_business(&mut *tx, principal.user_id, business.id)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Usuário não encontrado.".into()))?;

        tx.commit().await?;

        tracing::info!("🏢 Empresa '{}' criada por {}", business.name, owner.email);

        self.session_for(&owner, BusinessSummary { id: business.id, name: business.name })
    }

    /// Segundo fator: confirma a senha da empresa à qual o usuário já pertence.
    pub async fn login_business(
        &self,
        principal: &Principal,
        name: &str,
        password: &str,
    ) -> Result<BusinessSessionResponse, AppError> {
        let user = self.current_user(principal).await?;

        let business = match user.business_id {
            Some(business_id) => self.business_repo.find_by_id(business_id).await?,
            None => None,
        }
        .filter(|b| b.name == name)
        .ok_or_else(|| AppError::Forbidden("Você não pertence a esta empresa.".into()))?;

        if !verify_password(password, &business.password_hash).await? {
            tracing::warn!("Senha de empresa inválida para '{}' (usuário {})", name, user.id);
            return Err(AppError::Unauthenticated("Senha da empresa inválida.".into()));
        }

        self.session_for(&user, BusinessSummary { id: business.id, name: business.name })
    }

    /// Vincula um usuário existente à empresa do admin.
    // Não confere o vínculo atual do alvo: um usuário (inclusive admin) de
    // outra empresa é transferido para esta. Questão em aberto, ver DESIGN.md.
    pub async fn assign_user(&self, business_id: Uuid, target_user_id: Uuid) -> Result<User, AppError> {
        let user = self
            .user_repo
            .set_business(&self.pool, target_user_id, business_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))?;

        tracing::info!("🔗 Usuário {} vinculado à empresa {}", user.id, business_id);
        Ok(user)
    }

    pub async fn change_business_password(
        &self,
        business_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let business = self
            .business_repo
            .find_by_id(business_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Empresa não encontrada.".into()))?;

        if !verify_password(old_password, &business.password_hash).await? {
            return Err(AppError::Unauthenticated("Senha atual da empresa incorreta.".into()));
        }

        let hashed_password = hash_password(new_password).await?;
        self.business_repo.update_password(business.id, &hashed_password).await?;

        tracing::info!("🔑 Senha da empresa {} alterada", business.id);
        Ok(())
    }

    pub async fn my_business(&self, business_id: Uuid) -> Result<BusinessSummary, AppError> {
        self.business_repo
            .find_by_id(business_id)
            .await?
            .map(|b| BusinessSummary { id: b.id, name: b.name })
            .ok_or_else(|| AppError::NotFound("Empresa não encontrada.".into()))
    }

    pub async fn list_members(&self, business_id: Uuid) -> Result<Vec<BusinessMember>, AppError> {
        self.user_repo.list_by_business(business_id).await
    }

    async fn current_user(&self, principal: &Principal) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(principal.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Usuário não encontrado.".into()))
    }

    fn session_for(&self, user: &User, business: BusinessSummary) -> Result<BusinessSessionResponse, AppError> {
        let token = self.token_codec.issue_for(user)?;
        Ok(BusinessSessionResponse { token, business })
    }
}
