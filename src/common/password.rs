// src/common/password.rs

// Hash e verificação de senhas. O bcrypt roda fora do runtime assíncrono
// (spawn_blocking).

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::common::error::AppError;

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let hash_clone = password_hash.to_owned();

    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_is_one_way_and_verifies() {
        let digest = hash_password("p1-secreta").await.unwrap();
        assert_ne!(digest, "p1-secreta");
        assert!(verify_password("p1-secreta", &digest).await.unwrap());
        assert!(!verify_password("outra", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_digest_is_an_error_not_a_match() {
        assert!(verify_password("x", "nao-e-bcrypt").await.is_err());
    }
}
