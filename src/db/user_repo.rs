// src/db/user_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{User, UserClaim},
};

/// Persistência das contas de usuário e das suas claims.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Busca pelo e-mail já normalizado (trim + minúsculas).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Cria a conta. E-mail duplicado vira `AppError::IdentityErrors`.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    async fn claims_for(&self, user_id: Uuid) -> Result<Vec<UserClaim>, AppError>;

    /// Conta uma falha de senha. Ao atingir `max_attempts` o contador zera e
    /// a conta fica bloqueada até `lockout_until`. Devolve o `lockout_end` atual.
    async fn record_failed_access(
        &self,
        user_id: Uuid,
        max_attempts: i32,
        lockout_until: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, AppError>;

    async fn reset_access_failed(&self, user_id: Uuid) -> Result<(), AppError>;
}

pub fn duplicate_email_message(email: &str) -> String {
    format!("O e-mail '{}' já está em uso.", email)
}

// O repositório de usuários, responsável pelas tabelas 'users' e 'user_claims'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, access_failed_count, lockout_end, created_at, updated_at";

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_user)
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte violação de chave única em erro do provedor de identidade
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::IdentityErrors(vec![duplicate_email_message(email)]);
                }
            }
            e.into()
        })
    }

    async fn claims_for(&self, user_id: Uuid) -> Result<Vec<UserClaim>, AppError> {
        let claims = sqlx::query_as::<_, UserClaim>(
            "SELECT claim_type, claim_value FROM user_claims WHERE user_id = $1 ORDER BY claim_type",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(claims)
    }

    async fn record_failed_access(
        &self,
        user_id: Uuid,
        max_attempts: i32,
        lockout_until: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, AppError> {
        // No SET, as colunas ainda têm os valores antigos
        let lockout_end: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            UPDATE users SET
                access_failed_count = CASE
                    WHEN access_failed_count + 1 >= $2 THEN 0
                    ELSE access_failed_count + 1
                END,
                lockout_end = CASE
                    WHEN access_failed_count + 1 >= $2 THEN $3
                    ELSE lockout_end
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING lockout_end
            "#,
        )
        .bind(user_id)
        .bind(max_attempts)
        .bind(lockout_until)
        .fetch_one(&self.pool)
        .await?;

        Ok(lockout_end)
    }

    async fn reset_access_failed(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET access_failed_count = 0, lockout_end = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
