// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::JwtSettings,
    db::{duplicate_email_message, UserStore},
    models::auth::{Claims, User, UserResponse, UserToken},
};

pub const MAX_FAILED_ACCESS_ATTEMPTS: i32 = 5;
pub const LOCKOUT_MINUTES: i64 = 5;

/// Fronteira com o subsistema de identidade: criação de conta, verificação
/// de credenciais e emissão/validação de tokens. Os handlers só falam com ele.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtSettings,
    bcrypt_cost: u32,
    // Hash usado quando o e-mail não existe, para o tempo de resposta não revelar a conta
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtSettings, bcrypt_cost: u32) -> Self {
        Self {
            users,
            jwt,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn register_account(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        let policy_errors = check_password_policy(password);
        if !policy_errors.is_empty() {
            return Err(AppError::IdentityErrors(policy_errors));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::IdentityErrors(vec![duplicate_email_message(&email)]));
        }

        // Hashing fora do runtime assíncrono
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // A constraint UNIQUE ainda cobre cadastros simultâneos
        let user = self.users.create_user(&email, &hashed_password).await?;
        tracing::info!(user_id = %user.id, "Nova conta registrada");
        Ok(user)
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            // Mesmo custo de bcrypt de uma conta existente
            let dummy_hash = self.dummy_hash().await?;
            check_password(password, dummy_hash).await?;
            return Err(AppError::InvalidCredentials);
        };

        if user.is_locked_out(Utc::now()) {
            return Err(AppError::LockedOut);
        }

        let is_password_valid = check_password(password, &user.password_hash).await?;

        if !is_password_valid {
            let lockout_until = Utc::now() + chrono::Duration::minutes(LOCKOUT_MINUTES);
            let lockout_end = self
                .users
                .record_failed_access(user.id, MAX_FAILED_ACCESS_ATTEMPTS, lockout_until)
                .await?;

            if lockout_end.is_some_and(|end| end > Utc::now()) {
                tracing::warn!(user_id = %user.id, "Conta bloqueada por tentativas inválidas");
                return Err(AppError::LockedOut);
            }
            return Err(AppError::InvalidCredentials);
        }

        if user.access_failed_count > 0 || user.lockout_end.is_some() {
            self.users.reset_access_failed(user.id).await?;
        }

        Ok(user)
    }

    async fn dummy_hash(&self) -> Result<&str, AppError> {
        let cost = self.bcrypt_cost;
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| async move {
                let hashed = tokio::task::spawn_blocking(move || hash("senha-inexistente", cost))
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
                Ok::<_, AppError>(hashed)
            })
            .await?;
        Ok(dummy.as_str())
    }

    pub async fn issue_token(&self, user: &User) -> Result<UserResponse, AppError> {
        let user_claims = self.users.claims_for(user.id).await?;

        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.jwt.expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            jti: Uuid::new_v4(),
            iss: self.jwt.issuer.clone(),
            aud: self.jwt.audience.clone(),
            exp: expires_at.timestamp() as usize,
            nbf: now.timestamp() as usize,
            iat: now.timestamp() as usize,
            claims: user_claims
                .iter()
                .map(|c| (c.claim_type.clone(), c.claim_value.clone()))
                .collect(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.as_bytes()),
        )?;

        Ok(UserResponse {
            access_token,
            expires_in: (expires_at - now).num_seconds(),
            user_token: UserToken {
                id: user.id,
                email: user.email.clone(),
                claims: user_claims,
            },
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.jwt.issuer]);
        validation.set_audience(&[&self.jwt.audience]);
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }
}

// Executa a verificação em um thread separado
async fn check_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let password_hash_clone = password_hash.to_owned();

    let is_valid =
        tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

    Ok(is_valid)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Regras de senha do provedor de identidade. Todas as violações são
/// reportadas juntas.
pub fn check_password_policy(password: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < 6 {
        errors.push("A senha deve ter no mínimo 6 caracteres.".to_string());
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        errors.push("A senha deve conter ao menos um caractere não alfanumérico.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("A senha deve conter ao menos um dígito ('0'-'9').".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        errors.push("A senha deve conter ao menos uma letra minúscula ('a'-'z').".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        errors.push("A senha deve conter ao menos uma letra maiúscula ('A'-'Z').".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;

    use crate::models::auth::UserClaim;

    // Store sem nenhuma conta cadastrada
    struct NoUsers;

    #[async_trait]
    impl UserStore for NoUsers {
        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AppError> {
            Ok(None)
        }

        async fn create_user(&self, _email: &str, _password_hash: &str) -> Result<User, AppError> {
            Err(AppError::WriteFailed)
        }

        async fn claims_for(&self, _user_id: Uuid) -> Result<Vec<UserClaim>, AppError> {
            Ok(Vec::new())
        }

        async fn record_failed_access(
            &self,
            _user_id: Uuid,
            _max_attempts: i32,
            _lockout_until: DateTime<Utc>,
        ) -> Result<Option<DateTime<Utc>>, AppError> {
            Ok(None)
        }

        async fn reset_access_failed(&self, _user_id: Uuid) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn service() -> AuthService {
        let jwt = JwtSettings {
            secret: "segredo-de-teste".into(),
            expiration_hours: 1,
            issuer: "minimal-fornecedor".into(),
            audience: "https://localhost".into(),
        };
        AuthService::new(Arc::new(NoUsers), jwt, 4)
    }

    #[tokio::test]
    async fn unknown_email_still_pays_for_a_bcrypt_verify() {
        let service = service();
        assert!(!service.dummy_hash.initialized());

        let result = service.verify_credentials("ninguem@b.com", "Secret123!").await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
        assert!(service.dummy_hash.initialized());
    }

    #[tokio::test]
    async fn dummy_hash_is_computed_once() {
        let service = service();

        let first = service.dummy_hash().await.unwrap().to_owned();
        let second = service.dummy_hash().await.unwrap().to_owned();

        assert_eq!(first, second);
        assert!(!verify("Secret123!", &first).unwrap());
    }

    #[test]
    fn strong_password_passes_policy() {
        assert!(check_password_policy("Secret123!").is_empty());
    }

    #[test]
    fn weak_password_reports_every_rule() {
        let errors = check_password_policy("abc");
        // tamanho, especial, dígito e maiúscula
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  A@B.Com "), "a@b.com");
    }
}
