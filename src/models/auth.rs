// src/models/auth.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

// Representa um usuário vindo do banco de dados. Nunca sai na resposta HTTP:
// o hash da senha e o estado de bloqueio ficam só aqui.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub access_failed_count: i32,
    pub lockout_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_end.is_some_and(|end| end > now)
    }
}

// Uma claim concedida a um usuário (tabela 'user_claims')
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct UserClaim {
    #[serde(rename = "type")]
    #[schema(example = "ExcluirFornecedor")]
    pub claim_type: String,

    #[serde(rename = "value")]
    #[schema(example = "Excluir")]
    pub claim_value: String,
}

// Dados para registro de um novo usuário
// Campos ausentes ou `null` viram `None` e caem no `required`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[serde(default)]
    #[validate(
        required(message = "O campo Email é obrigatório."),
        email(message = "O e-mail fornecido é inválido.")
    )]
    #[schema(value_type = String, example = "a@b.com")]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "O campo Password é obrigatório."),
        length(
            min = 6,
            max = 100,
            message = "A senha precisa ter entre 6 e 100 caracteres."
        )
    )]
    #[schema(value_type = String, example = "Secret123!")]
    pub password: Option<String>,

    #[serde(default)]
    pub confirm_password: Option<String>,
}

impl RegisterUserPayload {
    /// Validação dos campos + confirmação de senha, no mesmo formato de erro.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(confirm) = &self.confirm_password {
            if self.password.as_ref() != Some(confirm) {
                let mut err = ValidationError::new("must_match");
                err.message = Some("As senhas não conferem.".into());
                errors.add("confirmPassword", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[serde(default)]
    #[validate(
        required(message = "O campo Email é obrigatório."),
        email(message = "O e-mail fornecido é inválido.")
    )]
    #[schema(value_type = String, example = "a@b.com")]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "O campo Password é obrigatório."),
        length(min = 1, message = "O campo Password é obrigatório.")
    )]
    #[schema(value_type = String, example = "Secret123!")]
    pub password: Option<String>,
}

// Resposta de autenticação: token + dados do usuário
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub access_token: String,
    /// Validade do token em segundos
    pub expires_in: i64,
    pub user_token: UserToken,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserToken {
    pub id: Uuid,
    pub email: String,
    pub claims: Vec<UserClaim>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // Subject (ID do usuário)
    pub email: String,
    pub jti: Uuid,
    pub iss: String,
    pub aud: String,
    pub exp: usize, // Expiration time
    pub nbf: usize,
    pub iat: usize, // Issued At
    // Claims do usuário: tipo -> valor
    #[serde(default)]
    pub claims: BTreeMap<String, String>,
}
