use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const WRITE_FAILED_MESSAGE: &str = "Houve um problema ao salvar o registro";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Usuário ou senha inválidos";
pub const LOCKED_OUT_MESSAGE: &str = "Usuário temporariamente bloqueado por tentativas inválidas";

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo que nem chega a ser um payload (JSON quebrado, tipo errado, content-type)
    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Registro não encontrado")]
    NotFound,

    // Zero linhas afetadas ou violação de constraint: o cliente recebe a mesma mensagem
    #[error("Falha ao gravar o registro")]
    WriteFailed,

    // Erros reportados pelo provedor de identidade (e-mail duplicado, senha fraca...)
    #[error("Erros de identidade: {0:?}")]
    IdentityErrors(Vec<String>),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Usuário bloqueado")]
    LockedOut,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Claim ausente: {0}")]
    MissingClaim(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidBody(rejection) => {
                tracing::warn!("Corpo rejeitado: {}", rejection.body_text());
                let body = Json(json!({
                    "error": "O corpo da requisição é inválido.",
                    "details": { "body": [rejection.body_text()] },
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            AppError::IdentityErrors(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            AppError::WriteFailed => (StatusCode::BAD_REQUEST, WRITE_FAILED_MESSAGE.to_string()),
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            AppError::LockedOut => (StatusCode::BAD_REQUEST, LOCKED_OUT_MESSAGE.to_string()),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::MissingClaim(claim) => (
                StatusCode::FORBIDDEN,
                format!("Você precisa da claim '{}' para realizar esta ação.", claim),
            ),

            // Todos os outros erros viram 500; o detalhe só vai para o log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
