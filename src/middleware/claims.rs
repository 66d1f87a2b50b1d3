// src/middleware/claims.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, middleware::auth::AuthenticatedUser};

/// Uma política que exige a presença de uma claim no token.
pub trait ClaimDef: Send + Sync + 'static {
    fn claim_type() -> &'static str;
}

/// Guardião de claim. Roda depois do `auth_guard`: sem usuário é 401,
/// usuário sem a claim é 403.
pub struct RequireClaim<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireClaim<T>
where
    T: ClaimDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        let required = T::claim_type();
        if !user.has_claim(required) {
            tracing::warn!(user_id = %user.id, claim = required, "Acesso negado: claim ausente");
            return Err(AppError::MissingClaim(required.to_string()));
        }

        Ok(RequireClaim(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS POLÍTICAS
// ---

pub struct ExcluirFornecedor;
impl ClaimDef for ExcluirFornecedor {
    fn claim_type() -> &'static str {
        "ExcluirFornecedor"
    }
}
