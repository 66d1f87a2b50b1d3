// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Fornecedor ---
        handlers::fornecedor::list_fornecedores,
        handlers::fornecedor::get_fornecedor,
        handlers::fornecedor::create_fornecedor,
        handlers::fornecedor::update_fornecedor,
        handlers::fornecedor::delete_fornecedor,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
    ),
    components(
        schemas(
            models::fornecedor::Fornecedor,
            models::fornecedor::FornecedorPayload,

            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UserResponse,
            models::auth::UserToken,
            models::auth::UserClaim,
        )
    ),
    tags(
        (name = "Fornecedor", description = "Cadastro de Fornecedores"),
        (name = "Auth", description = "Autenticação e Registro")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
