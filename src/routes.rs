// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o router da aplicação. GETs são públicos; escritas passam pelo
/// `auth_guard` e o DELETE ainda exige a claim `ExcluirFornecedor`.
pub fn create_router(app_state: AppState, with_swagger: bool) -> Router {
    let auth = axum_middleware::from_fn_with_state(app_state.clone(), auth_guard);

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/registro", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let fornecedor_routes = Router::new()
        .route(
            "/fornecedor",
            get(handlers::fornecedor::list_fornecedores).merge(
                post(handlers::fornecedor::create_fornecedor).route_layer(auth.clone()),
            ),
        )
        .route(
            "/fornecedor/{id}",
            get(handlers::fornecedor::get_fornecedor).merge(
                put(handlers::fornecedor::update_fornecedor)
                    .delete(handlers::fornecedor::delete_fornecedor)
                    .route_layer(auth),
            ),
        );

    let mut app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(auth_routes)
        .merge(fornecedor_routes);

    if with_swagger {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app.with_state(app_state)
}
