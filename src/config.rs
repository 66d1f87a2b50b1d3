// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{FornecedorRepository, FornecedorStore, UserRepository, UserStore},
    services::auth::AuthService,
};

/// Parâmetros de emissão e validação do JWT.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_addr: String,
    pub app_env: String,
    pub bcrypt_cost: u32,
    pub jwt: JwtSettings,
}

impl Settings {
    // Lê o ambiente (e o .env, se existir)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt = JwtSettings {
            secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            expiration_hours: parse_or("JWT_EXPIRATION_HOURS", 1)?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "minimal-fornecedor".to_string()),
            audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "https://localhost".to_string()),
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            jwt,
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} tem um valor inválido: '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Abre a pool de conexões com o Postgres.
pub async fn connect_database(settings: &Settings) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&settings.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub fornecedores: Arc<dyn FornecedorStore>,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(
        fornecedores: Arc<dyn FornecedorStore>,
        users: Arc<dyn UserStore>,
        jwt: JwtSettings,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            fornecedores,
            auth_service: AuthService::new(users, jwt, bcrypt_cost),
        }
    }

    // --- Monta o gráfico de dependências sobre o Postgres ---
    pub fn from_pool(db_pool: PgPool, settings: &Settings) -> Self {
        Self::new(
            Arc::new(FornecedorRepository::new(db_pool.clone())),
            Arc::new(UserRepository::new(db_pool)),
            settings.jwt.clone(),
            settings.bcrypt_cost,
        )
    }
}
