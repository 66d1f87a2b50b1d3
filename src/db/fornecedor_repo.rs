// src/db/fornecedor_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_write_error, error::AppError},
    models::fornecedor::Fornecedor,
};

/// Acesso à tabela 'fornecedores'. Toda escrita devolve o número de linhas
/// afetadas; quem chama decide o que zero significa.
#[async_trait]
pub trait FornecedorStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Fornecedor>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Fornecedor>, AppError>;

    async fn insert(&self, fornecedor: &Fornecedor) -> Result<u64, AppError>;

    /// Substituição completa de nome, documento e ativo.
    async fn update(&self, fornecedor: &Fornecedor) -> Result<u64, AppError>;

    async fn delete(&self, id: Uuid) -> Result<u64, AppError>;
}

// O repositório de fornecedores sobre o Postgres
#[derive(Clone)]
pub struct FornecedorRepository {
    pool: PgPool,
}

impl FornecedorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FornecedorStore for FornecedorRepository {
    async fn list(&self) -> Result<Vec<Fornecedor>, AppError> {
        let fornecedores = sqlx::query_as::<_, Fornecedor>(
            "SELECT id, nome, documento, ativo FROM fornecedores",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(fornecedores)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Fornecedor>, AppError> {
        let maybe_fornecedor = sqlx::query_as::<_, Fornecedor>(
            "SELECT id, nome, documento, ativo FROM fornecedores WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_fornecedor)
    }

    async fn insert(&self, fornecedor: &Fornecedor) -> Result<u64, AppError> {
        let result = sqlx::query(
            "INSERT INTO fornecedores (id, nome, documento, ativo) VALUES ($1, $2, $3, $4)",
        )
        .bind(fornecedor.id)
        .bind(&fornecedor.nome)
        .bind(&fornecedor.documento)
        .bind(fornecedor.ativo)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected())
    }

    async fn update(&self, fornecedor: &Fornecedor) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE fornecedores
            SET nome = $2, documento = $3, ativo = $4
            WHERE id = $1
            "#,
        )
        .bind(fornecedor.id)
        .bind(&fornecedor.nome)
        .bind(&fornecedor.documento)
        .bind(fornecedor.ativo)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM fornecedores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected())
    }
}
