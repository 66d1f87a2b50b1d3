// src/models/fornecedor.rs

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Representa um fornecedor vindo da tabela 'fornecedores'
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fornecedor {
    pub id: Uuid,

    #[schema(example = "Acme Ltda")]
    pub nome: String,

    #[schema(example = "12345678901234")]
    pub documento: String,

    pub ativo: bool,
}

impl Fornecedor {
    /// Monta o registro a partir de um payload que já passou por `validate()`.
    pub fn from_payload(id: Uuid, payload: FornecedorPayload) -> Self {
        Self {
            id,
            nome: payload.nome.unwrap_or_default(),
            documento: payload.documento.unwrap_or_default(),
            ativo: payload.ativo.unwrap_or(true),
        }
    }
}

// Corpo de criação e de atualização (substituição completa).
// O `id` nunca vem do cliente: na criação é gerado, na atualização vem da rota.
// Campo ausente ou `null` vira `None` e cai no `required`, nunca em erro de parse.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FornecedorPayload {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "O campo Nome é obrigatório."),
        length(
            min = 1,
            max = 200,
            message = "O campo Nome é obrigatório e deve ter no máximo 200 caracteres."
        )
    )]
    #[schema(value_type = String, example = "Acme Ltda")]
    pub nome: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "O campo Documento é obrigatório."),
        length(
            min = 1,
            max = 14,
            message = "O campo Documento é obrigatório e deve ter no máximo 14 caracteres."
        )
    )]
    #[schema(value_type = String, example = "12345678901234")]
    pub documento: Option<String>,

    // `null` ou ausente: ativo
    #[serde(default)]
    pub ativo: Option<bool>,
}

// Espaços nas pontas são descartados; texto em branco vira "" e falha no `length`
fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()))
}
