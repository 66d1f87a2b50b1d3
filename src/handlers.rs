pub mod auth;
pub mod fornecedor;
