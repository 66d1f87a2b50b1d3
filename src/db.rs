pub mod fornecedor_repo;
pub use fornecedor_repo::{FornecedorRepository, FornecedorStore};
pub mod user_repo;
pub use user_repo::{duplicate_email_message, UserRepository, UserStore};
