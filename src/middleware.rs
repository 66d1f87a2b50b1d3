pub mod auth;
pub mod claims;
