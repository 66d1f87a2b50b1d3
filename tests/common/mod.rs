#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use minimal_fornecedor::{
    common::error::AppError,
    config::{AppState, JwtSettings},
    db::{duplicate_email_message, FornecedorStore, UserStore},
    models::{
        auth::{User, UserClaim},
        fornecedor::Fornecedor,
    },
    routes::create_router,
};

pub const JWT_SECRET: &str = "segredo-de-teste";

// ---
// Stores em memória
// ---

#[derive(Default)]
pub struct MemoryFornecedorStore {
    rows: Mutex<Vec<Fornecedor>>,
    // Simula o banco devolvendo zero linhas afetadas
    pub zero_rows_on_write: AtomicBool,
}

impl MemoryFornecedorStore {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: Uuid) -> Option<Fornecedor> {
        self.rows.lock().unwrap().iter().find(|f| f.id == id).cloned()
    }

    pub fn seed(&self, nome: &str, documento: &str) -> Fornecedor {
        let fornecedor = Fornecedor {
            id: Uuid::new_v4(),
            nome: nome.to_string(),
            documento: documento.to_string(),
            ativo: true,
        };
        self.rows.lock().unwrap().push(fornecedor.clone());
        fornecedor
    }

    fn zero_rows(&self) -> bool {
        self.zero_rows_on_write.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FornecedorStore for MemoryFornecedorStore {
    async fn list(&self) -> Result<Vec<Fornecedor>, AppError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Fornecedor>, AppError> {
        Ok(self.get(id))
    }

    async fn insert(&self, fornecedor: &Fornecedor) -> Result<u64, AppError> {
        if self.zero_rows() {
            return Ok(0);
        }
        self.rows.lock().unwrap().push(fornecedor.clone());
        Ok(1)
    }

    async fn update(&self, fornecedor: &Fornecedor) -> Result<u64, AppError> {
        if self.zero_rows() {
            return Ok(0);
        }
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|f| f.id == fornecedor.id) {
            Some(existing) => {
                *existing = fornecedor.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        if self.zero_rows() {
            return Ok(0);
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|f| f.id != id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
    claims: Mutex<HashMap<Uuid, Vec<UserClaim>>>,
}

impl MemoryUserStore {
    pub fn grant_claim(&self, email: &str, claim_type: &str, claim_value: &str) {
        let user_id = self.users.lock().unwrap()[email].id;
        self.claims
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(UserClaim {
                claim_type: claim_type.to_string(),
                claim_value: claim_value.to_string(),
            });
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.user(email))
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(email) {
            return Err(AppError::IdentityErrors(vec![duplicate_email_message(email)]));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            access_failed_count: 0,
            lockout_end: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn claims_for(&self, user_id: Uuid) -> Result<Vec<UserClaim>, AppError> {
        Ok(self
            .claims
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn record_failed_access(
        &self,
        user_id: Uuid,
        max_attempts: i32,
        lockout_until: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .values_mut()
            .find(|u| u.id == user_id)
            .ok_or(AppError::WriteFailed)?;

        if user.access_failed_count + 1 >= max_attempts {
            user.access_failed_count = 0;
            user.lockout_end = Some(lockout_until);
        } else {
            user.access_failed_count += 1;
        }
        Ok(user.lockout_end)
    }

    async fn reset_access_failed(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.values_mut().find(|u| u.id == user_id) {
            user.access_failed_count = 0;
            user.lockout_end = None;
        }
        Ok(())
    }
}

// ---
// Aplicação de teste
// ---

pub struct TestApp {
    pub router: Router,
    pub fornecedores: Arc<MemoryFornecedorStore>,
    pub users: Arc<MemoryUserStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: JWT_SECRET.to_string(),
        expiration_hours: 1,
        issuer: "minimal-fornecedor".to_string(),
        audience: "https://localhost".to_string(),
    }
}

impl TestApp {
    pub fn new() -> Self {
        let fornecedores = Arc::new(MemoryFornecedorStore::default());
        let users = Arc::new(MemoryUserStore::default());
        // Custo mínimo do bcrypt para os testes não ficarem lentos
        let app_state = AppState::new(fornecedores.clone(), users.clone(), jwt_settings(), 4);

        Self {
            router: create_router(app_state, false),
            fornecedores,
            users,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Registra a conta e devolve o accessToken.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/registro",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "registro falhou: {}", response.body);
        response.body["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/login",
            Some(serde_json::json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Conta comum, sem claims.
    pub async fn user_token(&self) -> String {
        self.register("usuario@teste.com", "Secret123!").await
    }

    /// Conta com a claim ExcluirFornecedor; o token é emitido depois da concessão.
    pub async fn admin_token(&self) -> String {
        self.register("admin@teste.com", "Secret123!").await;
        self.users
            .grant_claim("admin@teste.com", "ExcluirFornecedor", "Excluir");
        let response = self.login("admin@teste.com", "Secret123!").await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["accessToken"].as_str().unwrap().to_string()
    }
}
