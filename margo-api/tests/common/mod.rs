/// Common test utilities for integration tests
///
/// Builds the real router over an in-memory store and a recording mailer,
/// plus a signed bearer token for a fresh user.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use margo_api::app::{build_router, AppState};
use margo_api::config::{ApiConfig, Config, DatabaseConfig, EmailConfig, JwtConfig};
use margo_shared::auth::jwt::{create_token, Claims};
use margo_shared::email::{EmailError, EmailSender, MarketingContact, TemplateEmail};
use margo_shared::store::MemoryStore;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Mailer that records every call
#[derive(Default)]
pub struct RecordingMailer {
    pub emails: Mutex<Vec<TemplateEmail>>,
    pub contacts: Mutex<Vec<MarketingContact>>,
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send_template(&self, email: TemplateEmail) -> Result<(), EmailError> {
        self.emails.lock().unwrap().push(email);
        Ok(())
    }

    async fn upsert_contact(&self, contact: MarketingContact) -> Result<(), EmailError> {
        self.contacts.lock().unwrap().push(contact);
        Ok(())
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub app: Router,
    pub user_id: Uuid,
    pub jwt_token: String,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        email: Some(EmailConfig {
            api_key: "SG.test".to_string(),
            from_email: "hello@margo.io".to_string(),
            welcome_template_id: "d-welcome".to_string(),
            list_id: "list-new-users".to_string(),
        }),
    }
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());

        let state = AppState::new(store.clone(), mailer.clone(), test_config());
        let app = build_router(state);

        let user_id = Uuid::new_v4();
        let jwt_token = token_for(user_id);

        Self {
            store,
            mailer,
            app,
            user_id,
            jwt_token,
        }
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends an authenticated request and returns status and JSON body
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_as(&self.auth_header(), method, uri, body).await
    }

    pub async fn send_as(
        &self,
        authorization: &str,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, authorization);

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        read_json(response).await
    }
}

pub fn token_for(user_id: Uuid) -> String {
    create_token(&Claims::new(user_id, "ada@example.com"), JWT_SECRET).unwrap()
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
