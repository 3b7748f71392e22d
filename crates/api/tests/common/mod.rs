//! Router harness: in-memory database, real middleware, simulated authority.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono_tz::America::El_Salvador;
use fake::{Fake, faker::company::en::CompanyName};
use http_body_util::BodyExt;
use omnigest_api::{AppState, EmailWorker, create_router, worker::email_channel};
use omnigest_core::{
    auth::{Role, hash_password},
    authority::SimulatedTaxAuthority,
    receipt::HandlebarsReceiptRenderer,
};
use omnigest_db::{
    CompanyRepository, UserRepository,
    entities::companies,
    migration::{Migrator, MigratorTrait},
    repositories::{CreateCompanyInput, CreateUserInput, UserWithProfile},
};
use omnigest_shared::{EmailConfig, EmailService, JwtConfig, JwtService};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "clave-segura-123";

/// A router wired to a fresh database.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub worker: EmailWorker,
    pub email_receiver: mpsc::Receiver<Uuid>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let jwt_service = JwtService::new(JwtConfig {
            secret: "router-test-secret".to_string(),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 3600,
        });
        let (email_queue, email_receiver) = email_channel(16);
        let worker = EmailWorker::new(
            db.clone(),
            Arc::new(EmailService::new(EmailConfig {
                enabled: false,
                ..EmailConfig::default()
            })),
            Arc::new(HandlebarsReceiptRenderer::new(El_Salvador).unwrap()),
            El_Salvador,
        );

        let state = AppState {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            authority: Arc::new(SimulatedTaxAuthority),
            email_queue,
            timezone: El_Salvador,
            recent_limit: 10,
            default_page_size: 20,
        };

        Self {
            router: create_router(state.clone()),
            state,
            worker,
            email_receiver,
        }
    }

    pub fn db(&self) -> DatabaseConnection {
        self.state.conn()
    }

    pub async fn company(&self) -> companies::Model {
        let suffix = &Uuid::new_v4().simple().to_string()[..8];
        CompanyRepository::new(self.db())
            .create(CreateCompanyInput {
                name: CompanyName().fake(),
                nit: format!("0614-{suffix}"),
                nrc: format!("NRC-{suffix}"),
                address: "San Salvador".to_string(),
                phone: None,
                email: None,
                economic_activity: None,
                legal_representative: None,
            })
            .await
            .unwrap()
    }

    /// Creates a user with [`PASSWORD`].
    pub async fn user(&self, username: &str, role: Role, company_id: Option<Uuid>) -> UserWithProfile {
        UserRepository::new(self.db())
            .create(CreateUserInput {
                username: username.to_string(),
                password_hash: hash_password(PASSWORD).unwrap(),
                email: Some(format!("{username}@example.com")),
                role,
                company_id,
            })
            .await
            .unwrap()
    }

    /// Access token for a user, skipping the login round trip.
    pub fn token_for(&self, user: &UserWithProfile) -> String {
        let role = user.role().map(|r| r.as_str()).unwrap_or_default();
        self.state
            .jwt_service
            .generate_pair(user.user.id, user.company_id(), role)
            .unwrap()
            .access_token
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
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
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }
}
