#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use portfolio_api::{
    AppConfig, AppState, MemoryRepository, create_router,
    models::AdminIdentity,
    notify::{MockNotifier, NotifierState},
    repository::{Repository, RepositoryState},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "owner@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryRepository>,
    pub notifier: Option<Arc<MockNotifier>>,
    pub config: AppConfig,
}

/// An app over a fresh in-memory store, with one provisioned admin.
pub async fn spawn_app(notifier: Option<MockNotifier>) -> TestApp {
    let repo = Arc::new(MemoryRepository::new());
    seed_admin(repo.as_ref(), ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let notifier = notifier.map(Arc::new);
    let config = AppConfig::default();
    let state = AppState {
        repo: repo.clone() as RepositoryState,
        notifier: notifier.clone().map(|n| n as NotifierState),
        config: config.clone(),
    };

    TestApp {
        router: create_router(state),
        repo,
        notifier,
        config,
    }
}

pub async fn seed_admin(repo: &dyn Repository, email: &str, password: &str) -> AdminIdentity {
    // Minimum bcrypt cost keeps the suite fast.
    let password_hash = portfolio_api::auth::hash_password(password, 4).unwrap();
    repo.insert_admin(AdminIdentity {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash,
    })
    .await
    .unwrap()
}

impl TestApp {
    pub async fn request(
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
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn login(&self) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/admin/login",
                None,
                Some(serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn project_payload(title: &str) -> Value {
    serde_json::json!({
        "title": title,
        "description": "A thing I built",
        "techStack": ["Rust", "Axum"],
        "links": { "repo": "https://github.com/me/thing", "demo": "https://thing.example.com" },
        "images": [],
        "category": "Web"
    })
}
