//! Shared setup for router tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use roster_config::ServerConfig;
use roster_core::HealthCheck;
use roster_repository::InMemoryUserRepository;
use roster_rest::{create_router, AppState};
use roster_service::{InMemoryCache, UserListCache, UserServiceImpl};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// A router wired to in-memory backends.
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryUserRepository>,
    pub cache: InMemoryCache,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_health_checks(|cache| vec![Arc::new(cache.clone()) as Arc<dyn HealthCheck>])
    }

    pub fn with_health_checks<F>(checks: F) -> Self
    where
        F: FnOnce(&InMemoryCache) -> Vec<Arc<dyn HealthCheck>>,
    {
        let repo = Arc::new(InMemoryUserRepository::new());
        let cache = InMemoryCache::new();
        let service = UserServiceImpl::new(
            repo.clone(),
            UserListCache::new(Arc::new(cache.clone())),
            Duration::from_secs(60),
        );
        let state = AppState::new(Arc::new(service), checks(&cache));
        let router = create_router(state, &ServerConfig::default());

        Self {
            router,
            repo,
            cache,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("valid request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Creates a user and returns its id, read back from the list.
    pub async fn create_user(&self, name: &str, email: &str) -> i64 {
        let body = serde_json::json!({ "name": name, "email": email }).to_string();
        let response = self.post("/users", &body).await;
        assert_eq!(response.status, StatusCode::CREATED);

        let list = self.get("/users").await.json();
        list.as_array()
            .and_then(|users| users.iter().rev().find(|u| u["email"] == email))
            .and_then(|u| u["id"].as_i64())
            .expect("created user is listed")
    }
}
