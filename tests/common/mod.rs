#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bookshelf::{config::Config, router, session::SESSION_COOKIE_NAME, state::AppState};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// All `Set-Cookie` headers for the session cookie.
    pub fn session_set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter(|v| v.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_string)
            .collect()
    }

    /// The `name=value` pair of the session cookie, usable as a `Cookie` header.
    pub fn session_cookie(&self) -> Option<String> {
        self.session_set_cookies()
            .first()
            .and_then(|c| c.split(';').next())
            .map(str::to_string)
    }
}

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_vars(&[])
    }

    pub fn with_vars(extra: &[(&str, &str)]) -> Self {
        let mut vars = vec![
            ("AUTH_SECRET", "integration-test-secret"),
            ("AUTH_RATE_LIMIT_BURST", "0"),
            ("PUBLIC_DIR", "tests/fixtures/public"),
        ];
        vars.extend_from_slice(extra);

        let config = Config::from_vars(|key| {
            vars.iter()
                .rev()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap();

        Self {
            router: router::build(AppState::in_memory(&config)),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Sends `body` verbatim as `application/json`.
    pub async fn post_raw(&self, uri: &str, body: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), cookie).await
    }

    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/auth/register",
            serde_json::json!({ "email": email, "password": password }),
            None,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/auth/login",
            serde_json::json!({ "email": email, "password": password }),
            None,
        )
        .await
    }

    /// Registers a user and returns its session cookie.
    pub async fn signed_in(&self, email: &str) -> String {
        let response = self.register(email, "secret").await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.session_cookie().unwrap()
    }
}
