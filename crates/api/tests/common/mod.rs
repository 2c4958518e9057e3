//! Common test utilities for integration tests.
//!
//! Every test builds the full router over an in-memory store and an
//! in-memory photo store, then drives it with `oneshot` requests.

// Not every integration test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use domain::models::role::RoleName;
use domain::models::user::{NewUser, User};
use domain::{PhotoStore, WorkforceStore};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use guard_manager_api::{
    app::create_app,
    config::{
        AdminBootstrapConfig, Config, DatabaseConfig, JwtAuthConfig, LoggingConfig,
        SecurityConfig, ServerConfig, UploadsConfig,
    },
    services::MemoryPhotoStore,
};
use persistence::MemoryStore;
use serde_json::Value;
use shared::password::hash_password;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "CorrectHorse42";

/// Test configuration: HS256 secret, in-memory store, no rate limiting.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
            max_body_size: 30 * 1024 * 1024,
        },
        database: DatabaseConfig {
            url: "memory://".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 5,
            idle_timeout_secs: 60,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            rate_limit_per_minute: 0,
            hsts_enabled: false,
        },
        jwt: JwtAuthConfig {
            secret: "integration_test_secret_key_0123456789abcdef".to_string(),
            private_key: String::new(),
            public_key: String::new(),
            token_expiry_secs: 3600,
            leeway_secs: 0,
        },
        uploads: UploadsConfig {
            dir: std::env::temp_dir()
                .join("guard-manager-test-uploads")
                .to_string_lossy()
                .into_owned(),
            public_prefix: "/uploads".to_string(),
            max_photo_bytes: 64 * 1024,
            max_photos: 5,
        },
        admin: AdminBootstrapConfig::default(),
    }
}

/// A router plus direct handles on its backing stores.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn WorkforceStore>,
    pub photos: Arc<MemoryPhotoStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let store: Arc<dyn WorkforceStore> = Arc::new(MemoryStore::new());
        let photos = Arc::new(MemoryPhotoStore::new(config.uploads.public_prefix.clone()));
        let photo_store: Arc<dyn PhotoStore> = photos.clone();
        let router =
            create_app(config, store.clone(), photo_store).expect("Failed to build test app");
        Self {
            router,
            store,
            photos,
        }
    }

    /// Sends one request and returns the status and the parsed JSON body
    /// (`Null` when the body is not JSON).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    /// Inserts a user with the shared test password.
    pub async fn seed_user(&self, username: &str, role: RoleName) -> User {
        let role_id = self
            .store
            .find_role_by_name(role)
            .await
            .unwrap()
            .expect("role is seeded")
            .id;
        self.store
            .insert_user(NewUser {
                username: username.to_string(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
                first_name: Some(FirstName().fake()),
                last_name: Some(LastName().fake()),
                email: None,
                phone: None,
                role_id,
            })
            .await
            .unwrap()
    }

    /// Logs in and returns the bearer token.
    pub async fn login(&self, username: &str) -> String {
        let (status, body) = self
            .send(json_request(
                Method::POST,
                "/api/auth/login",
                None,
                serde_json::json!({ "username": username, "password": TEST_PASSWORD }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Seeds a user with the given role and logs in as them.
    pub async fn token_for(&self, username: &str, role: RoleName) -> String {
        self.seed_user(username, role).await;
        self.login(username).await
    }

    /// Creates a client and one site with coordinates; returns the site id.
    pub async fn create_location(&self, token: &str, name: &str) -> i64 {
        let (status, client) = self
            .send(json_request(
                Method::POST,
                "/api/clients",
                Some(token),
                serde_json::json!({
                    "name": format!("{} Holdings", name),
                    "address": "12 Harbour Road",
                    "contactPerson": "Jane Roe",
                    "contactPhone": "+44 20 7946 0000",
                    "contactEmail": "contact@client.test"
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "client create failed: {}", client);

        let (status, location) = self
            .send(json_request(
                Method::POST,
                "/api/locations",
                Some(token),
                serde_json::json!({
                    "clientId": client["id"],
                    "name": name,
                    "latitude": 51.5072,
                    "longitude": -0.1276
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "location create failed: {}", location);
        location["id"].as_i64().unwrap()
    }

    /// Creates a guard through the API; returns the guard JSON.
    pub async fn create_guard(&self, token: &str, username: &str, code: &str) -> Value {
        let (status, body) = self
            .send(json_request(
                Method::POST,
                "/api/guards",
                Some(token),
                serde_json::json!({
                    "username": username,
                    "password": TEST_PASSWORD,
                    "firstName": FirstName().fake::<String>(),
                    "lastName": LastName().fake::<String>(),
                    "guardId": code,
                    "nationalId": format!("NID-{}", code),
                    "position": "Security Officer"
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "guard create failed: {}", body);
        body
    }

    /// Id of a seeded shift template.
    pub async fn shift_id(&self, name: &str) -> i64 {
        self.store
            .list_shifts()
            .await
            .unwrap()
            .into_iter()
            .find(|s| s.name == name)
            .expect("shift is seeded")
            .id
    }
}

/// Builds a JSON request, optionally authenticated.
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Builds a body-less request, optionally authenticated.
pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub const BOUNDARY: &str = "----guard-manager-test-boundary";

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Builds an authenticated `multipart/form-data` request.
pub fn multipart_request(uri: &str, token: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}
