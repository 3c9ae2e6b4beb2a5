//! Shared harness for the API flow tests.
//!
//! Boots the full service stack on a temporary work directory and
//! drives requests through `HttpService::oneshot`, so every test runs
//! the real middleware chain without binding a port.

#![allow(dead_code)]

use axum::body::Body;
use ems_server::db::repository::UserRepository;
use ems_server::{Config, ServerState};
use http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;

pub const PASSWORD: &str = "Passw0rd!";

pub struct TestServer {
    pub state: ServerState,
    _work_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or("")
    }

    pub fn is_success(&self) -> bool {
        self.body["success"].as_bool().unwrap_or(false)
    }
}

/// A signed-in account, as produced by [`TestServer::signup_verified`].
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub employee_id: String,
    pub email: String,
}

impl TestServer {
    pub async fn start() -> Self {
        let work_dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(work_dir.path().to_string_lossy().to_string(), 0);
        let state = ServerState::initialize(&config).await.unwrap();
        Self {
            state,
            _work_dir: work_dir,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.state.http.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        // CSV exports and empty bodies come back as a plain string / null.
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str, token: &str) -> TestResponse {
        self.request("GET", path, Some(token), None).await
    }

    pub async fn get_public(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(token), Some(body)).await
    }

    pub async fn post_public(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, None, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> TestResponse {
        self.request("DELETE", path, Some(token), None).await
    }

    /// The pending verification OTP, read straight from the database.
    pub async fn otp_for(&self, email: &str) -> String {
        let users = UserRepository::new(self.state.db.clone());
        let user = users.find_by_email(email).await.unwrap().unwrap();
        user.verification_code.unwrap()
    }

    /// Full signup, email verification and signin flow for one account.
    pub async fn signup_verified(&self, role: &str, code: &str, email: &str) -> Session {
        let response = self
            .post_public(
                "/api/auth/signup",
                json!({
                    "employeeId": code,
                    "email": email,
                    "password": PASSWORD,
                    "role": role,
                    "firstName": "Test",
                    "lastName": code,
                    "phone": "555-0100",
                    "department": "Engineering",
                    "designation": "Engineer",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "signup {}", email);

        let otp = self.otp_for(email).await;
        let response = self
            .post_public("/api/auth/verify-email", json!({"email": email, "otp": otp}))
            .await;
        assert_eq!(response.status, StatusCode::OK, "verify {}", email);

        self.signin(email).await
    }

    /// Sign in an already verified account, capturing the cookie token.
    pub async fn signin(&self, email: &str) -> Session {
        let response = self
            .post_public(
                "/api/auth/signin",
                json!({"email": email, "password": PASSWORD}),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "signin {}", email);

        let token = session_cookie(&response.headers);
        let user_id = response.data()["_id"].as_str().unwrap().to_string();
        let employee_id = response.data()["employee"]["_id"]
            .as_str()
            .unwrap()
            .to_string();
        Session {
            token,
            user_id,
            employee_id,
            email: email.to_string(),
        }
    }
}

impl TestServer {
    /// POST a multipart form, for the upload endpoints.
    pub async fn post_multipart(
        &self,
        path: &str,
        token: &str,
        boundary: &str,
        body: Vec<u8>,
    ) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::COOKIE, format!("token={}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = self.state.http.oneshot(request).await.unwrap();
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
}

/// Assemble a multipart body with one file part and optional text parts.
pub fn multipart_body(
    boundary: &str,
    file_field: &str,
    file_name: &str,
    file_bytes: &[u8],
    texts: &[(&str, &str)],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{file_field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");
    for (name, value) in texts {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// Pull the token out of the `Set-Cookie` header.
pub fn session_cookie(headers: &HeaderMap) -> String {
    let cookie = headers
        .get(header::SET_COOKIE)
        .expect("missing set-cookie header")
        .to_str()
        .unwrap();
    let token = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("token="))
        .expect("cookie is not a token");
    assert!(!token.is_empty(), "empty session token");
    token.to_string()
}
