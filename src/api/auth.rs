//! Login and registration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

use super::http::status_to_error;
use super::ApiClient;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    /// Newer backend builds return `token`, older ones `access_token`.
    #[serde(alias = "access_token")]
    token: String,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Log in and adopt the issued bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        debug!(email, "login");
        let resp = self
            .http()
            .post(self.url("/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let data: LoginResponse = resp.json().await?;
        self.set_token(&data.token)
    }

    /// Register a new account. Does not log in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        debug!(email, "register");
        let resp = self
            .http()
            .post(self.url("/register"))
            .json(&RegisterRequest {
                name,
                email,
                password,
            })
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(())
    }
}
