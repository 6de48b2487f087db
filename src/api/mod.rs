// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! NotesExchange REST API client.
//!
//! Handles:
//! - Bearer token attachment per request, by route namespace
//! - Request/response logging in development
//! - Mapping error responses (and their `msg`) to [`ApiError`]

pub mod credentials;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    AdminLoginResponse, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, UpdateNameRequest, UserEnvelope, UserProfile,
};
use crate::routes::api;
use crate::storage::SessionStore;
use reqwest::{header, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Instant;

/// NotesExchange API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
    log_http: bool,
}

impl ApiClient {
    /// Create a client that reads credentials from `store`.
    pub fn new(config: &Config, store: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            store,
            log_http: config.log_http(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Where the browser goes to start Google sign-in.
    pub fn google_auth_url(&self) -> String {
        self.url(api::GOOGLE_AUTH)
    }

    // ─── Endpoints ───────────────────────────────────────────────────────────

    /// Exchange email/password for a token pair and the user profile.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json(api::LOGIN, credentials).await
    }

    /// Fetch the profile of the user owning the stored access token.
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        let envelope: UserEnvelope = self.get_json(api::PROFILE).await?;
        envelope
            .user
            .ok_or_else(|| ApiError::Parse("Profile response has no user".to_string()))
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        self.post_json(api::REFRESH_TOKEN, &RefreshRequest { refresh_token })
            .await
    }

    /// Create an account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserEnvelope, ApiError> {
        self.post_json(api::REGISTER, request).await
    }

    /// Change the display name of the current user.
    pub async fn update_name(&self, request: &UpdateNameRequest) -> Result<UserEnvelope, ApiError> {
        self.send(Method::PUT, api::UPDATE_NAME, Some(request)).await
    }

    /// Mark the current user as Pro after a completed payment.
    pub async fn activate_premium(&self) -> Result<UserEnvelope, ApiError> {
        self.send::<(), _>(Method::POST, api::PREMIUM, None).await
    }

    /// Log in to the admin back-office.
    pub async fn admin_login(
        &self,
        credentials: &LoginRequest,
    ) -> Result<AdminLoginResponse, ApiError> {
        self.post_json(api::ADMIN_LOGIN, credentials).await
    }

    // ─── Generic requests ────────────────────────────────────────────────────

    /// GET `path` and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let authorization = credentials::authorization_for(path, &self.store);

        if self.log_http {
            tracing::debug!(
                method = %method,
                path,
                url = %url,
                authorized = authorization.is_some(),
                has_body = body.is_some(),
                "API request"
            );
        }

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            if self.log_http {
                tracing::debug!(method = %method, path, error = %e, "API request failed");
            }
            ApiError::Network(e.to_string())
        })?;

        self.check_response_json(&method, path, response, started)
            .await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        response: reqwest::Response,
        started: Instant,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response: {}", e)))?;

        if self.log_http {
            tracing::debug!(
                method = %method,
                path,
                status = status.as_u16(),
                bytes = body.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "API response"
            );
        }

        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16(), &body);
            if err.is_unauthorized() {
                tracing::warn!(path, "API rejected credentials (401)");
            }
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(format!("JSON parse error: {}", e)))
    }
}
