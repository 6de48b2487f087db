// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request and response payloads for the auth endpoints.

use super::UserProfile;
use crate::validation::{validate_not_blank, validate_strong_password};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Email/password credentials for the login endpoints.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(custom(
        function = "validate_strong_password",
        message = "Password must include 8+ characters, uppercase, lowercase, number, and symbol"
    ))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UserProfile,
}

/// Admin back-office login response.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
}

/// Body of the refresh-token exchange.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// New access token issued by the refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// Account creation payload.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile_picture: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("profile_picture", &self.profile_picture)
            .finish()
    }
}

/// Profile name edit.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateNameRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "Name must be at least 2 characters"),
        length(min = 2, max = 15, message = "Name must be 2 to 15 characters")
    )]
    pub name: String,
}

/// `{ success, user }` envelope used by profile and mutation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}
