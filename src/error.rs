// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with consistent user-facing messages.

use crate::storage::StorageError;
use serde::Deserialize;

/// Error returned by the NotesExchange REST API wrapper.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("no message"))]
    Unauthorized { message: Option<String> },

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Http {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Response parse error: {0}")]
    Parse(String),
}

/// Error body shape used by the API (`{ "msg": "..." }`).
#[derive(Deserialize)]
struct ErrorBody {
    msg: Option<String>,
}

impl ApiError {
    /// Build an error from a non-success status and its raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.msg)
            .filter(|m| !m.trim().is_empty());

        if status == 401 {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Http { status, message }
        }
    }

    /// Whether the server rejected the credentials (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// The human-readable `msg` sent by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } | ApiError::Http { message, .. } => {
                message.as_deref()
            }
            ApiError::Network(_) | ApiError::Parse(_) => None,
        }
    }
}

/// Error returned by auth flow operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Another request is already in progress")]
    Busy,

    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Message suitable for a short notification.
    ///
    /// Prefers the server-provided message and falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Api(err) => err
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            _ => fallback.to_string(),
        }
    }

    /// Whether this failure is an authorization failure that ends the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::Api(err) if err.is_unauthorized())
    }
}

/// Result type alias for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;
