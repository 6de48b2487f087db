// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-request credential attachment.
//!
//! The `Authorization` header is computed for each request from the route
//! namespace and the tokens currently in storage. Nothing is cached on the
//! HTTP client, so a logout takes effect on the very next request.

use crate::routes::api;
use crate::storage::SessionStore;

const BEARER_PREFIX: &str = "Bearer ";

/// Whether `path` belongs to the admin back-office namespace.
pub fn is_admin_path(path: &str) -> bool {
    path.starts_with(api::ADMIN_PREFIX)
}

/// Login endpoints must never carry a stale token.
pub fn is_login_path(path: &str) -> bool {
    path == api::LOGIN || path == api::ADMIN_LOGIN
}

/// `Authorization` header value for a request to `path`, if any.
pub fn authorization_for(path: &str, store: &SessionStore) -> Option<String> {
    if is_login_path(path) {
        return None;
    }

    let token = if is_admin_path(path) {
        store.admin_token()
    } else {
        store.access_token()
    }?;

    Some(bearer_value(&token))
}

/// Add the `Bearer ` scheme unless the stored token already carries it.
pub fn bearer_value(token: &str) -> String {
    if token.starts_with(BEARER_PREFIX) {
        token.to_string()
    } else {
        format!("{}{}", BEARER_PREFIX, token)
    }
}
