// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! NotesExchange client: session handling for the NotesExchange notes API
//!
//! This crate owns the client side of authentication: storing tokens,
//! attaching them to API requests, bootstrapping a session from an OAuth
//! callback, login, refresh and logout, and the route guards that consult
//! the resulting session.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod time_utils;
pub mod validation;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ApiError, AuthError};
pub use services::{AuthService, SessionPhase, SessionState};
pub use storage::{FileStorage, MemoryStorage, SessionStore, TokenStorage};
