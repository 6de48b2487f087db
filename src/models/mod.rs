// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models exchanged with the NotesExchange API.

pub mod auth;
pub mod user;

pub use auth::{
    AdminLoginResponse, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, UpdateNameRequest, UserEnvelope,
};
pub use user::UserProfile;
