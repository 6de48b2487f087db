// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application routes, REST endpoint paths and route guards.

pub mod guards;

pub use guards::{
    redirect_if_authenticated, require_admin, require_creator, require_user, GuardDecision,
};

/// Landing page.
pub const HOME: &str = "/";
/// Email/password and Google login page.
pub const LOGIN: &str = "/login";
/// Two-step registration page.
pub const REGISTER: &str = "/register";
/// Profile page (name edit).
pub const PROFILE: &str = "/profile";
/// Pro subscription page.
pub const PREMIUM: &str = "/premium";
/// Moderation queue for creators.
pub const CREATOR_POSTS: &str = "/creator-posts";
/// Note submission page.
pub const SUBMIT_POST: &str = "/submit-post";
/// Admin back-office login.
pub const ADMIN_LOGIN: &str = "/admin5839201";
/// Admin back-office landing page.
pub const ADMIN_DASHBOARD: &str = "/admin5839201/dashboard";

/// REST API endpoint paths, relative to the API base URL.
pub mod api {
    pub const LOGIN: &str = "/api/user/login";
    pub const REGISTER: &str = "/api/user/register";
    pub const PROFILE: &str = "/api/user/profile";
    pub const REFRESH_TOKEN: &str = "/api/user/refresh-token";
    pub const UPDATE_NAME: &str = "/api/user/update-name";
    pub const PREMIUM: &str = "/api/user/premium";
    /// Browser redirect target that starts the Google OAuth flow.
    pub const GOOGLE_AUTH: &str = "/api/user/auth/google";

    /// Every admin endpoint lives under this prefix and uses the admin token.
    pub const ADMIN_PREFIX: &str = "/api/5839201";
    pub const ADMIN_LOGIN: &str = "/api/5839201/login";
}
