// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth flow controller.
//!
//! `AuthService` is the single owner of "who is logged in". It is created
//! once at startup with its collaborators and every session transition goes
//! through one of its operations:
//!
//! - `bootstrap`: consume OAuth callback parameters, then resolve the profile
//! - `login` / `login_with_google`: acquire a session
//! - `refresh`: exchange the refresh token for a new access token
//! - `logout`: drop the session (cannot fail)
//!
//! Session state is published on a `watch` channel so UI layers can react to
//! changes without polling.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{ApiError, AuthError, Result};
use crate::models::{LoginRequest, UpdateNameRequest, UserProfile};
use crate::routes;
use crate::services::callback::CallbackParams;
use crate::services::notify::{Navigation, Navigator, NoticeLevel, Notifier};
use crate::storage::{SessionStore, TokenStorage};
use crate::validation::RegisterForm;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use validator::{Validate, ValidationError, ValidationErrors};

const MSG_BLOCKED: &str = "Your account has been blocked. Contact support.";
const MSG_SESSION_EXPIRED: &str = "Session expired, please log in again";

/// In-memory session state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Current user; `None` when logged out
    pub user: Option<UserProfile>,
    /// Set while bootstrapping or while a login is in flight
    pub loading: bool,
}

impl Default for SessionState {
    /// A fresh session starts out bootstrapping.
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Coarse session state consulted by route guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Bootstrapping,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Bootstrapping
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }
}

/// Owner of the client session.
pub struct AuthService {
    api: ApiClient,
    store: SessionStore,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<SessionState>,
    /// Refuses duplicate form submissions while one is in flight.
    busy: AtomicBool,
    /// Operations currently holding the loading flag.
    loading_depth: Mutex<usize>,
}

impl AuthService {
    pub fn new(
        api: ApiClient,
        store: SessionStore,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            api,
            store,
            notifier,
            navigator,
            state,
            busy: AtomicBool::new(false),
            loading_depth: Mutex::new(0),
        }
    }

    /// Wire up a service against `storage` using the API from `config`.
    pub fn from_config(
        config: &Config,
        storage: Arc<dyn TokenStorage>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let store = SessionStore::new(storage);
        let api = ApiClient::new(config, store.clone());
        Self::new(api, store, notifier, navigator)
    }

    // ─── State Access ────────────────────────────────────────────────────────

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the session state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Whether the current user holds an unexpired Pro subscription.
    pub fn has_premium(&self) -> bool {
        self.state
            .borrow()
            .user
            .as_ref()
            .is_some_and(|u| u.is_premium_at(Utc::now()))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Replace the current user wholesale.
    pub fn set_user(&self, user: Option<UserProfile>) {
        match user {
            Some(user) => {
                self.accept_user(user);
            }
            None => self.state.send_modify(|s| s.user = None),
        }
    }

    /// Patch fields of the current user in place.
    ///
    /// Returns the patched profile, or `None` when nobody is logged in.
    pub fn patch_user(&self, patch: impl FnOnce(&mut UserProfile)) -> Option<UserProfile> {
        let mut patched = None;
        self.state.send_if_modified(|s| match s.user.as_mut() {
            Some(user) => {
                patch(user);
                user.apply_premium_expiry(Utc::now());
                patched = Some(user.clone());
                true
            }
            None => false,
        });
        patched
    }

    // ─── Session Lifecycle ───────────────────────────────────────────────────

    /// Start the session from the location the app was opened at.
    ///
    /// Never fails: every problem is logged or notified and the session
    /// settles in whichever phase is safe.
    pub async fn bootstrap(&self, current_url: &str) -> SessionPhase {
        let loading = self.begin_loading();

        match CallbackParams::from_url(current_url) {
            Ok(params) => {
                if params.is_blocked() {
                    self.notify(NoticeLevel::Error, MSG_BLOCKED);
                }
                if let Some(token) = params.token.as_deref() {
                    match self
                        .store
                        .store_tokens(token, params.refresh_token.as_deref())
                    {
                        Ok(()) => tracing::info!(
                            has_refresh_token = params.refresh_token.is_some(),
                            "Stored tokens from OAuth callback"
                        ),
                        Err(e) => tracing::error!(error = %e, "Failed to store callback tokens"),
                    }
                    // Tokens must not linger in the address bar or history
                    self.navigator
                        .navigate(Navigation::Replace(routes::HOME.to_string()));
                }
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring unparsable startup URL"),
        }

        if let Err(e) = self.resolve_profile().await {
            tracing::warn!(error = %e, "Profile resolution failed during bootstrap");
        }

        drop(loading);
        let phase = self.phase();
        tracing::info!(phase = ?phase, "Auth bootstrap complete");
        phase
    }

    /// Load the profile for the stored access token.
    ///
    /// No stored token is a no-op. A 401 ends the session. Any other failure
    /// leaves tokens and the in-memory user untouched so a later attempt can
    /// succeed.
    pub async fn resolve_profile(&self) -> Result<Option<UserProfile>> {
        let _loading = self.begin_loading();
        if self.store.access_token().is_none() {
            tracing::debug!("No access token stored, staying logged out");
            return Ok(None);
        }

        match self.api.fetch_profile().await {
            Ok(user) => Ok(Some(self.accept_user(user))),
            Err(e) if e.is_unauthorized() => {
                self.expire_session();
                Err(e.into())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile fetch failed, keeping stored session");
                Err(e.into())
            }
        }
    }

    /// Email/password login.
    ///
    /// Credentials are only persisted once the server has accepted them, so
    /// a failed login leaves the previous state exactly as it was.
    pub async fn login(&self, credentials: LoginRequest) -> Result<UserProfile> {
        credentials.validate()?;
        let _busy = BusyGuard::acquire(&self.busy).ok_or(AuthError::Busy)?;
        let _loading = self.begin_loading();

        let response = match self.api.login(&credentials).await {
            Ok(response) => response,
            Err(e) => {
                let err = AuthError::from(e);
                tracing::warn!(email = %credentials.email, error = %err, "Login failed");
                self.notify(NoticeLevel::Error, &err.user_message("Login failed"));
                return Err(err);
            }
        };

        if response.token.trim().is_empty() {
            tracing::warn!(email = %credentials.email, "Login response has an empty token");
            self.notify(NoticeLevel::Error, "Login failed");
            return Err(ApiError::Parse("Login response has an empty token".to_string()).into());
        }

        let previous_access = self.store.access_token();
        let previous_refresh = self.store.refresh_token();
        if let Err(e) = self
            .store
            .store_tokens(&response.token, response.refresh_token.as_deref())
        {
            tracing::error!(error = %e, "Failed to persist login tokens");
            if let Err(restore_err) = self
                .store
                .restore_tokens(previous_access.as_deref(), previous_refresh.as_deref())
            {
                tracing::error!(error = %restore_err, "Failed to restore previous tokens");
            }
            self.notify(NoticeLevel::Error, "Login failed");
            return Err(e.into());
        }

        let user = self.accept_user(response.user);
        tracing::info!(email = %user.email, "Login successful");
        self.notify(NoticeLevel::Success, "Login successful!");
        self.navigator
            .navigate(Navigation::Push(routes::HOME.to_string()));
        Ok(user)
    }

    /// Send the browser to Google sign-in.
    ///
    /// Nothing changes locally; the API redirects back to the app root with
    /// tokens in the query string, which `bootstrap` picks up.
    pub fn login_with_google(&self) {
        let url = self.api.google_auth_url();
        tracing::info!(url = %url, "Redirecting to Google sign-in");
        self.navigator.navigate(Navigation::External(url));
    }

    /// Drop the session and return to the login page.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to clear stored session");
        }
        self.state.send_modify(|s| s.user = None);
        self.settle_loading();
        tracing::info!("Logged out");
        self.notify(NoticeLevel::Success, "Logged out successfully");
        self.navigator
            .navigate(Navigation::Push(routes::LOGIN.to_string()));
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Any failure logs the user out rather than leaving a half-refreshed
    /// session behind.
    pub async fn refresh(&self) -> Result<()> {
        let _loading = self.begin_loading();
        match self.try_refresh().await {
            Ok(()) => {
                tracing::info!("Session refreshed");
                self.notify(NoticeLevel::Success, "Session refreshed");
                Ok(())
            }
            Err(e) => {
                if e.is_unauthorized() {
                    tracing::info!(error = %e, "Refresh rejected by the API");
                } else {
                    tracing::warn!(error = %e, "Token refresh failed");
                }
                self.logout();
                Err(e)
            }
        }
    }

    async fn try_refresh(&self) -> Result<()> {
        let refresh_token = self
            .store
            .refresh_token()
            .ok_or(AuthError::MissingRefreshToken)?;

        let response = self.api.refresh_token(&refresh_token).await?;
        if response.token.is_empty() {
            return Err(ApiError::Parse("Refresh response has an empty token".to_string()).into());
        }
        self.store.set_access_token(&response.token)?;

        self.resolve_profile().await?;
        Ok(())
    }

    // ─── Account Mutations ───────────────────────────────────────────────────

    /// Create an account and send the user to the login page.
    pub async fn register(&self, form: &RegisterForm) -> Result<()> {
        let request = form.to_request()?;
        let _busy = BusyGuard::acquire(&self.busy).ok_or(AuthError::Busy)?;

        match self.api.register(&request).await {
            Ok(_) => {
                tracing::info!(email = %request.email, "Registration successful");
                self.notify(NoticeLevel::Success, "Registration successful!");
                self.navigator
                    .navigate(Navigation::Push(routes::LOGIN.to_string()));
                Ok(())
            }
            Err(e) => {
                let err = AuthError::from(e);
                tracing::warn!(email = %request.email, error = %err, "Registration failed");
                self.notify(NoticeLevel::Error, &err.user_message("Registration failed"));
                Err(err)
            }
        }
    }

    /// Change the display name of the current user.
    pub async fn update_name(&self, name: &str) -> Result<UserProfile> {
        let request = UpdateNameRequest {
            name: name.trim().to_string(),
        };
        request.validate()?;
        let _busy = BusyGuard::acquire(&self.busy).ok_or(AuthError::Busy)?;

        let envelope = match self.api.update_name(&request).await {
            Ok(envelope) => envelope,
            Err(e) => return Err(self.mutation_failed(e, "Error updating name")),
        };

        let user = match envelope.user {
            Some(user) => self.accept_user(user),
            None => self
                .patch_user(|u| u.name = request.name.clone())
                .ok_or_else(|| ApiError::Parse("No user to update".to_string()))?,
        };

        self.notify(NoticeLevel::Success, "Name updated successfully!");
        Ok(user)
    }

    /// Record a completed Pro purchase on the account.
    ///
    /// Payment itself happens outside this crate; this only tells the API the
    /// checkout succeeded and picks up the new entitlement.
    pub async fn activate_premium(&self) -> Result<UserProfile> {
        let _busy = BusyGuard::acquire(&self.busy).ok_or(AuthError::Busy)?;

        let envelope = match self.api.activate_premium().await {
            Ok(envelope) => envelope,
            Err(e) => return Err(self.mutation_failed(e, "Failed to activate Pro subscription")),
        };

        let user = match envelope.user {
            Some(user) => self.accept_user(user),
            None => self
                .patch_user(|u| u.premium = true)
                .ok_or_else(|| ApiError::Parse("No user to update".to_string()))?,
        };

        let message = match user.premium_expires_at {
            Some(expires_at) => format!(
                "Pro activated! Expires on {}",
                expires_at.format("%Y-%m-%d")
            ),
            None => "Pro activated!".to_string(),
        };
        self.notify(NoticeLevel::Success, &message);
        self.navigator
            .navigate(Navigation::Push(routes::HOME.to_string()));
        Ok(user)
    }

    // ─── Admin Back-Office ───────────────────────────────────────────────────

    /// Log in to the admin back-office.
    ///
    /// The admin token is stored separately and only attached to admin
    /// endpoints; the user session is unaffected.
    pub async fn admin_login(&self, credentials: LoginRequest) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if credentials.email.trim().is_empty() {
            errors.add("email", ValidationError::new("required"));
        }
        if credentials.password.is_empty() {
            errors.add("password", ValidationError::new("required"));
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }
        let _busy = BusyGuard::acquire(&self.busy).ok_or(AuthError::Busy)?;

        let response = match self.api.admin_login(&credentials).await {
            Ok(response) => response,
            Err(e) => {
                let err = AuthError::from(e);
                tracing::warn!(error = %err, "Admin login failed");
                self.notify(NoticeLevel::Error, &err.user_message("Admin login failed"));
                return Err(err);
            }
        };

        self.store.set_admin_token(&response.token)?;
        tracing::info!("Admin login successful");
        self.notify(NoticeLevel::Success, "Admin login successful!");
        self.navigator
            .navigate(Navigation::Push(routes::ADMIN_DASHBOARD.to_string()));
        Ok(())
    }

    /// Drop the admin token and return to the admin login page.
    pub fn admin_logout(&self) {
        if let Err(e) = self.store.clear_admin_token() {
            tracing::error!(error = %e, "Failed to clear admin token");
        }
        self.notify(NoticeLevel::Success, "Logged out successfully");
        self.navigator
            .navigate(Navigation::Push(routes::ADMIN_LOGIN.to_string()));
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    /// Install a profile as the current user.
    fn accept_user(&self, mut user: UserProfile) -> UserProfile {
        if user.apply_premium_expiry(Utc::now()) {
            tracing::info!(email = %user.email, "Pro subscription expired, treating as free tier");
        }
        if let Some(picture) = user.picture() {
            if let Err(e) = self.store.set_profile_picture(picture) {
                tracing::warn!(error = %e, "Failed to cache profile picture");
            }
        }
        self.state.send_modify(|s| s.user = Some(user.clone()));
        user
    }

    /// The server rejected our token: forget everything.
    fn expire_session(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to clear expired session");
        }
        self.state.send_modify(|s| s.user = None);
        self.settle_loading();
        tracing::info!("Session expired");
        self.notify(NoticeLevel::Error, MSG_SESSION_EXPIRED);
    }

    /// Common failure path for authenticated mutations.
    fn mutation_failed(&self, e: ApiError, fallback: &str) -> AuthError {
        if e.is_unauthorized() {
            self.expire_session();
        } else {
            tracing::warn!(error = %e, "{}", fallback);
            self.notify(NoticeLevel::Error, e.server_message().unwrap_or(fallback));
        }
        e.into()
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notifier.notify(level, message);
    }

    fn lock_depth(&self) -> MutexGuard<'_, usize> {
        self.loading_depth.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        let mut depth = self.lock_depth();
        *depth += 1;
        self.state.send_modify(|s| s.loading = true);
        LoadingGuard { service: self }
    }

    /// The session reached a terminal state: loading only stays set while
    /// some other operation is still running.
    fn settle_loading(&self) {
        let depth = self.lock_depth();
        let loading = *depth > 0;
        self.state.send_if_modified(|s| {
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }
}

/// Releases one hold on the loading flag when dropped, even if the operation
/// is cancelled. The flag clears when the last hold goes.
struct LoadingGuard<'a> {
    service: &'a AuthService,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut depth = self.service.lock_depth();
        *depth = depth.saturating_sub(1);
        if *depth == 0 {
            self.service.state.send_modify(|s| s.loading = false);
        }
    }
}

/// Holds the busy flag for the duration of a submission.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
