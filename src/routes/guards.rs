// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route guards.
//!
//! Guards only decide where the user should be; real access control lives
//! on the API, which rejects requests regardless of what the client shows.

use crate::services::{SessionPhase, SessionState};
use crate::storage::SessionStore;

/// Outcome of a route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the page.
    Allow,
    /// Session still loading; render the loading state and ask again.
    Wait,
    /// Leave for `to`, optionally telling the user why.
    Redirect {
        to: &'static str,
        notice: Option<&'static str>,
    },
}

impl GuardDecision {
    fn redirect(to: &'static str) -> Self {
        GuardDecision::Redirect { to, notice: None }
    }
}

/// Pages that need a logged-in user (profile, note submission).
pub fn require_user(state: &SessionState) -> GuardDecision {
    match state.phase() {
        SessionPhase::Bootstrapping => GuardDecision::Wait,
        SessionPhase::Authenticated => GuardDecision::Allow,
        SessionPhase::Unauthenticated => GuardDecision::redirect(super::LOGIN),
    }
}

/// The moderation queue: needs both a stored token and creator rights.
pub fn require_creator(state: &SessionState, store: &SessionStore) -> GuardDecision {
    if state.phase() == SessionPhase::Bootstrapping {
        return GuardDecision::Wait;
    }

    let is_creator = state.user.as_ref().is_some_and(|u| u.creator);
    if store.access_token().is_some() && is_creator {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect {
            to: super::LOGIN,
            notice: Some("You must be a creator to view this page"),
        }
    }
}

/// Admin back-office pages: need an admin token.
pub fn require_admin(store: &SessionStore) -> GuardDecision {
    if store.admin_token().is_some() {
        GuardDecision::Allow
    } else {
        GuardDecision::redirect(super::ADMIN_LOGIN)
    }
}

/// Login and registration pages send an authenticated user home.
pub fn redirect_if_authenticated(state: &SessionState) -> GuardDecision {
    match state.phase() {
        SessionPhase::Bootstrapping => GuardDecision::Wait,
        SessionPhase::Authenticated => GuardDecision::redirect(super::HOME),
        SessionPhase::Unauthenticated => GuardDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;

    fn settled(user: Option<UserProfile>) -> SessionState {
        SessionState {
            user,
            loading: false,
        }
    }

    fn profile(creator: bool) -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "creator": creator
        }))
        .unwrap()
    }

    #[test]
    fn test_require_user() {
        assert_eq!(require_user(&SessionState::default()), GuardDecision::Wait);
        assert_eq!(
            require_user(&settled(None)),
            GuardDecision::Redirect {
                to: "/login",
                notice: None
            }
        );
        assert_eq!(require_user(&settled(Some(profile(false)))), GuardDecision::Allow);
    }

    #[test]
    fn test_require_creator() {
        let store = SessionStore::in_memory();
        store.set_access_token("abc").unwrap();

        assert_eq!(
            require_creator(&settled(Some(profile(true))), &store),
            GuardDecision::Allow
        );
        assert!(matches!(
            require_creator(&settled(Some(profile(false))), &store),
            GuardDecision::Redirect {
                to: "/login",
                notice: Some(_)
            }
        ));

        let empty = SessionStore::in_memory();
        assert!(matches!(
            require_creator(&settled(Some(profile(true))), &empty),
            GuardDecision::Redirect { .. }
        ));
    }

    #[test]
    fn test_require_admin() {
        let store = SessionStore::in_memory();
        assert_eq!(
            require_admin(&store),
            GuardDecision::Redirect {
                to: "/admin5839201",
                notice: None
            }
        );
        store.set_admin_token("admin").unwrap();
        assert_eq!(require_admin(&store), GuardDecision::Allow);
    }

    #[test]
    fn test_redirect_if_authenticated() {
        assert_eq!(redirect_if_authenticated(&settled(None)), GuardDecision::Allow);
        assert_eq!(
            redirect_if_authenticated(&settled(Some(profile(false)))),
            GuardDecision::Redirect {
                to: "/",
                notice: None
            }
        );
    }
}
