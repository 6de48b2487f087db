// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-visible notices and client-side navigation.
//!
//! The auth service never renders anything itself; it reports outcomes to a
//! [`Notifier`] and moves the user around through a [`Navigator`].

use std::sync::Mutex;

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Sink for short user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Notifier that emits notices as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(notice = ?level, message, "Notice")
            }
            NoticeLevel::Error => tracing::warn!(notice = ?level, message, "Notice"),
        }
    }
}

/// A change of location requested by the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Navigate to an in-app route, adding a history entry.
    Push(String),
    /// Replace the current history entry (used to strip callback tokens).
    Replace(String),
    /// Leave the app for an external URL.
    External(String),
}

impl Navigation {
    pub fn target(&self) -> &str {
        match self {
            Navigation::Push(to) | Navigation::Replace(to) | Navigation::External(to) => to,
        }
    }
}

/// Client-side router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: Navigation);
}

/// Navigator for headless front-ends: logs each move and remembers the last one.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    last: Mutex<Option<Navigation>>,
}

impl LoggingNavigator {
    pub fn last(&self) -> Option<Navigation> {
        self.last.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, to: Navigation) {
        tracing::debug!(navigation = ?to, "Navigate");
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_navigator_remembers_last() {
        let navigator = LoggingNavigator::default();
        assert!(navigator.last().is_none());

        navigator.navigate(Navigation::Push("/login".to_string()));
        navigator.navigate(Navigation::External("https://api.example/auth".to_string()));

        assert_eq!(
            navigator.last().as_ref().map(Navigation::target),
            Some("https://api.example/auth")
        );
    }
}
