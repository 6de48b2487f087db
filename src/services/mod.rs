// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session logic layer.

pub mod auth;
pub mod callback;
pub mod notify;

pub use auth::{AuthService, SessionPhase, SessionState};
pub use callback::CallbackParams;
pub use notify::{LoggingNavigator, Navigation, Navigator, NoticeLevel, Notifier, TracingNotifier};
