// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

mod common;

use common::{start_mock_api, RecordingNavigator, RecordingNotifier, STRONG_PASSWORD};
use notes_exchange_client::models::LoginRequest;
use notes_exchange_client::{AuthService, Config, FileStorage, SessionPhase};
use std::sync::Arc;
use tempfile::tempdir;

fn service(config: &Config) -> AuthService {
    let storage = FileStorage::open(&config.session_file).unwrap();
    AuthService::from_config(
        config,
        Arc::new(storage),
        Arc::new(RecordingNotifier::default()),
        Arc::new(RecordingNavigator::default()),
    )
}

#[tokio::test]
async fn test_session_survives_restart() {
    let api = start_mock_api().await;
    let dir = tempdir().unwrap();
    let config = Config {
        api_base_url: api.base_url.clone(),
        session_file: dir.path().join("session.json"),
        ..Config::default()
    };

    service(&config)
        .login(LoginRequest::new("grace@example.com", STRONG_PASSWORD))
        .await
        .unwrap();

    let restarted = service(&config);
    assert_eq!(restarted.bootstrap("/").await, SessionPhase::Authenticated);
    assert_eq!(
        api.state.requests_to("/api/user/profile")[0]
            .authorization
            .as_deref(),
        Some("Bearer access-1")
    );

    restarted.logout();
    let after_logout = service(&config);
    assert_eq!(
        after_logout.bootstrap("/").await,
        SessionPhase::Unauthenticated
    );
    assert_eq!(api.state.hits("/api/user/profile"), 1);
}
