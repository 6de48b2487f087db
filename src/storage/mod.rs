// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent session storage.
//!
//! Tokens and the cached profile picture are opaque strings kept in a
//! key-value store, the way a browser keeps them in origin-scoped local
//! storage. Absence of the access token means "logged out".

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::sync::Arc;

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "token";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key for the cached profile picture URL.
pub const PROFILE_PICTURE_KEY: &str = "profilePicture";
/// Storage key for the admin back-office token.
pub const ADMIN_TOKEN_KEY: &str = "adminToken";

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Key-value backend for session data.
pub trait TokenStorage: Send + Sync {
    /// Read a value; missing keys and empty values both read as `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed view over a [`TokenStorage`].
///
/// Only the auth service writes through this; everything else reads.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn TokenStorage>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn TokenStorage>) -> Self {
        Self { backend }
    }

    /// Store with an in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    pub fn profile_picture(&self) -> Option<String> {
        self.read(PROFILE_PICTURE_KEY)
    }

    pub fn admin_token(&self) -> Option<String> {
        self.read(ADMIN_TOKEN_KEY)
    }

    /// Persist a freshly issued token pair.
    ///
    /// A missing refresh token leaves any stored one in place.
    pub fn store_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), StorageError> {
        self.backend.set(ACCESS_TOKEN_KEY, access_token)?;
        if let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) {
            self.backend.set(REFRESH_TOKEN_KEY, refresh_token)?;
        }
        Ok(())
    }

    /// Put back a token pair captured before a failed write.
    ///
    /// `None` removes the key. Both keys are attempted; the first error is
    /// returned.
    pub fn restore_tokens(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<(), StorageError> {
        let mut first_error = None;
        for (key, value) in [
            (ACCESS_TOKEN_KEY, access_token),
            (REFRESH_TOKEN_KEY, refresh_token),
        ] {
            let result = match value {
                Some(value) => self.backend.set(key, value),
                None => self.backend.remove(key),
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn set_access_token(&self, access_token: &str) -> Result<(), StorageError> {
        self.backend.set(ACCESS_TOKEN_KEY, access_token)
    }

    pub fn set_profile_picture(&self, url: &str) -> Result<(), StorageError> {
        self.backend.set(PROFILE_PICTURE_KEY, url)
    }

    pub fn set_admin_token(&self, token: &str) -> Result<(), StorageError> {
        self.backend.set(ADMIN_TOKEN_KEY, token)
    }

    pub fn clear_admin_token(&self) -> Result<(), StorageError> {
        self.backend.remove(ADMIN_TOKEN_KEY)
    }

    /// Remove the user's tokens and cached profile data.
    ///
    /// Every key is attempted even if an earlier removal fails; the first
    /// error is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, PROFILE_PICTURE_KEY] {
            if let Err(e) = self.backend.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear session key");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn read(&self, key: &str) -> Option<String> {
        self.backend.get(key).filter(|v| !v.is_empty())
    }
}
