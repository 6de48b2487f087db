// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth callback parameters.
//!
//! After Google sign-in the API redirects the browser back to the app root
//! with the issued tokens (or an error code) in the query string.

use reqwest::Url;

/// Error code the API sends when a blocked account tries to sign in.
pub const USER_BLOCKED: &str = "user_blocked";

/// Base used to resolve relative locations such as `/?token=...`.
const RELATIVE_BASE: &str = "http://localhost/";

/// Callback URL could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("Invalid callback URL: {0}")]
pub struct InvalidCallbackUrl(String);

/// Query parameters delivered by the OAuth redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Extract callback parameters from an absolute or root-relative URL.
    ///
    /// The first occurrence of each parameter wins and empty values count as
    /// absent.
    pub fn from_url(location: &str) -> Result<Self, InvalidCallbackUrl> {
        let url = match Url::parse(location) {
            Ok(url) => url,
            Err(_) => Url::parse(RELATIVE_BASE)
                .and_then(|base| base.join(location))
                .map_err(|e| InvalidCallbackUrl(e.to_string()))?,
        };

        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            let slot = match &*key {
                "token" => &mut params.token,
                "refreshToken" => &mut params.refresh_token,
                "error" => &mut params.error,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        Ok(params)
    }

    /// The API refused sign-in because the account is blocked.
    pub fn is_blocked(&self) -> bool {
        self.error.as_deref() == Some(USER_BLOCKED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_from_absolute_url() {
        let params =
            CallbackParams::from_url("https://notes.example/?token=abc123&refreshToken=r%2B1")
                .unwrap();
        assert_eq!(params.token.as_deref(), Some("abc123"));
        assert_eq!(params.refresh_token.as_deref(), Some("r+1"));
        assert!(!params.is_blocked());
    }

    #[test]
    fn test_relative_url() {
        let params = CallbackParams::from_url("/?token=abc123").unwrap();
        assert_eq!(params.token.as_deref(), Some("abc123"));
        assert!(params.refresh_token.is_none());
    }

    #[test]
    fn test_blocked_error() {
        let params = CallbackParams::from_url("/?error=user_blocked").unwrap();
        assert!(params.is_blocked());
        assert!(params.token.is_none());
    }

    #[test]
    fn test_other_error_is_not_blocked() {
        let params = CallbackParams::from_url("/?error=access_denied").unwrap();
        assert_eq!(params.error.as_deref(), Some("access_denied"));
        assert!(!params.is_blocked());
    }

    #[test]
    fn test_empty_and_repeated_values() {
        let params = CallbackParams::from_url("/?token=&token=second&token=third").unwrap();
        assert_eq!(params.token.as_deref(), Some("second"));
    }

    #[test]
    fn test_no_query() {
        assert_eq!(
            CallbackParams::from_url("https://notes.example/").unwrap(),
            CallbackParams::default()
        );
    }
}
