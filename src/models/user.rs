//! User profile model as returned by the API.

use crate::time_utils::has_passed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile of the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Server-side identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Email address
    #[serde(default)]
    pub email: String,
    /// Profile picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// Can moderate submitted notes
    #[serde(default)]
    pub creator: bool,
    /// Pro subscription flag as reported by the server
    #[serde(default)]
    pub premium: bool,
    /// When the Pro subscription ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_expires_at: Option<DateTime<Utc>>,
    /// Access revoked by an administrator
    #[serde(default)]
    pub blocked: bool,
}

impl UserProfile {
    /// Downgrade a lapsed Pro subscription.
    ///
    /// The server only flips `premium` on its next write, so the client
    /// treats an expired subscription as non-premium as soon as it sees it.
    /// Returns true if the profile was downgraded.
    pub fn apply_premium_expiry(&mut self, now: DateTime<Utc>) -> bool {
        match self.premium_expires_at {
            Some(expires_at) if self.premium && has_passed(expires_at, now) => {
                self.premium = false;
                self.premium_expires_at = None;
                true
            }
            _ => false,
        }
    }

    /// Pro entitlement as of `now`.
    pub fn is_premium_at(&self, now: DateTime<Utc>) -> bool {
        self.premium
            && self
                .premium_expires_at
                .map_or(true, |expires_at| !has_passed(expires_at, now))
    }

    /// Profile picture, ignoring empty strings.
    pub fn picture(&self) -> Option<&str> {
        self.profile_picture
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
