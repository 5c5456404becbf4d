//! Client-side session model.
//!
//! SYSTEM CONTEXT
//! ==============
//! `Session` is the client's current belief about the authenticated
//! identity. It starts anonymous at construction, transitions to
//! signed-in when a server round trip reports success, and is reset on
//! sign-out or a failed session probe. Server truth always wins: every
//! mutating flow ends with a probe that reconciles this view.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::Deserialize;
use time::OffsetDateTime;
use time::macros::format_description;

/// The client's view of the authenticated identity.
///
/// Invariant: `identity` is non-`None` iff the most recent server round
/// trip reported success.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    /// Display name or login of the signed-in user.
    pub identity: Option<String>,
    /// Server-reported last-login timestamp, epoch milliseconds.
    pub signed_in_at: Option<i64>,
    /// Credential backend that authenticated the user, when several are
    /// configured.
    pub store: Option<String>,
}

impl Session {
    /// Initial state at client construction.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Reset to anonymous. Used by sign-out and probe failure.
    pub fn reset(&mut self) {
        *self = Self::anonymous();
    }

    /// Transition to signed-in from a server session descriptor.
    /// Leaves `store` untouched; callers that know which backend
    /// authenticated the user set it separately.
    pub fn apply(&mut self, descriptor: &SessionDescriptor) {
        self.identity = Some(descriptor.display_name().to_owned());
        self.signed_in_at = descriptor.last_login;
    }
}

/// Session descriptor returned by the server on successful sign-in and
/// on session probes. Field names follow the wire format.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SessionDescriptor {
    pub login: String,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Location", default)]
    pub location: Option<String>,
    #[serde(rename = "lastlogintimestamp", default)]
    pub last_login: Option<i64>,
}

impl SessionDescriptor {
    /// Preferred display name: `Name` when present and non-blank after
    /// trimming, else `login`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.login)
    }
}

/// Render an epoch-milliseconds last-login timestamp as a short
/// `MM/DD/YY HH:MM` string, or `"N/A"` when absent or out of range.
#[must_use]
pub fn format_last_login(timestamp_millis: Option<i64>) -> String {
    let Some(millis) = timestamp_millis else {
        return "N/A".to_owned();
    };
    let Ok(datetime) = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
    else {
        return "N/A".to_owned();
    };
    datetime
        .format(format_description!(
            "[month]/[day]/[year repr:last_two] [hour]:[minute]"
        ))
        .unwrap_or_else(|_| "N/A".to_owned())
}

/// Status line shown while signed in, e.g. `jsmith logged in since 01/05/11 09:30`.
#[must_use]
pub fn status_line(descriptor: &SessionDescriptor) -> String {
    format!(
        "{} logged in since {}",
        descriptor.display_name(),
        format_last_login(descriptor.last_login)
    )
}
