//! Error taxonomy and server-message mapping.
//!
//! ERROR HANDLING
//! ==============
//! Three disjoint classes, all surfaced in-place in the current form:
//! local validation (no network call made), transport failures
//! (timeout, connection error), and server rejections (HTTP failure
//! status, or a 2xx body carrying an application-level error). None are
//! fatal; flows return to idle and the user may retry.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

/// Error returned by every authentication flow.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Sign-in submitted with an empty login.
    #[error("You must provide a user name and password.")]
    MissingCredentials,
    /// Account creation submitted with an empty login.
    #[error("You must provide a user name.")]
    MissingLogin,
    /// Account creation submitted with mismatched password fields.
    #[error("Passwords do not match.")]
    PasswordMismatch,
    /// Federated sign-in requested without a provider identifier.
    #[error("You must select an identity provider.")]
    MissingProvider,
    /// The server rejected the request; `message` is user-facing.
    #[error("{message}")]
    Rejected { message: String },
    /// The request never completed: timeout or network failure.
    #[error("{message}")]
    Transport { message: String },
}

/// Coarse classification of an [`AuthError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any network call.
    LocalValidation,
    /// The server answered and said no.
    ServerRejection,
    /// The request itself failed in transit.
    Transport,
}

impl AuthError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials
            | Self::MissingLogin
            | Self::PasswordMismatch
            | Self::MissingProvider => ErrorKind::LocalValidation,
            Self::Rejected { .. } => ErrorKind::ServerRejection,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }
}

/// Extract a user-facing message from a server response body.
///
/// Tries JSON first (an `error` field, then `Message`); falls back to
/// scraping the `<title>` of an HTML error page, since some deployments
/// answer with an error page instead of JSON. Any parse failure is
/// silent, not fatal.
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    if serde_json::from_str::<Value>(body).is_ok() {
        return extract_json_message(body);
    }
    html_title(body)
}

/// JSON-only variant of [`extract_message`], for 2xx bodies: an HTML
/// page in a successful response is a success artifact, not an error
/// page, so only an explicit JSON field counts as a rejection there.
#[must_use]
pub fn extract_json_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    for key in ["error", "Message"] {
        if let Some(message) = value.get(key).and_then(Value::as_str) {
            if !message.is_empty() {
                return Some(message.to_owned());
            }
        }
    }
    None
}

/// Fixed message for a known failure status, applied uniformly across
/// flows when the body carries no message of its own.
#[must_use]
pub fn status_message(status: u16) -> Option<&'static str> {
    match status {
        404 => Some("Cannot obtain login page"),
        500 => Some("Internal error during authentication"),
        401 => Some("Invalid user login"),
        _ => None,
    }
}

/// Map a failure response to its user-facing message: body message
/// first, then the status table, then `fallback`.
pub(crate) fn rejection_message(status: u16, body: &str, fallback: &str) -> String {
    extract_message(body)
        .or_else(|| status_message(status).map(str::to_owned))
        .unwrap_or_else(|| fallback.to_owned())
}

fn html_title(body: &str) -> Option<String> {
    let lower = body.to_ascii_lowercase();
    let open_start = lower.find("<title")?;
    let open_end = open_start + lower[open_start..].find('>')? + 1;
    let close = open_end + lower[open_end..].find("</title")?;
    let title = body.get(open_end..close)?.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_owned())
    }
}
