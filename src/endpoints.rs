//! Endpoint tables for the supported deployment variants.
//!
//! Paths differ slightly between deployments but are stable within one:
//! the default "mixed" variant routes form sign-in through
//! `/login/form` and federated sign-in through `/login/openid`, while
//! the older "flat" variant uses `/login` and `/openid` with user
//! creation at `/users/create`.

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod endpoints_test;

/// Server paths consumed by the auth client, plus the landing view the
/// UI returns to after sign-out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Credential sign-in (form POST).
    pub sign_in: String,
    /// Current-identity probe (empty POST).
    pub current_user: String,
    /// Sign-out (empty POST).
    pub sign_out: String,
    /// Self-service account creation (form POST).
    pub create_user: String,
    /// Federated sign-in entry point (navigated to, not POSTed).
    pub federated: String,
    /// Capability probe gating the create-account affordance.
    pub can_add_users: String,
    /// Landing view after sign-out.
    pub landing: String,
}

impl Endpoints {
    /// Default variant.
    #[must_use]
    pub fn mixed() -> Self {
        Self {
            sign_in: "/login/form".to_owned(),
            current_user: "/login".to_owned(),
            sign_out: "/logout".to_owned(),
            create_user: "/users".to_owned(),
            federated: "/login/openid".to_owned(),
            can_add_users: "/login/canaddusers".to_owned(),
            landing: "/index.html".to_owned(),
        }
    }

    /// Older single-level layout.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            sign_in: "/login".to_owned(),
            current_user: "/login".to_owned(),
            sign_out: "/logout".to_owned(),
            create_user: "/users/create".to_owned(),
            federated: "/openid".to_owned(),
            can_add_users: "/login/canaddusers".to_owned(),
            landing: "/index.html".to_owned(),
        }
    }

    /// Look up a variant by name (`"mixed"` or `"flat"`).
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mixed" => Some(Self::mixed()),
            "flat" => Some(Self::flat()),
            _ => None,
        }
    }

    /// Variant from `TIDEPOOL_AUTH_VARIANT`, defaulting to mixed when
    /// unset or unrecognized.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("TIDEPOOL_AUTH_VARIANT")
            .ok()
            .and_then(|name| Self::named(&name))
            .unwrap_or_else(Self::mixed)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::mixed()
    }
}
