//! Injected UI adapter.
//!
//! DESIGN
//! ======
//! Flow logic never touches a toolkit directly; it drives this adapter,
//! which a host binds to its widgets (or to nothing, via [`NullUi`]).
//! Keeps the session flows unit-testable without a DOM.

use crate::error::AuthError;

/// Widgets the auth flows reconcile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Widget {
    /// Sign-in panel with the login/password fields.
    LoginPanel,
    /// Account-creation panel.
    CreatePanel,
    /// In-form error banner.
    ErrorBanner,
    /// Signed-in status line.
    StatusText,
    /// Affordance that opens the account-creation panel.
    CreateAccountLink,
}

/// Host-provided bindings for the handful of UI operations the flows
/// need.
pub trait UiAdapter: Send + Sync {
    fn set_visible(&self, widget: Widget, visible: bool);
    fn focus(&self, widget: Widget);
    fn set_text(&self, widget: Widget, text: &str);
    /// Leave the current view for `url` (sign-out landing, federated
    /// redirect).
    fn navigate(&self, url: &str);

    /// Show `message` in the error banner.
    fn show_error(&self, message: &str) {
        self.set_text(Widget::ErrorBanner, message);
        self.set_visible(Widget::ErrorBanner, true);
    }

    /// Hide the error banner.
    fn clear_error(&self) {
        self.set_text(Widget::ErrorBanner, "");
        self.set_visible(Widget::ErrorBanner, false);
    }

    /// Surface `error` and reopen `panel` so the user can retry.
    fn reopen_with_error(&self, panel: Widget, error: &AuthError) {
        self.show_error(&error.to_string());
        self.set_visible(panel, true);
        self.focus(panel);
    }
}

/// Adapter that binds to nothing. Useful for headless hosts and as a
/// default.
pub struct NullUi;

impl UiAdapter for NullUi {
    fn set_visible(&self, _widget: Widget, _visible: bool) {}
    fn focus(&self, _widget: Widget) {}
    fn set_text(&self, _widget: Widget, _text: &str) {}
    fn navigate(&self, _url: &str) {}
}
