//! Client-side authentication for the Tidepool web IDE.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server owns credentials, session cookies, and federated provider
//! handshakes; this crate owns the client's view of them. It tracks the
//! current [`session::Session`], drives the sign-in / sign-out /
//! create-account flows and the federated popup or redirect, and
//! reconciles an injected [`ui::UiAdapter`] with the last known server
//! response. All HTTP goes through the [`transport::Transport`] seam,
//! so every flow is testable without a network or a DOM.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod events;
pub mod federated;
pub mod flow;
pub mod session;
pub mod transport;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use client::AuthClient;
pub use endpoints::Endpoints;
pub use error::{AuthError, ErrorKind};
pub use events::AuthEvent;
pub use federated::{PollTiming, PopupHandle, PopupWatch, spawn_popup_watch};
pub use flow::{FlowKind, FlowOutcome, FlowState};
pub use session::{Session, SessionDescriptor};
pub use transport::{HttpTransport, Transport, TransportFailure, TransportResponse};
pub use ui::{NullUi, UiAdapter, Widget};
