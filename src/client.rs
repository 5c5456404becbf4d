//! The auth session client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mediates the three credential flows (sign in, sign out, create
//! account) and the session probe against the deployment's HTTP
//! endpoints, reconciling the injected UI with the last known server
//! response. Federated sign-in lives in [`crate::federated`] and drives
//! the same probe path.
//!
//! CONCURRENCY
//! ===========
//! Flows may be driven from concurrent tasks. In-flight HTTP calls are
//! not cancelled; instead every request carries a [`FlowTicket`] and
//! completions from superseded instances are discarded before touching
//! the session or the UI. Every successful mutating flow ends with a
//! probe so displayed identity tracks server truth rather than
//! optimistic state.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use uuid::Uuid;

use crate::endpoints::Endpoints;
use crate::error::{AuthError, extract_json_message, rejection_message};
use crate::events::{AuthEvent, AuthEvents};
use crate::flow::{FlowKind, FlowOutcome, FlowState, FlowTicket, FlowTracker};
use crate::session::{Session, SessionDescriptor, status_line};
use crate::transport::{Transport, TransportResponse};
use crate::ui::{UiAdapter, Widget};

const CREATE_USER_FALLBACK: &str = "User could not be created.";

#[derive(Debug, Deserialize)]
struct CanAddUsersResponse {
    #[serde(rename = "CanAddUsers")]
    can_add_users: bool,
}

/// Client-visible authentication state plus the flows that mutate it.
pub struct AuthClient {
    transport: Arc<dyn Transport>,
    ui: Arc<dyn UiAdapter>,
    endpoints: Endpoints,
    session: Mutex<Session>,
    flows: FlowTracker,
    events: AuthEvents,
}

impl AuthClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, ui: Arc<dyn UiAdapter>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            ui,
            endpoints,
            session: Mutex::new(Session::anonymous()),
            flows: FlowTracker::new(),
            events: AuthEvents::new(),
        }
    }

    /// Snapshot of the current session view.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Subscribe to flow-completion events.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Most recent state of a flow kind, for UI affordances.
    #[must_use]
    pub fn flow_state(&self, kind: FlowKind) -> FlowState {
        self.flows.state(kind)
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub(crate) fn ui(&self) -> &dyn UiAdapter {
        self.ui.as_ref()
    }

    pub(crate) fn flows(&self) -> &FlowTracker {
        &self.flows
    }

    pub(crate) fn emit(&self, event: AuthEvent) {
        self.events.emit(event);
    }

    /// Page-load equivalent: capability check plus initial session
    /// probe. Both failures are non-fatal.
    pub async fn initialize(&self) {
        if let Err(error) = self.can_add_users().await {
            tracing::debug!(%error, "capability probe failed");
        }
        if let Err(error) = self.probe_session().await {
            tracing::warn!(%error, "initial session probe failed");
        }
    }

    /// Sign in with credentials against the configured store.
    ///
    /// An empty login fails locally without a network round trip. On
    /// success the session transitions to signed-in and a probe
    /// reconciles the displayed identity; on failure the mapped message
    /// lands in the error banner and the sign-in panel reopens.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingCredentials`] on an empty login, otherwise
    /// the mapped transport failure or server rejection.
    pub async fn sign_in(
        &self,
        login: &str,
        password: &str,
        store: Option<&str>,
    ) -> Result<FlowOutcome, AuthError> {
        if login.is_empty() {
            let error = AuthError::MissingCredentials;
            self.ui.reopen_with_error(Widget::LoginPanel, &error);
            return Err(error);
        }

        let ticket = self.flows.begin(FlowKind::SignIn);
        let flow_id = Uuid::new_v4();
        tracing::info!(%flow_id, login, store, "sign-in submitted");
        self.ui.clear_error();
        self.ui.set_visible(Widget::LoginPanel, false);

        let mut fields = vec![("login", login), ("password", password)];
        if let Some(store) = store {
            fields.push(("store", store));
        }
        let result = self.transport.post_form(&self.endpoints.sign_in, &fields).await;

        let response = match result {
            Ok(response) => response,
            Err(failure) => {
                return self.fail_flow(
                    &ticket,
                    Widget::LoginPanel,
                    AuthError::Transport { message: failure.message },
                );
            }
        };
        if let Some(error) = self.sign_in_rejection(&response) {
            return self.fail_flow(&ticket, Widget::LoginPanel, error);
        }

        if !self.flows.complete(&ticket, true) {
            tracing::debug!(%flow_id, "sign-in superseded, discarding response");
            return Ok(FlowOutcome::Superseded);
        }
        if let Ok(descriptor) = serde_json::from_str::<SessionDescriptor>(&response.body) {
            let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            session.apply(&descriptor);
            session.store = store.map(str::to_owned);
        }
        tracing::info!(%flow_id, login, "sign-in succeeded");

        if let Err(error) = self.probe_session().await {
            tracing::warn!(%flow_id, %error, "post-sign-in probe failed");
        }
        let signed_in = self.session().is_signed_in();
        self.events.emit(AuthEvent::Done { flow: FlowKind::SignIn, signed_in });
        Ok(FlowOutcome::Completed)
    }

    /// Sign out.
    ///
    /// The session resets to anonymous and the "auth done" event fires
    /// before the network call resolves; the landing navigation happens
    /// only once the response is observed. A transport failure after
    /// the optimistic reset is logged and swallowed.
    ///
    /// # Errors
    ///
    /// Currently infallible at the API surface; the signature leaves
    /// room for stricter hosts.
    pub async fn sign_out(&self) -> Result<FlowOutcome, AuthError> {
        let ticket = self.flows.begin(FlowKind::SignOut);
        {
            let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            session.reset();
        }
        self.ui.set_text(Widget::StatusText, "");
        self.events.emit(AuthEvent::Done { flow: FlowKind::SignOut, signed_in: false });
        tracing::info!("signed out locally, notifying server");

        let result = self.transport.post_form(&self.endpoints.sign_out, &[]).await;
        match result {
            Ok(response) if response.is_success() => {
                if !self.flows.complete(&ticket, true) {
                    return Ok(FlowOutcome::Superseded);
                }
                if let Err(error) = self.probe_session().await {
                    tracing::warn!(%error, "post-sign-out probe failed");
                }
                self.ui.navigate(&self.endpoints.landing);
            }
            Ok(response) => {
                if !self.flows.complete(&ticket, false) {
                    return Ok(FlowOutcome::Superseded);
                }
                tracing::warn!(status = response.status, "sign-out rejected by server");
            }
            Err(failure) => {
                if !self.flows.complete(&ticket, false) {
                    return Ok(FlowOutcome::Superseded);
                }
                tracing::warn!(error = %failure, "sign-out request failed");
            }
        }
        Ok(FlowOutcome::Completed)
    }

    /// Create a self-service account, then sign in with the same
    /// credentials so the account is usable without a second manual
    /// submission.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingLogin`] or [`AuthError::PasswordMismatch`]
    /// locally (no network call, creation panel reopened), otherwise
    /// the mapped server rejection or transport failure.
    pub async fn create_user(
        &self,
        login: &str,
        password: &str,
        password_confirm: &str,
        store: Option<&str>,
    ) -> Result<FlowOutcome, AuthError> {
        if login.is_empty() {
            let error = AuthError::MissingLogin;
            self.ui.reopen_with_error(Widget::CreatePanel, &error);
            return Err(error);
        }
        if password != password_confirm {
            let error = AuthError::PasswordMismatch;
            self.ui.reopen_with_error(Widget::CreatePanel, &error);
            return Err(error);
        }

        let ticket = self.flows.begin(FlowKind::CreateUser);
        let flow_id = Uuid::new_v4();
        tracing::info!(%flow_id, login, store, "account creation submitted");
        self.ui.clear_error();
        self.ui.set_visible(Widget::CreatePanel, false);

        let mut fields = vec![
            ("login", login),
            ("password", password),
            ("passwordConf", password_confirm),
        ];
        if let Some(store) = store {
            fields.push(("store", store));
        }
        let result = self.transport.post_form(&self.endpoints.create_user, &fields).await;

        let response = match result {
            Ok(response) => response,
            Err(failure) => {
                return self.fail_flow(
                    &ticket,
                    Widget::CreatePanel,
                    AuthError::Transport { message: failure.message },
                );
            }
        };
        if !response.is_success() {
            let message = rejection_message(response.status, &response.body, CREATE_USER_FALLBACK);
            return self.fail_flow(&ticket, Widget::CreatePanel, AuthError::Rejected { message });
        }
        if let Some(message) = extract_json_message(&response.body) {
            return self.fail_flow(&ticket, Widget::CreatePanel, AuthError::Rejected { message });
        }

        if !self.flows.complete(&ticket, true) {
            tracing::debug!(%flow_id, "account creation superseded, discarding response");
            return Ok(FlowOutcome::Superseded);
        }
        tracing::info!(%flow_id, login, "account created, signing in");
        let outcome = self.sign_in(login, password, store).await;
        let signed_in = self.session().is_signed_in();
        self.events.emit(AuthEvent::Done { flow: FlowKind::CreateUser, signed_in });
        outcome
    }

    /// Query the server for the current identity and reconcile the
    /// session and status text. Never navigates. A failed probe is
    /// authoritative: the session resets to anonymous.
    ///
    /// # Errors
    ///
    /// [`AuthError::Transport`] when the probe request itself fails; a
    /// non-2xx answer is a successful probe of an anonymous session.
    pub async fn probe_session(&self) -> Result<FlowOutcome, AuthError> {
        let ticket = self.flows.begin(FlowKind::Probe);
        let result = self.transport.post_form(&self.endpoints.current_user, &[]).await;
        let response = match result {
            Ok(response) => response,
            Err(failure) => {
                if !self.flows.complete(&ticket, false) {
                    return Ok(FlowOutcome::Superseded);
                }
                self.reset_to_anonymous();
                return Err(AuthError::Transport { message: failure.message });
            }
        };
        if !self.flows.complete(&ticket, true) {
            return Ok(FlowOutcome::Superseded);
        }
        if !response.is_success() {
            self.reset_to_anonymous();
            return Ok(FlowOutcome::Completed);
        }
        match serde_json::from_str::<SessionDescriptor>(&response.body) {
            Ok(descriptor) => {
                {
                    let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
                    session.apply(&descriptor);
                }
                self.ui.set_text(Widget::StatusText, &status_line(&descriptor));
            }
            Err(error) => {
                tracing::debug!(%error, "session probe body not a descriptor, leaving session as-is");
            }
        }
        Ok(FlowOutcome::Completed)
    }

    /// Ask whether this deployment allows self-service accounts, hiding
    /// the create-account affordance when it does not.
    ///
    /// # Errors
    ///
    /// [`AuthError::Transport`] or [`AuthError::Rejected`]; callers
    /// treat both as non-fatal and leave the affordance alone.
    pub async fn can_add_users(&self) -> Result<bool, AuthError> {
        let response = self
            .transport
            .post_form(&self.endpoints.can_add_users, &[])
            .await
            .map_err(|failure| AuthError::Transport { message: failure.message })?;
        if !response.is_success() {
            let message = rejection_message(
                response.status,
                &response.body,
                &format!("Unable to load {} status: {}", self.endpoints.can_add_users, response.status),
            );
            return Err(AuthError::Rejected { message });
        }
        let allowed = serde_json::from_str::<CanAddUsersResponse>(&response.body)
            .map_or(true, |r| r.can_add_users);
        if !allowed {
            self.ui.set_visible(Widget::CreateAccountLink, false);
        }
        Ok(allowed)
    }

    /// Map a sign-in response to a rejection, if it is one. A 2xx body
    /// carrying an `error`/`Message` field counts as a rejection even
    /// though the transport succeeded.
    fn sign_in_rejection(&self, response: &TransportResponse) -> Option<AuthError> {
        if response.is_success() {
            return extract_json_message(&response.body)
                .map(|message| AuthError::Rejected { message });
        }
        let fallback = format!(
            "Unable to load {} status: {}",
            self.endpoints.sign_in, response.status
        );
        let message = rejection_message(response.status, &response.body, &fallback);
        Some(AuthError::Rejected { message })
    }

    /// Record a failed flow and surface the error, unless the ticket
    /// has been superseded (stale completions leave the UI alone).
    fn fail_flow(
        &self,
        ticket: &FlowTicket,
        panel: Widget,
        error: AuthError,
    ) -> Result<FlowOutcome, AuthError> {
        if !self.flows.complete(ticket, false) {
            tracing::debug!(kind = ?ticket.kind(), "stale flow failure discarded");
            return Ok(FlowOutcome::Superseded);
        }
        self.ui.reopen_with_error(panel, &error);
        Err(error)
    }

    fn reset_to_anonymous(&self) {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        session.reset();
        drop(session);
        self.ui.set_text(Widget::StatusText, "");
    }
}
