//! Flow-completion notifications.
//!
//! DESIGN
//! ======
//! Listeners (route guards, status widgets) subscribe for "auth done"
//! events instead of sharing a mutable notify flag with the flows. Each
//! event carries the flow kind that finished and the resulting
//! signed-in state, so a listener can tell a completed sign-out from a
//! completed sign-in without consulting the client.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use tokio::sync::broadcast;

use crate::flow::FlowKind;

/// Notification published when a flow reaches a terminal state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// The flow finished; `signed_in` is the session state it left
    /// behind.
    Done { flow: FlowKind, signed_in: bool },
}

const CHANNEL_CAPACITY: usize = 16;

/// Broadcast fan-out for [`AuthEvent`]s. Dropping every receiver is
/// fine; sends to an empty channel are no-ops.
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn emit(&self, event: AuthEvent) {
        tracing::debug!(?event, "auth event");
        let _ = self.sender.send(event);
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
