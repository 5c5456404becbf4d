//! Flow lifecycle and supersession tracking.
//!
//! DESIGN
//! ======
//! Each user-initiated flow runs `Idle -> Submitting -> {Succeeded,
//! Failed}`. In-flight HTTP calls are never cancelled, so a new flow of
//! the same kind supersedes the old one and the old completion must be
//! discarded when it eventually lands. Session-mutating kinds also bump
//! a shared epoch: a sign-out started while a sign-in is in flight
//! invalidates the sign-in's ticket, so the stale response cannot
//! resurrect the session.

#[cfg(test)]
#[path = "flow_test.rs"]
mod flow_test;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// One complete user-initiated authentication interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
    SignIn,
    SignOut,
    CreateUser,
    Federated,
    Probe,
}

impl FlowKind {
    /// Whether a flow of this kind changes the session on completion.
    /// Probes only read.
    #[must_use]
    pub fn mutates_session(self) -> bool {
        !matches!(self, Self::Probe)
    }
}

/// Lifecycle state of the most recent flow of a given kind. `Succeeded`
/// and `Failed` are resting states; a new flow may begin from any of
/// them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// How a flow call ended: it ran to completion and its result was
/// applied, or a newer flow superseded it and the completion was
/// discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    Superseded,
}

/// Identifies one flow instance. Completions are applied only while the
/// ticket is still current.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowTicket {
    kind: FlowKind,
    generation: u64,
    epoch: u64,
}

impl FlowTicket {
    #[must_use]
    pub fn kind(&self) -> FlowKind {
        self.kind
    }
}

#[derive(Default)]
struct TrackerInner {
    generations: HashMap<FlowKind, u64>,
    states: HashMap<FlowKind, FlowState>,
    epoch: u64,
}

/// Per-kind generation counters plus the shared session epoch.
#[derive(Default)]
pub struct FlowTracker {
    inner: Mutex<TrackerInner>,
}

impl FlowTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new flow instance, superseding any outstanding instance
    /// of the same kind (and, for session-mutating kinds, any
    /// outstanding instance of every other kind).
    pub fn begin(&self, kind: FlowKind) -> FlowTicket {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = inner.generations.entry(kind).or_insert(0);
        *generation += 1;
        let generation = *generation;
        if kind.mutates_session() {
            inner.epoch += 1;
        }
        inner.states.insert(kind, FlowState::Submitting);
        FlowTicket { kind, generation, epoch: inner.epoch }
    }

    /// Whether the ticket's flow instance is still the current one.
    #[must_use]
    pub fn is_current(&self, ticket: &FlowTicket) -> bool {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.generations.get(&ticket.kind) == Some(&ticket.generation) && inner.epoch == ticket.epoch
    }

    /// Record the terminal state for a flow instance. Returns `false`
    /// (leaving the recorded state alone) when the ticket has been
    /// superseded and the completion must be discarded.
    pub fn complete(&self, ticket: &FlowTicket, succeeded: bool) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.generations.get(&ticket.kind) != Some(&ticket.generation) || inner.epoch != ticket.epoch {
            return false;
        }
        let state = if succeeded { FlowState::Succeeded } else { FlowState::Failed };
        inner.states.insert(ticket.kind, state);
        true
    }

    /// Snapshot of the most recent state for a flow kind.
    #[must_use]
    pub fn state(&self, kind: FlowKind) -> FlowState {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.states.get(&kind).copied().unwrap_or_default()
    }
}
