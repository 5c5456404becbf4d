//! Test doubles shared by the colocated test modules: a scripted
//! transport and a recording UI adapter.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::transport::{Transport, TransportFailure, TransportResponse};
use crate::ui::{UiAdapter, Widget};

/// One observed transport call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub path: String,
    pub fields: Vec<(String, String)>,
}

/// Transport that replays scripted responses in order and records every
/// call. Calls may be individually gated on a oneshot so tests can
/// observe client state while a request is still in flight. When the
/// script runs dry it answers `200` with an empty body.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportFailure>>>,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(TransportResponse { status, body: body.to_owned() }));
    }

    pub fn push_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(TransportFailure { message: message.to_owned() }));
    }

    /// Gate the next un-gated call on the returned sender: the call
    /// records itself, then blocks until the sender fires (or drops).
    pub fn push_gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.path).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<TransportResponse, TransportFailure> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(RecordedCall {
            path: path.to_owned(),
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        });
        let gate = self
            .gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(TransportResponse { status: 200, body: String::new() }))
    }
}

/// One observed UI operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum UiOp {
    SetVisible(Widget, bool),
    Focus(Widget),
    SetText(Widget, String),
    Navigate(String),
}

/// Adapter that records every operation for assertions.
#[derive(Default)]
pub(crate) struct RecordingUi {
    ops: Mutex<Vec<UiOp>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<UiOp> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Last text set on `widget`, if any.
    pub fn text_of(&self, widget: Widget) -> Option<String> {
        self.ops()
            .into_iter()
            .rev()
            .find_map(|op| match op {
                UiOp::SetText(w, text) if w == widget => Some(text),
                _ => None,
            })
    }

    /// Last visibility set on `widget`, if any.
    pub fn visible(&self, widget: Widget) -> Option<bool> {
        self.ops()
            .into_iter()
            .rev()
            .find_map(|op| match op {
                UiOp::SetVisible(w, visible) if w == widget => Some(visible),
                _ => None,
            })
    }

    pub fn navigations(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                UiOp::Navigate(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Text showing in the error banner, if it is visible.
    pub fn error_banner(&self) -> Option<String> {
        if self.visible(Widget::ErrorBanner) == Some(true) {
            self.text_of(Widget::ErrorBanner)
        } else {
            None
        }
    }

    fn record(&self, op: UiOp) {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner).push(op);
    }
}

impl UiAdapter for RecordingUi {
    fn set_visible(&self, widget: Widget, visible: bool) {
        self.record(UiOp::SetVisible(widget, visible));
    }

    fn focus(&self, widget: Widget) {
        self.record(UiOp::Focus(widget));
    }

    fn set_text(&self, widget: Widget, text: &str) {
        self.record(UiOp::SetText(widget, text.to_owned()));
    }

    fn navigate(&self, url: &str) {
        self.record(UiOp::Navigate(url.to_owned()));
    }
}
