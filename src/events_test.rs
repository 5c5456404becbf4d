use super::*;

#[tokio::test]
async fn subscriber_receives_emitted_event() {
    let events = AuthEvents::new();
    let mut rx = events.subscribe();
    events.emit(AuthEvent::Done { flow: FlowKind::SignIn, signed_in: true });
    let event = rx.recv().await.unwrap();
    assert_eq!(event, AuthEvent::Done { flow: FlowKind::SignIn, signed_in: true });
}

#[tokio::test]
async fn emit_without_subscribers_is_a_no_op() {
    let events = AuthEvents::new();
    events.emit(AuthEvent::Done { flow: FlowKind::SignOut, signed_in: false });
}

#[tokio::test]
async fn each_subscriber_sees_every_event() {
    let events = AuthEvents::new();
    let mut rx1 = events.subscribe();
    let mut rx2 = events.subscribe();
    events.emit(AuthEvent::Done { flow: FlowKind::Federated, signed_in: false });
    assert!(rx1.recv().await.is_ok());
    assert!(rx2.recv().await.is_ok());
}

#[tokio::test]
async fn late_subscriber_misses_earlier_events() {
    let events = AuthEvents::new();
    events.emit(AuthEvent::Done { flow: FlowKind::SignIn, signed_in: true });
    let mut rx = events.subscribe();
    assert!(rx.try_recv().is_err());
}
