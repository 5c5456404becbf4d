use super::*;

// =============================================================================
// SessionDescriptor deserialization
// =============================================================================

#[test]
fn descriptor_full_body_deserializes() {
    let json = r#"{"login": "jsmith", "Name": "Jane Smith", "Location": "/users/jsmith", "lastlogintimestamp": 1300000000000}"#;
    let descriptor: SessionDescriptor = serde_json::from_str(json).unwrap();
    assert_eq!(descriptor.login, "jsmith");
    assert_eq!(descriptor.name.as_deref(), Some("Jane Smith"));
    assert_eq!(descriptor.location.as_deref(), Some("/users/jsmith"));
    assert_eq!(descriptor.last_login, Some(1_300_000_000_000));
}

#[test]
fn descriptor_login_only_deserializes() {
    let descriptor: SessionDescriptor = serde_json::from_str(r#"{"login": "jsmith"}"#).unwrap();
    assert_eq!(descriptor.login, "jsmith");
    assert!(descriptor.name.is_none());
    assert!(descriptor.location.is_none());
    assert!(descriptor.last_login.is_none());
}

#[test]
fn descriptor_without_login_is_rejected() {
    assert!(serde_json::from_str::<SessionDescriptor>(r#"{"Name": "Jane"}"#).is_err());
}

// =============================================================================
// display_name
// =============================================================================

#[test]
fn display_name_prefers_name() {
    let descriptor: SessionDescriptor =
        serde_json::from_str(r#"{"login": "jsmith", "Name": "Jane Smith"}"#).unwrap();
    assert_eq!(descriptor.display_name(), "Jane Smith");
}

#[test]
fn display_name_falls_back_to_login_when_name_missing() {
    let descriptor: SessionDescriptor = serde_json::from_str(r#"{"login": "jsmith"}"#).unwrap();
    assert_eq!(descriptor.display_name(), "jsmith");
}

#[test]
fn display_name_falls_back_to_login_when_name_blank() {
    let descriptor: SessionDescriptor =
        serde_json::from_str(r#"{"login": "jsmith", "Name": "   "}"#).unwrap();
    assert_eq!(descriptor.display_name(), "jsmith");
}

#[test]
fn display_name_trims_surrounding_whitespace() {
    let descriptor: SessionDescriptor =
        serde_json::from_str(r#"{"login": "jsmith", "Name": "  Jane  "}"#).unwrap();
    assert_eq!(descriptor.display_name(), "Jane");
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[test]
fn anonymous_session_is_not_signed_in() {
    let session = Session::anonymous();
    assert!(!session.is_signed_in());
    assert!(session.identity.is_none());
    assert!(session.signed_in_at.is_none());
    assert!(session.store.is_none());
}

#[test]
fn apply_transitions_to_signed_in() {
    let descriptor: SessionDescriptor =
        serde_json::from_str(r#"{"login": "jsmith", "lastlogintimestamp": 42}"#).unwrap();
    let mut session = Session::anonymous();
    session.apply(&descriptor);
    assert!(session.is_signed_in());
    assert_eq!(session.identity.as_deref(), Some("jsmith"));
    assert_eq!(session.signed_in_at, Some(42));
}

#[test]
fn apply_leaves_store_untouched() {
    let descriptor: SessionDescriptor = serde_json::from_str(r#"{"login": "jsmith"}"#).unwrap();
    let mut session = Session::anonymous();
    session.store = Some("ldap".to_owned());
    session.apply(&descriptor);
    assert_eq!(session.store.as_deref(), Some("ldap"));
}

#[test]
fn reset_returns_to_anonymous() {
    let descriptor: SessionDescriptor = serde_json::from_str(r#"{"login": "jsmith"}"#).unwrap();
    let mut session = Session::anonymous();
    session.apply(&descriptor);
    session.store = Some("ldap".to_owned());
    session.reset();
    assert_eq!(session, Session::anonymous());
}

// =============================================================================
// format_last_login
// =============================================================================

#[test]
fn format_last_login_renders_short_form() {
    // 2011-03-13T07:06:40Z
    assert_eq!(format_last_login(Some(1_300_000_000_000)), "03/13/11 07:06");
}

#[test]
fn format_last_login_missing_is_not_available() {
    assert_eq!(format_last_login(None), "N/A");
}

#[test]
fn format_last_login_out_of_range_is_not_available() {
    assert_eq!(format_last_login(Some(i64::MAX)), "N/A");
}

// =============================================================================
// status_line
// =============================================================================

#[test]
fn status_line_uses_display_name_and_timestamp() {
    let descriptor: SessionDescriptor = serde_json::from_str(
        r#"{"login": "jsmith", "Name": "Jane", "lastlogintimestamp": 1300000000000}"#,
    )
    .unwrap();
    assert_eq!(status_line(&descriptor), "Jane logged in since 03/13/11 07:06");
}

#[test]
fn status_line_without_timestamp_reads_not_available() {
    let descriptor: SessionDescriptor = serde_json::from_str(r#"{"login": "jsmith"}"#).unwrap();
    assert_eq!(status_line(&descriptor), "jsmith logged in since N/A");
}
