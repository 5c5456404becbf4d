use super::*;

// =============================================================================
// Variant tables
// =============================================================================

#[test]
fn mixed_variant_paths() {
    let endpoints = Endpoints::mixed();
    assert_eq!(endpoints.sign_in, "/login/form");
    assert_eq!(endpoints.current_user, "/login");
    assert_eq!(endpoints.sign_out, "/logout");
    assert_eq!(endpoints.create_user, "/users");
    assert_eq!(endpoints.federated, "/login/openid");
    assert_eq!(endpoints.can_add_users, "/login/canaddusers");
    assert_eq!(endpoints.landing, "/index.html");
}

#[test]
fn flat_variant_paths() {
    let endpoints = Endpoints::flat();
    assert_eq!(endpoints.sign_in, "/login");
    assert_eq!(endpoints.create_user, "/users/create");
    assert_eq!(endpoints.federated, "/openid");
}

#[test]
fn default_is_mixed() {
    assert_eq!(Endpoints::default(), Endpoints::mixed());
}

// =============================================================================
// named lookup
// =============================================================================

#[test]
fn named_resolves_both_variants() {
    assert_eq!(Endpoints::named("mixed"), Some(Endpoints::mixed()));
    assert_eq!(Endpoints::named("flat"), Some(Endpoints::flat()));
}

#[test]
fn named_is_case_and_whitespace_tolerant() {
    assert_eq!(Endpoints::named(" Mixed "), Some(Endpoints::mixed()));
    assert_eq!(Endpoints::named("FLAT"), Some(Endpoints::flat()));
}

#[test]
fn named_unknown_is_none() {
    assert!(Endpoints::named("legacy").is_none());
    assert!(Endpoints::named("").is_none());
}

// =============================================================================
// from_env — env manipulation requires unsafe in edition 2024; these
// tests run in one process, so keep them in a single case to avoid
// races.
// =============================================================================

#[test]
fn from_env_selects_variant_and_defaults_to_mixed() {
    unsafe { std::env::remove_var("TIDEPOOL_AUTH_VARIANT") };
    assert_eq!(Endpoints::from_env(), Endpoints::mixed());

    unsafe { std::env::set_var("TIDEPOOL_AUTH_VARIANT", "flat") };
    assert_eq!(Endpoints::from_env(), Endpoints::flat());

    unsafe { std::env::set_var("TIDEPOOL_AUTH_VARIANT", "bogus") };
    assert_eq!(Endpoints::from_env(), Endpoints::mixed());

    unsafe { std::env::remove_var("TIDEPOOL_AUTH_VARIANT") };
}
