use boredit::config::{Config, MAX_LOCK_TIMEOUT_MINUTES};
use boredit::core::context::EditContext;
use boredit::db::queries::load_user_by_name;
use boredit::errors::AppError;
use chrono::Duration;

mod common;
use common::Fixture;

#[test]
fn test_missing_keys_fall_back_to_defaults() {
    let cfg = Config::from_yaml("database: /tmp/boredit_cfg.sqlite\n").unwrap();
    assert_eq!(cfg.lock_timeout_minutes, 60);
    assert_eq!(cfg.unknown_lithology_code, "unknown");
    assert_eq!(cfg.lock_timeout().unwrap(), Duration::minutes(60));
}

#[test]
fn test_out_of_range_lock_timeout_is_rejected() {
    for minutes in [0, -5, MAX_LOCK_TIMEOUT_MINUTES + 1, i64::MAX] {
        let yaml = format!("database: /tmp/boredit_cfg.sqlite\nlock_timeout_minutes: {minutes}\n");
        assert!(
            matches!(Config::from_yaml(&yaml), Err(AppError::Config(_))),
            "timeout {minutes}"
        );
    }

    let upper = format!(
        "database: /tmp/boredit_cfg.sqlite\nlock_timeout_minutes: {MAX_LOCK_TIMEOUT_MINUTES}\n"
    );
    assert!(Config::from_yaml(&upper).is_ok());
}

#[test]
fn test_context_refuses_unvalidated_timeout() {
    let fx = Fixture::new("config_ctx_timeout");
    let user = load_user_by_name(&fx.pool.conn, "editor").unwrap();

    let huge = Config {
        lock_timeout_minutes: i64::MAX,
        ..Config::default()
    };
    assert!(matches!(
        EditContext::new(user.clone(), &huge),
        Err(AppError::Config(_))
    ));

    let zero = Config {
        lock_timeout_minutes: 0,
        ..Config::default()
    };
    assert!(matches!(EditContext::new(user, &zero), Err(AppError::Config(_))));
}
