use boredit::core::borehole::BoreholeLogic;
use boredit::core::lock::LockManager;
use boredit::db::queries::{load_borehole, load_workflow_log};
use boredit::errors::AppError;
use chrono::Duration;

mod common;
use common::Fixture;

#[test]
fn test_acquire_is_exclusive_between_users() {
    let mut fx = Fixture::new("lock_exclusive");
    let editor = fx.ctx("editor");
    let editor2 = fx.ctx("editor2");

    let lock = LockManager::acquire(&mut fx.pool, fx.borehole_id, &editor).unwrap();
    assert_eq!(lock.holder, editor.user.id);
    assert_eq!(lock.acquired_at, editor.now);

    let err = LockManager::acquire(&mut fx.pool, fx.borehole_id, &editor2).unwrap_err();
    match err {
        AppError::Locked {
            holder,
            acquired_at,
        } => {
            assert_eq!(holder, editor.user.id);
            assert_eq!(acquired_at, editor.now);
        }
        other => panic!("expected Locked, got {other:?}"),
    }
}

#[test]
fn test_holder_refreshes_own_lock() {
    let mut fx = Fixture::new("lock_refresh");
    let editor = fx.ctx("editor");

    LockManager::acquire(&mut fx.pool, fx.borehole_id, &editor).unwrap();
    let later = editor.at(editor.now + Duration::minutes(30));
    let lock = LockManager::acquire(&mut fx.pool, fx.borehole_id, &later).unwrap();

    assert_eq!(lock.acquired_at, later.now);
    let stored = load_borehole(&fx.pool.conn, fx.borehole_id).unwrap();
    assert_eq!(stored.lock.map(|l| l.acquired_at), Some(later.now));
}

#[test]
fn test_lock_expires_after_timeout() {
    let mut fx = Fixture::new("lock_expiry");
    let editor = fx.ctx("editor");
    let editor2 = fx.ctx("editor2");

    LockManager::acquire(&mut fx.pool, fx.borehole_id, &editor).unwrap();

    let almost = editor2.at(editor.now + Duration::minutes(59));
    assert!(matches!(
        LockManager::acquire(&mut fx.pool, fx.borehole_id, &almost),
        Err(AppError::Locked { .. })
    ));

    let expired = editor2.at(editor.now + Duration::minutes(60));
    let lock = LockManager::acquire(&mut fx.pool, fx.borehole_id, &expired).unwrap();
    assert_eq!(lock.holder, editor2.user.id);
}

#[test]
fn test_release_policy() {
    let mut fx = Fixture::new("lock_release");
    let editor = fx.ctx("editor");
    let editor2 = fx.ctx("editor2");
    let root = fx.ctx("root");

    LockManager::acquire(&mut fx.pool, fx.borehole_id, &editor).unwrap();

    // another user cannot release a live lock
    assert!(matches!(
        LockManager::release(&mut fx.pool, fx.borehole_id, &editor2),
        Err(AppError::Locked { .. })
    ));

    // the holder can
    LockManager::release(&mut fx.pool, fx.borehole_id, &editor).unwrap();
    assert!(load_borehole(&fx.pool.conn, fx.borehole_id).unwrap().lock.is_none());

    // admins force-unlock
    LockManager::acquire(&mut fx.pool, fx.borehole_id, &editor).unwrap();
    LockManager::release(&mut fx.pool, fx.borehole_id, &root).unwrap();
    assert!(load_borehole(&fx.pool.conn, fx.borehole_id).unwrap().lock.is_none());

    // anyone may clear an expired lock
    LockManager::acquire(&mut fx.pool, fx.borehole_id, &editor).unwrap();
    let later = editor2.at(editor.now + Duration::hours(2));
    LockManager::release(&mut fx.pool, fx.borehole_id, &later).unwrap();
}

#[test]
fn test_acquire_requires_active_role() {
    let mut fx = Fixture::new("lock_role");
    let viewer = fx.ctx("viewer");
    let controller = fx.ctx("controller");
    let outsider = fx.ctx("outsider");

    for ctx in [&viewer, &controller, &outsider] {
        assert!(matches!(
            LockManager::acquire(&mut fx.pool, fx.borehole_id, ctx),
            Err(AppError::Authorization(_))
        ));
    }
    assert!(load_borehole(&fx.pool.conn, fx.borehole_id).unwrap().lock.is_none());
}

#[test]
fn test_disabled_membership_cannot_lock() {
    let mut fx = Fixture::new("lock_disabled");
    boredit::core::admin::AdminLogic::set_membership(
        &mut fx.pool,
        "editor",
        "geo",
        &[boredit::models::role::Role::Edit],
        true,
    )
    .unwrap();
    let editor = fx.ctx("editor");

    assert!(matches!(
        LockManager::acquire(&mut fx.pool, fx.borehole_id, &editor),
        Err(AppError::Authorization(_))
    ));
}

#[test]
fn test_first_acquire_stamps_stage_start() {
    let mut fx = Fixture::new("lock_started_at");
    let editor = fx.ctx("editor");

    let log = load_workflow_log(&fx.pool.conn, fx.borehole_id).unwrap();
    assert_eq!(log.open_entry().and_then(|e| e.started_at), None);

    LockManager::acquire(&mut fx.pool, fx.borehole_id, &editor).unwrap();
    let later = editor.at(editor.now + Duration::minutes(5));
    LockManager::acquire(&mut fx.pool, fx.borehole_id, &later).unwrap();

    let log = load_workflow_log(&fx.pool.conn, fx.borehole_id).unwrap();
    assert_eq!(log.open_entry().and_then(|e| e.started_at), Some(editor.now));
}

#[test]
fn test_patch_refreshes_lock_and_respects_it() {
    let mut fx = Fixture::new("lock_patch");
    let editor = fx.ctx("editor");
    let editor2 = fx.ctx("editor2");

    let b = BoreholeLogic::patch(&mut fx.pool, fx.borehole_id, "total_depth", "42.5", &editor).unwrap();
    assert_eq!(b.total_depth, Some(42.5));
    assert_eq!(b.lock.map(|l| l.holder), Some(editor.user.id));

    let result = BoreholeLogic::patch(&mut fx.pool, fx.borehole_id, "name", "BH-X", &editor2);
    assert!(matches!(result, Err(AppError::Locked { .. })));
    assert_eq!(load_borehole(&fx.pool.conn, fx.borehole_id).unwrap().name, "BH-1");
}
