use boredit::core::borehole::BoreholeLogic;
use boredit::core::permission::PermissionFilter;
use boredit::core::workflow::WorkflowEngine;
use boredit::db::query_builder::QueryBuilder;
use boredit::db::queries::load_borehole;
use boredit::errors::AppError;
use boredit::models::role::Role;
use rusqlite::types::Value;

mod common;
use common::Fixture;

#[test]
fn test_sql_clause_without_memberships_is_published_only() {
    let fx = Fixture::new("perm_clause_root");
    let root = fx.ctx("root");

    let mut qb = QueryBuilder::new("SELECT id FROM boreholes");
    let clause = PermissionFilter::new(&root.user).sql_clause(&mut qb);
    assert_eq!(clause, "published = 1");
}

#[test]
fn test_sql_clause_binds_visible_groups() {
    let fx = Fixture::new("perm_clause_editor");
    let editor = fx.ctx("editor");

    let mut qb = QueryBuilder::new("SELECT id FROM boreholes");
    let clause = PermissionFilter::new(&editor.user).sql_clause(&mut qb);
    qb.push_where(&[clause]);

    let (sql, args) = qb.build();
    assert!(sql.contains("(published = 1 OR group_id IN (?1))"), "{sql}");
    assert_eq!(args, vec![Value::Integer(fx.group_id)]);
}

#[test]
fn test_excluded_roles_hide_group() {
    let fx = Fixture::new("perm_exclude");
    let viewer = fx.ctx("viewer");
    let editor = fx.ctx("editor");

    let filter = PermissionFilter::new(&viewer.user).excluding(&[Role::View]);
    assert!(filter.visible_groups().is_empty());

    let filter = PermissionFilter::new(&editor.user).excluding(&[Role::View]);
    assert_eq!(filter.visible_groups(), vec![fx.group_id]);
}

#[test]
fn test_list_shows_own_group_and_published() {
    let mut fx = Fixture::new("perm_list");
    let outsider = fx.ctx("outsider");
    let editor = fx.ctx("editor");
    let controller = fx.ctx("controller");

    assert!(BoreholeLogic::list(&mut fx.pool, &[], &outsider).unwrap().is_empty());
    assert_eq!(BoreholeLogic::list(&mut fx.pool, &[], &editor).unwrap().len(), 1);

    // walk the borehole to publication
    for ctx in [&editor, &controller, &controller, &controller] {
        let id = fx.open_entry();
        WorkflowEngine::submit(&mut fx.pool, id, ctx).unwrap();
    }
    assert!(load_borehole(&fx.pool.conn, fx.borehole_id).unwrap().published);

    let visible = BoreholeLogic::list(&mut fx.pool, &[], &outsider).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, fx.borehole_id);
}

#[test]
fn test_outsider_cannot_view_unpublished() {
    let mut fx = Fixture::new("perm_show");
    let outsider = fx.ctx("outsider");

    assert!(matches!(
        BoreholeLogic::show(&mut fx.pool, fx.borehole_id, &outsider),
        Err(AppError::Authorization(_))
    ));
}

#[test]
fn test_create_needs_edit_membership() {
    let mut fx = Fixture::new("perm_create");
    let viewer = fx.ctx("viewer");
    let root = fx.ctx("root");

    assert!(matches!(
        BoreholeLogic::create(&mut fx.pool, "BH-2", fx.group_id, Role::Edit, false, &viewer),
        Err(AppError::Authorization(_))
    ));

    let imported =
        BoreholeLogic::create(&mut fx.pool, "BH-3", fx.group_id, Role::Public, true, &root).unwrap();
    assert!(imported.published);

    let (_, log) = BoreholeLogic::show(&mut fx.pool, imported.id, &root).unwrap();
    assert_eq!(log.entries.len(), 1);
    assert!(!log.entries[0].is_open());
}
