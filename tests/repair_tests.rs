use boredit::core::layer::LayerLogic;
use boredit::core::layer::repair::{
    DeleteMode, GapMode, IntervalEdit, LayerChange, plan,
};
use boredit::db::codelist::id_by_code;
use boredit::db::queries::load_layers;
use boredit::errors::AppError;
use boredit::models::layer::Layer;
use boredit::models::profile::ProfileKind;

mod common;
use common::Fixture;

fn three_layers() -> Vec<Layer> {
    vec![
        Layer::new(1, 1, Some(0.0), Some(5.0)),
        Layer::new(2, 1, Some(5.0), Some(9.0)),
        Layer::new(3, 1, Some(9.0), Some(12.0)),
    ]
}

#[test]
fn test_delete_modes_parse() {
    assert_eq!(DeleteMode::from_code(0, None).unwrap(), DeleteMode::Only);
    assert_eq!(DeleteMode::from_code(2, Some(1.0)).unwrap(), DeleteMode::ExtendLower);
    assert_eq!(DeleteMode::from_code(3, Some(7.0)).unwrap(), DeleteMode::Split(7.0));
    assert!(matches!(DeleteMode::from_code(3, None), Err(AppError::ActionWrong(_))));
    assert!(matches!(DeleteMode::from_code(9, None), Err(AppError::ActionWrong(_))));
    assert!(matches!(GapMode::from_code(4, None), Err(AppError::ActionWrong(_))));
}

#[test]
fn test_delete_only_leaves_gap() {
    let changes = plan(
        &three_layers(),
        IntervalEdit::Delete {
            layer_id: 2,
            mode: DeleteMode::Only,
        },
    )
    .unwrap();
    assert_eq!(changes, vec![LayerChange::Remove { id: 2 }]);
}

#[test]
fn test_delete_extend_upper_reaches_lower_neighbor() {
    let changes = plan(
        &three_layers(),
        IntervalEdit::Delete {
            layer_id: 2,
            mode: DeleteMode::ExtendUpper,
        },
    )
    .unwrap();
    assert_eq!(
        changes,
        vec![
            LayerChange::SetDepthTo {
                id: 1,
                value: Some(9.0)
            },
            LayerChange::Remove { id: 2 },
        ]
    );
}

#[test]
fn test_delete_extend_lower_on_first_layer_reaches_surface() {
    let changes = plan(
        &three_layers(),
        IntervalEdit::Delete {
            layer_id: 1,
            mode: DeleteMode::ExtendLower,
        },
    )
    .unwrap();
    assert_eq!(
        changes,
        vec![
            LayerChange::SetDepthFrom {
                id: 2,
                value: Some(0.0)
            },
            LayerChange::Remove { id: 1 },
        ]
    );
}

#[test]
fn test_delete_without_required_neighbor_is_rejected() {
    let layers = three_layers();
    let upper_missing = plan(
        &layers,
        IntervalEdit::Delete {
            layer_id: 1,
            mode: DeleteMode::ExtendUpper,
        },
    );
    assert!(matches!(upper_missing, Err(AppError::ActionWrong(_))));

    let lower_missing = plan(
        &layers,
        IntervalEdit::Delete {
            layer_id: 3,
            mode: DeleteMode::ExtendLower,
        },
    );
    assert!(matches!(lower_missing, Err(AppError::ActionWrong(_))));
}

#[test]
fn test_delete_split_moves_both_neighbors() {
    let changes = plan(
        &three_layers(),
        IntervalEdit::Delete {
            layer_id: 2,
            mode: DeleteMode::Split(7.0),
        },
    )
    .unwrap();
    assert!(changes.contains(&LayerChange::SetDepthFrom {
        id: 3,
        value: Some(7.0)
    }));
    assert!(changes.contains(&LayerChange::SetDepthTo {
        id: 1,
        value: Some(7.0)
    }));
    assert_eq!(changes.last(), Some(&LayerChange::Remove { id: 2 }));
}

#[test]
fn test_gap_fill_without_upper_starts_at_surface() {
    let layers = vec![Layer::new(4, 1, Some(2.0), Some(6.0))];
    let changes = plan(
        &layers,
        IntervalEdit::Gap {
            layer_id: 4,
            mode: GapMode::Fill,
        },
    )
    .unwrap();
    assert_eq!(
        changes,
        vec![LayerChange::InsertFiller {
            depth_from: 0.0,
            depth_to: Some(2.0)
        }]
    );
}

#[test]
fn test_gap_extend_upper_without_upper_is_rejected() {
    let layers = vec![Layer::new(4, 1, Some(2.0), Some(6.0))];
    let result = plan(
        &layers,
        IntervalEdit::Gap {
            layer_id: 4,
            mode: GapMode::ExtendUpper,
        },
    );
    assert!(matches!(result, Err(AppError::ActionWrong(_))));
}

#[test]
fn test_gap_on_touching_or_overlapping_layers_is_rejected() {
    for lower_from in [5.0, 3.0] {
        let layers = vec![
            Layer::new(1, 1, Some(0.0), Some(5.0)),
            Layer::new(2, 1, Some(lower_from), Some(10.0)),
        ];
        for mode in [GapMode::Fill, GapMode::ExtendUpper, GapMode::ExtendSelf, GapMode::Split(4.0)] {
            let result = plan(&layers, IntervalEdit::Gap { layer_id: 2, mode });
            assert!(
                matches!(result, Err(AppError::ActionWrong(_))),
                "mode {mode:?} with lower top {lower_from}"
            );
        }
    }

    let at_surface = vec![Layer::new(4, 1, Some(0.0), Some(6.0))];
    let result = plan(
        &at_surface,
        IntervalEdit::Gap {
            layer_id: 4,
            mode: GapMode::Fill,
        },
    );
    assert!(matches!(result, Err(AppError::ActionWrong(_))));
}

#[test]
fn test_gap_fill_on_overlap_leaves_store_untouched() {
    let mut fx = Fixture::new("repair_gap_overlap");
    let editor = fx.ctx("editor");
    let profile = fx.add_profile(ProfileKind::Geology);
    fx.add_layer(profile, Some(0.0), Some(5.0));
    let lower = fx.add_layer(profile, Some(3.0), Some(10.0));
    let before = fx.depths(profile);

    let result = LayerLogic::gap(&mut fx.pool, lower, GapMode::Fill, &editor);
    assert!(matches!(result, Err(AppError::ActionWrong(_))));
    assert_eq!(fx.depths(profile), before);
}

#[test]
fn test_unknown_layer_is_not_found() {
    let result = plan(
        &three_layers(),
        IntervalEdit::Delete {
            layer_id: 42,
            mode: DeleteMode::Only,
        },
    );
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn test_delete_with_extend_upper_in_store() {
    let mut fx = Fixture::new("repair_delete_upper");
    let editor = fx.ctx("editor");
    let profile = fx.add_profile(ProfileKind::Geology);
    let a = fx.add_layer(profile, Some(0.0), Some(5.0));
    let b = fx.add_layer(profile, Some(5.0), Some(9.0));
    let c = fx.add_layer(profile, Some(9.0), Some(12.0));

    LayerLogic::delete(&mut fx.pool, b, DeleteMode::ExtendUpper, &editor).unwrap();

    assert_eq!(
        fx.depths(profile),
        vec![(a, Some(0.0), Some(9.0)), (c, Some(9.0), Some(12.0))]
    );
}

#[test]
fn test_gap_fill_inserts_unknown_lithology_layer() {
    let mut fx = Fixture::new("repair_gap_fill");
    let editor = fx.ctx("editor");
    let profile = fx.add_profile(ProfileKind::Geology);
    fx.add_layer(profile, Some(0.0), Some(5.0));
    let lower = fx.add_layer(profile, Some(8.0), Some(12.0));

    LayerLogic::gap(&mut fx.pool, lower, GapMode::Fill, &editor).unwrap();

    let layers = load_layers(&fx.pool.conn, profile).unwrap();
    assert_eq!(layers.len(), 3);

    let filler = &layers[1];
    assert_eq!(filler.depth_from, Some(5.0));
    assert_eq!(filler.depth_to, Some(8.0));

    let unknown = id_by_code(&fx.pool.conn, "lithology", "unknown").unwrap();
    assert_eq!(filler.lithology, Some(unknown));
}

#[test]
fn test_gap_split_meets_at_value() {
    let mut fx = Fixture::new("repair_gap_split");
    let editor = fx.ctx("editor");
    let profile = fx.add_profile(ProfileKind::Geology);
    let upper = fx.add_layer(profile, Some(0.0), Some(5.0));
    let lower = fx.add_layer(profile, Some(8.0), Some(12.0));

    LayerLogic::gap(&mut fx.pool, lower, GapMode::Split(6.5), &editor).unwrap();

    assert_eq!(
        fx.depths(profile),
        vec![(upper, Some(0.0), Some(6.5)), (lower, Some(6.5), Some(12.0))]
    );
}

#[test]
fn test_failed_edit_rolls_back_everything() {
    let mut fx = Fixture::new("repair_rollback");
    let editor = fx.ctx("editor");
    let profile = fx.add_profile(ProfileKind::Geology);
    fx.add_layer(profile, Some(0.0), Some(5.0));
    let lower = fx.add_layer(profile, Some(8.0), Some(12.0));
    let before = fx.depths(profile);

    // Filler lithology code does not exist: the insert fails after planning.
    let mut broken = editor.clone();
    broken.unknown_lithology_code = "no_such_code".to_string();

    let result = LayerLogic::gap(&mut fx.pool, lower, GapMode::Fill, &broken);
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(fx.depths(profile), before);

    // the lock refresh was rolled back as well
    let holder: Option<i64> = fx
        .pool
        .conn
        .query_row(
            "SELECT locked_by FROM boreholes WHERE id = ?1",
            [fx.borehole_id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(holder, None);
}

#[test]
fn test_edit_by_other_user_is_locked_out() {
    let mut fx = Fixture::new("repair_locked");
    let editor = fx.ctx("editor");
    let editor2 = fx.ctx("editor2");
    let profile = fx.add_profile(ProfileKind::Geology);
    let a = fx.add_layer(profile, Some(0.0), Some(5.0));
    let b = fx.add_layer(profile, Some(5.0), Some(9.0));

    LayerLogic::delete(&mut fx.pool, a, DeleteMode::Only, &editor).unwrap();

    let result = LayerLogic::delete(&mut fx.pool, b, DeleteMode::Only, &editor2);
    assert!(matches!(result, Err(AppError::Locked { .. })));
    assert_eq!(fx.depths(profile), vec![(b, Some(5.0), Some(9.0))]);
}
