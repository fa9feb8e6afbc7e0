use lazyview_foundation::{VirtualListConfig, VirtualListError, VisibleWindow};
use lazyview_testing::{has_item, ListTestRule};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 50px rows, 5px gap, one row of buffer and two visible rows.
fn small_config() -> VirtualListConfig {
    VirtualListConfig::new()
        .item_height(50.0)
        .gap(5.0)
        .offset_buffer(1)
        .display_height(110.0)
}

fn letters() -> Vec<&'static str> {
    vec!["A", "B", "C", "D", "E"]
}

#[test]
fn initial_window_materializes_visible_rows_plus_buffer() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();

    rule.assert_materialized(&[0, 1, 2]);
    assert_eq!(rule.window(), VisibleWindow::new(0, 3));
    assert_eq!(rule.list().port().extent(), 275.0);
    assert_eq!(rule.attached_labels(), vec!["row:A", "row:B", "row:C"]);

    let b = rule.node_at(1).unwrap();
    assert_eq!(b.slot().offset, 55.0);
    assert_eq!(b.slot().height, 50.0);
}

#[test]
fn remove_item_shifts_later_items_up() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();
    let a = rule.node_at(0).unwrap();

    let removed = rule.list_mut().remove_item(1).unwrap();
    rule.await_idle();

    assert_eq!(removed, "B");
    assert_eq!(rule.list().items(), &["A", "C", "D", "E"]);
    assert_eq!(rule.node_at(1).unwrap().label(), "row:C");
    assert_eq!(rule.node_at(2).unwrap().label(), "row:D");
    assert!(rule.node_at(0).unwrap().same_node(&a));
    assert_eq!(rule.list().port().extent(), 220.0);
    rule.assert_materialized(&[0, 1, 2]);
}

#[test]
fn set_items_replaces_everything() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();

    rule.list_mut().set_items(["X", "Y"]);
    assert_eq!(rule.list().port().extent(), 110.0);
    assert!(rule.list().port().is_empty());

    rule.await_idle();
    rule.assert_materialized(&[0, 1]);
    assert_eq!(rule.attached_labels(), vec!["row:X", "row:Y"]);
}

#[test]
fn update_keeps_neighbours_and_rerenders_target() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();
    let a = rule.node_at(0).unwrap();
    let b = rule.node_at(1).unwrap();
    let c = rule.node_at(2).unwrap();

    rule.list_mut().update_item(1, "B2").unwrap();
    assert!(rule.node_at(1).is_none());
    rule.await_idle();

    assert!(rule.node_at(0).unwrap().same_node(&a));
    assert!(rule.node_at(2).unwrap().same_node(&c));
    let updated = rule.node_at(1).unwrap();
    assert!(!updated.same_node(&b));
    assert_eq!(updated.label(), "row:B2");
}

#[test]
fn prepend_renders_fresh_nodes() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();
    let a = rule.node_at(0).unwrap();

    rule.list_mut().add_item("Z", true);
    rule.await_idle();

    assert_eq!(rule.attached_labels(), vec!["row:Z", "row:A", "row:B"]);
    let shifted_a = rule.node_at(1).unwrap();
    assert!(!shifted_a.same_node(&a));
    assert_eq!(shifted_a.index(), 1);
    assert_eq!(rule.list().port().extent(), 330.0);
}

#[test]
fn prepend_many_keeps_order_and_renders_fresh_nodes() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();
    let a = rule.node_at(0).unwrap();

    rule.list_mut().add_items(["X", "Y"], true);
    assert!(rule.list().port().is_empty());
    rule.await_idle();

    assert_eq!(rule.list().items(), &["X", "Y", "A", "B", "C", "D", "E"]);
    assert_eq!(rule.attached_labels(), vec!["row:X", "row:Y", "row:A"]);
    assert!(!rule.node_at(2).unwrap().same_node(&a));
    assert_eq!(rule.list().port().extent(), 385.0);
}

#[test]
fn append_outside_window_renders_nothing_new() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();
    let renders = rule.render_count();

    rule.list_mut().add_items(["F", "G"], false);
    rule.await_idle();

    assert_eq!(rule.render_count(), renders);
    assert_eq!(rule.list().port().extent(), 385.0);
    rule.assert_materialized(&[0, 1, 2]);
}

#[test]
fn remove_items_with_duplicates_and_unordered_input() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();

    let removed = rule.list_mut().remove_items(&[3, 0, 3]).unwrap();
    rule.await_idle();

    assert_eq!(removed, vec!["A", "D"]);
    assert_eq!(rule.attached_labels(), vec!["row:B", "row:C", "row:E"]);
}

#[test]
fn remove_items_keeps_nodes_below_first_removed_index() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();
    let a = rule.node_at(0).unwrap();
    let b = rule.node_at(1).unwrap();
    let c = rule.node_at(2).unwrap();

    rule.list_mut().remove_items(&[2, 4]).unwrap();
    rule.await_idle();

    assert!(rule.node_at(0).unwrap().same_node(&a));
    assert!(rule.node_at(1).unwrap().same_node(&b));
    let d = rule.node_at(2).unwrap();
    assert!(!d.same_node(&c));
    assert_eq!(d.label(), "row:D");
    assert_eq!(rule.list().port().extent(), 165.0);
}

#[test]
fn remove_items_rejects_out_of_range_without_changes() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();

    let err = rule.list_mut().remove_items(&[1, 5]).unwrap_err();

    assert!(matches!(
        err,
        VirtualListError::IndexOutOfRange { index: 5, len: 5 }
    ));
    assert_eq!(rule.list().len(), 5);
    rule.assert_materialized(&[0, 1, 2]);
}

#[test]
fn recompute_without_changes_is_idempotent() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();
    let renders = rule.render_count();
    let attaches = rule.list().port().attach_count();

    rule.list_mut().request_recompute();
    rule.await_idle();

    assert_eq!(rule.render_count(), renders);
    assert_eq!(rule.list().port().attach_count(), attaches);
    rule.assert_materialized(&[0, 1, 2]);
}

#[test]
fn materialized_set_tracks_every_scroll_offset() {
    init_logging();
    let items: Vec<usize> = (0..100).collect();
    let config = VirtualListConfig::new()
        .item_height(50.0)
        .gap(5.0)
        .offset_buffer(3)
        .display_height(600.0);
    let mut rule = ListTestRule::new(items, config);
    rule.await_idle();

    let max_offset = 100.0 * 55.0 - 600.0;
    let mut offset = 0.0_f32;
    while offset <= max_offset {
        rule.scroll_to(offset);

        let start = ((offset / 55.0).floor() as usize).saturating_sub(3);
        let end = (start + 11 + 3).min(100);
        let expected: Vec<usize> = (start..end).collect();
        rule.assert_materialized(&expected);
        offset += 37.0;
    }
}

#[test]
fn host_offset_past_last_page_is_used_as_reported() {
    init_logging();
    let items: Vec<usize> = (0..20).collect();
    let mut rule = ListTestRule::new(items, small_config());
    rule.await_idle();

    // 990 is extent minus display height; the host viewport may be shorter.
    rule.scroll_to(1045.0);

    assert_eq!(rule.list().scroll_offset(), 1045.0);
    rule.assert_materialized(&[18, 19]);

    rule.scroll_to(10_000.0);
    rule.assert_materialized(&[]);
}

#[test]
fn scroll_to_index_near_end_is_clamped() {
    init_logging();
    let items: Vec<usize> = (0..20).collect();
    let mut rule = ListTestRule::new(items, small_config());
    rule.await_idle();

    rule.scroll_to_index(19);

    assert_eq!(rule.list().scroll_offset(), 990.0);
    rule.assert_materialized(&[17, 18, 19]);
}

#[test]
fn scroll_to_index_brings_item_into_view() {
    init_logging();
    let items: Vec<usize> = (0..50).collect();
    let mut rule = ListTestRule::new(items, small_config());
    rule.await_idle();

    rule.scroll_to_index(30);

    rule.assert_exists(&has_item(30));
    rule.assert_materialized(&[29, 30, 31]);
}

#[test]
fn resize_grows_window() {
    init_logging();
    let items: Vec<usize> = (0..20).collect();
    let mut rule = ListTestRule::new(items, small_config());
    rule.await_idle();

    rule.resize(330.0);

    assert_eq!(rule.list().geometry().max_visible_count, 6);
    rule.assert_materialized(&[0, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn removing_everything_empties_viewport() {
    init_logging();
    let mut rule = ListTestRule::new(letters(), small_config());
    rule.await_idle();

    rule.list_mut().remove_items(&[0, 1, 2, 3, 4]).unwrap();
    rule.await_idle();

    assert!(rule.list().is_empty());
    assert!(rule.list().port().is_empty());
    assert_eq!(rule.list().port().extent(), 0.0);
}

#[test]
fn empty_list_settles_without_rendering() {
    init_logging();
    let mut rule = ListTestRule::new(Vec::<&str>::new(), small_config());
    rule.await_idle();

    assert_eq!(rule.render_count(), 0);
    assert!(rule.attached_indices().is_empty());
}

#[test]
fn invalid_config_is_reported() {
    let result = ListTestRule::try_new(letters(), small_config().item_height(0.0).gap(0.0));
    assert!(matches!(result, Err(VirtualListError::InvalidConfig(_))));
}

#[test]
fn sub_pixel_rows_are_rejected() {
    let result = ListTestRule::try_new(vec!["a"], small_config().item_height(1e-30).gap(0.0));
    assert!(matches!(result, Err(VirtualListError::InvalidConfig(_))));
}
