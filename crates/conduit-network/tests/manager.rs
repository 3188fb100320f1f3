//! Merge, split and removal behavior of the network manager.

mod common;

use common::*;
use conduit_network::{Direction, Error, FluidNetwork, FluidTier, ItemTier, OpenWorld, StaticWorld};

#[test]
fn line_forms_one_network_and_splits_in_two() {
    let mut manager = manager();
    add_all(&mut manager, &OpenWorld, &item(), &[p(0, 0, 0), p(1, 0, 0), p(2, 0, 0)]);

    assert_eq!(manager.network_count(), 1);
    let id = network_id(&manager, p(0, 0, 0));
    assert_eq!(manager.members(&id).len(), 3);

    manager.remove_segment(&OpenWorld, p(1, 0, 0)).unwrap();

    assert_eq!(manager.network_count(), 2);
    assert_eq!(
        partition(&manager),
        [group(&[p(0, 0, 0)]), group(&[p(2, 0, 0)])].into_iter().collect()
    );
    assert_ne!(network_id(&manager, p(0, 0, 0)), network_id(&manager, p(2, 0, 0)));
}

#[test]
fn adding_next_to_a_network_joins_it() {
    let mut manager = manager();
    let first = manager.add_segment(&OpenWorld, p(0, 0, 0), &item()).unwrap();
    let second = manager.add_segment(&OpenWorld, p(0, 1, 0), &item()).unwrap();

    assert_eq!(first, second);
    assert_eq!(manager.network_count(), 1);
    assert_eq!(manager.members(&first), vec![p(0, 0, 0), p(0, 1, 0)]);
}

#[test]
fn connector_merges_every_neighbor() {
    let mut manager = manager();
    let arms = [p(-1, 0, 0), p(1, 0, 0), p(0, 0, -1), p(0, 0, 1)];
    add_all(&mut manager, &OpenWorld, &item(), &arms);
    assert_eq!(manager.network_count(), 4);

    let merged = manager.add_segment(&OpenWorld, p(0, 0, 0), &item()).unwrap();

    assert_eq!(manager.network_count(), 1);
    assert_eq!(manager.members(&merged).len(), 5);
    for arm in arms {
        assert_eq!(network_id(&manager, arm), merged);
    }
}

#[test]
fn split_preserves_segment_count() {
    let mut manager = manager();
    // Plus shape in the xz plane
    let arms = [p(-2, 0, 0), p(-1, 0, 0), p(1, 0, 0), p(2, 0, 0), p(0, 0, 1), p(0, 0, -1)];
    add_all(&mut manager, &OpenWorld, &item(), &arms);
    manager.add_segment(&OpenWorld, p(0, 0, 0), &item()).unwrap();
    assert_eq!(manager.network_count(), 1);

    manager.remove_segment(&OpenWorld, p(0, 0, 0)).unwrap();

    assert_eq!(manager.segment_count(), 6);
    assert_eq!(manager.network_count(), 4);
    assert_eq!(
        partition(&manager),
        [
            group(&[p(-2, 0, 0), p(-1, 0, 0)]),
            group(&[p(1, 0, 0), p(2, 0, 0)]),
            group(&[p(0, 0, 1)]),
            group(&[p(0, 0, -1)]),
        ]
        .into_iter()
        .collect()
    );
}

#[test]
fn removing_a_non_connector_keeps_one_network() {
    let mut manager = manager();
    // 2x2 square: every segment has two neighbors
    let square = [p(0, 0, 0), p(1, 0, 0), p(0, 0, 1), p(1, 0, 1)];
    add_all(&mut manager, &OpenWorld, &item(), &square);
    let id = network_id(&manager, p(0, 0, 0));

    manager.remove_segment(&OpenWorld, p(0, 0, 0)).unwrap();

    assert_eq!(manager.network_count(), 1);
    assert_eq!(network_id(&manager, p(1, 0, 1)), id);
    assert_eq!(manager.network(&id).unwrap().origin(), p(0, 0, 1));
}

#[test]
fn removing_the_last_segment_deletes_the_network() {
    let mut manager = manager();
    let id = manager.add_segment(&OpenWorld, p(5, 5, 5), &item()).unwrap();
    let removed = manager.remove_segment(&OpenWorld, p(5, 5, 5)).unwrap();

    assert_eq!(removed.position(), p(5, 5, 5));
    assert!(manager.network(&id).is_none());
    assert_eq!(manager.network_count(), 0);
    assert_eq!(manager.segment_count(), 0);
}

#[test]
fn different_families_never_connect() {
    let mut manager = manager();
    manager.add_segment(&OpenWorld, p(0, 0, 0), &item()).unwrap();
    manager
        .add_segment(&OpenWorld, p(1, 0, 0), &fluid(FluidTier::Basic))
        .unwrap();
    manager
        .add_segment(&OpenWorld, p(2, 0, 0), &fluid(FluidTier::Elite))
        .unwrap();

    assert_eq!(manager.network_count(), 3);
}

#[test]
fn item_tiers_share_networks() {
    let mut manager = manager();
    manager
        .add_segment(&OpenWorld, p(0, 0, 0), &ItemTier::Basic.segment_type())
        .unwrap();
    manager
        .add_segment(&OpenWorld, p(1, 0, 0), &ItemTier::Advanced.segment_type())
        .unwrap();
    assert_eq!(manager.network_count(), 1);
}

#[test]
fn duplicate_add_is_rejected() {
    let mut manager = manager();
    manager.add_segment(&OpenWorld, p(0, 0, 0), &item()).unwrap();
    let err = manager.add_segment(&OpenWorld, p(0, 0, 0), &item()).unwrap_err();
    assert!(matches!(err, Error::DuplicateSegment(pos) if pos == p(0, 0, 0)));
    assert_eq!(manager.segment_count(), 1);
}

#[test]
fn removing_a_missing_segment_is_rejected() {
    let mut manager = manager();
    let err = manager.remove_segment(&OpenWorld, p(0, 0, 0)).unwrap_err();
    assert!(matches!(err, Error::SegmentNotFound(_)));
}

#[test]
fn unknown_segment_type_is_rejected() {
    let mut manager = manager();
    let err = manager
        .add_segment(&OpenWorld, p(0, 0, 0), &"conduit:energy".into())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownSegmentType(_)));
    assert_eq!(manager.segment_count(), 0);
    assert!(!manager.is_dirty());
}

#[test]
fn dirty_flag_tracks_mutations() {
    let mut manager = manager();
    assert!(!manager.is_dirty());

    manager.add_segment(&OpenWorld, p(0, 0, 0), &item()).unwrap();
    assert!(manager.take_dirty());
    assert!(!manager.is_dirty());

    manager.remove_segment(&OpenWorld, p(0, 0, 0)).unwrap();
    assert!(manager.is_dirty());
}

#[test]
fn blocked_face_keeps_networks_apart() {
    let mut world = StaticWorld::new();
    world.block(p(0, 0, 0), Direction::East);

    let mut manager = manager();
    add_all(&mut manager, &world, &item(), &[p(0, 0, 0), p(1, 0, 0)]);
    assert_eq!(manager.network_count(), 2);

    world.unblock(p(0, 0, 0), Direction::East);
    manager.refresh(&world, p(0, 0, 0)).unwrap();
    assert_eq!(manager.network_count(), 1);

    world.block(p(1, 0, 0), Direction::West);
    manager.refresh(&world, p(1, 0, 0)).unwrap();
    assert_eq!(manager.network_count(), 2);
    assert_eq!(manager.segment_count(), 2);
}

#[test]
fn blocking_a_connector_face_splits_on_refresh() {
    let mut world = StaticWorld::new();
    let mut manager = manager();
    add_all(&mut manager, &world, &item(), &[p(0, 0, 0), p(1, 0, 0), p(2, 0, 0), p(3, 0, 0)]);

    world.block(p(1, 0, 0), Direction::East);
    manager.refresh(&world, p(1, 0, 0)).unwrap();

    assert_eq!(
        partition(&manager),
        [group(&[p(0, 0, 0), p(1, 0, 0)]), group(&[p(2, 0, 0), p(3, 0, 0)])]
            .into_iter()
            .collect()
    );
}

#[test]
fn refresh_of_missing_segment_is_rejected() {
    let mut manager = manager();
    assert!(matches!(
        manager.refresh(&OpenWorld, p(0, 0, 0)),
        Err(Error::SegmentNotFound(_))
    ));
}

#[test]
fn fluid_merges_add_up_and_splits_start_empty() {
    let mut manager = manager();
    let basic = fluid(FluidTier::Basic);
    let left = manager.add_segment(&OpenWorld, p(0, 0, 0), &basic).unwrap();
    let right = manager.add_segment(&OpenWorld, p(2, 0, 0), &basic).unwrap();

    manager
        .network_mut(&left)
        .unwrap()
        .downcast_mut::<FluidNetwork>()
        .unwrap()
        .fill(300);
    manager
        .network_mut(&right)
        .unwrap()
        .downcast_mut::<FluidNetwork>()
        .unwrap()
        .fill(200);

    let merged = manager.add_segment(&OpenWorld, p(1, 0, 0), &basic).unwrap();
    assert_eq!(manager.network_count(), 1);
    let amount = manager
        .network(&merged)
        .unwrap()
        .downcast_ref::<FluidNetwork>()
        .unwrap()
        .amount();
    assert_eq!(amount, 500);

    manager.remove_segment(&OpenWorld, p(1, 0, 0)).unwrap();
    let total: u64 = manager
        .networks()
        .filter_map(|n| n.downcast_ref::<FluidNetwork>())
        .map(FluidNetwork::amount)
        .sum();
    assert_eq!(total, 500);
    assert_eq!(manager.network_count(), 2);
}

#[test]
fn segment_data_is_kept() {
    let mut manager = manager();
    manager.add_segment(&OpenWorld, p(0, 0, 0), &item()).unwrap();
    manager
        .set_segment_data(p(0, 0, 0), serde_json::json!({ "attachment": "extractor" }))
        .unwrap();
    assert_eq!(manager.segment(p(0, 0, 0)).unwrap().data()["attachment"], "extractor");
    assert!(matches!(
        manager.set_segment_data(p(9, 9, 9), serde_json::Value::Null),
        Err(Error::SegmentNotFound(_))
    ));
}
