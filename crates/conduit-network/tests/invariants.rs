//! Random add/remove sequences never break the connectivity invariant.
//!
//! After every operation the manager's partition must equal the connected
//! components computed from scratch, every network must be non-empty and own
//! its origin, and save/load must reproduce the same partition.

mod common;

use std::collections::{BTreeSet, HashSet, VecDeque};

use common::*;
use conduit_network::{Direction, FluidTier, NetworkManager, OpenWorld, Position, SegmentType, StaticWorld, World};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Toggle {
    pos: Position,
    fluid: bool,
}

fn arb_toggle() -> impl Strategy<Value = Toggle> {
    (0..4i32, 0..2i32, 0..4i32, prop::bool::weighted(0.25)).prop_map(|(x, y, z, fluid)| Toggle {
        pos: Position::new(x, y, z),
        fluid,
    })
}

fn arb_blocked_faces() -> impl Strategy<Value = StaticWorld> {
    let face = (0..4i32, 0..2i32, 0..4i32, 0..6usize);
    prop::collection::vec(face, 0..24).prop_map(|faces| {
        let mut world = StaticWorld::new();
        for (x, y, z, dir) in faces {
            world.block(Position::new(x, y, z), Direction::ALL[dir]);
        }
        world
    })
}

fn kind(fluid: bool) -> SegmentType {
    if fluid {
        FluidTier::Basic.segment_type()
    } else {
        item()
    }
}

/// Components of same-family linked adjacency, computed without the manager.
fn expected_partition(manager: &NetworkManager, world: &dyn World) -> BTreeSet<BTreeSet<Position>> {
    let segments = manager.segments();
    let mut seen = HashSet::new();
    let mut groups = BTreeSet::new();

    for start in segments.positions() {
        if !seen.insert(start) {
            continue;
        }
        let family = segments.get(start).unwrap().network_type().clone();
        let mut group = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for dir in Direction::ALL {
                let next = pos.offset(dir);
                let same = segments
                    .get(next)
                    .is_some_and(|s| s.network_type() == &family);
                if same && world.is_linked(pos, dir) && seen.insert(next) {
                    group.insert(next);
                    queue.push_back(next);
                }
            }
        }
        groups.insert(group);
    }
    groups
}

fn check(manager: &NetworkManager, world: &dyn World) -> Result<(), TestCaseError> {
    prop_assert_eq!(partition(manager), expected_partition(manager, world));

    for network in manager.networks() {
        let members = manager.members(network.id());
        prop_assert!(!members.is_empty(), "empty network {}", network.id());
        prop_assert!(members.contains(&network.origin()), "origin outside {}", network.id());
        for pos in members {
            let segment = manager.segment(pos).unwrap();
            prop_assert_eq!(segment.network_type(), network.network_type());
        }
    }
    let assigned: usize = manager.networks().map(|n| manager.members(n.id()).len()).sum();
    prop_assert_eq!(assigned, manager.segment_count());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn membership_matches_components(toggles in prop::collection::vec(arb_toggle(), 1..60)) {
        let mut manager = manager();
        for toggle in &toggles {
            if manager.segment(toggle.pos).is_some() {
                manager.remove_segment(&OpenWorld, toggle.pos).unwrap();
            } else {
                manager.add_segment(&OpenWorld, toggle.pos, &kind(toggle.fluid)).unwrap();
            }
            check(&manager, &OpenWorld)?;
        }

        let mut restored = common::manager();
        restored.from_json(&OpenWorld, &manager.to_json().unwrap()).unwrap();
        prop_assert_eq!(partition(&restored), partition(&manager));
        prop_assert!(!restored.is_dirty());
    }

    #[test]
    fn membership_respects_blocked_faces(
        world in arb_blocked_faces(),
        toggles in prop::collection::vec(arb_toggle(), 1..60),
    ) {
        let mut manager = manager();
        for toggle in &toggles {
            if manager.segment(toggle.pos).is_some() {
                manager.remove_segment(&world, toggle.pos).unwrap();
            } else {
                manager.add_segment(&world, toggle.pos, &kind(toggle.fluid)).unwrap();
            }
            check(&manager, &world)?;
        }

        let mut restored = common::manager();
        restored.from_json(&world, &manager.to_json().unwrap()).unwrap();
        prop_assert_eq!(partition(&restored), partition(&manager));
        check(&restored, &world)?;
    }
}
