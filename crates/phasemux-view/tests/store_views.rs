use phasemux_core::{Label, Point};
use phasemux_space::Domain;
use phasemux_store::{ConfigError, MultiFieldStore, NoBoundingBox, SmallRow, ZeroTolApproximation};
use phasemux_test_utils::fixtures::{random_writes, scenario_domain, scenario_store, SCENARIO_TOL};
use phasemux_view::{BoundingBoxDomain, DenseImage, FullDomain, Image, ViewExt};

fn dom(lo: [i32; 2], hi: [i32; 2]) -> Domain {
    Domain::new(Point::from(lo), Point::from(hi)).unwrap()
}

#[test]
fn full_view_reads_like_the_store() {
    let mut store = scenario_store();
    for op in random_writes(21, &scenario_domain(), 2, SCENARIO_TOL, 500) {
        store.set_value(&op.point, op.label, op.value);
    }
    for l in 0..2 {
        let label = Label(l);
        let view = store.view(label);
        assert_eq!(view.domain(), store.domain());
        assert_eq!(view.iter().len(), store.size());
        for (p, v) in view.indexed() {
            assert_eq!(v, store.get_value(&p, label));
        }
    }
}

#[test]
fn bounding_box_view_iterates_only_the_box() {
    let mut store = scenario_store();
    store.set_value(&Point::from([2, 2]), Label(1), 1.0);
    store.set_value(&Point::from([8, 8]), Label(1), 2.0);

    let tight = store.view_with(Label(1), BoundingBoxDomain::uniform(2, 0));
    assert_eq!(tight.domain(), &dom([2, 2], [8, 8]));
    assert_eq!(tight.positions().count(), 49);
    assert_eq!(tight.iter().sum::<f64>(), 3.0);

    let buffered = store.view_with(Label(1), BoundingBoxDomain::uniform(2, 3));
    assert_eq!(buffered.domain(), &dom([0, 0], [10, 10]));
}

#[test]
fn empty_label_view_yields_nothing() {
    let store = scenario_store();
    let view = store.view_with(Label(0), BoundingBoxDomain::uniform(2, 4));
    assert!(view.domain().is_empty());
    assert_eq!(view.iter().count(), 0);
    let (begin, end) = view.cursor_range();
    assert_eq!(begin, end);
    assert!(view.to_dense().values().is_empty());
}

#[test]
fn writes_through_a_view_keep_boxes_exact() {
    let mut store = scenario_store();
    {
        let mut view = store.view_mut(Label(0));
        view.set_value(&Point::from([3, 7]), 0.5);
        view.entry(&Point::from([6, 1])).set(-0.5);
        view.set_value(&Point::from([3, 7]), 0.0);
    }
    assert_eq!(store.tight_bounding_box(Label(0)), dom([6, 1], [6, 1]));
    assert!(store.tight_bounding_box(Label(1)).is_empty());
    store.check_consistency().unwrap();
}

#[test]
fn update_over_bounding_box_and_refresh() {
    let mut store = scenario_store();
    store.set_value(&Point::from([4, 4]), Label(1), 1.0);
    store.set_value(&Point::from([5, 6]), Label(1), 1.0);
    let mut view = store.view_mut_with(Label(1), BoundingBoxDomain::uniform(2, 1));
    assert_eq!(view.domain(), &dom([3, 3], [6, 7]));
    view.update(|p, v| if p == &Point::from([3, 3]) { 9.0 } else { v });
    view.refresh();
    assert_eq!(view.domain(), &dom([2, 2], [6, 7]));
    drop(view);
    assert_eq!(store.get_value(&Point::from([3, 3]), Label(1)), 9.0);
    assert_eq!(store.stored_size(), 3);
    store.check_consistency().unwrap();
}

#[test]
fn update_can_clear_a_label() {
    let mut store = scenario_store();
    for op in random_writes(4, &scenario_domain(), 2, SCENARIO_TOL, 300) {
        store.set_value(&op.point, op.label, op.value);
    }
    store
        .view_mut_with(Label(0), BoundingBoxDomain::uniform(2, 0))
        .update(|_, _| 0.0);
    assert!(store.tight_bounding_box(Label(0)).is_empty());
    assert_eq!(store.present_count(Label(0)), Some(0));
    store.check_consistency().unwrap();
}

#[test]
fn dense_round_trip_through_copy_from() {
    let mut store = scenario_store();
    let patch = DenseImage::from_fn(dom([1, 2], [3, 4]), |p| f64::from(p[0] * p[1]));
    store.view_mut(Label(1)).copy_from(&patch).unwrap();
    assert_eq!(store.tight_bounding_box(Label(1)), dom([1, 2], [3, 4]));

    let dense = store
        .view_with(Label(1), BoundingBoxDomain::uniform(2, 0))
        .to_dense();
    assert_eq!(dense, patch);
    assert_eq!(dense.get_value(&Point::from([3, 4])), 12.0);
}

#[test]
fn copy_from_rejects_out_of_domain_source() {
    let mut store = scenario_store();
    let patch = DenseImage::new(dom([9, 9], [12, 12]), 1.0);
    let err = store.view_mut(Label(0)).copy_from(&patch).unwrap_err();
    assert_eq!(err.to_string(), "point (12, 12) outside domain [(0, 0), (10, 10)]");
    assert_eq!(store.stored_size(), 0);
}

#[test]
fn untracked_store_bounding_box_view_is_full() {
    let domain = scenario_domain();
    let mut store = MultiFieldStore::<_, SmallRow<f64>, NoBoundingBox>::new(
        domain.clone(),
        2,
        ZeroTolApproximation::new(SCENARIO_TOL),
    )
    .unwrap();
    store.set_value(&Point::from([1, 1]), Label(0), 1.0);
    let view = store.view_with(Label(0), BoundingBoxDomain::uniform(2, 0));
    assert_eq!(view.domain(), &domain);
    let full = store.view_with(Label(0), FullDomain);
    assert!(view.iter().eq(full.iter()));
}

#[test]
fn reverse_iteration_matches_forward() {
    let mut store = scenario_store();
    for op in random_writes(8, &scenario_domain(), 2, SCENARIO_TOL, 200) {
        store.set_value(&op.point, op.label, op.value);
    }
    let view = store.view_with(Label(1), BoundingBoxDomain::uniform(2, 1));
    let forward: Vec<(Point, f64)> = view.indexed().collect();
    let mut backward: Vec<(Point, f64)> = view.indexed().rev().collect();
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn full_view_reaching_i32_max() {
    let domain = dom([0, i32::MAX - 1], [2, i32::MAX]);
    let mut store = MultiFieldStore::<_>::new(domain.clone(), 1, ZeroTolApproximation::new(0.1))
        .unwrap();
    store.set_value(&Point::from([2, i32::MAX]), Label(0), 3.0);
    let view = store.view(Label(0));
    assert_eq!(view.iter().count(), 6);
    assert_eq!(view.iter().sum::<f64>(), 3.0);
    let forward: Vec<Point> = view.positions().map(|(p, _)| p).collect();
    assert_eq!(forward, domain.iter().collect::<Vec<_>>());
    assert_eq!(view.iter().rev().next(), Some(3.0));

    let boxed = store.view_with(Label(0), BoundingBoxDomain::uniform(2, 2));
    assert_eq!(boxed.domain(), &domain);
    assert_eq!(boxed.to_dense().values().iter().sum::<f64>(), 3.0);
}

#[test]
fn full_view_reaching_i32_min() {
    let domain = dom([i32::MIN, i32::MIN], [i32::MIN + 1, i32::MIN + 1]);
    let mut store = MultiFieldStore::<_>::new(domain.clone(), 1, ZeroTolApproximation::new(0.1))
        .unwrap();
    store.set_value(&Point::from([i32::MIN, i32::MIN]), Label(0), 5.0);
    let view = store.view(Label(0));
    assert_eq!(view.iter().rev().count(), 4);
    let mut backward: Vec<(Point, usize)> = view.positions().rev().collect();
    backward.reverse();
    assert_eq!(backward, view.positions().collect::<Vec<_>>());
    assert_eq!(view.iter().rev().last(), Some(5.0));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn oversized_store_is_rejected_before_views() {
    let huge = Domain::from_shape(&[1 << 20, 1 << 20, 1 << 20]).unwrap();
    let result = MultiFieldStore::<_>::new(huge, 1, ZeroTolApproximation::new(0.1));
    assert!(matches!(result, Err(ConfigError::StorageOverflow { .. })));
}

#[cfg(not(miri))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn views_agree_with_store(
            seed in 0u64..10_000,
            writes in 0usize..300,
            buffer in 0i32..4,
        ) {
            let domain = Domain::new(Point::from([-3, 2, 0]), Point::from([4, 6, 3])).unwrap();
            let approx = ZeroTolApproximation::new(0.2);
            let mut store = MultiFieldStore::<_>::new(domain.clone(), 3, approx).unwrap();
            for op in random_writes(seed, &domain, 3, 0.2, writes) {
                store.set_value(&op.point, op.label, op.value);
            }
            for l in 0..3 {
                let label = Label(l);
                let view = store.view_with(label, BoundingBoxDomain::uniform(3, buffer));
                let expected = store.bounding_box(label, &Point::diagonal(3, buffer));
                prop_assert_eq!(view.domain(), &expected);
                let points: Vec<Point> = view.positions().map(|(p, _)| p).collect();
                prop_assert_eq!(points.clone(), expected.iter().collect::<Vec<_>>());
                for (p, v) in view.indexed() {
                    prop_assert_eq!(v, store.get_value(&p, label));
                }
                for (p, i) in view.positions() {
                    prop_assert_eq!(i, store.index_of(&p));
                }
            }
        }
    }
}
