mod common;

use colortrack::detection::interaction::{
    InteractionThresholds, contour_distance, detect_interactions, point_polygon_distance,
};
use common::*;

const THRESHOLDS: InteractionThresholds = InteractionThresholds {
    proximity: 80.0,
    collision: 5.0,
};

#[test]
fn signed_distance_is_positive_inside_and_negative_outside() {
    let square = square_contour(0, 0, 10);

    assert_eq!(point_polygon_distance(&square, (5.0, 5.0)), Some(5.0));
    assert_eq!(point_polygon_distance(&square, (2.0, 5.0)), Some(2.0));
    assert_eq!(point_polygon_distance(&square, (15.0, 5.0)), Some(-5.0));
    assert_eq!(point_polygon_distance(&square, (13.0, 14.0)), Some(-5.0));
}

#[test]
fn points_on_the_boundary_are_zero() {
    let square = square_contour(0, 0, 10);
    assert_eq!(point_polygon_distance(&square, (10.0, 5.0)), Some(0.0));
    assert_eq!(point_polygon_distance(&square, (5.0, 0.0)), Some(0.0));
    assert_eq!(point_polygon_distance(&square, (0.0, 0.0)), Some(0.0));
    assert_eq!(point_polygon_distance(&[], (0.0, 0.0)), None);
}

#[test]
fn contour_distance_measures_the_gap() {
    let a = square_contour(0, 0, 10);
    let b = square_contour(30, 0, 10);
    assert_eq!(contour_distance(&a, &b), Some(20.0));
    assert_eq!(contour_distance(&b, &a), Some(20.0));
}

#[test]
fn contour_distance_probes_with_the_smaller_contour() {
    // The single probe point sits inside the big square
    let big = square_contour(0, 0, 100);
    let dot = polygon(&[(50, 40)]);
    assert_eq!(contour_distance(&big, &dot), Some(40.0));
    assert_eq!(contour_distance(&dot, &big), Some(40.0));
    assert_eq!(contour_distance(&[], &big), None);
}

#[test]
fn nearby_pair_is_proximity() {
    let red = vec![make_object("Red", square_contour(0, 0, 40))];
    let yellow = vec![make_object("Yellow", square_contour(70, 0, 40))];

    let interactions = detect_interactions(&red, &yellow, THRESHOLDS);
    assert_eq!(interactions.len(), 1);

    let hit = &interactions[0];
    assert_eq!(hit.kind, InteractionKind::Proximity);
    assert_eq!(hit.distance, 30.0);
    assert_eq!(hit.midpoint(), (55, 20));
}

#[test]
fn touching_pair_is_collision() {
    let red = vec![make_object("Red", square_contour(0, 0, 40))];
    let yellow = vec![make_object("Yellow", square_contour(42, 0, 40))];

    let interactions = detect_interactions(&red, &yellow, THRESHOLDS);
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].kind, InteractionKind::Collision);
}

#[test]
fn distant_pairs_are_ignored() {
    let red = vec![make_object("Red", square_contour(0, 0, 40))];
    let yellow = vec![make_object("Yellow", square_contour(200, 0, 40))];

    assert!(detect_interactions(&red, &yellow, THRESHOLDS).is_empty());
    assert!(detect_interactions(&red, &[], THRESHOLDS).is_empty());
    assert!(detect_interactions(&[], &yellow, THRESHOLDS).is_empty());
}

#[test]
fn every_pair_is_checked() {
    let red = vec![
        make_object("Red", square_contour(0, 0, 40)),
        make_object("Red", square_contour(0, 300, 40)),
    ];
    let yellow = vec![
        make_object("Yellow", square_contour(60, 0, 40)),
        make_object("Yellow", square_contour(41, 300, 40)),
    ];

    let interactions = detect_interactions(&red, &yellow, THRESHOLDS);
    let pairs: Vec<_> = interactions
        .iter()
        .map(|i| (i.red_index, i.yellow_index, i.kind))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (0, 0, InteractionKind::Proximity),
            (1, 1, InteractionKind::Collision),
        ]
    );
}
