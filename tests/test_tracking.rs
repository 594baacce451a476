mod common;

use colortrack::controls::KeyCommand;
use common::*;

#[test]
fn trail_evicts_oldest_when_full() {
    let mut trail = Trail::new(3);
    for x in 0..4 {
        trail.push(Some((x, 0)));
    }

    assert_eq!(trail.len(), 3);
    let points: Vec<_> = trail.iter().copied().collect();
    assert_eq!(points, vec![Some((1, 0)), Some((2, 0)), Some((3, 0))]);
}

#[test]
fn gaps_break_trail_segments() {
    let mut trail = Trail::new(5);
    trail.push(Some((0, 0)));
    trail.push(None);
    trail.push(Some((10, 0)));
    trail.push(Some((20, 0)));

    assert_eq!(trail.segments(), vec![(3, (10, 0), (20, 0))]);
}

#[test]
fn short_trails_have_no_segments() {
    let mut trail = Trail::new(5);
    assert!(trail.segments().is_empty());
    trail.push(Some((1, 1)));
    assert!(trail.segments().is_empty());
}

#[test]
fn zero_capacity_trail_stays_empty() {
    let mut trail = Trail::new(0);
    trail.push(Some((1, 1)));
    assert!(trail.is_empty());
}

#[test]
fn profile_records_position_and_velocity() {
    let mut red = ColorProfile::red(20);
    red.record(Some((10, 10)));
    red.record(Some((15, 7)));

    assert_eq!(red.last_position, Some((15, 7)));
    assert_eq!(red.velocity, (5, -3));
    assert_eq!(red.trail.len(), 2);

    // A miss leaves a gap but keeps the last known position
    red.record(None);
    assert_eq!(red.trail.len(), 3);
    assert_eq!(red.last_position, Some((15, 7)));
}

#[test]
fn reset_clears_history() {
    let mut yellow = ColorProfile::yellow(20);
    yellow.record(Some((1, 2)));
    yellow.record(Some((3, 4)));
    yellow.reset();

    assert!(yellow.trail.is_empty());
    assert_eq!(yellow.trail.capacity(), 20);
    assert_eq!(yellow.last_position, None);
    assert_eq!(yellow.velocity, (0, 0));
}

#[test]
fn default_profiles_match_tracked_colors() {
    let red = ColorProfile::red(20);
    assert_eq!(red.name, "Red");
    assert_eq!(red.ranges.len(), 2);

    let yellow = ColorProfile::yellow(20);
    assert_eq!(yellow.name, "Yellow");
    assert_eq!(yellow.ranges.len(), 1);
}

#[test]
fn keys_map_to_commands() {
    assert_eq!(KeyCommand::from_key('q' as i32), KeyCommand::Quit);
    assert_eq!(KeyCommand::from_key(27), KeyCommand::Quit);
    assert_eq!(KeyCommand::from_key('r' as i32), KeyCommand::Reset);
    assert_eq!(KeyCommand::from_key(-1), KeyCommand::None);
    assert_eq!(KeyCommand::from_key('x' as i32), KeyCommand::None);
    // Only the low byte is significant
    assert_eq!(KeyCommand::from_key(0x100 | 'q' as i32), KeyCommand::Quit);
}
