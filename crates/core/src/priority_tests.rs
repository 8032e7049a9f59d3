// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    lowest = { 0 },
    middle = { 5 },
    highest = { 10 },
)]
fn accepts_levels_in_range(level: i64) {
    let priority = Priority::try_from(level).unwrap();
    assert_eq!(i64::from(priority.level()), level);
}

#[parameterized(
    negative = { -1 },
    one_past_max = { 11 },
    far_out = { 300 },
)]
fn rejects_levels_out_of_range(level: i64) {
    let err = Priority::try_from(level).unwrap_err();
    assert!(matches!(err, ResourceError::InvalidPriority(l) if l == level));
}

#[test]
fn new_rejects_above_max() {
    assert!(Priority::new(MAX_PRIORITY).is_some());
    assert!(Priority::new(MAX_PRIORITY + 1).is_none());
}

#[test]
fn all_covers_every_level_in_order() {
    let levels: Vec<u8> = Priority::all().map(Priority::level).collect();
    assert_eq!(levels.len(), PRIORITY_LEVELS);
    assert_eq!(levels.first(), Some(&0));
    assert_eq!(levels.last(), Some(&MAX_PRIORITY));
    assert!(levels.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn higher_level_orders_higher() {
    assert!(Priority::HIGHEST > Priority::LOWEST);
    assert!(Priority::new(7).unwrap() > Priority::new(3).unwrap());
}

#[test]
fn level_or_none_uses_sentinel() {
    assert_eq!(Priority::level_or_none(None), NONE_WAITING);
    assert_eq!(Priority::level_or_none(Priority::new(7)), 7);
}

#[test]
fn deserializes_through_range_check() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        priority: Priority,
    }

    let ok: Wrapper = toml::from_str("priority = 4").unwrap();
    assert_eq!(ok.priority.level(), 4);

    let err = toml::from_str::<Wrapper>("priority = 12");
    assert!(err.is_err());
}
