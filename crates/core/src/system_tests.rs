// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::{ResourceConfig, UserConfig};
use std::time::Instant;
use yare::parameterized;

fn six_user_system(policy: FairnessPolicy) -> ResourceSystem {
    let mut system = ResourceSystem::new();
    system.add_resource("A", NonZeroU32::new(20).unwrap(), policy);
    for (name, hold_ms) in [("1", 8), ("2", 1), ("3", 2), ("4", 5), ("5", 2), ("6", 5)] {
        system.add_user(name, Duration::from_millis(hold_ms));
    }
    system
}

#[parameterized(
    barging = { FairnessPolicy::Barging },
    hand_off = { FairnessPolicy::HandOff },
)]
fn six_users_drain_one_resource(policy: FairnessPolicy) {
    let system = six_user_system(policy);
    let initial = system.managers()[0].basic().initial_uses();
    assert!((1..=20).contains(&initial));

    let report = system.run().unwrap();

    assert_eq!(report.users.len(), 6);
    assert!(!report.interrupted());
    assert_eq!(report.total_uses(), initial);
    assert!(report.total_uses() <= 20);
    assert_eq!(
        report.resources,
        vec![ResourceReport {
            name: "A".to_string(),
            initial_uses: initial,
            uses_left: 0,
        }]
    );

    let manager = &system.managers()[0];
    assert!(manager.is_exhausted());
    assert!(!manager.is_occupied());
    assert_eq!(manager.snapshot().waiting.iter().sum::<u32>(), 0);
}

#[test]
fn every_resource_is_exhausted() {
    let mut system = ResourceSystem::with_seed(3);
    system.add_resource("A", NonZeroU32::new(6).unwrap(), FairnessPolicy::Barging);
    system.add_resource("B", NonZeroU32::new(4).unwrap(), FairnessPolicy::HandOff);
    for name in ["x", "y", "z"] {
        system.add_user(name, Duration::from_millis(1));
    }

    let report = system.run().unwrap();

    assert!(report.resources.iter().all(|r| r.uses_left == 0));
    let budget: u32 = report.resources.iter().map(|r| r.initial_uses).sum();
    assert_eq!(report.total_uses(), budget);
}

#[test]
fn seed_fixes_resource_budgets() {
    let budgets = |seed| {
        let mut system = ResourceSystem::with_seed(seed);
        system.add_resource("A", NonZeroU32::new(1_000).unwrap(), FairnessPolicy::Barging);
        system.add_resource("B", NonZeroU32::new(1_000).unwrap(), FairnessPolicy::Barging);
        system
            .managers()
            .iter()
            .map(|m| m.basic().initial_uses())
            .collect::<Vec<_>>()
    };

    assert_eq!(budgets(11), budgets(11));
}

#[test]
fn builds_from_config() {
    let config = SystemConfig {
        seed: Some(5),
        resources: vec![ResourceConfig::new("A", 4).with_fairness(FairnessPolicy::HandOff)],
        users: vec![
            UserConfig::new("1", Duration::from_millis(1)),
            UserConfig::new("2", Duration::from_millis(1)),
        ],
    };

    let system = ResourceSystem::from_config(&config).unwrap();

    assert_eq!(system.managers().len(), 1);
    assert_eq!(system.managers()[0].policy(), FairnessPolicy::HandOff);
    let report = system.run().unwrap();
    assert_eq!(report.users.len(), 2);
    assert_eq!(report.resources[0].uses_left, 0);
}

#[test]
fn invalid_config_is_rejected() {
    let config = SystemConfig {
        seed: None,
        resources: vec![ResourceConfig::new("A", 0)],
        users: vec![UserConfig::new("1", Duration::from_millis(1))],
    };

    assert!(matches!(
        ResourceSystem::from_config(&config),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn interrupt_handle_stops_a_run() {
    let mut system = ResourceSystem::new();
    system.add_resource("A", NonZeroU32::new(50).unwrap(), FairnessPolicy::Barging);
    for name in ["1", "2", "3"] {
        system.add_user(name, Duration::from_secs(10));
    }
    let handle = system.interrupt_handle();

    let start = Instant::now();
    let runner = thread::spawn(move || system.run());
    thread::sleep(Duration::from_millis(50));
    handle.interrupt_all();

    match runner.join().unwrap() {
        Ok(report) => assert!(report.interrupted()),
        Err(SystemError::User { source, .. }) => {
            assert!(matches!(source, crate::error::ResourceError::Interrupted { .. }))
        }
        Err(other) => panic!("unexpected error: {}", other),
    }
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn run_without_users_reports_untouched_resources() {
    let mut system = ResourceSystem::with_seed(1);
    system.add_resource("A", NonZeroU32::new(3).unwrap(), FairnessPolicy::Barging);

    let report = system.run().unwrap();

    assert!(report.users.is_empty());
    assert_eq!(report.resources[0].uses_left, report.resources[0].initial_uses);
}
