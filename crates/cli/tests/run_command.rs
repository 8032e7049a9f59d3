// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for `resman run`

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use common::{resman, write_config, SMALL_SYSTEM};
use predicates::prelude::*;

#[test]
fn run_reports_every_user_and_resource() {
    let (_temp, path) = write_config(SMALL_SYSTEM);

    resman()
        .arg("run")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("user 1:"))
        .stdout(predicate::str::contains("user 2:"))
        .stdout(predicate::str::contains("resource \"A\":"))
        .stdout(predicate::str::contains("All users finished"));
}

#[test]
fn run_consumes_whole_budget() {
    let (_temp, path) = write_config(
        r#"
[[resource]]
name = "A"
max_uses = 1

[[user]]
name = "solo"
max_hold = "1ms"
"#,
    );

    resman()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("user solo: 1 uses in"))
        .stdout(predicate::str::contains("resource \"A\": 1 of 1 uses consumed"));
}

#[test]
fn run_with_same_seed_draws_same_budget() {
    let (_temp, path) = write_config(SMALL_SYSTEM);

    let budget = |seed: &str| {
        let output = resman()
            .args(["run", "--seed", seed, "--config"])
            .arg(&path)
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout)
            .unwrap()
            .lines()
            .find(|line| line.starts_with("resource \"A\""))
            .map(str::to_string)
            .unwrap()
    };

    assert_eq!(budget("42"), budget("42"));
}

#[test]
fn run_accepts_hand_off_fairness() {
    let (_temp, path) = write_config(SMALL_SYSTEM);

    resman()
        .args(["run", "--fairness", "hand-off", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("All users finished"));
}

#[test]
fn run_rejects_unknown_fairness() {
    resman()
        .args(["run", "--fairness", "lottery"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lottery"));
}

#[test]
fn run_fails_on_missing_config() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");

    resman()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not load"));
}

#[test]
fn run_logs_usage_at_info() {
    let (_temp, path) = write_config(SMALL_SYSTEM);

    resman()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("finished using"));
}
