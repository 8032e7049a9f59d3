// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Two quick users sharing one small resource
pub const SMALL_SYSTEM: &str = r#"
seed = 11

[[resource]]
name = "A"
max_uses = 4

[[user]]
name = "1"
max_hold = "1ms"

[[user]]
name = "2"
max_hold = "2ms"
"#;

/// Write `content` to a config file inside a fresh temp dir
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("system.toml");
    std::fs::write(&path, content).unwrap();
    (temp, path)
}

pub fn resman() -> Command {
    let mut cmd = Command::cargo_bin("resman").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}
