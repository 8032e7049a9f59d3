// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request priorities
//!
//! Priorities belong to a single request, not to the user making it. Higher
//! numbers are more urgent.

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest priority a request may carry
pub const MAX_PRIORITY: u8 = 10;

/// Number of distinct priority levels (`0..=MAX_PRIORITY`)
pub const PRIORITY_LEVELS: usize = MAX_PRIORITY as usize + 1;

/// Integer returned in place of a level when a release finds nobody waiting
pub const NONE_WAITING: i32 = -1;

/// A priority level in `0..=MAX_PRIORITY`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const LOWEST: Priority = Priority(0);
    pub const HIGHEST: Priority = Priority(MAX_PRIORITY);

    /// Returns `None` when `level` exceeds [`MAX_PRIORITY`]
    pub const fn new(level: u8) -> Option<Self> {
        if level <= MAX_PRIORITY {
            Some(Self(level))
        } else {
            None
        }
    }

    pub const fn level(self) -> u8 {
        self.0
    }

    /// Index into per-level tables
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// All levels, lowest first
    pub fn all() -> impl DoubleEndedIterator<Item = Priority> {
        (0..=MAX_PRIORITY).map(Priority)
    }

    /// Maps a release outcome onto the integer convention, where nobody
    /// woken is [`NONE_WAITING`].
    pub fn level_or_none(woken: Option<Priority>) -> i32 {
        woken.map_or(NONE_WAITING, |p| i32::from(p.0))
    }
}

impl TryFrom<i64> for Priority {
    type Error = ResourceError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        u8::try_from(level)
            .ok()
            .and_then(Priority::new)
            .ok_or(ResourceError::InvalidPriority(level))
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
