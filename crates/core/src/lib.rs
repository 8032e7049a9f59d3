// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! resman-core: priority arbitration for a single reusable resource
//!
//! This crate provides:
//! - Resources with a finite usage budget
//! - Resource managers that grant exclusive access by priority
//! - Users that contend for resources until they are exhausted
//! - Systems that run a set of users against a set of resources

pub mod config;
pub mod error;
pub mod interrupt;
pub mod manager;
pub mod priority;
pub mod resource;
pub mod system;
pub mod user;

pub use config::{ResourceConfig, SystemConfig, UserConfig};
pub use error::{ConfigError, ResourceError, SystemError};
pub use interrupt::{Interrupt, InterruptHandle};
pub use manager::{
    ArbiterSnapshot, BasicResourceManager, FairnessPolicy, LockResourceManager, ResourceManager,
    WaitingCounts,
};
pub use priority::{Priority, MAX_PRIORITY, NONE_WAITING, PRIORITY_LEVELS};
pub use resource::Resource;
pub use system::{ResourceReport, ResourceSystem, RunReport};
pub use user::{ResourceUser, UserReport};
