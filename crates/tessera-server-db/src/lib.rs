// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the Tessera server.
//!
//! Instances are stored in a single SQLite table; configurations are kept as
//! JSON text so schema additions need no migration.

pub mod error;
pub mod instance;
pub mod pool;
pub mod testing;

pub use error::{DbError, Result};
pub use instance::{InstanceRepository, InstanceStore};
pub use pool::{create_pool, run_migrations};
