// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for tests that need a database.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::pool::INSTANCES_SCHEMA;

/// In-memory pool with the instances table created.
///
/// Limited to one connection: every `:memory:` connection is its own database.
pub async fn create_instance_test_pool() -> SqlitePool {
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect("sqlite::memory:")
		.await
		.unwrap();
	sqlx::query(INSTANCES_SCHEMA).execute(&pool).await.unwrap();
	pool
}
