// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Instance repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use tessera_instance_core::{Contexts, Instance, InstanceConfig, InstanceId};

use crate::error::DbError;

/// Trait for instance database operations.
#[async_trait]
pub trait InstanceStore: Send + Sync {
	async fn get_instance(&self, id: &InstanceId) -> Result<Option<Instance>, DbError>;

	async fn get_instance_by_uuid(&self, uuid: &str) -> Result<Option<Instance>, DbError>;

	/// Insert a new record. Fails with [`DbError::Conflict`] if the uuid is taken.
	async fn create_instance(&self, instance: &Instance) -> Result<(), DbError>;

	/// Overwrite the stored configuration of an existing record.
	async fn update_instance(&self, instance: &Instance) -> Result<(), DbError>;

	async fn delete_instance(&self, id: &InstanceId) -> Result<(), DbError>;

	async fn health_check(&self) -> Result<(), DbError>;
}

/// Repository for instance database operations.
#[derive(Clone)]
pub struct InstanceRepository {
	pool: SqlitePool,
}

impl InstanceRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}
}

#[async_trait]
impl InstanceStore for InstanceRepository {
	#[tracing::instrument(skip(self), fields(instance_id = %id))]
	async fn get_instance(&self, id: &InstanceId) -> Result<Option<Instance>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, uuid, base_config, contexts, created_at, updated_at
			FROM instances
			WHERE id = ?
			"#,
		)
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_instance(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(uuid = %uuid))]
	async fn get_instance_by_uuid(&self, uuid: &str) -> Result<Option<Instance>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, uuid, base_config, contexts, created_at, updated_at
			FROM instances
			WHERE uuid = ?
			"#,
		)
		.bind(uuid)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_instance(&r)).transpose()
	}

	#[tracing::instrument(skip(self, instance), fields(instance_id = %instance.id, uuid = %instance.uuid))]
	async fn create_instance(&self, instance: &Instance) -> Result<(), DbError> {
		let base_config = serde_json::to_string(&instance.base_config)?;
		let contexts = serde_json::to_string(&instance.contexts)?;

		sqlx::query(
			r#"
			INSERT INTO instances (id, uuid, base_config, contexts, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(instance.id.as_str())
		.bind(&instance.uuid)
		.bind(&base_config)
		.bind(&contexts)
		.bind(instance.created_at.to_rfc3339())
		.bind(instance.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(format!("Instance with uuid {} already exists", instance.uuid))
			}
			_ => DbError::Sqlx(e),
		})?;

		tracing::debug!("instance created");
		Ok(())
	}

	#[tracing::instrument(skip(self, instance), fields(instance_id = %instance.id))]
	async fn update_instance(&self, instance: &Instance) -> Result<(), DbError> {
		let base_config = serde_json::to_string(&instance.base_config)?;
		let contexts = serde_json::to_string(&instance.contexts)?;

		let result = sqlx::query(
			r#"
			UPDATE instances
			SET base_config = ?, contexts = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&base_config)
		.bind(&contexts)
		.bind(instance.updated_at.to_rfc3339())
		.bind(instance.id.as_str())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound("Instance not found".to_string()));
		}

		tracing::debug!("instance updated");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(instance_id = %id))]
	async fn delete_instance(&self, id: &InstanceId) -> Result<(), DbError> {
		let result = sqlx::query(r#"DELETE FROM instances WHERE id = ?"#)
			.bind(id.as_str())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound("Instance not found".to_string()));
		}

		tracing::debug!("instance deleted");
		Ok(())
	}

	#[tracing::instrument(skip(self))]
	async fn health_check(&self) -> Result<(), DbError> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;
		Ok(())
	}
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|d| d.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(e.to_string()))
}

fn row_to_instance(row: &sqlx::sqlite::SqliteRow) -> Result<Instance, DbError> {
	let id: String = row.get("id");
	let base_config: String = row.get("base_config");
	let contexts: String = row.get("contexts");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Instance {
		id: InstanceId::from(id),
		uuid: row.get("uuid"),
		base_config: serde_json::from_str::<InstanceConfig>(&base_config)?,
		contexts: serde_json::from_str::<Contexts>(&contexts)?,
		created_at: parse_timestamp(&created_at)?,
		updated_at: parse_timestamp(&updated_at)?,
	})
}
