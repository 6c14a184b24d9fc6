// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Instance orchestration: turns create/read/update/delete requests into
//! record-model calls and a single write per request.

use std::sync::Arc;

use tessera_instance_core::{Instance, InstanceId, InstanceUpdate, MergeError, UpdateStage};
use tessera_server_api::InstanceRequestParams;
use tessera_server_db::{DbError, InstanceStore};

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
	#[error("invalid request: {0}")]
	InvalidRequest(String),

	#[error("instance {0} not found")]
	NotFound(InstanceId),

	#[error("an instance with uuid {0} already exists")]
	DuplicateUuid(String),

	#[error("failed to merge configuration: {0}")]
	Merge(#[from] MergeError),

	#[error("storage error: {0}")]
	Storage(#[source] DbError),
}

/// Coordinates the instance store and the record model.
///
/// Holds no mutable state; concurrent updates to one instance are last
/// writer wins.
pub struct InstanceService {
	store: Arc<dyn InstanceStore>,
}

impl InstanceService {
	pub fn new(store: Arc<dyn InstanceStore>) -> Self {
		Self { store }
	}

	/// Create a new instance. The configuration and contexts are stored as
	/// given, without merging.
	#[tracing::instrument(skip(self, params), fields(uuid = params.uuid.as_deref().unwrap_or_default()))]
	pub async fn create(&self, params: InstanceRequestParams) -> Result<Instance, InstanceError> {
		let uuid = params
			.uuid
			.filter(|u| !u.trim().is_empty())
			.ok_or_else(|| InstanceError::InvalidRequest("uuid is required".to_string()))?;

		if self
			.store
			.get_instance_by_uuid(&uuid)
			.await
			.map_err(InstanceError::Storage)?
			.is_some()
		{
			return Err(InstanceError::DuplicateUuid(uuid));
		}

		let instance = Instance::new(
			uuid,
			params.config.unwrap_or_default(),
			params.contexts.unwrap_or_default(),
		);

		self.store
			.create_instance(&instance)
			.await
			.map_err(|e| match e {
				DbError::Conflict(_) => InstanceError::DuplicateUuid(instance.uuid.clone()),
				e => InstanceError::Storage(e),
			})?;

		tracing::info!(instance_id = %instance.id, "instance created");
		Ok(instance)
	}

	/// Load an instance by id.
	#[tracing::instrument(skip(self), fields(instance_id = %id))]
	pub async fn load(&self, id: &InstanceId) -> Result<Instance, InstanceError> {
		self.store
			.get_instance(id)
			.await
			.map_err(InstanceError::Storage)?
			.ok_or_else(|| InstanceError::NotFound(id.clone()))
	}

	/// Apply a partial update to a loaded instance and persist the result once.
	///
	/// The request's `uuid` is ignored. On a merge failure nothing is written.
	#[tracing::instrument(skip(self, instance, params), fields(instance_id = %instance.id))]
	pub async fn update(
		&self,
		mut instance: Instance,
		params: InstanceRequestParams,
	) -> Result<Instance, InstanceError> {
		let stage = instance.apply_update(InstanceUpdate {
			base_config: params.config,
			contexts: params.contexts,
		})?;
		tracing::debug!(%stage, "update applied in memory");

		self.store
			.update_instance(&instance)
			.await
			.map_err(|e| match e {
				DbError::NotFound(_) => InstanceError::NotFound(instance.id.clone()),
				e => InstanceError::Storage(e),
			})?;

		tracing::info!(stage = %UpdateStage::Persisted, "instance updated");
		Ok(instance)
	}

	/// Delete a loaded instance. Dependent data is not touched.
	#[tracing::instrument(skip(self, instance), fields(instance_id = %instance.id))]
	pub async fn delete(&self, instance: Instance) -> Result<(), InstanceError> {
		self.store
			.delete_instance(&instance.id)
			.await
			.map_err(|e| match e {
				DbError::NotFound(_) => InstanceError::NotFound(instance.id.clone()),
				e => InstanceError::Storage(e),
			})?;

		tracing::info!("instance deleted");
		Ok(())
	}

	pub fn store(&self) -> &Arc<dyn InstanceStore> {
		&self.store
	}
}
