// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_instance_core::{Contexts, Instance, InstanceConfig, InstanceId, InstanceState};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Body of create and update requests.
///
/// On create, `uuid` is required and `config`/`contexts` are stored as given.
/// On update every field is optional: an absent field requests no change, and
/// `uuid` is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct InstanceRequestParams {
	#[serde(default)]
	pub uuid: Option<String>,
	#[serde(default)]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
	pub config: Option<InstanceConfig>,
	#[serde(default)]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
	pub contexts: Option<Contexts>,
}

/// A stored instance plus the service endpoint and its state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct InstanceResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = String))]
	pub id: InstanceId,
	pub uuid: String,
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub config: InstanceConfig,
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub contexts: Contexts,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub endpoint: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String, example = "active"))]
	pub state: InstanceState,
}

impl InstanceResponse {
	pub fn new(instance: Instance, endpoint: impl Into<String>) -> Self {
		Self {
			id: instance.id,
			uuid: instance.uuid,
			config: instance.base_config,
			contexts: instance.contexts,
			created_at: instance.created_at,
			updated_at: instance.updated_at,
			endpoint: endpoint.into(),
			state: InstanceState::Active,
		}
	}
}

/// Error response for instance operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct InstanceErrorResponse {
	pub error: String,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_request_params_all_optional() {
		let params: InstanceRequestParams = serde_json::from_value(json!({})).unwrap();
		assert!(params.uuid.is_none());
		assert!(params.config.is_none());
		assert!(params.contexts.is_none());
	}

	#[test]
	fn test_explicit_empty_config_is_distinct_from_absent() {
		let params: InstanceRequestParams =
			serde_json::from_value(json!({"config": {}, "contexts": {}})).unwrap();
		assert_eq!(params.config, Some(InstanceConfig::default()));
		assert_eq!(params.contexts, Some(Contexts::new()));
	}

	#[test]
	fn test_response_shape() {
		let instance = Instance::new(
			"tenant-1",
			serde_json::from_value(json!({"site_url": "https://a.example"})).unwrap(),
			Contexts::new(),
		);
		let id = instance.id.to_string();
		let value =
			serde_json::to_value(InstanceResponse::new(instance, "https://id.example.com")).unwrap();

		assert_eq!(value["id"], json!(id));
		assert_eq!(value["uuid"], json!("tenant-1"));
		assert_eq!(value["config"], json!({"site_url": "https://a.example"}));
		assert_eq!(value["contexts"], json!({}));
		assert_eq!(value["endpoint"], json!("https://id.example.com"));
		assert_eq!(value["state"], json!("active"));
		assert!(value["created_at"].is_string());
	}
}
