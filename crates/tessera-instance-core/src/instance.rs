// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The instance record and its update lifecycle.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::InstanceConfig;
use crate::merge::{Merge, MergeError};

/// Named configuration overlays, keyed by context name.
pub type Contexts = BTreeMap<String, InstanceConfig>;

/// Server-assigned identifier of an instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
	pub fn generate() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<String> for InstanceId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl From<&str> for InstanceId {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl fmt::Display for InstanceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Lifecycle state reported alongside an instance. Only `Active` exists today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceState {
	#[default]
	Active,
}

impl InstanceState {
	pub fn as_str(&self) -> &'static str {
		match self {
			InstanceState::Active => "active",
		}
	}
}

impl fmt::Display for InstanceState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Steps an update passes through, in order.
///
/// `BaseMerged` and `ContextsReconciled` are skipped when the update carries
/// nothing for them. `Persisted` is reached by the caller once the record has
/// been written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UpdateStage {
	Loaded,
	BaseMerged,
	ContextsReconciled,
	Persisted,
}

impl fmt::Display for UpdateStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UpdateStage::Loaded => write!(f, "loaded"),
			UpdateStage::BaseMerged => write!(f, "base_merged"),
			UpdateStage::ContextsReconciled => write!(f, "contexts_reconciled"),
			UpdateStage::Persisted => write!(f, "persisted"),
		}
	}
}

/// A partial update to an instance. `None` means "no change requested".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceUpdate {
	pub base_config: Option<InstanceConfig>,
	pub contexts: Option<Contexts>,
}

/// A tenant's configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
	pub id: InstanceId,
	pub uuid: String,
	#[serde(rename = "config")]
	pub base_config: InstanceConfig,
	#[serde(default)]
	pub contexts: Contexts,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Instance {
	/// Build a new record with a fresh id. Values are stored as given.
	pub fn new(uuid: impl Into<String>, base_config: InstanceConfig, contexts: Contexts) -> Self {
		let now = Utc::now();
		Self {
			id: InstanceId::generate(),
			uuid: uuid.into(),
			base_config,
			contexts,
			created_at: now,
			updated_at: now,
		}
	}

	/// Apply `update` in memory.
	///
	/// Returns the last stage reached. On error the record is left exactly as
	/// it was; nothing is committed until every step has succeeded.
	pub fn apply_update(&mut self, update: InstanceUpdate) -> Result<UpdateStage, MergeError> {
		let mut stage = UpdateStage::Loaded;
		let mut base_config = None;
		let mut contexts = None;

		if let Some(partial) = update.base_config.filter(|c| !c.is_empty()) {
			let mut merged = self.base_config.clone();
			merged.merge(partial).map_err(|e| e.within("config"))?;
			base_config = Some(merged);
			stage = UpdateStage::BaseMerged;
		}

		if let Some(incoming) = update.contexts.filter(|c| !c.is_empty()) {
			let mut reconciled = self.contexts.clone();
			reconcile_contexts(&mut reconciled, incoming)?;
			contexts = Some(reconciled);
			stage = UpdateStage::ContextsReconciled;
		}

		if let Some(base_config) = base_config {
			self.base_config = base_config;
		}
		if let Some(contexts) = contexts {
			self.contexts = contexts;
		}
		if stage != UpdateStage::Loaded {
			self.updated_at = Utc::now();
		}
		Ok(stage)
	}
}

/// Merge each incoming overlay into the context of the same name, inserting
/// it verbatim when there is none. Contexts not named in `incoming` are kept.
///
/// Stops at the first failure, which may leave `existing` partially updated.
pub fn reconcile_contexts(existing: &mut Contexts, incoming: Contexts) -> Result<(), MergeError> {
	for (name, partial) in incoming {
		match existing.get_mut(&name) {
			Some(current) => current
				.merge(partial)
				.map_err(|e| e.within(&name).within("contexts"))?,
			None => {
				existing.insert(name, partial);
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::MailerConfig;
	use crate::merge::Shape;
	use serde_json::json;

	fn config(value: serde_json::Value) -> InstanceConfig {
		serde_json::from_value(value).unwrap()
	}

	fn contexts(entries: &[(&str, serde_json::Value)]) -> Contexts {
		entries
			.iter()
			.map(|(name, value)| (name.to_string(), config(value.clone())))
			.collect()
	}

	#[test]
	fn test_new_instance_stores_values_verbatim() {
		let base = config(json!({"site_url": "https://a.example"}));
		let instance = Instance::new("tenant-1", base.clone(), Contexts::new());

		assert_eq!(instance.uuid, "tenant-1");
		assert_eq!(instance.base_config, base);
		assert!(instance.contexts.is_empty());
		assert_eq!(instance.created_at, instance.updated_at);
		assert!(Uuid::parse_str(instance.id.as_str()).is_ok());
	}

	#[test]
	fn test_ids_are_unique() {
		let a = Instance::new("a", InstanceConfig::default(), Contexts::new());
		let b = Instance::new("a", InstanceConfig::default(), Contexts::new());
		assert_ne!(a.id, b.id);
	}

	#[test]
	fn test_reconcile_inserts_then_merges() {
		let mut existing = Contexts::new();

		reconcile_contexts(
			&mut existing,
			contexts(&[("staging", json!({"site_url": "https://s.example"}))]),
		)
		.unwrap();
		assert_eq!(
			existing["staging"],
			config(json!({"site_url": "https://s.example"}))
		);

		reconcile_contexts(
			&mut existing,
			contexts(&[("staging", json!({"mailer": {"from": "c@x.com"}}))]),
		)
		.unwrap();
		assert_eq!(
			existing["staging"],
			config(json!({"site_url": "https://s.example", "mailer": {"from": "c@x.com"}}))
		);
	}

	#[test]
	fn test_reconcile_leaves_unnamed_contexts() {
		let mut existing = contexts(&[
			("staging", json!({"site_url": "https://s.example"})),
			("preview", json!({"site_url": "https://p.example"})),
		]);
		reconcile_contexts(
			&mut existing,
			contexts(&[("staging", json!({"disable_signup": true}))]),
		)
		.unwrap();
		assert_eq!(
			existing["preview"],
			config(json!({"site_url": "https://p.example"}))
		);
		assert_eq!(existing["staging"].disable_signup, Some(true));
	}

	#[test]
	fn test_apply_update_merges_base() {
		let mut instance = Instance::new(
			"tenant-1",
			config(json!({"site_url": "https://a.example", "mailer": {"from": "a@x.com"}})),
			Contexts::new(),
		);

		let stage = instance
			.apply_update(InstanceUpdate {
				base_config: Some(InstanceConfig {
					mailer: Some(MailerConfig {
						from: Some("b@x.com".to_string()),
						..Default::default()
					}),
					..Default::default()
				}),
				contexts: None,
			})
			.unwrap();

		assert_eq!(stage, UpdateStage::BaseMerged);
		assert_eq!(
			instance.base_config,
			config(json!({"site_url": "https://a.example", "mailer": {"from": "b@x.com"}}))
		);
		assert!(instance.updated_at >= instance.created_at);
	}

	#[test]
	fn test_apply_update_with_contexts_reaches_reconciled() {
		let mut instance = Instance::new("tenant-1", InstanceConfig::default(), Contexts::new());
		let stage = instance
			.apply_update(InstanceUpdate {
				base_config: Some(config(json!({"site_url": "https://a.example"}))),
				contexts: Some(contexts(&[("staging", json!({"disable_signup": true}))])),
			})
			.unwrap();

		assert_eq!(stage, UpdateStage::ContextsReconciled);
		assert_eq!(instance.base_config.site_url.as_deref(), Some("https://a.example"));
		assert!(instance.contexts.contains_key("staging"));
	}

	#[test]
	fn test_empty_update_changes_nothing() {
		let mut instance = Instance::new(
			"tenant-1",
			config(json!({"site_url": "https://a.example"})),
			Contexts::new(),
		);
		let before = instance.clone();

		let stage = instance
			.apply_update(InstanceUpdate {
				base_config: Some(InstanceConfig::default()),
				contexts: Some(Contexts::new()),
			})
			.unwrap();

		assert_eq!(stage, UpdateStage::Loaded);
		assert_eq!(instance, before);
	}

	#[test]
	fn test_failed_context_merge_leaves_record_unchanged() {
		let mut instance = Instance::new(
			"tenant-1",
			config(json!({"site_url": "https://a.example"})),
			contexts(&[("staging", json!({"hooks": {"signup": "https://h"}}))]),
		);
		let before = instance.clone();

		let err = instance
			.apply_update(InstanceUpdate {
				base_config: Some(config(json!({"site_url": "https://b.example"}))),
				contexts: Some(contexts(&[("staging", json!({"hooks": ["signup"]}))])),
			})
			.unwrap_err();

		assert_eq!(
			err,
			MergeError::ShapeMismatch {
				path: "contexts.staging.hooks".to_string(),
				stored: Shape::Object,
				update: Shape::Array,
			}
		);
		assert_eq!(instance, before);
	}

	#[test]
	fn test_failed_base_merge_reports_config_path() {
		let mut instance = Instance::new(
			"tenant-1",
			config(json!({"hooks": {"signup": "https://h"}})),
			Contexts::new(),
		);
		let err = instance
			.apply_update(InstanceUpdate {
				base_config: Some(config(json!({"hooks": "off"}))),
				contexts: None,
			})
			.unwrap_err();
		assert_eq!(err.path(), "config.hooks");
	}

	#[test]
	fn test_instance_serializes_base_as_config() {
		let instance = Instance::new(
			"tenant-1",
			config(json!({"site_url": "https://a.example"})),
			Contexts::new(),
		);
		let value = serde_json::to_value(&instance).unwrap();
		assert_eq!(value["config"], json!({"site_url": "https://a.example"}));
		assert_eq!(value["uuid"], json!("tenant-1"));
		assert_eq!(value["id"], json!(instance.id.as_str()));
	}

	#[test]
	fn test_stage_and_state_display() {
		assert_eq!(UpdateStage::ContextsReconciled.to_string(), "contexts_reconciled");
		assert_eq!(InstanceState::Active.to_string(), "active");
		assert_eq!(
			serde_json::to_value(InstanceState::Active).unwrap(),
			json!("active")
		);
	}
}
