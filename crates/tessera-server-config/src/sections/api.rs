// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Public API identity: the endpoint reported alongside every instance and
//! the version advertised by the manifest.

use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "http://localhost:8081";

/// API configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct ApiConfig {
	/// Externally reachable base URL of the service.
	pub endpoint: String,
	pub version: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		ApiConfigLayer::default().finalize()
	}
}

/// API configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfigLayer {
	#[serde(default)]
	pub endpoint: Option<String>,
	#[serde(default)]
	pub version: Option<String>,
}

impl ApiConfigLayer {
	pub fn merge(&mut self, other: ApiConfigLayer) {
		if other.endpoint.is_some() {
			self.endpoint = other.endpoint;
		}
		if other.version.is_some() {
			self.version = other.version;
		}
	}

	pub fn finalize(self) -> ApiConfig {
		ApiConfig {
			endpoint: self
				.endpoint
				.map(|e| e.trim_end_matches('/').to_string())
				.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
			version: self
				.version
				.unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
		}
	}
}
