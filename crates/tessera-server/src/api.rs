// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Router,
};
use tessera_server_config::ServerConfig;
use tessera_server_db::InstanceStore;

use crate::instances::InstanceService;
use crate::routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub instances: Arc<InstanceService>,
	/// Reported as `endpoint` on every instance response.
	pub endpoint: String,
	pub version: String,
}

pub fn create_app_state(store: Arc<dyn InstanceStore>, config: &ServerConfig) -> AppState {
	AppState {
		instances: Arc::new(InstanceService::new(store)),
		endpoint: config.api.endpoint.clone(),
		version: config.api.version.clone(),
	}
}

/// Create the API router with all routes.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/", get(routes::manifest::get_manifest))
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(routes::docs::openapi_json))
		.route("/instances", post(routes::instances::create_instance))
		.route(
			"/instances/{instance_id}",
			get(routes::instances::get_instance)
				.put(routes::instances::update_instance)
				.delete(routes::instances::delete_instance),
		)
		.with_state(state)
}
