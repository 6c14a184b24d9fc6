// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tessera_server_api::{
	DatabaseHealth, HealthResponse, HealthStatus, InstanceErrorResponse, InstanceRequestParams,
	InstanceResponse, ManifestResponse,
};
use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
	info(
		title = "Tessera",
		description = "Per-tenant instance configuration with named context overlays"
	),
	paths(
		routes::manifest::get_manifest,
		routes::health::health_check,
		routes::instances::create_instance,
		routes::instances::get_instance,
		routes::instances::update_instance,
		routes::instances::delete_instance,
	),
	components(schemas(
		DatabaseHealth,
		HealthResponse,
		HealthStatus,
		InstanceErrorResponse,
		InstanceRequestParams,
		InstanceResponse,
		ManifestResponse,
	)),
	tags(
		(name = "instances", description = "Instance configuration records"),
		(name = "health", description = "Service health"),
		(name = "manifest", description = "Service identity")
	)
)]
pub struct ApiDoc;
