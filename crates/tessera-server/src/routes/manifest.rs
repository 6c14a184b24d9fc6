// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{extract::State, Json};
use tessera_server_api::ManifestResponse;

use crate::api::AppState;

pub const SERVICE_NAME: &str = "Tessera";
pub const SERVICE_DESCRIPTION: &str =
	"Tessera manages per-tenant instance configuration with named context overlays.";

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service manifest", body = ManifestResponse)
    ),
    tag = "manifest"
)]
/// GET / - Service name, description and version.
pub async fn get_manifest(State(state): State<AppState>) -> Json<ManifestResponse> {
	Json(ManifestResponse {
		version: state.version.clone(),
		name: SERVICE_NAME.to_string(),
		description: SERVICE_DESCRIPTION.to_string(),
	})
}
