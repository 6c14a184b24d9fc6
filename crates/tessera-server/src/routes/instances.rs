// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Instance HTTP handlers.
//!
//! Handlers that address an existing instance load it first and pass the
//! loaded record on to the service.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use tessera_instance_core::{Instance, InstanceId};
use tessera_server_api::{InstanceErrorResponse, InstanceRequestParams, InstanceResponse};

use crate::{api::AppState, error::ServerError};

fn decode(
	payload: Result<Json<InstanceRequestParams>, JsonRejection>,
) -> Result<InstanceRequestParams, ServerError> {
	payload
		.map(|Json(params)| params)
		.map_err(|e| ServerError::BadRequest(e.body_text()))
}

async fn load_instance(state: &AppState, instance_id: String) -> Result<Instance, ServerError> {
	Ok(state.instances.load(&InstanceId::from(instance_id)).await?)
}

fn respond(state: &AppState, instance: Instance) -> Json<InstanceResponse> {
	Json(InstanceResponse::new(instance, state.endpoint.clone()))
}

#[utoipa::path(
    post,
    path = "/instances",
    request_body = InstanceRequestParams,
    responses(
        (status = 201, description = "Instance created", body = InstanceResponse),
        (status = 400, description = "Malformed request", body = InstanceErrorResponse),
        (status = 409, description = "An instance with this uuid already exists", body = InstanceErrorResponse),
        (status = 500, description = "Storage failure", body = InstanceErrorResponse)
    ),
    tag = "instances"
)]
/// POST /instances - Create an instance.
///
/// The supplied configuration and contexts are stored as given.
pub async fn create_instance(
	State(state): State<AppState>,
	payload: Result<Json<InstanceRequestParams>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let params = decode(payload)?;
	let instance = state.instances.create(params).await?;
	Ok((StatusCode::CREATED, respond(&state, instance)))
}

#[utoipa::path(
    get,
    path = "/instances/{instance_id}",
    params(
        ("instance_id" = String, Path, description = "Instance ID")
    ),
    responses(
        (status = 200, description = "The instance", body = InstanceResponse),
        (status = 404, description = "Instance not found", body = InstanceErrorResponse)
    ),
    tag = "instances"
)]
/// GET /instances/{instance_id} - Fetch an instance.
pub async fn get_instance(
	State(state): State<AppState>,
	Path(instance_id): Path<String>,
) -> Result<Json<InstanceResponse>, ServerError> {
	let instance = load_instance(&state, instance_id).await?;
	Ok(respond(&state, instance))
}

#[utoipa::path(
    put,
    path = "/instances/{instance_id}",
    params(
        ("instance_id" = String, Path, description = "Instance ID")
    ),
    request_body = InstanceRequestParams,
    responses(
        (status = 200, description = "Instance updated", body = InstanceResponse),
        (status = 400, description = "Malformed request", body = InstanceErrorResponse),
        (status = 404, description = "Instance not found", body = InstanceErrorResponse),
        (status = 500, description = "Merge or storage failure", body = InstanceErrorResponse)
    ),
    tag = "instances"
)]
/// PUT /instances/{instance_id} - Merge a partial update into an instance.
///
/// `config` is deep-merged into the base configuration. Each entry of
/// `contexts` is merged into the context of the same name, or inserted when
/// there is none.
pub async fn update_instance(
	State(state): State<AppState>,
	Path(instance_id): Path<String>,
	payload: Result<Json<InstanceRequestParams>, JsonRejection>,
) -> Result<Json<InstanceResponse>, ServerError> {
	let instance = load_instance(&state, instance_id).await?;
	let params = decode(payload)?;
	let instance = state.instances.update(instance, params).await?;
	Ok(respond(&state, instance))
}

#[utoipa::path(
    delete,
    path = "/instances/{instance_id}",
    params(
        ("instance_id" = String, Path, description = "Instance ID")
    ),
    responses(
        (status = 204, description = "Instance deleted"),
        (status = 404, description = "Instance not found", body = InstanceErrorResponse)
    ),
    tag = "instances"
)]
/// DELETE /instances/{instance_id} - Delete an instance.
pub async fn delete_instance(
	State(state): State<AppState>,
	Path(instance_id): Path<String>,
) -> Result<StatusCode, ServerError> {
	let instance = load_instance(&state, instance_id).await?;
	state.instances.delete(instance).await?;
	Ok(StatusCode::NO_CONTENT)
}
