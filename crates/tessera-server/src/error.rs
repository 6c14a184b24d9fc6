// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::response::{IntoResponse, Response};
use tessera_instance_core::MergeError;
use tessera_server_api::InstanceErrorResponse;

use crate::api_response::{bad_request, conflict, internal_error, internal_error_with_code, not_found};
use crate::instances::InstanceError;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("bad request: {0}")]
	BadRequest(String),
	#[error("not found: {0}")]
	NotFound(String),
	#[error("conflict: {0}")]
	Conflict(String),
	#[error(transparent)]
	Merge(MergeError),
	#[error("internal error: {0}")]
	Internal(String),
}

impl From<InstanceError> for ServerError {
	fn from(e: InstanceError) -> Self {
		match e {
			InstanceError::InvalidRequest(msg) => ServerError::BadRequest(msg),
			e @ InstanceError::NotFound(_) => ServerError::NotFound(e.to_string()),
			e @ InstanceError::DuplicateUuid(_) => ServerError::Conflict(e.to_string()),
			InstanceError::Merge(e) => ServerError::Merge(e),
			e @ InstanceError::Storage(_) => ServerError::Internal(e.to_string()),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match self {
			ServerError::BadRequest(msg) => {
				bad_request::<InstanceErrorResponse>("bad_request", msg).into_response()
			}
			ServerError::NotFound(msg) => not_found::<InstanceErrorResponse>(msg).into_response(),
			ServerError::Conflict(msg) => {
				conflict::<InstanceErrorResponse>("conflict", msg).into_response()
			}
			ServerError::Merge(e) => {
				tracing::error!(error = %e, path = e.path(), "configuration merge failed");
				internal_error_with_code::<InstanceErrorResponse>("merge_error", e.to_string())
					.into_response()
			}
			ServerError::Internal(msg) => {
				tracing::error!(error = %msg, "internal server error");
				internal_error::<InstanceErrorResponse>(msg).into_response()
			}
		}
	}
}
