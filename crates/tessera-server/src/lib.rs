// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tessera instance configuration server.
//!
//! This crate provides an HTTP server for creating, reading, updating and
//! deleting instance configuration records stored in SQLite.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod error;
pub mod instances;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use instances::{InstanceError, InstanceService};
pub use tessera_server_config::ServerConfig;
