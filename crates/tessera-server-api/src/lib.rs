// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod health;
pub mod instances;
pub mod manifest;

pub use health::{DatabaseHealth, HealthResponse, HealthStatus};
pub use instances::{InstanceErrorResponse, InstanceRequestParams, InstanceResponse};
pub use manifest::ManifestResponse;
