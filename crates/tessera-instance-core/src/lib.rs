// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Tessera instances.
//!
//! An instance is a tenant's configuration record: a base configuration plus a
//! set of named overlays ("contexts"). This crate owns the record shape, the
//! configuration schema and the merge engine used to apply partial updates.
//! It performs no I/O; persistence and HTTP live in the server crates.
//!
//! # Overview
//!
//! - [`config`] - the [`InstanceConfig`] schema shared by base and contexts
//! - [`merge`] - overwrite-if-present, else-preserve deep merge
//! - [`instance`] - the [`Instance`] record and its update state machine
//!
//! # Example
//!
//! ```
//! use tessera_instance_core::{merged, InstanceConfig, MailerConfig};
//!
//! let stored = InstanceConfig {
//!     site_url: Some("https://a.example".to_string()),
//!     mailer: Some(MailerConfig {
//!         from: Some("a@x.com".to_string()),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//! let partial = InstanceConfig {
//!     mailer: Some(MailerConfig {
//!         from: Some("b@x.com".to_string()),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let result = merged(&stored, &partial).unwrap();
//! assert_eq!(result.site_url.as_deref(), Some("https://a.example"));
//! assert_eq!(result.mailer.unwrap().from.as_deref(), Some("b@x.com"));
//! ```

pub mod merge;

pub mod config;
pub mod instance;

pub use config::{
	CookieConfig, EmailContentConfig, EmailProviderConfig, ExternalConfig, InstanceConfig,
	JwtConfig, MailerConfig, OAuthProviderConfig, SmtpConfig, WebhookConfig,
};
pub use instance::{
	reconcile_contexts, Contexts, Instance, InstanceId, InstanceState, InstanceUpdate, UpdateStage,
};
pub use merge::{merged, Merge, MergeError, Shape};
