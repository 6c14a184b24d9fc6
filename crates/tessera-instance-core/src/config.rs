// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Instance configuration schema.
//!
//! The same schema describes an instance's base configuration and each of its
//! context overlays. Every field is optional so a value of this type can be a
//! complete configuration or a partial update; absent fields are omitted when
//! serialized.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_merge;

const REDACTED: &str = "[REDACTED]";

fn redact(secret: &Option<String>) -> Option<&'static str> {
	secret.as_ref().map(|_| REDACTED)
}

/// Configuration for one instance (or one context overlay).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub site_url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub disable_signup: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub jwt: Option<JwtConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub smtp: Option<SmtpConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mailer: Option<MailerConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub external: Option<ExternalConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub webhook: Option<WebhookConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cookies: Option<CookieConfig>,
	/// Top-level settings this schema does not model, kept verbatim.
	#[serde(flatten)]
	pub additional: Map<String, Value>,
}

impl InstanceConfig {
	/// True when no field is set, i.e. merging this value changes nothing.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

impl_merge!(InstanceConfig {
	site_url,
	disable_signup,
	jwt,
	smtp,
	mailer,
	external,
	webhook,
	cookies;
	flatten additional
});

/// Token signing settings.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub secret: Option<String>,
	/// Token lifetime in seconds.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub exp: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub aud: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub admin_group_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_group_name: Option<String>,
}

impl_merge!(JwtConfig {
	secret,
	exp,
	aud,
	admin_group_name,
	default_group_name,
});

impl fmt::Debug for JwtConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("JwtConfig")
			.field("secret", &redact(&self.secret))
			.field("exp", &self.exp)
			.field("aud", &self.aud)
			.field("admin_group_name", &self.admin_group_name)
			.field("default_group_name", &self.default_group_name)
			.finish()
	}
}

/// Outgoing mail server.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub host: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub port: Option<u16>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pass: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub admin_email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_frequency_secs: Option<u64>,
}

impl_merge!(SmtpConfig {
	host,
	port,
	user,
	pass,
	admin_email,
	max_frequency_secs,
});

impl fmt::Debug for SmtpConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SmtpConfig")
			.field("host", &self.host)
			.field("port", &self.port)
			.field("user", &self.user)
			.field("pass", &redact(&self.pass))
			.field("admin_email", &self.admin_email)
			.field("max_frequency_secs", &self.max_frequency_secs)
			.finish()
	}
}

/// Transactional mail behaviour and content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub from: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub autoconfirm: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_frequency_secs: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subjects: Option<EmailContentConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub templates: Option<EmailContentConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url_paths: Option<EmailContentConfig>,
}

impl_merge!(MailerConfig {
	from,
	autoconfirm,
	max_frequency_secs,
	subjects,
	templates,
	url_paths,
});

/// Per-message values (subject lines, template URLs or link paths).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailContentConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub invite: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub confirmation: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub recovery: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email_change: Option<String>,
}

impl_merge!(EmailContentConfig {
	invite,
	confirmation,
	recovery,
	email_change,
});

/// External identity providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bitbucket: Option<OAuthProviderConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub github: Option<OAuthProviderConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub gitlab: Option<OAuthProviderConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub google: Option<OAuthProviderConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub facebook: Option<OAuthProviderConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<EmailProviderConfig>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub redirect_url: Option<String>,
}

impl_merge!(ExternalConfig {
	bitbucket,
	github,
	gitlab,
	google,
	facebook,
	email,
	redirect_url,
});

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthProviderConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub secret: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub redirect_uri: Option<String>,
	/// Base URL for self-hosted providers.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

impl_merge!(OAuthProviderConfig {
	enabled,
	client_id,
	secret,
	redirect_uri,
	url,
});

impl fmt::Debug for OAuthProviderConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OAuthProviderConfig")
			.field("enabled", &self.enabled)
			.field("client_id", &self.client_id)
			.field("secret", &redact(&self.secret))
			.field("redirect_uri", &self.redirect_uri)
			.field("url", &self.url)
			.finish()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailProviderConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub disabled: Option<bool>,
}

impl_merge!(EmailProviderConfig { disabled });

/// Outgoing event notifications.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub retries: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timeout_secs: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub secret: Option<String>,
	/// Replaced as a whole by a non-empty update.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub events: Vec<String>,
}

impl_merge!(WebhookConfig {
	url,
	retries,
	timeout_secs,
	secret,
	events,
});

impl fmt::Debug for WebhookConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebhookConfig")
			.field("url", &self.url)
			.field("retries", &self.retries)
			.field("timeout_secs", &self.timeout_secs)
			.field("secret", &redact(&self.secret))
			.field("events", &self.events)
			.finish()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub key: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duration_secs: Option<u64>,
}

impl_merge!(CookieConfig { key, duration_secs });

#[cfg(test)]
mod tests {
	use super::*;
	use crate::merge::{merged, Merge, MergeError, Shape};
	use proptest::prelude::*;
	use serde_json::json;

	fn config(value: Value) -> InstanceConfig {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_partial_update_preserves_unset_fields() {
		let stored = config(json!({
			"site_url": "https://a.example",
			"mailer": {"from": "a@x.com"}
		}));
		let partial = config(json!({"mailer": {"from": "b@x.com"}}));

		let result = merged(&stored, &partial).unwrap();
		assert_eq!(
			result,
			config(json!({
				"site_url": "https://a.example",
				"mailer": {"from": "b@x.com"}
			}))
		);
	}

	#[test]
	fn test_nested_section_merges_field_by_field() {
		let stored = config(json!({
			"mailer": {
				"autoconfirm": true,
				"subjects": {"invite": "You're invited", "recovery": "Reset"}
			}
		}));
		let partial = config(json!({"mailer": {"subjects": {"recovery": "Reset your password"}}}));

		let result = merged(&stored, &partial).unwrap();
		let mailer = result.mailer.unwrap();
		assert_eq!(mailer.autoconfirm, Some(true));
		let subjects = mailer.subjects.unwrap();
		assert_eq!(subjects.invite.as_deref(), Some("You're invited"));
		assert_eq!(subjects.recovery.as_deref(), Some("Reset your password"));
	}

	#[test]
	fn test_missing_section_adopted_wholesale() {
		let stored = config(json!({"site_url": "https://a.example"}));
		let partial = config(json!({
			"external": {"github": {"enabled": true, "client_id": "abc"}}
		}));

		let result = merged(&stored, &partial).unwrap();
		assert_eq!(result.external, partial.external);
		assert_eq!(result.site_url.as_deref(), Some("https://a.example"));
	}

	#[test]
	fn test_webhook_events_replaced_only_when_non_empty() {
		let stored = config(json!({"webhook": {"url": "https://h.example", "events": ["signup", "login"]}}));

		let untouched = merged(&stored, &config(json!({"webhook": {"retries": 3}}))).unwrap();
		assert_eq!(
			untouched.webhook.as_ref().unwrap().events,
			vec!["signup".to_string(), "login".to_string()]
		);

		let replaced = merged(&stored, &config(json!({"webhook": {"events": ["validate"]}}))).unwrap();
		assert_eq!(replaced.webhook.unwrap().events, vec!["validate".to_string()]);
	}

	#[test]
	fn test_additional_settings_round_trip() {
		let value = json!({"site_url": "https://a.example", "hooks": {"signup": {"url": "https://h"}}});
		let parsed = config(value.clone());
		assert_eq!(parsed.additional["hooks"], json!({"signup": {"url": "https://h"}}));
		assert_eq!(serde_json::to_value(&parsed).unwrap(), value);
	}

	#[test]
	fn test_additional_shape_mismatch_reported() {
		let mut stored = config(json!({"hooks": {"signup": {"url": "https://h"}}}));
		let err = stored.merge(config(json!({"hooks": "off"}))).unwrap_err();
		assert_eq!(
			err,
			MergeError::ShapeMismatch {
				path: "hooks".to_string(),
				stored: Shape::Object,
				update: Shape::Scalar,
			}
		);
	}

	#[test]
	fn test_absent_fields_not_serialized() {
		let value = serde_json::to_value(InstanceConfig {
			mailer: Some(MailerConfig::default()),
			..Default::default()
		})
		.unwrap();
		assert_eq!(value, json!({"mailer": {}}));
	}

	#[test]
	fn test_is_empty() {
		assert!(InstanceConfig::default().is_empty());
		assert!(config(json!({})).is_empty());
		assert!(!config(json!({"disable_signup": false})).is_empty());
	}

	#[test]
	fn test_debug_redacts_secrets() {
		let cfg = config(json!({
			"jwt": {"secret": "jwt-secret-value"},
			"smtp": {"pass": "smtp-pass-value"},
			"external": {"google": {"secret": "oauth-secret-value"}},
			"webhook": {"secret": "hook-secret-value"}
		}));
		let debug = format!("{cfg:?}");
		assert!(!debug.contains("jwt-secret-value"));
		assert!(!debug.contains("smtp-pass-value"));
		assert!(!debug.contains("oauth-secret-value"));
		assert!(!debug.contains("hook-secret-value"));
		assert!(debug.contains(REDACTED));
	}

	fn arb_mailer() -> impl Strategy<Value = Option<MailerConfig>> {
		proptest::option::of(
			(
				proptest::option::of("[a-z]{1,8}@x\\.com"),
				proptest::option::of(any::<bool>()),
				proptest::option::of(proptest::option::of("[A-Za-z ]{1,16}")),
			)
				.prop_map(|(from, autoconfirm, invite)| MailerConfig {
					from,
					autoconfirm,
					subjects: invite.map(|invite| EmailContentConfig {
						invite,
						..Default::default()
					}),
					..Default::default()
				}),
		)
	}

	fn arb_webhook() -> impl Strategy<Value = Option<WebhookConfig>> {
		proptest::option::of(
			(
				proptest::option::of("https://[a-z]{1,8}\\.example"),
				proptest::option::of(0u32..10),
				proptest::collection::vec("[a-z]{1,8}", 0..4),
			)
				.prop_map(|(url, retries, events)| WebhookConfig {
					url,
					retries,
					events,
					..Default::default()
				}),
		)
	}

	fn arb_additional() -> impl Strategy<Value = Map<String, Value>> {
		proptest::collection::btree_map(
			"x_[a-z]{1,6}",
			prop_oneof![
				any::<i64>().prop_map(Value::from),
				"[a-z]{0,8}".prop_map(Value::from),
				("[a-z]{1,4}", any::<bool>()).prop_map(|(k, v)| json!({ k: v })),
			],
			0..3,
		)
		.prop_map(|entries| entries.into_iter().collect())
	}

	/// Fields touched by the first half of a disjoint pair.
	fn arb_left() -> impl Strategy<Value = InstanceConfig> {
		(proptest::option::of("https://[a-z]{1,8}\\.example"), arb_mailer()).prop_map(
			|(site_url, mailer)| InstanceConfig {
				site_url,
				mailer,
				..Default::default()
			},
		)
	}

	/// Fields touched by the second half of a disjoint pair.
	fn arb_right() -> impl Strategy<Value = InstanceConfig> {
		(
			proptest::option::of(any::<bool>()),
			arb_webhook(),
			arb_additional(),
		)
			.prop_map(|(disable_signup, webhook, additional)| InstanceConfig {
				disable_signup,
				webhook,
				additional,
				..Default::default()
			})
	}

	fn arb_config() -> impl Strategy<Value = InstanceConfig> {
		(arb_left(), arb_right()).prop_map(|(left, right)| InstanceConfig {
			disable_signup: right.disable_signup,
			webhook: right.webhook,
			additional: right.additional,
			..left
		})
	}

	proptest! {
		/// Merging an empty partial is the identity.
		#[test]
		fn merge_with_empty_is_identity(c in arb_config()) {
			prop_assert_eq!(merged(&c, &InstanceConfig::default()).unwrap(), c);
		}

		/// Merging a configuration into itself changes nothing.
		#[test]
		fn merge_is_idempotent(c in arb_config()) {
			prop_assert_eq!(merged(&c, &c).unwrap(), c);
		}

		/// Partial updates over disjoint fields commute.
		#[test]
		fn disjoint_updates_commute(
			dst in arb_config(),
			left in arb_left(),
			right in arb_right(),
		) {
			let left_then_right = merged(&dst, &left).and_then(|c| merged(&c, &right));
			let right_then_left = merged(&dst, &right).and_then(|c| merged(&c, &left));
			prop_assert_eq!(left_then_right, right_then_left);
		}

		/// Every field set in a partial update is visible afterwards.
		#[test]
		fn present_fields_win(dst in arb_config(), src in arb_left()) {
			let result = merged(&dst, &src).unwrap();
			if src.site_url.is_some() {
				prop_assert_eq!(&result.site_url, &src.site_url);
			} else {
				prop_assert_eq!(&result.site_url, &dst.site_url);
			}
			if let Some(from) = src.mailer.as_ref().and_then(|m| m.from.clone()) {
				prop_assert_eq!(result.mailer.and_then(|m| m.from), Some(from));
			}
		}
	}
}
