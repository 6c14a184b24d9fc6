// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file and the environment.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{ApiConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/tessera/server.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults. Section defaults are applied by `finalize`, so this
/// layer is empty.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: TESSERA_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		load_from_lookup(|name| std::env::var(name).ok())
	}
}

/// Build a layer from an arbitrary variable lookup. Empty values count as
/// unset.
fn load_from_lookup<F>(lookup: F) -> Result<ServerConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

	let port = match var("TESSERA_SERVER_PORT") {
		Some(v) => Some(parse_u16("TESSERA_SERVER_PORT", &v)?),
		None => None,
	};

	Ok(ServerConfigLayer {
		http: Some(HttpConfigLayer {
			host: var("TESSERA_SERVER_HOST"),
			port,
		}),
		database: Some(DatabaseConfigLayer {
			url: var("TESSERA_SERVER_DATABASE_URL"),
		}),
		api: Some(ApiConfigLayer {
			endpoint: var("TESSERA_SERVER_API_ENDPOINT"),
			version: var("TESSERA_SERVER_API_VERSION"),
		}),
		logging: Some(LoggingConfigLayer {
			level: var("TESSERA_SERVER_LOG_LEVEL"),
		}),
	})
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
	value.parse().map_err(|_| ConfigError::InvalidValue {
		key: key.to_string(),
		message: format!("invalid u16 value '{value}'"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/config.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[database]\nurl = \"sqlite:/tmp/t.db\"").unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(
			layer.database.unwrap().url.as_deref(),
			Some("sqlite:/tmp/t.db")
		);
	}

	#[test]
	fn test_toml_source_parse_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[http\nport = ").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_lookup_maps_variables() {
		let layer = load_from_lookup(lookup(&[
			("TESSERA_SERVER_HOST", "127.0.0.1"),
			("TESSERA_SERVER_PORT", "9090"),
			("TESSERA_SERVER_API_ENDPOINT", "https://id.example.com"),
			("TESSERA_SERVER_LOG_LEVEL", ""),
		]))
		.unwrap();

		let http = layer.http.unwrap();
		assert_eq!(http.host.as_deref(), Some("127.0.0.1"));
		assert_eq!(http.port, Some(9090));
		assert_eq!(
			layer.api.unwrap().endpoint.as_deref(),
			Some("https://id.example.com")
		);
		assert!(layer.logging.unwrap().level.is_none());
	}

	#[test]
	fn test_env_invalid_port() {
		let err = load_from_lookup(lookup(&[("TESSERA_SERVER_PORT", "http")])).unwrap_err();
		match err {
			ConfigError::InvalidValue { key, .. } => assert_eq!(key, "TESSERA_SERVER_PORT"),
			other => panic!("unexpected error: {other}"),
		}
	}
}
