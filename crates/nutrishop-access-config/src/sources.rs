// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::AccessConfigLayer;
use crate::sections::{LoggingConfigLayer, NavigationConfigLayer};

/// Default location of the config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/nutrishop/access.toml";

/// Merge order of a source. Variants are declared lowest first and a later
/// source overrides values set by an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults,
	ConfigFile,
	Environment,
}

/// Contributes a partial [`AccessConfigLayer`] to the merge.
pub trait ConfigSource: Send + Sync {
	/// Short label used in load logs.
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<AccessConfigLayer, ConfigError>;
}

/// Bottom of the stack. Contributes an empty layer; built-in values are
/// filled in when the merged layer is finalized.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<AccessConfigLayer, ConfigError> {
		Ok(AccessConfigLayer::default())
	}
}

/// Reads `[navigation]`, `[logging]` and `[routes]` tables from a TOML file.
/// A file that does not exist contributes nothing; any other read failure is
/// an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Source for [`SYSTEM_CONFIG_PATH`].
	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"config-file"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<AccessConfigLayer, ConfigError> {
		let content = match std::fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				debug!(path = %self.path.display(), "no config file");
				return Ok(AccessConfigLayer::default());
			}
			Err(source) => {
				return Err(ConfigError::FileRead {
					path: self.path.clone(),
					source,
				})
			}
		};

		let layer = toml::from_str::<AccessConfigLayer>(&content).map_err(|source| {
			ConfigError::TomlParse {
				path: self.path.clone(),
				source,
			}
		})?;
		trace!(path = %self.path.display(), "parsed config file");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: NUTRISHOP_ACCESS_<FIELD>. Routes are file-only.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<AccessConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(AccessConfigLayer {
			navigation: Some(load_navigation_from_env()?),
			logging: Some(load_logging_from_env()),
			routes: None,
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Result<Option<bool>, ConfigError> {
	match env_var(name) {
		Some(v) => match v.to_ascii_lowercase().as_str() {
			"true" | "1" | "yes" => Ok(Some(true)),
			"false" | "0" | "no" => Ok(Some(false)),
			_ => Err(ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid boolean value '{v}'"),
			}),
		},
		None => Ok(None),
	}
}

fn load_navigation_from_env() -> Result<NavigationConfigLayer, ConfigError> {
	Ok(NavigationConfigLayer {
		login_path: env_var("NUTRISHOP_ACCESS_LOGIN_PATH"),
		upgrade_path: env_var("NUTRISHOP_ACCESS_UPGRADE_PATH"),
		verify_email_path: env_var("NUTRISHOP_ACCESS_VERIFY_EMAIL_PATH"),
		replace_on_redirect: env_bool("NUTRISHOP_ACCESS_REPLACE_ON_REDIRECT")?,
	})
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("NUTRISHOP_ACCESS_LOG_LEVEL"),
	}
}
