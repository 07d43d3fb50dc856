// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the NutriShop access guard.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of navigation targets and the route table
//! - Consistent environment variable naming (`NUTRISHOP_ACCESS_*`)
//!
//! # Usage
//!
//! ```ignore
//! use nutrishop_access_config::load_config;
//!
//! let config = load_config()?;
//! let guard_config = config.navigation.guard_config();
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::AccessConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use nutrishop_access::GuardConfig;
use tracing::{debug, info};

/// Fully resolved access guard configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessConfig {
	pub navigation: NavigationConfig,
	pub logging: LoggingConfig,
	pub routes: RoutesConfig,
}

impl AccessConfig {
	pub fn guard_config(&self) -> GuardConfig {
		self.navigation.guard_config()
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`NUTRISHOP_ACCESS_*`)
/// 2. Config file (`/etc/nutrishop/access.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<AccessConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<AccessConfig, ConfigError> {
	let mut merged = AccessConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<AccessConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<AccessConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = AccessConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: AccessConfigLayer) -> Result<AccessConfig, ConfigError> {
	let navigation = layer.navigation.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let routes = layer.routes.unwrap_or_default().finalize()?;

	validate_config(&navigation, &routes)?;

	info!(
		login_path = %navigation.login_path,
		upgrade_path = %navigation.upgrade_path,
		verify_email_path = %navigation.verify_email_path,
		replace_on_redirect = navigation.replace_on_redirect,
		routes = routes.table.len(),
		"access configuration loaded"
	);

	Ok(AccessConfig {
		navigation,
		logging,
		routes,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(navigation: &NavigationConfig, routes: &RoutesConfig) -> Result<(), ConfigError> {
	navigation.validate()?;

	if routes.table.guards_login(&navigation.login_path) {
		return Err(ConfigError::Validation(format!(
			"login path '{}' is routed behind a preset that requires sign-in; \
			 visitors would be redirected to it forever",
			navigation.login_path
		)));
	}

	Ok(())
}
