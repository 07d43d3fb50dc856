// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Navigation targets used by the guard.

use nutrishop_access::{GuardConfig, DEFAULT_LOGIN_PATH, DEFAULT_UPGRADE_PATH, DEFAULT_VERIFY_EMAIL_PATH};
use serde::Deserialize;

use crate::error::ConfigError;

/// Navigation configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationConfig {
	pub login_path: String,
	pub upgrade_path: String,
	pub verify_email_path: String,
	pub replace_on_redirect: bool,
}

impl Default for NavigationConfig {
	fn default() -> Self {
		NavigationConfigLayer::default().finalize()
	}
}

impl NavigationConfig {
	/// Guard settings for these navigation targets.
	pub fn guard_config(&self) -> GuardConfig {
		GuardConfig {
			login_path: self.login_path.clone(),
			upgrade_path: self.upgrade_path.clone(),
			verify_email_path: self.verify_email_path.clone(),
			replace_on_redirect: self.replace_on_redirect,
		}
	}

	/// Every target must be an absolute path.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (key, value) in [
			("navigation.login_path", &self.login_path),
			("navigation.upgrade_path", &self.upgrade_path),
			("navigation.verify_email_path", &self.verify_email_path),
		] {
			if !value.starts_with('/') {
				return Err(ConfigError::InvalidValue {
					key: key.to_string(),
					message: format!("'{value}' must start with '/'"),
				});
			}
		}
		Ok(())
	}
}

/// Navigation configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavigationConfigLayer {
	#[serde(default)]
	pub login_path: Option<String>,
	#[serde(default)]
	pub upgrade_path: Option<String>,
	#[serde(default)]
	pub verify_email_path: Option<String>,
	#[serde(default)]
	pub replace_on_redirect: Option<bool>,
}

impl NavigationConfigLayer {
	pub fn merge(&mut self, other: NavigationConfigLayer) {
		if other.login_path.is_some() {
			self.login_path = other.login_path;
		}
		if other.upgrade_path.is_some() {
			self.upgrade_path = other.upgrade_path;
		}
		if other.verify_email_path.is_some() {
			self.verify_email_path = other.verify_email_path;
		}
		if other.replace_on_redirect.is_some() {
			self.replace_on_redirect = other.replace_on_redirect;
		}
	}

	pub fn finalize(self) -> NavigationConfig {
		NavigationConfig {
			login_path: self
				.login_path
				.unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
			upgrade_path: self
				.upgrade_path
				.unwrap_or_else(|| DEFAULT_UPGRADE_PATH.to_string()),
			verify_email_path: self
				.verify_email_path
				.unwrap_or_else(|| DEFAULT_VERIFY_EMAIL_PATH.to_string()),
			replace_on_redirect: self.replace_on_redirect.unwrap_or(true),
		}
	}
}
