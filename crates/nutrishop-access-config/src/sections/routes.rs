// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route table configuration.
//!
//! A config file may replace the storefront table:
//!
//! ```toml
//! [[routes]]
//! path = "/admin/*"
//! layout = "admin"
//! preset = "admin-only"
//! ```

use nutrishop_access::{RouteEntry, RouteTable};
use serde::Deserialize;

use crate::error::ConfigError;

/// Route table configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutesConfig {
	pub table: RouteTable,
}

impl Default for RoutesConfig {
	fn default() -> Self {
		Self {
			table: RouteTable::storefront(),
		}
	}
}

/// Route table layer. A layer that names routes replaces the whole table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RoutesConfigLayer {
	pub entries: Option<Vec<RouteEntry>>,
}

impl RoutesConfigLayer {
	pub fn merge(&mut self, other: RoutesConfigLayer) {
		if other.entries.is_some() {
			self.entries = other.entries;
		}
	}

	pub fn finalize(self) -> Result<RoutesConfig, ConfigError> {
		let table = match self.entries {
			Some(entries) => RouteTable::from_entries(entries)?,
			None => RouteTable::storefront(),
		};
		Ok(RoutesConfig { table })
	}
}
