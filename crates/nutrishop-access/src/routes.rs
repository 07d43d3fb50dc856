// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Declarative route table binding storefront paths to layout shells and
//! guard presets.
//!
//! Matching is deliberately small: exact paths, plus a trailing `/*` that
//! covers a section and everything beneath it. Exact entries win over
//! wildcards, and the longest wildcard prefix wins among wildcards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AccessError, Result};
use crate::presets::RoutePreset;
use crate::requirements::AccessRequirements;

/// Layout shell a page renders inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
	/// Storefront header and footer.
	Public,
	/// Signed-in account area.
	Account,
	/// Back-office shell.
	Admin,
}

impl Layout {
	pub fn as_str(&self) -> &'static str {
		match self {
			Layout::Public => "public",
			Layout::Account => "account",
			Layout::Admin => "admin",
		}
	}
}

impl fmt::Display for Layout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Layout {
	type Err = AccessError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"public" => Ok(Layout::Public),
			"account" => Ok(Layout::Account),
			"admin" => Ok(Layout::Admin),
			other => Err(AccessError::UnknownLayout(other.to_string())),
		}
	}
}

/// One route in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
	pub path: String,
	pub layout: Layout,
	pub preset: RoutePreset,
}

impl RouteEntry {
	pub fn new(path: impl Into<String>, layout: Layout, preset: RoutePreset) -> Self {
		Self {
			path: path.into(),
			layout,
			preset,
		}
	}

	fn wildcard_prefix(&self) -> Option<&str> {
		self.path.strip_suffix("/*")
	}

	fn matches(&self, path: &str) -> bool {
		match self.wildcard_prefix() {
			Some("") => true,
			Some(prefix) => {
				path == prefix
					|| path
						.strip_prefix(prefix)
						.is_some_and(|rest| rest.starts_with('/'))
			}
			None => self.path == path,
		}
	}
}

/// Ordered set of routes. Serializes as a plain list of entries; every path
/// is validated when a table is deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RouteEntry>", into = "Vec<RouteEntry>")]
pub struct RouteTable {
	entries: Vec<RouteEntry>,
}

impl RouteTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table, validating every path.
	pub fn from_entries(entries: impl IntoIterator<Item = RouteEntry>) -> Result<Self> {
		let mut table = Self::new();
		for entry in entries {
			table.insert(entry)?;
		}
		Ok(table)
	}

	/// The NutriShop storefront routes.
	pub fn storefront() -> Self {
		use Layout::{Account, Admin, Public};
		use RoutePreset::{ActiveSubscription, AdminOnly, Authenticated, EmailVerified};

		let entries = [
			("/", Public, RoutePreset::Public),
			("/products", Public, RoutePreset::Public),
			("/products/*", Public, RoutePreset::Public),
			("/cart", Public, RoutePreset::Public),
			("/login", Public, RoutePreset::Public),
			("/register", Public, RoutePreset::Public),
			("/pricing", Public, RoutePreset::Public),
			("/verify-email", Public, RoutePreset::Public),
			("/checkout", Account, Authenticated),
			("/account/*", Account, Authenticated),
			("/account/subscription/*", Account, ActiveSubscription),
			("/reviews/new", Account, EmailVerified),
			("/admin/*", Admin, AdminOnly),
		];

		Self {
			entries: entries
				.into_iter()
				.map(|(path, layout, preset)| RouteEntry::new(path, layout, preset))
				.collect(),
		}
	}

	/// Adds a route. Replaces an existing entry with the same path.
	pub fn insert(&mut self, entry: RouteEntry) -> Result<()> {
		validate_path(&entry.path)?;
		match self.entries.iter_mut().find(|e| e.path == entry.path) {
			Some(existing) => *existing = entry,
			None => self.entries.push(entry),
		}
		Ok(())
	}

	pub fn entries(&self) -> &[RouteEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Finds the route for `path`, ignoring any query string and a trailing
	/// slash.
	pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
		let path = normalize(path);

		if let Some(exact) = self
			.entries
			.iter()
			.find(|e| e.wildcard_prefix().is_none() && e.path == path)
		{
			return Some(exact);
		}

		self
			.entries
			.iter()
			.filter(|e| e.wildcard_prefix().is_some() && e.matches(path))
			.max_by_key(|e| e.path.len())
	}

	/// Requirement set guarding `path`, if the path is routed.
	pub fn requirements_for(&self, path: &str) -> Option<AccessRequirements> {
		self.resolve(path).map(|entry| entry.preset.requirements())
	}

	/// Returns true if visiting `login_path` would itself require signing in.
	pub fn guards_login(&self, login_path: &str) -> bool {
		self
			.resolve(login_path)
			.is_some_and(|entry| entry.preset.requires_auth())
	}
}

impl TryFrom<Vec<RouteEntry>> for RouteTable {
	type Error = AccessError;

	fn try_from(entries: Vec<RouteEntry>) -> Result<Self> {
		Self::from_entries(entries)
	}
}

impl From<RouteTable> for Vec<RouteEntry> {
	fn from(table: RouteTable) -> Self {
		table.entries
	}
}

fn normalize(path: &str) -> &str {
	let path = path.split(['?', '#']).next().unwrap_or(path);
	if path.len() > 1 {
		path.trim_end_matches('/')
	} else {
		path
	}
}

fn validate_path(path: &str) -> Result<()> {
	let invalid = |message: &str| AccessError::InvalidPath {
		path: path.to_string(),
		message: message.to_string(),
	};

	if !path.starts_with('/') {
		return Err(invalid("must start with '/'"));
	}

	let body = path.strip_suffix("/*").unwrap_or(path);
	if body.contains('*') {
		return Err(invalid("'*' is only allowed as a trailing '/*' segment"));
	}

	if body.len() > 1 && body.ends_with('/') {
		return Err(invalid("must not end with '/'"));
	}

	Ok(())
}
