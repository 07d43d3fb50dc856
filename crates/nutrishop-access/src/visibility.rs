// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conditional visibility for inline fragments.
//!
//! A [`VisibilityRule`] decides whether a fragment (a button, a menu entry)
//! renders or is suppressed. It reuses the evaluator's admin, permission, and
//! role gates and nothing else.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::engine::{run_gates, Evaluation, DEFAULT_LOGIN_PATH, VISIBILITY_GATES};
use crate::requirements::AccessRequirements;
use crate::types::{Location, Permission, Role, SessionSnapshot};

/// Render-or-suppress rule for a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRule {
	#[serde(default)]
	pub permissions: BTreeSet<Permission>,
	#[serde(default)]
	pub roles: BTreeSet<Role>,
	#[serde(default)]
	pub require_admin: bool,
	/// Flip the final answer: show the fragment to those who fail the checks.
	#[serde(default)]
	pub invert: bool,
}

impl VisibilityRule {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
		self.permissions.insert(permission.into());
		self
	}

	pub fn with_role(mut self, role: impl Into<Role>) -> Self {
		self.roles.insert(role.into());
		self
	}

	pub fn require_admin(mut self, required: bool) -> Self {
		self.require_admin = required;
		self
	}

	pub fn inverted(mut self) -> Self {
		self.invert = true;
		self
	}

	fn requirements(&self) -> AccessRequirements {
		let mut requirements = AccessRequirements::public().require_admin(self.require_admin);
		requirements.permissions = self.permissions.clone();
		requirements.roles = self.roles.clone();
		requirements
	}
}

/// Returns true if the fragment guarded by `rule` should render.
///
/// A snapshot that is not ready always suppresses the fragment, inverted or
/// not.
pub fn is_visible(snapshot: &SessionSnapshot, rule: &VisibilityRule) -> bool {
	if !snapshot.is_ready() {
		return false;
	}

	let requirements = rule.requirements();
	let location = Location::new("");
	let evaluation = Evaluation {
		snapshot,
		requirements: &requirements,
		location: &location,
		login_path: DEFAULT_LOGIN_PATH,
	};

	let passes = run_gates(VISIBILITY_GATES, &evaluation).is_none();
	passes != rule.invert
}
