// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Named requirement presets for common route guards.
//!
//! Presets are plain data: each one pre-fills an [`AccessRequirements`] and
//! the same evaluator does the rest.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AccessError;
use crate::requirements::AccessRequirements;

/// A named requirement bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutePreset {
	/// Anyone, signed in or not.
	Public,
	/// Any signed-in user.
	Authenticated,
	/// Signed-in administrators only.
	AdminOnly,
	/// Signed-in users with a verified email address.
	EmailVerified,
	/// Signed-in users with an active subscription.
	ActiveSubscription,
}

impl RoutePreset {
	/// Returns all presets.
	pub fn all() -> &'static [RoutePreset] {
		&[
			RoutePreset::Public,
			RoutePreset::Authenticated,
			RoutePreset::AdminOnly,
			RoutePreset::EmailVerified,
			RoutePreset::ActiveSubscription,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			RoutePreset::Public => "public",
			RoutePreset::Authenticated => "authenticated",
			RoutePreset::AdminOnly => "admin-only",
			RoutePreset::EmailVerified => "email-verified",
			RoutePreset::ActiveSubscription => "active-subscription",
		}
	}

	/// The requirement set this preset stands for.
	pub fn requirements(&self) -> AccessRequirements {
		let base = AccessRequirements::default();
		match self {
			RoutePreset::Public => base.require_auth(false),
			RoutePreset::Authenticated => base,
			RoutePreset::AdminOnly => base.require_admin(true),
			RoutePreset::EmailVerified => base.require_email_verification(true),
			RoutePreset::ActiveSubscription => base.require_subscription(true),
		}
	}

	/// Returns true if the preset sends anonymous visitors to the login page.
	pub fn requires_auth(&self) -> bool {
		!matches!(self, RoutePreset::Public)
	}
}

impl fmt::Display for RoutePreset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RoutePreset {
	type Err = AccessError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		RoutePreset::all()
			.iter()
			.copied()
			.find(|preset| preset.as_str() == s)
			.ok_or_else(|| AccessError::UnknownPreset(s.to_string()))
	}
}
