// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Requirement sets attached to protected regions.
//!
//! An [`AccessRequirements`] value is built per call site, evaluated once, and
//! dropped. Everything except the custom check round-trips through serde so
//! requirement sets can live in configuration files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::types::{Location, Permission, Role, UserRecord};

fn default_true() -> bool {
	true
}

/// The declarative access conditions for one protected region.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessRequirements {
	#[serde(default = "default_true")]
	pub require_auth: bool,
	#[serde(default)]
	pub require_admin: bool,
	#[serde(default)]
	pub require_email_verification: bool,
	#[serde(default)]
	pub require_subscription: bool,
	/// All must be held.
	#[serde(default)]
	pub permissions: BTreeSet<Permission>,
	/// The user's role must be one of these. Empty means unrestricted.
	#[serde(default)]
	pub roles: BTreeSet<Role>,
	#[serde(skip)]
	pub custom_check: Option<CustomCheck>,
	/// Overrides the configured login target for this call site.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_to: Option<String>,
	/// When false, an unauthenticated visitor gets a fallback view instead of
	/// a login redirect.
	#[serde(default = "default_true")]
	pub redirect_unauthenticated: bool,
}

impl Default for AccessRequirements {
	fn default() -> Self {
		Self {
			require_auth: true,
			require_admin: false,
			require_email_verification: false,
			require_subscription: false,
			permissions: BTreeSet::new(),
			roles: BTreeSet::new(),
			custom_check: None,
			redirect_to: None,
			redirect_unauthenticated: true,
		}
	}
}

impl fmt::Debug for AccessRequirements {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AccessRequirements")
			.field("require_auth", &self.require_auth)
			.field("require_admin", &self.require_admin)
			.field("require_email_verification", &self.require_email_verification)
			.field("require_subscription", &self.require_subscription)
			.field("permissions", &self.permissions)
			.field("roles", &self.roles)
			.field("custom_check", &self.custom_check.is_some())
			.field("redirect_to", &self.redirect_to)
			.field("redirect_unauthenticated", &self.redirect_unauthenticated)
			.finish()
	}
}

impl AccessRequirements {
	/// Requirement set with every default: sign-in required, nothing else.
	pub fn new() -> Self {
		Self::default()
	}

	/// Requirement set that admits everyone, signed in or not.
	pub fn public() -> Self {
		Self::default().require_auth(false)
	}

	pub fn require_auth(mut self, required: bool) -> Self {
		self.require_auth = required;
		self
	}

	pub fn require_admin(mut self, required: bool) -> Self {
		self.require_admin = required;
		self
	}

	pub fn require_email_verification(mut self, required: bool) -> Self {
		self.require_email_verification = required;
		self
	}

	pub fn require_subscription(mut self, required: bool) -> Self {
		self.require_subscription = required;
		self
	}

	pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
		self.permissions.insert(permission.into());
		self
	}

	pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<Permission>,
	{
		self
			.permissions
			.extend(permissions.into_iter().map(Into::into));
		self
	}

	pub fn with_role(mut self, role: impl Into<Role>) -> Self {
		self.roles.insert(role.into());
		self
	}

	pub fn with_roles<I, R>(mut self, roles: I) -> Self
	where
		I: IntoIterator<Item = R>,
		R: Into<Role>,
	{
		self.roles.extend(roles.into_iter().map(Into::into));
		self
	}

	pub fn with_custom_check(mut self, check: CustomCheck) -> Self {
		self.custom_check = Some(check);
		self
	}

	/// Builder: send unauthenticated visitors to `target` instead of the
	/// configured login path.
	pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
		self.redirect_to = Some(target.into());
		self
	}

	/// Builder: show the sign-in fallback view instead of redirecting.
	pub fn fallback_on_unauthenticated(mut self) -> Self {
		self.redirect_unauthenticated = false;
		self
	}
}

/// Signature of a custom access predicate.
pub type CustomCheckFn = dyn Fn(Option<&UserRecord>, &Location) -> CustomCheckResult + Send + Sync;

/// A shared custom predicate over the current user and location.
#[derive(Clone)]
pub struct CustomCheck(Arc<CustomCheckFn>);

impl CustomCheck {
	/// Wraps a predicate whose result converts into a [`CustomCheckResult`]
	/// (`bool`, `String`, `&str`, or `Option<String>`).
	pub fn new<F, R>(check: F) -> Self
	where
		F: Fn(Option<&UserRecord>, &Location) -> R + Send + Sync + 'static,
		R: Into<CustomCheckResult>,
	{
		let inner: Arc<CustomCheckFn> =
			Arc::new(move |user: Option<&UserRecord>, location: &Location| -> CustomCheckResult {
				check(user, location).into()
			});
		Self(inner)
	}

	/// Wraps a predicate that returns loosely typed JSON, as produced by
	/// scripted checks. See [`CustomCheckResult::from_json`].
	pub fn from_json_fn<F>(check: F) -> Self
	where
		F: Fn(Option<&UserRecord>, &Location) -> serde_json::Value + Send + Sync + 'static,
	{
		Self::new(move |user: Option<&UserRecord>, location: &Location| {
			CustomCheckResult::from_json(&check(user, location))
		})
	}

	pub fn run(&self, user: Option<&UserRecord>, location: &Location) -> CustomCheckResult {
		(self.0)(user, location)
	}
}

impl fmt::Debug for CustomCheck {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("CustomCheck(..)")
	}
}

/// Result of a custom check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomCheckResult {
	Allow,
	/// Denied with the generic message.
	Deny,
	/// Denied with a human-readable message for the fallback view.
	DenyWithMessage(String),
}

impl CustomCheckResult {
	/// Interprets a loosely typed result: `true` allows, a string denies with
	/// that message, and anything else (`false`, numbers, objects, null) denies
	/// with the generic message.
	pub fn from_json(value: &serde_json::Value) -> Self {
		match value {
			serde_json::Value::Bool(true) => Self::Allow,
			serde_json::Value::String(message) => Self::DenyWithMessage(message.clone()),
			_ => Self::Deny,
		}
	}

	pub fn is_allow(&self) -> bool {
		matches!(self, Self::Allow)
	}

	/// The denial message, if one was given.
	pub fn message(&self) -> Option<&str> {
		match self {
			Self::DenyWithMessage(message) => Some(message),
			_ => None,
		}
	}
}

impl From<bool> for CustomCheckResult {
	fn from(allowed: bool) -> Self {
		if allowed {
			Self::Allow
		} else {
			Self::Deny
		}
	}
}

impl From<String> for CustomCheckResult {
	fn from(message: String) -> Self {
		Self::DenyWithMessage(message)
	}
}

impl From<&str> for CustomCheckResult {
	fn from(message: &str) -> Self {
		Self::DenyWithMessage(message.to_string())
	}
}

/// `None` allows; `Some(message)` denies with that message.
impl From<Option<String>> for CustomCheckResult {
	fn from(denial: Option<String>) -> Self {
		match denial {
			None => Self::Allow,
			Some(message) => Self::DenyWithMessage(message),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	mod requirements {
		use super::*;

		#[test]
		fn defaults_require_only_auth() {
			let req = AccessRequirements::default();
			assert!(req.require_auth);
			assert!(!req.require_admin);
			assert!(!req.require_email_verification);
			assert!(!req.require_subscription);
			assert!(req.permissions.is_empty());
			assert!(req.roles.is_empty());
			assert!(req.custom_check.is_none());
			assert!(req.redirect_unauthenticated);
		}

		#[test]
		fn builder_collects_tags() {
			let req = AccessRequirements::new()
				.with_permissions(["orders.read", "orders.write"])
				.with_role("staff")
				.with_roles(["admin"]);
			assert_eq!(req.permissions.len(), 2);
			assert!(req.roles.contains("staff"));
			assert!(req.roles.contains("admin"));
		}

		#[test]
		fn deserializes_with_defaults() {
			let req: AccessRequirements =
				serde_json::from_str(r#"{"permissions":["orders.read"]}"#).unwrap();
			assert!(req.require_auth);
			assert!(req.redirect_unauthenticated);
			assert!(req.permissions.contains("orders.read"));
		}

		#[test]
		fn public_does_not_require_auth() {
			assert!(!AccessRequirements::public().require_auth);
		}

		#[test]
		fn debug_hides_custom_check_body() {
			let req = AccessRequirements::new().with_custom_check(CustomCheck::new(|_, _| true));
			let debug = format!("{req:?}");
			assert!(debug.contains("custom_check: true"));
		}
	}

	mod custom_check {
		use super::*;

		#[test]
		fn bool_results_convert() {
			let allow = CustomCheck::new(|_, _| true);
			let deny = CustomCheck::new(|_, _| false);
			let location = Location::new("/");
			assert_eq!(allow.run(None, &location), CustomCheckResult::Allow);
			assert_eq!(deny.run(None, &location), CustomCheckResult::Deny);
		}

		#[test]
		fn string_result_is_denial_message() {
			let check = CustomCheck::new(|_, location: &Location| format!("{} is closed", location.path));
			assert_eq!(
				check.run(None, &Location::new("/sale")),
				CustomCheckResult::DenyWithMessage("/sale is closed".to_string())
			);
		}

		#[test]
		fn option_none_allows() {
			let check = CustomCheck::new(|_, _| None::<String>);
			assert!(check.run(None, &Location::new("/")).is_allow());
		}

		#[test]
		fn json_results_follow_contract() {
			assert_eq!(CustomCheckResult::from_json(&json!(true)), CustomCheckResult::Allow);
			assert_eq!(CustomCheckResult::from_json(&json!(false)), CustomCheckResult::Deny);
			assert_eq!(
				CustomCheckResult::from_json(&json!("Store closed")),
				CustomCheckResult::DenyWithMessage("Store closed".to_string())
			);
			assert_eq!(CustomCheckResult::from_json(&json!(1)), CustomCheckResult::Deny);
			assert_eq!(
				CustomCheckResult::from_json(&json!({"ok": true})),
				CustomCheckResult::Deny
			);
			assert_eq!(CustomCheckResult::from_json(&json!(null)), CustomCheckResult::Deny);
		}

		#[test]
		fn json_fn_wraps_loose_results() {
			let check = CustomCheck::from_json_fn(|_, _| json!({"truthy": "object"}));
			assert_eq!(check.run(None, &Location::new("/")), CustomCheckResult::Deny);
		}
	}
}
