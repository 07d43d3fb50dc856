// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for access evaluation.
//!
//! This module defines the read-only inputs to the guard:
//!
//! - **Tag newtypes**: [`Role`] and [`Permission`] wrap opaque strings so role
//!   tags and capability tags cannot be mixed up
//! - **Identity**: [`UserRecord`] as published by the identity provider
//! - **Session state**: [`SessionSnapshot`], one instant of the provider's view
//! - **Routing input**: [`Location`], the path being rendered plus forwarded state
//!
//! All types serialize as snake_case JSON so snapshots can be captured from the
//! storefront and replayed through the evaluator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::error::AccessError;

/// Role tag that marks a user as a storefront administrator.
pub const ADMIN_ROLE: &str = "admin";

// =============================================================================
// Identifiers
// =============================================================================

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
	/// Create a new ID from a UUID.
	pub fn new(id: Uuid) -> Self {
		Self(id)
	}

	/// Generate a new random ID.
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}

	/// Get the inner UUID value.
	pub fn into_inner(self) -> Uuid {
		self.0
	}
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<Uuid> for UserId {
	fn from(id: Uuid) -> Self {
		Self(id)
	}
}

// =============================================================================
// Tags
// =============================================================================

macro_rules! define_tag_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			/// Create a tag without validation.
			pub fn new(tag: impl Into<String>) -> Self {
				Self(tag.into())
			}

			/// Create a tag, rejecting empty or whitespace-bearing values.
			pub fn parse(tag: &str) -> Result<Self, AccessError> {
				if tag.is_empty() || tag.chars().any(char::is_whitespace) {
					return Err(AccessError::InvalidTag(tag.to_string()));
				}
				Ok(Self(tag.to_string()))
			}

			/// Borrow the tag as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(tag: &str) -> Self {
				Self(tag.to_string())
			}
		}

		impl From<String> for $name {
			fn from(tag: String) -> Self {
				Self(tag)
			}
		}

		impl std::borrow::Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
	};
}

define_tag_type!(Role, "Role tag assigned to a user (e.g. `admin`, `customer`).");
define_tag_type!(
	Permission,
	"Capability tag naming one grantable permission (e.g. `orders.read`)."
);

// =============================================================================
// Identity
// =============================================================================

/// Subscription state of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Subscription {
	#[serde(default)]
	pub active: bool,
}

/// The identity record published by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
	pub id: UserId,
	pub role: Role,
	#[serde(default)]
	pub permissions: BTreeSet<Permission>,
	#[serde(default)]
	pub subscription: Subscription,
	#[serde(default)]
	pub email_verified: bool,
}

impl UserRecord {
	/// Creates a user with the given role, no permissions, no active
	/// subscription, and an unverified email address.
	pub fn new(id: UserId, role: impl Into<Role>) -> Self {
		Self {
			id,
			role: role.into(),
			permissions: BTreeSet::new(),
			subscription: Subscription::default(),
			email_verified: false,
		}
	}

	/// Builder: grant a permission.
	pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
		self.permissions.insert(permission.into());
		self
	}

	/// Builder: grant several permissions.
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

	/// Builder: set subscription state.
	pub fn with_subscription(mut self, active: bool) -> Self {
		self.subscription.active = active;
		self
	}

	/// Builder: set email verification state.
	pub fn with_email_verified(mut self, verified: bool) -> Self {
		self.email_verified = verified;
		self
	}

	/// Returns true if the user's role is the admin role.
	pub fn is_admin(&self) -> bool {
		self.role.as_str() == ADMIN_ROLE
	}

	/// Returns true if the user holds the given capability tag.
	pub fn has_permission(&self, permission: &str) -> bool {
		self.permissions.contains(permission)
	}

	/// Returns true if the user holds every permission in `required`.
	pub fn has_all_permissions(&self, required: &BTreeSet<Permission>) -> bool {
		required.is_subset(&self.permissions)
	}

	/// Returns the permissions in `required` that the user does not hold.
	pub fn missing_permissions<'a>(&'a self, required: &'a BTreeSet<Permission>) -> Vec<&'a Permission> {
		required.difference(&self.permissions).collect()
	}
}

// =============================================================================
// Session
// =============================================================================

/// One instant of the identity provider's session state.
///
/// The default value is a provider that has not finished bootstrapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
	#[serde(default)]
	pub user: Option<UserRecord>,
	#[serde(default)]
	pub is_authenticated: bool,
	#[serde(default)]
	pub initialized: bool,
	#[serde(default)]
	pub loading: bool,
}

impl SessionSnapshot {
	/// Snapshot of a provider that is still restoring its session.
	pub fn bootstrapping() -> Self {
		Self {
			user: None,
			is_authenticated: false,
			initialized: false,
			loading: true,
		}
	}

	/// Snapshot of an initialized provider with no signed-in user.
	pub fn anonymous() -> Self {
		Self {
			user: None,
			is_authenticated: false,
			initialized: true,
			loading: false,
		}
	}

	/// Snapshot of an initialized provider with a signed-in user.
	pub fn authenticated(user: UserRecord) -> Self {
		Self {
			user: Some(user),
			is_authenticated: true,
			initialized: true,
			loading: false,
		}
	}

	/// Returns true once the provider has initialized and is not reloading.
	pub fn is_ready(&self) -> bool {
		self.initialized && !self.loading
	}

	pub fn is_admin(&self) -> bool {
		self.user.as_ref().is_some_and(UserRecord::is_admin)
	}

	pub fn email_verified(&self) -> bool {
		self.user.as_ref().is_some_and(|u| u.email_verified)
	}

	pub fn subscription_active(&self) -> bool {
		self.user.as_ref().is_some_and(|u| u.subscription.active)
	}

	/// Role of the signed-in user, if any.
	pub fn role(&self) -> Option<&Role> {
		self.user.as_ref().map(|u| &u.role)
	}
}

// =============================================================================
// Location
// =============================================================================

/// The location being rendered, as reported by the routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
	pub path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<serde_json::Value>,
}

impl Location {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			search: None,
			state: None,
		}
	}

	/// Builder: set the query string (including the leading `?`).
	pub fn with_search(mut self, search: impl Into<String>) -> Self {
		self.search = Some(search.into());
		self
	}

	/// Builder: attach forwarded navigation state.
	pub fn with_state(mut self, state: serde_json::Value) -> Self {
		self.state = Some(state);
		self
	}

	/// Path plus query string.
	pub fn href(&self) -> String {
		match &self.search {
			Some(search) => format!("{}{}", self.path, search),
			None => self.path.clone(),
		}
	}
}

impl From<&str> for Location {
	fn from(path: &str) -> Self {
		Self::new(path)
	}
}
