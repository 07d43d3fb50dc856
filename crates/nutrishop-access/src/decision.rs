// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decision results produced by the evaluator.
//!
//! The taxonomy is closed: a decision is [`AccessDecision::Pending`] while the
//! identity provider bootstraps, otherwise one of the terminal states
//! `Redirect`, `Denied`, or `Allowed`.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AccessError;
use crate::types::Location;

/// Outcome of evaluating a requirement set against a session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccessDecision {
	/// The snapshot is not trustworthy yet; render nothing and re-evaluate.
	Pending,
	/// Send the visitor to `target`, remembering where they came from.
	Redirect { target: String, from: Location },
	/// Render a fallback view for `reason`.
	Denied {
		reason: DenialReason,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	/// Render the protected content.
	Allowed,
}

impl AccessDecision {
	pub(crate) fn denied(reason: DenialReason) -> Self {
		Self::Denied {
			reason,
			message: None,
		}
	}

	/// Returns true for every state except [`AccessDecision::Pending`].
	pub fn is_terminal(&self) -> bool {
		!matches!(self, Self::Pending)
	}

	pub fn is_pending(&self) -> bool {
		matches!(self, Self::Pending)
	}

	pub fn is_allowed(&self) -> bool {
		matches!(self, Self::Allowed)
	}

	/// The denial reason, if this decision is a denial.
	pub fn denial_reason(&self) -> Option<DenialReason> {
		match self {
			Self::Denied { reason, .. } => Some(*reason),
			_ => None,
		}
	}

	/// The tag passed to denial observers, if this decision notifies them.
	pub fn reason_tag(&self) -> Option<ReasonTag> {
		match self {
			Self::Redirect { .. } => Some(ReasonTag::Redirect),
			Self::Denied { reason, .. } => Some(ReasonTag::Denied(*reason)),
			Self::Pending | Self::Allowed => None,
		}
	}
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
	/// Visitor is not signed in and the call site asked for a fallback
	/// instead of a login redirect.
	Authentication,
	/// Admin role required.
	Admin,
	/// Verified email address required.
	Verification,
	/// Active subscription required.
	Subscription,
	/// At least one required capability tag is missing.
	Permissions,
	/// User's role is not in the allowed set.
	Role,
	/// The call site's custom check rejected the visitor.
	Custom,
}

impl DenialReason {
	/// Returns all denial reasons in evaluation order.
	pub fn all() -> &'static [DenialReason] {
		&[
			DenialReason::Authentication,
			DenialReason::Admin,
			DenialReason::Verification,
			DenialReason::Subscription,
			DenialReason::Permissions,
			DenialReason::Role,
			DenialReason::Custom,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			DenialReason::Authentication => "authentication",
			DenialReason::Admin => "admin",
			DenialReason::Verification => "verification",
			DenialReason::Subscription => "subscription",
			DenialReason::Permissions => "permissions",
			DenialReason::Role => "role",
			DenialReason::Custom => "custom",
		}
	}
}

impl fmt::Display for DenialReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DenialReason {
	type Err = AccessError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		DenialReason::all()
			.iter()
			.copied()
			.find(|reason| reason.as_str() == s)
			.ok_or_else(|| AccessError::UnknownReason(s.to_string()))
	}
}

/// Tag handed to a denial observer when a decision becomes terminal without
/// granting access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonTag {
	Redirect,
	Denied(DenialReason),
}

impl fmt::Display for ReasonTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ReasonTag::Redirect => f.write_str("redirect"),
			ReasonTag::Denied(reason) => fmt::Display::fmt(reason, f),
		}
	}
}

impl Serialize for ReasonTag {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}
