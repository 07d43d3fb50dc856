// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Denial observers.
//!
//! The evaluator calls an observer exactly once when a decision lands in
//! `Redirect` or `Denied`. Observers are the caller's hook for analytics; the
//! evaluator itself stores nothing.

use serde::Serialize;
use std::sync::Mutex;

use crate::decision::ReasonTag;
use crate::types::{Permission, Role, UserId};

/// Context describing a denial or redirect, handed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialContext {
	/// Path of the location being evaluated.
	pub path: String,
	pub user_id: Option<UserId>,
	pub role: Option<Role>,
	/// Required capability tags the user does not hold.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub missing_permissions: Vec<Permission>,
	/// Allowed roles, when the role check failed.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub required_roles: Vec<Role>,
	/// Message returned by a custom check.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Where the visitor is being sent, for redirects.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub redirect_target: Option<String>,
}

impl DenialContext {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			user_id: None,
			role: None,
			missing_permissions: Vec::new(),
			required_roles: Vec::new(),
			message: None,
			redirect_target: None,
		}
	}
}

/// Receives denial and redirect notifications from the evaluator.
pub trait DenialObserver {
	fn observe(&self, tag: ReasonTag, context: &DenialContext);
}

impl<F> DenialObserver for F
where
	F: Fn(ReasonTag, &DenialContext),
{
	fn observe(&self, tag: ReasonTag, context: &DenialContext) {
		self(tag, context)
	}
}

/// Emits one structured `tracing` event per denial.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DenialObserver for TracingObserver {
	fn observe(&self, tag: ReasonTag, context: &DenialContext) {
		tracing::info!(
			reason = %tag,
			path = %context.path,
			user_id = ?context.user_id,
			role = ?context.role.as_ref().map(Role::as_str),
			missing_permissions = context.missing_permissions.len(),
			redirect_target = ?context.redirect_target,
			"access not granted"
		);
	}
}

/// One observed notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialEvent {
	pub tag: ReasonTag,
	pub context: DenialContext,
}

/// Keeps every observed notification in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
	events: Mutex<Vec<DenialEvent>>,
}

impl RecordingObserver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of the events observed so far.
	pub fn events(&self) -> Vec<DenialEvent> {
		self
			.events
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.clone()
	}

	pub fn len(&self) -> usize {
		self
			.events
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl DenialObserver for RecordingObserver {
	fn observe(&self, tag: ReasonTag, context: &DenialContext) {
		self
			.events
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.push(DenialEvent {
				tag,
				context: context.clone(),
			});
	}
}
