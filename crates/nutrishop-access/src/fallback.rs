// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fallback views shown in place of protected content.

use serde::Serialize;

use crate::decision::DenialReason;
use crate::guard::GuardConfig;

/// A way out of a denial, such as an upgrade page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryAction {
	pub label: String,
	pub target: String,
}

/// What to render when access is denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackView {
	pub reason: DenialReason,
	pub title: String,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub recovery: Option<RecoveryAction>,
}

impl FallbackView {
	/// Builds the fallback view for `reason`. A custom-check message replaces
	/// the default body text.
	pub fn for_denial(reason: DenialReason, custom_message: Option<&str>, config: &GuardConfig) -> Self {
		let (title, message) = default_copy(reason);
		let message = custom_message.map(str::to_string).unwrap_or_else(|| message.to_string());

		Self {
			reason,
			title: title.to_string(),
			message,
			recovery: recovery_for(reason, config),
		}
	}

	pub fn is_recoverable(&self) -> bool {
		self.recovery.is_some()
	}
}

fn default_copy(reason: DenialReason) -> (&'static str, &'static str) {
	match reason {
		DenialReason::Authentication => (
			"Sign in required",
			"Please sign in to continue.",
		),
		DenialReason::Admin => (
			"Admin access required",
			"This area is only available to store administrators.",
		),
		DenialReason::Verification => (
			"Email verification required",
			"Please verify your email address to continue.",
		),
		DenialReason::Subscription => (
			"Active subscription required",
			"This feature is part of a NutriShop subscription.",
		),
		DenialReason::Permissions => (
			"Insufficient permissions",
			"Your account does not have the permissions needed for this page.",
		),
		DenialReason::Role => (
			"Access restricted",
			"Your account role does not have access to this page.",
		),
		DenialReason::Custom => ("Access denied", "You do not have access to this page."),
	}
}

fn recovery_for(reason: DenialReason, config: &GuardConfig) -> Option<RecoveryAction> {
	let (label, target) = match reason {
		DenialReason::Authentication => ("Sign in", &config.login_path),
		DenialReason::Verification => ("Verify email", &config.verify_email_path),
		DenialReason::Subscription => ("View plans", &config.upgrade_path),
		DenialReason::Admin | DenialReason::Permissions | DenialReason::Role | DenialReason::Custom => {
			return None;
		}
	};

	Some(RecoveryAction {
		label: label.to_string(),
		target: target.clone(),
	})
}
