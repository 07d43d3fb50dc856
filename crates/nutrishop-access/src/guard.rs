// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Guard glue between the evaluator, the identity provider, and the router.
//!
//! This module provides:
//! - [`IdentityProvider`] - source of the current [`SessionSnapshot`]
//! - [`Navigator`] - the router's redirect primitive
//! - [`Guard`] - wraps a protected subtree and renders content, a fallback
//!   view, or triggers a redirect
//! - [`AccessStatus`] - hook-style result for components that branch inline
//!
//! # Render Flow
//!
//! ```text
//! snapshot ──► evaluate ──┬── Pending  → Loading
//!                         ├── Allowed  → Content(children())
//!                         ├── Denied   → Fallback(FallbackView)
//!                         └── Redirect → navigator.navigate(target, replace, from)
//! ```

use serde::Serialize;
use tracing::debug;

use crate::decision::AccessDecision;
use crate::engine::{Evaluator, DEFAULT_LOGIN_PATH};
use crate::fallback::FallbackView;
use crate::observer::DenialObserver;
use crate::presets::RoutePreset;
use crate::requirements::AccessRequirements;
use crate::types::{Location, SessionSnapshot};

/// Default page offering subscription plans.
pub const DEFAULT_UPGRADE_PATH: &str = "/pricing";

/// Default page that resends the verification email.
pub const DEFAULT_VERIFY_EMAIL_PATH: &str = "/verify-email";

/// Navigation targets and redirect behavior for a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
	pub login_path: String,
	pub upgrade_path: String,
	pub verify_email_path: String,
	/// Replace the current history entry when redirecting, so "back" does not
	/// bounce the visitor into the guard again.
	pub replace_on_redirect: bool,
}

impl Default for GuardConfig {
	fn default() -> Self {
		Self {
			login_path: DEFAULT_LOGIN_PATH.to_string(),
			upgrade_path: DEFAULT_UPGRADE_PATH.to_string(),
			verify_email_path: DEFAULT_VERIFY_EMAIL_PATH.to_string(),
			replace_on_redirect: true,
		}
	}
}

/// Source of the current session snapshot.
pub trait IdentityProvider {
	fn snapshot(&self) -> SessionSnapshot;
}

/// A fixed snapshot acts as its own provider.
impl IdentityProvider for SessionSnapshot {
	fn snapshot(&self) -> SessionSnapshot {
		self.clone()
	}
}

/// Options passed along with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigateOptions {
	/// Replace the current history entry instead of pushing a new one.
	pub replace: bool,
	/// Where the visitor was headed, for post-login return.
	pub from: Option<Location>,
}

/// The router's redirect primitive.
pub trait Navigator {
	fn navigate(&self, to: &str, options: NavigateOptions);
}

impl<F> Navigator for F
where
	F: Fn(&str, NavigateOptions),
{
	fn navigate(&self, to: &str, options: NavigateOptions) {
		self(to, options)
	}
}

/// What a guarded subtree renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
	/// Session still bootstrapping.
	Loading,
	/// The protected children.
	Content(T),
	/// A fallback view in place of the children.
	Fallback(FallbackView),
	/// A redirect was issued to `target`; render nothing.
	Redirected { target: String },
}

impl<T> GuardOutcome<T> {
	pub fn content(self) -> Option<T> {
		match self {
			GuardOutcome::Content(content) => Some(content),
			_ => None,
		}
	}
}

/// Hook-style access result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessStatus {
	pub decision: AccessDecision,
	pub is_loading: bool,
	pub has_access: bool,
}

/// Wraps protected subtrees with an access decision.
pub struct Guard<P, N> {
	provider: P,
	navigator: N,
	config: GuardConfig,
	evaluator: Evaluator,
	observer: Option<Box<dyn DenialObserver>>,
}

impl<P: IdentityProvider, N: Navigator> Guard<P, N> {
	pub fn new(provider: P, navigator: N, config: GuardConfig) -> Self {
		let evaluator = Evaluator::new(config.login_path.clone());
		Self {
			provider,
			navigator,
			config,
			evaluator,
			observer: None,
		}
	}

	/// Builder: notify `observer` of every redirect and denial this guard
	/// decides.
	pub fn with_observer(mut self, observer: impl DenialObserver + 'static) -> Self {
		self.observer = Some(Box::new(observer));
		self
	}

	pub fn config(&self) -> &GuardConfig {
		&self.config
	}

	pub fn provider(&self) -> &P {
		&self.provider
	}

	/// Decides what the subtree at `location` renders as.
	///
	/// `children` is only invoked when access is allowed. A redirect calls the
	/// navigator before returning.
	pub fn protect<T>(
		&self,
		requirements: &AccessRequirements,
		location: &Location,
		children: impl FnOnce() -> T,
	) -> GuardOutcome<T> {
		let snapshot = self.provider.snapshot();
		let decision =
			self
				.evaluator
				.evaluate_observed(&snapshot, requirements, location, self.observer.as_deref());
		debug!(path = %location.path, outcome = ?decision, "guard decided");

		match decision {
			AccessDecision::Pending => GuardOutcome::Loading,
			AccessDecision::Allowed => GuardOutcome::Content(children()),
			AccessDecision::Denied { reason, message } => GuardOutcome::Fallback(
				FallbackView::for_denial(reason, message.as_deref(), &self.config),
			),
			AccessDecision::Redirect { target, from } => {
				self.navigator.navigate(
					&target,
					NavigateOptions {
						replace: self.config.replace_on_redirect,
						from: Some(from),
					},
				);
				GuardOutcome::Redirected { target }
			}
		}
	}

	/// [`Guard::protect`] with a named preset.
	pub fn protect_preset<T>(
		&self,
		preset: RoutePreset,
		location: &Location,
		children: impl FnOnce() -> T,
	) -> GuardOutcome<T> {
		self.protect(&preset.requirements(), location, children)
	}

	/// Hook form: the same decision without navigation or observer calls.
	pub fn check(&self, requirements: &AccessRequirements, location: &Location) -> AccessStatus {
		let snapshot = self.provider.snapshot();
		let decision = self.evaluator.evaluate(&snapshot, requirements, location);
		AccessStatus {
			is_loading: decision.is_pending(),
			has_access: decision.is_allowed(),
			decision,
		}
	}
}
