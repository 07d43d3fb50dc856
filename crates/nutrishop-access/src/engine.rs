// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access decision evaluator.
//!
//! [`evaluate`] runs a requirement set against a session snapshot by walking
//! an ordered table of gates. Each gate either passes or yields the decision
//! for the whole evaluation; the first gate that yields wins:
//!
//! 1. **Readiness**: provider not initialized or reloading → `Pending`
//! 2. **Authentication**: sign-in required and absent → `Redirect` (or
//!    `Denied(authentication)` when the call site opts out of redirects)
//! 3. **Admin**, 4. **Verification**, 5. **Subscription**
//! 6. **Permissions**: conjunctive over the requested capability tags
//! 7. **Roles**: user's role must be in the set; empty set is unrestricted
//! 8. **Custom**: the call site's predicate
//!
//! Evaluation is pure and emits no logs of its own. The only side effect is
//! the optional [`DenialObserver`] notification when the result is a redirect
//! or denial; callers that want diagnostics pass [`TracingObserver`].
//!
//! [`TracingObserver`]: crate::observer::TracingObserver

use crate::decision::{AccessDecision, DenialReason};
use crate::observer::{DenialContext, DenialObserver};
use crate::requirements::{AccessRequirements, CustomCheckResult};
use crate::types::{Location, SessionSnapshot};

/// Login path used when neither the evaluator nor the call site names one.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Inputs visible to every gate.
pub(crate) struct Evaluation<'a> {
	pub snapshot: &'a SessionSnapshot,
	pub requirements: &'a AccessRequirements,
	pub location: &'a Location,
	pub login_path: &'a str,
}

pub(crate) type Gate = fn(&Evaluation<'_>) -> Option<AccessDecision>;

/// Gates in evaluation order. Readiness must stay first so a bootstrapping
/// session never produces a redirect or denial.
const GATES: &[Gate] = &[
	check_readiness,
	check_authentication,
	check_admin,
	check_verification,
	check_subscription,
	check_permissions,
	check_roles,
	check_custom,
];

/// Gates applied by conditional visibility. Sign-in, verification, and
/// subscription never hide a fragment.
pub(crate) const VISIBILITY_GATES: &[Gate] = &[check_admin, check_permissions, check_roles];

/// Evaluates a requirement set with the default login path.
///
/// See [`Evaluator::evaluate`].
pub fn evaluate(
	snapshot: &SessionSnapshot,
	requirements: &AccessRequirements,
	location: &Location,
) -> AccessDecision {
	Evaluator::default().evaluate(snapshot, requirements, location)
}

/// Evaluates a requirement set with the default login path, notifying
/// `observer` on redirects and denials.
pub fn evaluate_observed(
	snapshot: &SessionSnapshot,
	requirements: &AccessRequirements,
	location: &Location,
	observer: Option<&dyn DenialObserver>,
) -> AccessDecision {
	Evaluator::default().evaluate_observed(snapshot, requirements, location, observer)
}

/// Evaluator bound to a configured login path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluator {
	login_path: String,
}

impl Default for Evaluator {
	fn default() -> Self {
		Self::new(DEFAULT_LOGIN_PATH)
	}
}

impl Evaluator {
	pub fn new(login_path: impl Into<String>) -> Self {
		Self {
			login_path: login_path.into(),
		}
	}

	pub fn login_path(&self) -> &str {
		&self.login_path
	}

	/// Evaluates `requirements` against `snapshot` at `location`.
	///
	/// Never fails: every unmet condition maps to a terminal decision, and a
	/// snapshot that is not ready yet maps to [`AccessDecision::Pending`].
	pub fn evaluate(
		&self,
		snapshot: &SessionSnapshot,
		requirements: &AccessRequirements,
		location: &Location,
	) -> AccessDecision {
		self.evaluate_observed(snapshot, requirements, location, None)
	}

	/// Like [`Evaluator::evaluate`], notifying `observer` once if the decision
	/// is a redirect or a denial.
	pub fn evaluate_observed(
		&self,
		snapshot: &SessionSnapshot,
		requirements: &AccessRequirements,
		location: &Location,
		observer: Option<&dyn DenialObserver>,
	) -> AccessDecision {
		let evaluation = Evaluation {
			snapshot,
			requirements,
			location,
			login_path: &self.login_path,
		};

		let decision = run_gates(GATES, &evaluation).unwrap_or(AccessDecision::Allowed);

		if let (Some(observer), Some(tag)) = (observer, decision.reason_tag()) {
			observer.observe(tag, &denial_context(&evaluation, &decision));
		}

		decision
	}
}

/// Runs `gates` in order, returning the first decision a gate yields.
pub(crate) fn run_gates(gates: &[Gate], evaluation: &Evaluation<'_>) -> Option<AccessDecision> {
	gates.iter().find_map(|gate| gate(evaluation))
}

fn check_readiness(e: &Evaluation<'_>) -> Option<AccessDecision> {
	(!e.snapshot.is_ready()).then_some(AccessDecision::Pending)
}

/// A snapshot flagged authenticated but carrying no user record is treated as
/// signed out.
fn check_authentication(e: &Evaluation<'_>) -> Option<AccessDecision> {
	let signed_in = e.snapshot.is_authenticated && e.snapshot.user.is_some();
	if !e.requirements.require_auth || signed_in {
		return None;
	}

	if !e.requirements.redirect_unauthenticated {
		return Some(AccessDecision::denied(DenialReason::Authentication));
	}

	let target = e
		.requirements
		.redirect_to
		.clone()
		.unwrap_or_else(|| e.login_path.to_string());

	Some(AccessDecision::Redirect {
		target,
		from: e.location.clone(),
	})
}

fn check_admin(e: &Evaluation<'_>) -> Option<AccessDecision> {
	(e.requirements.require_admin && !e.snapshot.is_admin())
		.then(|| AccessDecision::denied(DenialReason::Admin))
}

fn check_verification(e: &Evaluation<'_>) -> Option<AccessDecision> {
	(e.requirements.require_email_verification && !e.snapshot.email_verified())
		.then(|| AccessDecision::denied(DenialReason::Verification))
}

fn check_subscription(e: &Evaluation<'_>) -> Option<AccessDecision> {
	(e.requirements.require_subscription && !e.snapshot.subscription_active())
		.then(|| AccessDecision::denied(DenialReason::Subscription))
}

fn check_permissions(e: &Evaluation<'_>) -> Option<AccessDecision> {
	let required = &e.requirements.permissions;
	if required.is_empty() {
		return None;
	}

	let held = e
		.snapshot
		.user
		.as_ref()
		.is_some_and(|user| user.has_all_permissions(required));

	(!held).then(|| AccessDecision::denied(DenialReason::Permissions))
}

fn check_roles(e: &Evaluation<'_>) -> Option<AccessDecision> {
	let allowed = &e.requirements.roles;
	if allowed.is_empty() {
		return None;
	}

	let member = e.snapshot.role().is_some_and(|role| allowed.contains(role));

	(!member).then(|| AccessDecision::denied(DenialReason::Role))
}

fn check_custom(e: &Evaluation<'_>) -> Option<AccessDecision> {
	let check = e.requirements.custom_check.as_ref()?;

	match check.run(e.snapshot.user.as_ref(), e.location) {
		CustomCheckResult::Allow => None,
		CustomCheckResult::Deny => Some(AccessDecision::denied(DenialReason::Custom)),
		CustomCheckResult::DenyWithMessage(message) => Some(AccessDecision::Denied {
			reason: DenialReason::Custom,
			message: Some(message),
		}),
	}
}

/// Builds the observer context for a redirect or denial.
fn denial_context(e: &Evaluation<'_>, decision: &AccessDecision) -> DenialContext {
	let user = e.snapshot.user.as_ref();
	let mut context = DenialContext::new(e.location.path.clone());
	context.user_id = user.map(|u| u.id);
	context.role = user.map(|u| u.role.clone());

	match decision {
		AccessDecision::Redirect { target, .. } => {
			context.redirect_target = Some(target.clone());
		}
		AccessDecision::Denied {
			reason: DenialReason::Permissions,
			..
		} => {
			context.missing_permissions = match user {
				Some(user) => user
					.missing_permissions(&e.requirements.permissions)
					.into_iter()
					.cloned()
					.collect(),
				None => e.requirements.permissions.iter().cloned().collect(),
			};
		}
		AccessDecision::Denied {
			reason: DenialReason::Role,
			..
		} => {
			context.required_roles = e.requirements.roles.iter().cloned().collect();
		}
		AccessDecision::Denied { message, .. } => {
			context.message = message.clone();
		}
		AccessDecision::Pending | AccessDecision::Allowed => {}
	}

	context
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::decision::ReasonTag;
	use crate::observer::RecordingObserver;
	use crate::requirements::CustomCheck;
	use crate::types::{UserId, UserRecord, ADMIN_ROLE};

	fn customer() -> UserRecord {
		UserRecord::new(UserId::generate(), "customer")
	}

	fn admin() -> UserRecord {
		UserRecord::new(UserId::generate(), ADMIN_ROLE)
	}

	fn at(path: &str) -> Location {
		Location::new(path)
	}

	mod readiness {
		use super::*;

		#[test]
		fn uninitialized_is_pending() {
			let decision = evaluate(
				&SessionSnapshot::bootstrapping(),
				&AccessRequirements::default(),
				&at("/checkout"),
			);
			assert_eq!(decision, AccessDecision::Pending);
		}

		#[test]
		fn loading_is_pending_even_when_authenticated() {
			let mut snapshot = SessionSnapshot::authenticated(admin());
			snapshot.loading = true;
			let decision = evaluate(&snapshot, &AccessRequirements::public(), &at("/"));
			assert_eq!(decision, AccessDecision::Pending);
		}

		#[test]
		fn pending_does_not_notify_observer() {
			let observer = RecordingObserver::new();
			evaluate_observed(
				&SessionSnapshot::bootstrapping(),
				&AccessRequirements::default(),
				&at("/checkout"),
				Some(&observer),
			);
			assert!(observer.is_empty());
		}
	}

	mod authentication {
		use super::*;

		#[test]
		fn anonymous_redirects_to_login_with_origin() {
			let location = at("/checkout").with_search("?step=2");
			let decision = evaluate(
				&SessionSnapshot::anonymous(),
				&AccessRequirements::default(),
				&location,
			);
			assert_eq!(
				decision,
				AccessDecision::Redirect {
					target: "/login".to_string(),
					from: location,
				}
			);
		}

		#[test]
		fn configured_login_path_is_used() {
			let evaluator = Evaluator::new("/sign-in");
			let decision = evaluator.evaluate(
				&SessionSnapshot::anonymous(),
				&AccessRequirements::default(),
				&at("/cart"),
			);
			assert!(matches!(decision, AccessDecision::Redirect { target, .. } if target == "/sign-in"));
		}

		#[test]
		fn call_site_redirect_overrides_login_path() {
			let requirements = AccessRequirements::default().redirect_to("/register");
			let decision = evaluate(&SessionSnapshot::anonymous(), &requirements, &at("/cart"));
			assert!(matches!(decision, AccessDecision::Redirect { target, .. } if target == "/register"));
		}

		#[test]
		fn fallback_mode_denies_with_authentication() {
			let requirements = AccessRequirements::default().fallback_on_unauthenticated();
			let decision = evaluate(&SessionSnapshot::anonymous(), &requirements, &at("/cart"));
			assert_eq!(decision.denial_reason(), Some(DenialReason::Authentication));
		}

		#[test]
		fn public_requirements_allow_anonymous() {
			let decision = evaluate(
				&SessionSnapshot::anonymous(),
				&AccessRequirements::public(),
				&at("/products"),
			);
			assert_eq!(decision, AccessDecision::Allowed);
		}

		#[test]
		fn authenticated_flag_without_user_redirects() {
			let snapshot = SessionSnapshot {
				user: None,
				is_authenticated: true,
				initialized: true,
				loading: false,
			};
			let decision = evaluate(&snapshot, &AccessRequirements::default(), &at("/checkout"));
			assert_eq!(
				decision,
				AccessDecision::Redirect {
					target: "/login".to_string(),
					from: at("/checkout"),
				}
			);

			let requirements = AccessRequirements::default().fallback_on_unauthenticated();
			let decision = evaluate(&snapshot, &requirements, &at("/checkout"));
			assert_eq!(decision.denial_reason(), Some(DenialReason::Authentication));
		}

		#[test]
		fn authenticated_flag_without_user_passes_public_requirements() {
			let snapshot = SessionSnapshot {
				user: None,
				is_authenticated: true,
				initialized: true,
				loading: false,
			};
			assert!(evaluate(&snapshot, &AccessRequirements::public(), &at("/")).is_allowed());
		}

		#[test]
		fn default_requirements_allow_signed_in_user() {
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer()),
				&AccessRequirements::default(),
				&at("/account"),
			);
			assert_eq!(decision, AccessDecision::Allowed);
		}
	}

	mod gates {
		use super::*;

		#[test]
		fn non_admin_is_denied_admin() {
			let requirements = AccessRequirements::default().require_admin(true);
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer()),
				&requirements,
				&at("/admin"),
			);
			assert_eq!(decision.denial_reason(), Some(DenialReason::Admin));
		}

		#[test]
		fn unverified_email_is_denied_verification() {
			let requirements = AccessRequirements::default().require_email_verification(true);
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer()),
				&requirements,
				&at("/reviews/new"),
			);
			assert_eq!(decision.denial_reason(), Some(DenialReason::Verification));
		}

		#[test]
		fn inactive_subscription_is_denied_subscription() {
			let requirements = AccessRequirements::default().require_subscription(true);
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer().with_email_verified(true)),
				&requirements,
				&at("/account/subscription/meals"),
			);
			assert_eq!(decision.denial_reason(), Some(DenialReason::Subscription));
		}

		#[test]
		fn missing_permission_is_denied_permissions() {
			let requirements =
				AccessRequirements::default().with_permissions(["orders.read", "orders.write"]);
			let user = customer().with_permission("orders.read");
			let decision = evaluate(
				&SessionSnapshot::authenticated(user),
				&requirements,
				&at("/admin/orders"),
			);
			assert_eq!(decision.denial_reason(), Some(DenialReason::Permissions));
		}

		#[test]
		fn superset_of_permissions_is_allowed() {
			let requirements = AccessRequirements::default().with_permission("orders.read");
			let user = customer().with_permissions(["orders.read", "orders.write"]);
			let decision = evaluate(
				&SessionSnapshot::authenticated(user),
				&requirements,
				&at("/orders"),
			);
			assert_eq!(decision, AccessDecision::Allowed);
		}

		#[test]
		fn role_outside_set_is_denied_role() {
			let requirements = AccessRequirements::default().with_roles(["staff", "admin"]);
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer()),
				&requirements,
				&at("/staff"),
			);
			assert_eq!(decision.denial_reason(), Some(DenialReason::Role));
		}

		#[test]
		fn role_inside_set_is_allowed() {
			let requirements = AccessRequirements::default().with_roles(["staff", "customer"]);
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer()),
				&requirements,
				&at("/staff"),
			);
			assert_eq!(decision, AccessDecision::Allowed);
		}

		#[test]
		fn public_permission_check_without_user_denies() {
			let requirements = AccessRequirements::public().with_permission("catalog.preview");
			let decision = evaluate(&SessionSnapshot::anonymous(), &requirements, &at("/preview"));
			assert_eq!(decision.denial_reason(), Some(DenialReason::Permissions));
		}

		#[test]
		fn admin_is_checked_before_permissions() {
			let requirements = AccessRequirements::default()
				.require_admin(true)
				.with_permission("orders.write");
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer()),
				&requirements,
				&at("/admin/orders"),
			);
			assert_eq!(decision.denial_reason(), Some(DenialReason::Admin));
		}
	}

	mod custom {
		use super::*;

		#[test]
		fn custom_message_is_carried() {
			let requirements = AccessRequirements::default()
				.with_custom_check(CustomCheck::new(|_, _| "Checkout is closed for maintenance"));
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer()),
				&requirements,
				&at("/checkout"),
			);
			assert_eq!(
				decision,
				AccessDecision::Denied {
					reason: DenialReason::Custom,
					message: Some("Checkout is closed for maintenance".to_string()),
				}
			);
		}

		#[test]
		fn custom_false_denies_without_message() {
			let requirements =
				AccessRequirements::default().with_custom_check(CustomCheck::new(|_, _| false));
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer()),
				&requirements,
				&at("/checkout"),
			);
			assert_eq!(decision, AccessDecision::denied(DenialReason::Custom));
		}

		#[test]
		fn custom_check_sees_user_and_location() {
			let requirements = AccessRequirements::default().with_custom_check(CustomCheck::new(
				|user: Option<&UserRecord>, location: &Location| {
					user.is_some_and(|u| u.email_verified) && location.path.starts_with("/account")
				},
			));
			let snapshot = SessionSnapshot::authenticated(customer().with_email_verified(true));

			assert!(evaluate(&snapshot, &requirements, &at("/account/orders")).is_allowed());
			assert!(!evaluate(&snapshot, &requirements, &at("/checkout")).is_allowed());
		}

		#[test]
		fn custom_check_not_run_when_earlier_gate_fails() {
			let requirements = AccessRequirements::default()
				.require_admin(true)
				.with_custom_check(CustomCheck::new(|_, _| -> bool {
					panic!("custom check must not run")
				}));
			let decision = evaluate(
				&SessionSnapshot::authenticated(customer()),
				&requirements,
				&at("/admin"),
			);
			assert_eq!(decision.denial_reason(), Some(DenialReason::Admin));
		}
	}

	mod observer {
		use super::*;

		#[test]
		fn redirect_notifies_with_target() {
			let observer = RecordingObserver::new();
			evaluate_observed(
				&SessionSnapshot::anonymous(),
				&AccessRequirements::default(),
				&at("/checkout"),
				Some(&observer),
			);

			let events = observer.events();
			assert_eq!(events.len(), 1);
			assert_eq!(events[0].tag, ReasonTag::Redirect);
			assert_eq!(events[0].context.path, "/checkout");
			assert_eq!(events[0].context.redirect_target.as_deref(), Some("/login"));
		}

		#[test]
		fn permission_denial_lists_missing_tags() {
			let observer = RecordingObserver::new();
			let user = customer().with_permission("orders.read");
			let user_id = user.id;
			evaluate_observed(
				&SessionSnapshot::authenticated(user),
				&AccessRequirements::default().with_permissions(["orders.read", "orders.write"]),
				&at("/admin/orders"),
				Some(&observer),
			);

			let events = observer.events();
			assert_eq!(events[0].tag, ReasonTag::Denied(DenialReason::Permissions));
			assert_eq!(events[0].context.user_id, Some(user_id));
			assert_eq!(
				events[0].context.missing_permissions,
				vec![crate::types::Permission::from("orders.write")]
			);
		}

		#[test]
		fn role_denial_lists_allowed_roles() {
			let observer = RecordingObserver::new();
			evaluate_observed(
				&SessionSnapshot::authenticated(customer()),
				&AccessRequirements::default().with_role("staff"),
				&at("/staff"),
				Some(&observer),
			);
			assert_eq!(
				observer.events()[0].context.required_roles,
				vec![crate::types::Role::from("staff")]
			);
		}

		#[test]
		fn allowed_does_not_notify() {
			let observer = RecordingObserver::new();
			evaluate_observed(
				&SessionSnapshot::authenticated(customer()),
				&AccessRequirements::default(),
				&at("/account"),
				Some(&observer),
			);
			assert!(observer.is_empty());
		}

		#[test]
		fn closure_observer_receives_tag() {
			let seen = std::cell::Cell::new(None);
			let observer = |tag: ReasonTag, _: &DenialContext| seen.set(Some(tag));
			evaluate_observed(
				&SessionSnapshot::authenticated(customer()),
				&AccessRequirements::default().require_subscription(true),
				&at("/account/subscription"),
				Some(&observer),
			);
			assert_eq!(seen.get(), Some(ReasonTag::Denied(DenialReason::Subscription)));
		}

		#[derive(Clone, Default)]
		struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

		impl std::io::Write for CapturedLogs {
			fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
				self.0.lock().unwrap().extend_from_slice(buf);
				Ok(buf.len())
			}

			fn flush(&mut self) -> std::io::Result<()> {
				Ok(())
			}
		}

		impl CapturedLogs {
			fn text(&self) -> String {
				String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
			}
		}

		fn logs_while(run: impl FnOnce()) -> String {
			let captured = CapturedLogs::default();
			let writer = captured.clone();
			let subscriber = tracing_subscriber::fmt()
				.with_max_level(tracing::Level::TRACE)
				.with_ansi(false)
				.with_writer(move || writer.clone())
				.finish();
			tracing::subscriber::with_default(subscriber, run);
			captured.text()
		}

		#[test]
		fn evaluation_alone_writes_no_logs() {
			let logs = logs_while(|| {
				evaluate(
					&SessionSnapshot::anonymous(),
					&AccessRequirements::default(),
					&at("/checkout"),
				);
				evaluate(
					&SessionSnapshot::authenticated(customer()),
					&AccessRequirements::default().require_admin(true),
					&at("/admin"),
				);
			});
			assert!(logs.is_empty(), "unexpected logs: {logs}");
		}

		#[test]
		fn tracing_observer_is_the_log_sink() {
			let logs = logs_while(|| {
				evaluate_observed(
					&SessionSnapshot::authenticated(customer()),
					&AccessRequirements::default().require_admin(true),
					&at("/admin"),
					Some(&crate::observer::TracingObserver),
				);
			});
			assert!(logs.contains("access not granted"), "{logs}");
			assert!(logs.contains("/admin"), "{logs}");
		}
	}

	mod property_tests {
		use super::*;
		use crate::types::Permission;
		use proptest::prelude::*;
		use std::collections::BTreeSet;

		const TAGS: &[&str] = &[
			"orders.read",
			"orders.write",
			"catalog.edit",
			"refunds.issue",
			"reports.view",
		];

		const ROLES: &[&str] = &["customer", "staff", "admin", "support"];

		fn arb_tags() -> impl Strategy<Value = BTreeSet<Permission>> {
			proptest::sample::subsequence(TAGS, 0..=TAGS.len())
				.prop_map(|tags| tags.into_iter().map(Permission::from).collect())
		}

		fn arb_role() -> impl Strategy<Value = String> {
			proptest::sample::select(ROLES).prop_map(str::to_string)
		}

		fn arb_user() -> impl Strategy<Value = UserRecord> {
			(arb_role(), arb_tags(), any::<bool>(), any::<bool>()).prop_map(
				|(role, permissions, verified, subscribed)| {
					let mut user = UserRecord::new(UserId::generate(), role)
						.with_email_verified(verified)
						.with_subscription(subscribed);
					user.permissions = permissions;
					user
				},
			)
		}

		fn arb_snapshot() -> impl Strategy<Value = SessionSnapshot> {
			(
				proptest::option::of(arb_user()),
				any::<bool>(),
				any::<bool>(),
				any::<bool>(),
			)
				.prop_map(|(user, is_authenticated, initialized, loading)| SessionSnapshot {
					user,
					is_authenticated,
					initialized,
					loading,
				})
		}

		fn arb_requirements() -> impl Strategy<Value = AccessRequirements> {
			(
				any::<bool>(),
				any::<bool>(),
				any::<bool>(),
				any::<bool>(),
				arb_tags(),
				proptest::sample::subsequence(ROLES, 0..=2),
			)
				.prop_map(|(auth, admin, verified, subscribed, permissions, roles)| {
					let mut requirements = AccessRequirements::default()
						.require_auth(auth)
						.require_admin(admin)
						.require_email_verification(verified)
						.require_subscription(subscribed)
						.with_roles(roles);
					requirements.permissions = permissions;
					requirements
				})
		}

		proptest! {
			#[test]
			fn uninitialized_is_always_pending(
				mut snapshot in arb_snapshot(),
				requirements in arb_requirements(),
			) {
				snapshot.initialized = false;
				prop_assert_eq!(evaluate(&snapshot, &requirements, &at("/any")), AccessDecision::Pending);
			}

			#[test]
			fn unauthenticated_redirect_carries_origin(
				mut snapshot in arb_snapshot(),
				requirements in arb_requirements(),
				path in "/[a-z]{1,12}",
			) {
				snapshot.initialized = true;
				snapshot.loading = false;
				snapshot.is_authenticated = false;
				let requirements = requirements.require_auth(true);
				let location = at(&path);

				prop_assert_eq!(
					evaluate(&snapshot, &requirements, &location),
					AccessDecision::Redirect { target: DEFAULT_LOGIN_PATH.to_string(), from: location }
				);
			}

			#[test]
			fn missing_user_never_passes_required_sign_in(
				mut snapshot in arb_snapshot(),
				requirements in arb_requirements(),
				is_authenticated in any::<bool>(),
			) {
				snapshot.initialized = true;
				snapshot.loading = false;
				snapshot.user = None;
				snapshot.is_authenticated = is_authenticated;
				let requirements = requirements.require_auth(true);

				let decision = evaluate(&snapshot, &requirements, &at("/checkout"));
				prop_assert!(
					matches!(decision, AccessDecision::Redirect { .. }),
					"expected redirect, got {:?}",
					decision
				);
			}

			#[test]
			fn non_admin_with_admin_requirement_is_denied_admin(
				user in arb_user(),
				requirements in arb_requirements(),
			) {
				prop_assume!(!user.is_admin());
				let snapshot = SessionSnapshot::authenticated(user);
				let requirements = requirements.require_admin(true);

				prop_assert_eq!(
					evaluate(&snapshot, &requirements, &at("/admin")).denial_reason(),
					Some(DenialReason::Admin)
				);
			}

			#[test]
			fn permission_check_is_conjunctive(
				held in arb_tags(),
				required in arb_tags(),
			) {
				let mut user = UserRecord::new(UserId::generate(), "staff");
				user.permissions = held.clone();
				let snapshot = SessionSnapshot::authenticated(user);
				let mut requirements = AccessRequirements::default();
				requirements.permissions = required.clone();

				let decision = evaluate(&snapshot, &requirements, &at("/orders"));
				if required.is_subset(&held) {
					prop_assert_eq!(decision, AccessDecision::Allowed);
				} else {
					prop_assert_eq!(decision.denial_reason(), Some(DenialReason::Permissions));
				}
			}

			#[test]
			fn role_check_respects_empty_set(
				role in arb_role(),
				roles in proptest::sample::subsequence(ROLES, 0..=ROLES.len()),
			) {
				let snapshot = SessionSnapshot::authenticated(UserRecord::new(UserId::generate(), role.clone()));
				let requirements = AccessRequirements::default().with_roles(roles.clone());

				let decision = evaluate(&snapshot, &requirements, &at("/staff"));
				if roles.is_empty() || roles.contains(&role.as_str()) {
					prop_assert_eq!(decision, AccessDecision::Allowed);
				} else {
					prop_assert_eq!(decision.denial_reason(), Some(DenialReason::Role));
				}
			}

			#[test]
			fn evaluation_is_idempotent(
				snapshot in arb_snapshot(),
				requirements in arb_requirements(),
			) {
				let before = snapshot.clone();
				let first = evaluate(&snapshot, &requirements, &at("/checkout"));
				let second = evaluate(&snapshot, &requirements, &at("/checkout"));
				prop_assert_eq!(first, second);
				prop_assert_eq!(snapshot, before);
			}

			#[test]
			fn observer_fires_only_for_redirects_and_denials(
				snapshot in arb_snapshot(),
				requirements in arb_requirements(),
			) {
				let observer = RecordingObserver::new();
				let decision = evaluate_observed(&snapshot, &requirements, &at("/x"), Some(&observer));
				let expected = usize::from(decision.reason_tag().is_some());
				prop_assert_eq!(observer.len(), expected);
			}
		}
	}
}
