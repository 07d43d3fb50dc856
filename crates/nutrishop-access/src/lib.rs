// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route access guard for the NutriShop storefront.
//!
//! This crate decides, for one render of a protected region, whether to show
//! the content, show a fallback view, or redirect. It provides:
//!
//! - [`evaluate`] / [`Evaluator`]: the pure decision function
//! - [`AccessRequirements`] and [`RoutePreset`]: what a region demands
//! - [`Guard`]: glue to an identity provider and a router
//! - [`is_visible`]: inline render-or-suppress checks
//! - [`RouteTable`]: the storefront's path → (layout, preset) table
//!
//! # Example
//!
//! ```
//! use nutrishop_access::{evaluate, AccessDecision, AccessRequirements, Location, SessionSnapshot};
//!
//! let decision = evaluate(
//!     &SessionSnapshot::anonymous(),
//!     &AccessRequirements::default(),
//!     &Location::new("/checkout"),
//! );
//! assert!(matches!(decision, AccessDecision::Redirect { .. }));
//! ```

pub mod decision;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod guard;
pub mod observer;
pub mod presets;
pub mod requirements;
pub mod routes;
pub mod types;
pub mod visibility;

pub use decision::{AccessDecision, DenialReason, ReasonTag};
pub use engine::{evaluate, evaluate_observed, Evaluator, DEFAULT_LOGIN_PATH};
pub use error::{AccessError, Result};
pub use fallback::{FallbackView, RecoveryAction};
pub use guard::{
	AccessStatus, Guard, GuardConfig, GuardOutcome, IdentityProvider, NavigateOptions, Navigator,
	DEFAULT_UPGRADE_PATH, DEFAULT_VERIFY_EMAIL_PATH,
};
pub use observer::{DenialContext, DenialEvent, DenialObserver, RecordingObserver, TracingObserver};
pub use presets::RoutePreset;
pub use requirements::{AccessRequirements, CustomCheck, CustomCheckResult};
pub use routes::{Layout, RouteEntry, RouteTable};
pub use types::{
	Location, Permission, Role, SessionSnapshot, Subscription, UserId, UserRecord, ADMIN_ROLE,
};
pub use visibility::{is_visible, VisibilityRule};
