// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::Deserialize;

use crate::sections::{LoggingConfigLayer, NavigationConfigLayer, RoutesConfigLayer};

/// One source's view of the configuration. Absent sections are `None` and
/// leave lower-precedence values untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccessConfigLayer {
	pub navigation: Option<NavigationConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
	pub routes: Option<RoutesConfigLayer>,
}

impl AccessConfigLayer {
	/// Overlays `other` on top of `self`.
	pub fn merge(&mut self, other: AccessConfigLayer) {
		merge_section(&mut self.navigation, other.navigation, NavigationConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.routes, other.routes, RoutesConfigLayer::merge);
	}
}

fn merge_section<T>(current: &mut Option<T>, incoming: Option<T>, merge: fn(&mut T, T)) {
	match (current.as_mut(), incoming) {
		(Some(existing), Some(incoming)) => merge(existing, incoming),
		(None, Some(incoming)) => *current = Some(incoming),
		(_, None) => {}
	}
}
