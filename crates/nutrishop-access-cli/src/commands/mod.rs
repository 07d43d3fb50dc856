// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod evaluate;
pub mod presets;
pub mod route;
pub mod visible;

use nutrishop_access::Location;

/// Splits a `path?query` argument into a routed location.
pub(crate) fn location_from_arg(arg: &str) -> Location {
	match arg.split_once('?') {
		Some((path, search)) => Location::new(path).with_search(format!("?{search}")),
		None => Location::new(arg),
	}
}
