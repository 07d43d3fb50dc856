// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use nutrishop_access::{AccessRequirements, RoutePreset};
use serde::Serialize;

use crate::input::print_json;

#[derive(Debug, Serialize)]
pub struct PresetListing {
	pub name: RoutePreset,
	pub requirements: AccessRequirements,
}

pub fn listings() -> Vec<PresetListing> {
	RoutePreset::all()
		.iter()
		.map(|preset| PresetListing {
			name: *preset,
			requirements: preset.requirements(),
		})
		.collect()
}

pub fn run() -> anyhow::Result<()> {
	print_json(&listings())
}
