// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use nutrishop_access::{
	AccessDecision, DenialObserver, Evaluator, RouteEntry, RouteTable, SessionSnapshot, TracingObserver,
};
use nutrishop_access_config::AccessConfig;
use serde::Serialize;

use super::location_from_arg;
use crate::input::{print_json, read_json};

#[derive(Debug, Clone, clap::Args)]
pub struct RouteArgs {
	/// Session snapshot JSON file (`-` for stdin)
	#[arg(long)]
	pub snapshot: PathBuf,

	/// Path being visited, optionally with a query string
	#[arg(long)]
	pub path: String,
}

#[derive(Debug, Serialize)]
pub struct RouteReport {
	pub path: String,
	/// `None` when no route matches; the caller shows its not-found page.
	pub route: Option<RouteEntry>,
	pub decision: Option<AccessDecision>,
}

pub fn run(args: RouteArgs, config: &AccessConfig) -> anyhow::Result<()> {
	let snapshot: SessionSnapshot = read_json(&args.snapshot)?;
	let evaluator = Evaluator::new(config.navigation.login_path.clone());
	let report = route(&snapshot, &args.path, &config.routes.table, &evaluator);
	print_json(&report)
}

pub fn route(
	snapshot: &SessionSnapshot,
	path: &str,
	table: &RouteTable,
	evaluator: &Evaluator,
) -> RouteReport {
	let location = location_from_arg(path);
	let route = table.resolve(&location.path).cloned();
	let observer: &dyn DenialObserver = &TracingObserver;
	let decision = route.as_ref().map(|entry| {
		evaluator.evaluate_observed(snapshot, &entry.preset.requirements(), &location, Some(observer))
	});

	if route.is_none() {
		tracing::debug!(path = %location.path, "no route matches");
	}

	RouteReport {
		path: location.path,
		route,
		decision,
	}
}
