// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use nutrishop_access::{
	AccessDecision, AccessRequirements, DenialObserver, Evaluator, FallbackView, GuardConfig, RoutePreset,
	SessionSnapshot, TracingObserver,
};
use nutrishop_access_config::AccessConfig;
use serde::Serialize;

use super::location_from_arg;
use crate::input::{print_json, read_json};

#[derive(Debug, Clone, clap::Args)]
#[command(group(clap::ArgGroup::new("requirement_set").required(true).args(["requirements", "preset"])))]
pub struct EvaluateArgs {
	/// Session snapshot JSON file (`-` for stdin)
	#[arg(long)]
	pub snapshot: PathBuf,

	/// Requirement set JSON file
	#[arg(long)]
	pub requirements: Option<PathBuf>,

	/// Named route preset
	#[arg(long)]
	pub preset: Option<RoutePreset>,

	/// Path being rendered, optionally with a query string
	#[arg(long)]
	pub path: String,

	/// Print the fallback view instead of the bare decision for denials
	#[arg(long)]
	pub fallback: bool,
}

/// Either a bare decision or the fallback view rendered for a denial.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EvaluateOutput {
	Decision(AccessDecision),
	Fallback(FallbackView),
}

pub fn run(args: EvaluateArgs, config: &AccessConfig) -> anyhow::Result<()> {
	let snapshot: SessionSnapshot = read_json(&args.snapshot)?;
	let requirements = match (&args.requirements, args.preset) {
		(Some(path), _) => read_json(path)?,
		(None, Some(preset)) => preset.requirements(),
		(None, None) => anyhow::bail!("either --requirements or --preset is required"),
	};

	let output = evaluate(
		&snapshot,
		&requirements,
		&args.path,
		args.fallback,
		&config.guard_config(),
	);
	print_json(&output)
}

pub fn evaluate(
	snapshot: &SessionSnapshot,
	requirements: &AccessRequirements,
	path: &str,
	fallback: bool,
	guard_config: &GuardConfig,
) -> EvaluateOutput {
	let evaluator = Evaluator::new(guard_config.login_path.clone());
	let observer: &dyn DenialObserver = &TracingObserver;
	let decision =
		evaluator.evaluate_observed(snapshot, requirements, &location_from_arg(path), Some(observer));
	tracing::debug!(path, outcome = ?decision, "evaluated");

	match decision {
		AccessDecision::Denied { reason, message } if fallback => EvaluateOutput::Fallback(
			FallbackView::for_denial(reason, message.as_deref(), guard_config),
		),
		decision => EvaluateOutput::Decision(decision),
	}
}
