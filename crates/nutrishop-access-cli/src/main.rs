// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod commands;
mod input;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nutrishop_access_config::{load_config, load_config_with_file, AccessConfig};
use tracing_subscriber::EnvFilter;

use commands::{evaluate::EvaluateArgs, route::RouteArgs, visible::VisibleArgs};

/// NutriShop access guard - evaluate route access decisions offline
#[derive(Parser, Debug)]
#[command(name = "nutrishop-access", version)]
struct Cli {
	/// Config file (defaults to /etc/nutrishop/access.toml)
	#[arg(long, global = true, env = "NUTRISHOP_ACCESS_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Evaluate a snapshot against a requirement set
	Evaluate(EvaluateArgs),
	/// Resolve a path against the route table and evaluate it
	Route(RouteArgs),
	/// Check whether an inline fragment would render
	Visible(VisibleArgs),
	/// List route presets and their requirement sets
	Presets,
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let config = match &cli.config {
		Some(path) => load_config_with_file(path)
			.with_context(|| format!("loading config from {}", path.display()))?,
		None => load_config().context("loading config")?,
	};

	init_logging(&config);

	match cli.command {
		Command::Evaluate(args) => commands::evaluate::run(args, &config),
		Command::Route(args) => commands::route::run(args, &config),
		Command::Visible(args) => commands::visible::run(args),
		Command::Presets => commands::presets::run(),
	}
}

fn init_logging(config: &AccessConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
