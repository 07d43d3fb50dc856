// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use nutrishop_access::{is_visible, Permission, Role, SessionSnapshot, VisibilityRule};

use crate::input::read_json;

#[derive(Debug, Clone, clap::Args)]
pub struct VisibleArgs {
	/// Session snapshot JSON file (`-` for stdin)
	#[arg(long)]
	pub snapshot: PathBuf,

	/// Required permission (repeatable, all must be held)
	#[arg(long = "permission", value_parser = Permission::parse)]
	pub permissions: Vec<Permission>,

	/// Accepted role (repeatable, any one suffices)
	#[arg(long = "role", value_parser = Role::parse)]
	pub roles: Vec<Role>,

	/// Require the admin role
	#[arg(long)]
	pub admin: bool,

	/// Render only when the checks fail
	#[arg(long)]
	pub invert: bool,
}

impl VisibleArgs {
	fn rule(&self) -> VisibilityRule {
		let mut rule = self
			.permissions
			.iter()
			.fold(VisibilityRule::new(), |rule, p| rule.with_permission(p.clone()));
		rule = self
			.roles
			.iter()
			.fold(rule, |rule, r| rule.with_role(r.clone()))
			.require_admin(self.admin);
		if self.invert {
			rule = rule.inverted();
		}
		rule
	}
}

pub fn run(args: VisibleArgs) -> anyhow::Result<()> {
	let snapshot: SessionSnapshot = read_json(&args.snapshot)?;
	println!("{}", is_visible(&snapshot, &args.rule()));
	Ok(())
}
