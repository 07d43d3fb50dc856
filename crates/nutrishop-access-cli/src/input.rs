// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JSON inputs and outputs.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Reads and parses a JSON document. `-` reads stdin.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
	let content = if path == Path::new("-") {
		let mut buf = String::new();
		std::io::stdin()
			.read_to_string(&mut buf)
			.context("reading stdin")?;
		buf
	} else {
		std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
	};

	serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
	let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
	println!("{rendered}");
	Ok(())
}
