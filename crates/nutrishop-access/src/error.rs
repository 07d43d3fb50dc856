// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for parsing guard inputs.
//!
//! Evaluation itself never fails; these errors only surface while turning
//! configuration text into presets, reasons, tags, and route tables.

use thiserror::Error;

/// Errors that can occur while building guard inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
	/// Preset name is not one of the known presets
	#[error("unknown route preset: {0}")]
	UnknownPreset(String),

	/// Denial reason string is not in the closed taxonomy
	#[error("unknown denial reason: {0}")]
	UnknownReason(String),

	/// Layout name is not one of the known layout shells
	#[error("unknown layout: {0}")]
	UnknownLayout(String),

	/// Route path is not absolute or has a misplaced wildcard
	#[error("invalid route path '{path}': {message}")]
	InvalidPath { path: String, message: String },

	/// Role or capability tag is empty or contains whitespace
	#[error("invalid tag: '{0}'")]
	InvalidTag(String),
}

pub type Result<T> = std::result::Result<T, AccessError>;
