// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod logging;
mod navigation;
mod routes;

pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use navigation::{NavigationConfig, NavigationConfigLayer};
pub use routes::{RoutesConfig, RoutesConfigLayer};
