// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the vision quickstart

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-vision-v2.0-2026-10-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-10-18";

/// Service API version the client targets
pub const API_VERSION: &str = "v2.0";

/// Supported quickstart capabilities in this version
pub const FEATURES: &[&str] = &[
    "analyze-image",
    "domain-specific-details",
    "detect-objects",
    "ocr",
    "batch-read",
    "bounded-polling",
    "poll-cancellation",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!(
        "Vision quickstart {} (API {}, {})",
        VERSION_NUMBER, API_VERSION, BUILD_DATE
    )
}
