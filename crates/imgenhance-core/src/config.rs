// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhancer configuration. Held in memory for the lifetime of a session; the
// host may hand it over as JSON.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ExportFormat;

/// Session-wide settings for decoding, rendering and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    /// Format used by `export_image`.
    pub export_format: ExportFormat,
    /// File name stem of exported images (`enhanced-image` → `enhanced-image.png`).
    pub export_file_stem: String,
    /// Reject images wider than this many pixels.
    pub max_width: u32,
    /// Reject images taller than this many pixels.
    pub max_height: u32,
    /// Upper bound on decoder allocations, in bytes.
    pub max_alloc_bytes: u64,
    /// Re-render immediately whenever a parameter changes.
    pub auto_render: bool,
}

impl EnhancerConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialise the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Full download name, e.g. `enhanced-image.png`.
    pub fn export_file_name(&self) -> String {
        format!("{}.{}", self.export_file_stem, self.export_format.extension())
    }
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            export_format: ExportFormat::Png,
            export_file_stem: "enhanced-image".into(),
            max_width: 16_384,
            max_height: 16_384,
            max_alloc_bytes: 1024 * 1024 * 1024,
            auto_render: true,
        }
    }
}
