// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render pass — filter chain followed by the sharpening stage, plus the
// encoded result handed to display and export.

use chrono::{DateTime, Utc};
use imgenhance_core::error::Result;
use imgenhance_core::{EnhancementParams, EnhancerConfig, ImageId};
use tracing::{info, instrument};

use crate::buffer::ImageBuffer;
use crate::export::{ExportedImage, export};
use crate::filters::FilterChain;
use crate::sharpen::sharpen;

/// Render `source` with `params`.
///
/// A pure function of its inputs: the same source and parameters always give
/// the same output buffer.
#[instrument(skip_all, fields(width = source.width(), height = source.height()))]
pub fn render(source: &ImageBuffer, params: &EnhancementParams) -> ImageBuffer {
    let filtered = FilterChain::from_params(params).apply(source);
    sharpen(filtered, params.sharpness())
}

/// The output of one render pass.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Image the render was computed from.
    pub image_id: ImageId,
    /// Monotonic render counter; later renders have larger generations.
    pub generation: u64,
    pub params: EnhancementParams,
    pub buffer: ImageBuffer,
    /// The buffer encoded for export.
    pub encoded: ExportedImage,
    pub rendered_at: DateTime<Utc>,
}

impl RenderResult {
    /// Render and encode in one step.
    pub fn compute(
        image_id: ImageId,
        generation: u64,
        source: &ImageBuffer,
        params: EnhancementParams,
        config: &EnhancerConfig,
    ) -> Result<Self> {
        let buffer = render(source, &params);
        let encoded = export(&buffer, config.export_format, &config.export_file_stem)?;
        info!(
            %image_id,
            generation,
            sha256 = %encoded.sha256,
            "Render complete"
        );
        Ok(Self {
            image_id,
            generation,
            params,
            buffer,
            encoded,
            rendered_at: Utc::now(),
        })
    }
}
