// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imgenhance-pipeline — The image enhancement pipeline.
//
// Decodes raster images into RGBA buffers, applies the brightness, contrast,
// saturation and blur filter chain, runs the self-composite sharpening stage,
// and encodes the result losslessly for export.

pub mod buffer;
pub mod export;
pub mod filters;
pub mod render;
pub mod sharpen;

// Re-export the primary types so callers can use `imgenhance_pipeline::ImageBuffer` etc.
pub use buffer::{DecodeLimits, ImageBuffer};
pub use export::{ExportedImage, export};
pub use filters::{FilterChain, FilterStep};
pub use render::{RenderResult, render};
pub use sharpen::{composite_over, sharpen};
