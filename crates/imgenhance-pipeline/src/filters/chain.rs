// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Declarative filter chain — an ordered list of steps evaluated against each
// pixel (or its neighbourhood), in the spirit of a CSS `filter` list.

use image::Rgba;
use imageproc::map::map_colors;
use imgenhance_core::EnhancementParams;
use tracing::{debug, instrument};

use super::blur::gaussian_blur;
use super::color::{self, Rgb, quantize};
use crate::buffer::ImageBuffer;

/// A single filter in the chain. Values use the same units as
/// [`EnhancementParams`]: percentages for the colour steps, pixels for blur.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStep {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Blur(f32),
}

impl FilterStep {
    /// Whether the step only looks at the pixel itself.
    pub fn is_per_pixel(&self) -> bool {
        !matches!(self, Self::Blur(_))
    }

    fn apply_rgb(&self, rgb: Rgb) -> Rgb {
        match *self {
            Self::Brightness(percent) => color::brightness(rgb, percent),
            Self::Contrast(percent) => color::contrast(rgb, percent),
            Self::Saturate(percent) => color::saturate(rgb, percent),
            Self::Blur(_) => rgb,
        }
    }
}

impl std::fmt::Display for FilterStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brightness(v) => write!(f, "brightness({v}%)"),
            Self::Contrast(v) => write!(f, "contrast({v}%)"),
            Self::Saturate(v) => write!(f, "saturate({v}%)"),
            Self::Blur(v) => write!(f, "blur({v}px)"),
        }
    }
}

/// An ordered filter chain.
///
/// Consecutive per-pixel steps are fused: they are evaluated in f32, clamped
/// after every step, and quantised to 8 bits once. A blur step consumes the
/// quantised output of the steps before it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterChain {
    steps: Vec<FilterStep>,
}

impl FilterChain {
    /// A chain that applies `steps` in the given order.
    pub fn new(steps: Vec<FilterStep>) -> Self {
        Self { steps }
    }

    /// The enhancement chain: brightness, contrast, saturation, then blur.
    ///
    /// Blur is left out entirely at radius 0.
    pub fn from_params(params: &EnhancementParams) -> Self {
        let mut steps = vec![
            FilterStep::Brightness(params.brightness()),
            FilterStep::Contrast(params.contrast()),
            FilterStep::Saturate(params.saturation()),
        ];
        if params.blur_radius() > 0.0 {
            steps.push(FilterStep::Blur(params.blur_radius()));
        }
        Self { steps }
    }

    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    /// Run the chain over `source`, producing a new buffer of the same size.
    #[instrument(skip_all, fields(chain = %self, width = source.width(), height = source.height()))]
    pub fn apply(&self, source: &ImageBuffer) -> ImageBuffer {
        let mut current = source.as_rgba_image().clone();

        for run in self.steps.chunk_by(|a, b| a.is_per_pixel() && b.is_per_pixel()) {
            match run {
                [FilterStep::Blur(radius)] => {
                    if *radius > 0.0 {
                        current = gaussian_blur(&current, *radius);
                    } else {
                        debug!("Skipping zero-radius blur");
                    }
                }
                colour_steps => {
                    current = map_colors(&current, |Rgba([r, g, b, a])| {
                        let rgb = colour_steps
                            .iter()
                            .fold([r as f32, g as f32, b as f32], |rgb, step| {
                                step.apply_rgb(rgb)
                            });
                        Rgba([quantize(rgb[0]), quantize(rgb[1]), quantize(rgb[2]), a])
                    });
                }
            }
        }

        ImageBuffer::from_stage_output(current)
    }
}

impl std::fmt::Display for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("none");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
