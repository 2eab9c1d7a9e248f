// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-pixel colour adjustments. Each operates on straight RGB in f32 and
// clamps its output to [0, 255]; alpha is never touched.

/// Rec. 601 luma weights.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

pub type Rgb = [f32; 3];

/// Scale each channel by `percent / 100`.
pub fn brightness(rgb: Rgb, percent: f32) -> Rgb {
    let factor = percent / 100.0;
    rgb.map(|c| clamp_channel(c * factor))
}

/// Stretch each channel away from (or towards) mid-grey 128.
pub fn contrast(rgb: Rgb, percent: f32) -> Rgb {
    let factor = percent / 100.0;
    rgb.map(|c| clamp_channel((c - 128.0) * factor + 128.0))
}

/// Blend each channel with the pixel's luma.
pub fn saturate(rgb: Rgb, percent: f32) -> Rgb {
    let factor = percent / 100.0;
    let luma = luma(rgb);
    rgb.map(|c| clamp_channel(luma + (c - luma) * factor))
}

/// Weighted grey value `0.299 R + 0.587 G + 0.114 B`.
pub fn luma(rgb: Rgb) -> f32 {
    rgb[0] * LUMA_WEIGHTS[0] + rgb[1] * LUMA_WEIGHTS[1] + rgb[2] * LUMA_WEIGHTS[2]
}

pub fn clamp_channel(value: f32) -> f32 {
    value.clamp(0.0, 255.0)
}

/// Round half away from zero and saturate into a `u8`.
pub fn quantize(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
