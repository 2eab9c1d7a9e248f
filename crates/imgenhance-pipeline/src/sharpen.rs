// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sharpening stage — composites the filtered image over itself with an
// over-unity layer alpha.
//
// This is not an unsharp mask: no blurred copy is subtracted. The visible
// effect comes entirely from how the compositing surface saturates when the
// layer alpha exceeds 1.
//
// Surface clamping rule used by `composite_over`:
//
//   out = clamp(clamp(src * alpha, 0, 255) + dst * clamp(1 - alpha, 0, 1), 0, 255)
//
// The source term saturates on its own and destination coverage can never go
// negative. For alpha > 1 and src == dst this gives clamp(dst * alpha, 0, 255).

use image::{Rgba, RgbaImage};
use tracing::{debug, instrument};

use crate::buffer::ImageBuffer;
use crate::filters::color::quantize;

/// Composite `src` over `dst` (both anchored at the origin) with layer
/// opacity `alpha`, which may exceed 1.
///
/// Only colour channels are blended; the output keeps `dst`'s alpha channel.
/// Pixels of `dst` that `src` does not cover are copied through.
pub fn composite_over(src: &ImageBuffer, dst: &ImageBuffer, alpha: f32) -> ImageBuffer {
    let src_pixels = src.as_rgba_image();
    let dst_pixels = dst.as_rgba_image();
    let src_weight = alpha.max(0.0);
    let dst_weight = (1.0 - alpha).clamp(0.0, 1.0);

    let output = RgbaImage::from_fn(dst.width(), dst.height(), |x, y| {
        let Rgba(d) = *dst_pixels.get_pixel(x, y);
        if x >= src.width() || y >= src.height() {
            return Rgba(d);
        }
        let Rgba(s) = *src_pixels.get_pixel(x, y);

        let blend = |c: usize| {
            let source_term = (s[c] as f32 * src_weight).clamp(0.0, 255.0);
            quantize(source_term + d[c] as f32 * dst_weight)
        };
        Rgba([blend(0), blend(1), blend(2), d[3]])
    });

    ImageBuffer::from_stage_output(output)
}

/// Apply the sharpening stage with intensity `amount` (0–100).
///
/// Returns `buffer` untouched when `amount` is 0. Otherwise the buffer is
/// composited over itself with `alpha = 1 + amount / 100`.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn sharpen(buffer: ImageBuffer, amount: f32) -> ImageBuffer {
    if amount <= 0.0 || amount.is_nan() {
        return buffer;
    }

    let alpha = 1.0 + amount / 100.0;
    debug!(alpha, "Self-compositing filtered image");
    composite_over(&buffer, &buffer, alpha)
}
