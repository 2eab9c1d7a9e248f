// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gaussian blur over all four channels, via imageproc's separable filter.

use image::{Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use imageproc::map::map_colors;
use tracing::{debug, instrument};

use super::color::quantize;

/// Blur all four channels with a Gaussian whose standard deviation is
/// `radius` pixels.
///
/// Samples outside the image reuse the nearest edge pixel. Both passes run on
/// an f32 copy of the image so the result is quantised once, at the end.
/// A non-positive (or NaN) radius returns the image unchanged.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn gaussian_blur(image: &RgbaImage, radius: f32) -> RgbaImage {
    if radius.is_nan() || radius <= 0.0 {
        return image.clone();
    }

    let widened = map_colors(image, |Rgba(channels)| Rgba(channels.map(f32::from)));
    let blurred = gaussian_blur_f32(&widened, radius);
    let output = map_colors(&blurred, |Rgba(channels)| Rgba(channels.map(quantize)));

    debug!(radius, "Gaussian blur applied");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_dot_row() -> RgbaImage {
        let mut image = RgbaImage::from_pixel(9, 1, Rgba([0, 0, 0, 255]));
        image.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        image
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let image = RgbaImage::from_pixel(5, 4, Rgba([200, 100, 50, 255]));
        let blurred = gaussian_blur(&image, 3.0);
        assert_eq!(blurred, image);
    }

    #[test]
    fn blur_spreads_a_bright_dot() {
        let mut image = RgbaImage::from_pixel(9, 9, Rgba([0, 0, 0, 255]));
        image.put_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let blurred = gaussian_blur(&image, 1.0);

        let centre = blurred.get_pixel(4, 4).0[0];
        let neighbour = blurred.get_pixel(5, 4).0[0];
        assert!(centre < 255);
        assert!(neighbour > 0);
        assert!(centre > neighbour);
        assert_eq!(blurred.get_pixel(4, 4).0[3], 255);
    }

    #[test]
    fn edge_samples_repeat_the_border_pixel() {
        let blurred = gaussian_blur(&edge_dot_row(), 2.0);
        let reds: Vec<u8> = blurred.pixels().map(|p| p.0[0]).collect();

        // Zero padding would leave the edge pixel near 255 / 4.9 = 52; repeating
        // it keeps the left half of the kernel on the dot.
        assert!(reds[0] > 140, "edge value {}", reds[0]);
        // Wrapping around would pull the dot into the last column.
        assert_eq!(reds[8], 0);
        assert!(reds.windows(2).take(4).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn blur_preserves_dimensions_of_single_row() {
        let image = RgbaImage::from_pixel(7, 1, Rgba([10, 20, 30, 40]));
        let blurred = gaussian_blur(&image, 10.0);
        assert_eq!(blurred.dimensions(), (7, 1));
        assert_eq!(blurred, image);
    }

    #[test]
    fn zero_radius_is_identity() {
        let image = edge_dot_row();
        assert_eq!(gaussian_blur(&image, 0.0), image);
        assert_eq!(gaussian_blur(&image, f32::NAN), image);
    }
}
