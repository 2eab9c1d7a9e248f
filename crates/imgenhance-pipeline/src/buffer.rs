// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image buffer — decodes encoded bytes into a fixed-size RGBA8 grid and
// encodes it back. Codecs come from the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, Limits, Rgba, RgbaImage};
use imgenhance_core::error::{EnhanceError, Result};
use imgenhance_core::{EnhancerConfig, ExportFormat};
use tracing::{debug, info, instrument};

/// Decoder resource limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_width: u32,
    pub max_height: u32,
    pub max_alloc_bytes: u64,
}

impl DecodeLimits {
    fn to_image_limits(self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_width);
        limits.max_image_height = Some(self.max_height);
        limits.max_alloc = Some(self.max_alloc_bytes);
        limits
    }
}

impl From<&EnhancerConfig> for DecodeLimits {
    fn from(config: &EnhancerConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            max_alloc_bytes: config.max_alloc_bytes,
        }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::from(&EnhancerConfig::default())
    }
}

/// A decoded image: `width x height` pixels of straight (non-premultiplied)
/// RGBA, 8 bits per channel.
///
/// Dimensions are fixed at construction and always non-zero. Each render pass
/// allocates a new buffer rather than mutating its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pixels: RgbaImage,
}

impl ImageBuffer {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (PNG, JPEG, ...) with the default limits.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::decode_with_limits(data, DecodeLimits::default())
    }

    /// Decode raw encoded bytes, enforcing `limits`.
    ///
    /// Decoding is all-or-nothing: on any error no buffer is produced.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn decode_with_limits(data: &[u8], limits: DecodeLimits) -> Result<Self> {
        if data.is_empty() {
            return Err(EnhanceError::Decode("input is empty".into()));
        }

        let mut reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|err| EnhanceError::Decode(format!("failed to read image header: {err}")))?;
        let Some(format) = reader.format() else {
            return Err(EnhanceError::Decode("unrecognised image format".into()));
        };
        reader.limits(limits.to_image_limits());

        let decoded = reader
            .decode()
            .map_err(|err| EnhanceError::Decode(format!("{format:?}: {err}")))?;

        let buffer = Self::from_rgba_image(decoded.into_rgba8())?;
        info!(
            width = buffer.width(),
            height = buffer.height(),
            ?format,
            "Image decoded"
        );
        Ok(buffer)
    }

    /// Wrap an already-decoded RGBA image. Zero-sized images are rejected.
    pub fn from_rgba_image(pixels: RgbaImage) -> Result<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(EnhanceError::Decode(format!(
                "image has zero size ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self { pixels })
    }

    /// Build a buffer from raw RGBA bytes in row-major order.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        let pixels = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            EnhanceError::Decode(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {actual}"
            ))
        })?;
        Self::from_rgba_image(pixels)
    }

    /// Wrap the output of a stage that preserved its input's dimensions.
    pub(crate) fn from_stage_output(pixels: RgbaImage) -> Self {
        debug_assert!(pixels.width() > 0 && pixels.height() > 0);
        Self { pixels }
    }

    /// A buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        Self::from_rgba_image(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Read the pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    /// Overwrite the pixel at `(x, y)`. Panics when out of bounds.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.pixels.put_pixel(x, y, Rgba(rgba));
    }

    /// Raw RGBA bytes in row-major order.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Borrow the underlying `RgbaImage`.
    pub fn as_rgba_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Consume the buffer and return the underlying `RgbaImage`.
    pub fn into_rgba_image(self) -> RgbaImage {
        self.pixels
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the buffer in the given lossless format.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn encode(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let image_format = match format {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Tiff => ImageFormat::Tiff,
            ExportFormat::Bmp => ImageFormat::Bmp,
        };

        let mut bytes = Vec::new();
        let mut cursor = Cursor::new(&mut bytes);
        self.pixels
            .write_to(&mut cursor, image_format)
            .map_err(|err| EnhanceError::Encode(format!("{image_format:?} encoding failed: {err}")))?;

        debug!(encoded_len = bytes.len(), "Image encoded");
        Ok(bytes)
    }
}

impl From<ImageBuffer> for DynamicImage {
    fn from(buffer: ImageBuffer) -> Self {
        DynamicImage::ImageRgba8(buffer.pixels)
    }
}
