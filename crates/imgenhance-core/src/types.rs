// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the enhancement pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EnhanceError;

/// Unique identifier for a loaded source image.
///
/// A fresh id is minted every time an image is loaded, so renders started
/// against a previous image can be recognised and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned when an observer subscribes to session events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of the enhancement session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing loaded yet (or the session was cleared).
    NoImage,
    /// An image is loaded and its current output has not been rendered.
    Loaded,
    /// A render pass is in progress.
    Rendering,
    /// The latest render matches the current image and parameters.
    Rendered,
}

/// The five adjustable enhancement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamName {
    Brightness,
    Contrast,
    Saturation,
    BlurRadius,
    Sharpness,
}

impl ParamName {
    /// All parameters in slider order.
    pub const ALL: [ParamName; 5] = [
        Self::Brightness,
        Self::Contrast,
        Self::Saturation,
        Self::Sharpness,
        Self::BlurRadius,
    ];

    /// Inclusive range accepted for this parameter.
    pub fn range(&self) -> (f32, f32) {
        match self {
            Self::Brightness | Self::Contrast | Self::Saturation => (0.0, 200.0),
            Self::BlurRadius => (0.0, 10.0),
            Self::Sharpness => (0.0, 100.0),
        }
    }

    /// The identity value for this parameter.
    pub fn default_value(&self) -> f32 {
        match self {
            Self::Brightness | Self::Contrast | Self::Saturation => 100.0,
            Self::BlurRadius | Self::Sharpness => 0.0,
        }
    }

    /// Clamp `value` into this parameter's range. NaN maps to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default_value();
        }
        let (min, max) = self.range();
        value.clamp(min, max)
    }

    /// Caption shown next to the slider.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Brightness => "Brightness",
            Self::Contrast => "Contrast",
            Self::Saturation => "Saturation",
            Self::BlurRadius => "Blur",
            Self::Sharpness => "Sharpness",
        }
    }

    /// Display unit appended to the value.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Brightness | Self::Contrast | Self::Saturation => "%",
            Self::BlurRadius => "px",
            Self::Sharpness => "",
        }
    }

    /// Format a value the way the slider caption shows it (`150%`, `3px`).
    pub fn format_value(&self, value: f32) -> String {
        format!("{}{}", value, self.unit())
    }
}

impl std::fmt::Display for ParamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::BlurRadius => "blur_radius",
            Self::Sharpness => "sharpness",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ParamName {
    type Err = EnhanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brightness" => Ok(Self::Brightness),
            "contrast" => Ok(Self::Contrast),
            "saturation" | "saturate" => Ok(Self::Saturation),
            "blur" | "blur_radius" | "blurradius" => Ok(Self::BlurRadius),
            "sharpness" | "sharpen" => Ok(Self::Sharpness),
            _ => Err(EnhanceError::UnknownParameter(s.to_owned())),
        }
    }
}

/// The five-dimensional enhancement configuration.
///
/// Every value is clamped to its documented range on the way in, so a params
/// value can never hold an out-of-range setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "UncheckedParams")]
pub struct EnhancementParams {
    brightness: f32,
    contrast: f32,
    saturation: f32,
    blur_radius: f32,
    sharpness: f32,
}

impl EnhancementParams {
    /// Build a parameter set, clamping each value.
    pub fn new(
        brightness: f32,
        contrast: f32,
        saturation: f32,
        blur_radius: f32,
        sharpness: f32,
    ) -> Self {
        Self {
            brightness: ParamName::Brightness.clamp(brightness),
            contrast: ParamName::Contrast.clamp(contrast),
            saturation: ParamName::Saturation.clamp(saturation),
            blur_radius: ParamName::BlurRadius.clamp(blur_radius),
            sharpness: ParamName::Sharpness.clamp(sharpness),
        }
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    pub fn blur_radius(&self) -> f32 {
        self.blur_radius
    }

    pub fn sharpness(&self) -> f32 {
        self.sharpness
    }

    /// Read a parameter by name.
    pub fn get(&self, name: ParamName) -> f32 {
        match name {
            ParamName::Brightness => self.brightness,
            ParamName::Contrast => self.contrast,
            ParamName::Saturation => self.saturation,
            ParamName::BlurRadius => self.blur_radius,
            ParamName::Sharpness => self.sharpness,
        }
    }

    /// Set a parameter by name and return the value actually stored.
    pub fn set(&mut self, name: ParamName, value: f32) -> f32 {
        let clamped = name.clamp(value);
        let slot = match name {
            ParamName::Brightness => &mut self.brightness,
            ParamName::Contrast => &mut self.contrast,
            ParamName::Saturation => &mut self.saturation,
            ParamName::BlurRadius => &mut self.blur_radius,
            ParamName::Sharpness => &mut self.sharpness,
        };
        *slot = clamped;
        clamped
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, name: ParamName, value: f32) -> Self {
        self.set(name, value);
        self
    }

    /// Whether every parameter is at its identity value.
    pub fn is_identity(&self) -> bool {
        ParamName::ALL
            .iter()
            .all(|name| self.get(*name) == name.default_value())
    }
}

impl Default for EnhancementParams {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur_radius: 0.0,
            sharpness: 0.0,
        }
    }
}

/// Wire form of [`EnhancementParams`]; missing fields take their defaults and
/// every value is clamped on conversion.
#[derive(Deserialize)]
#[serde(default)]
struct UncheckedParams {
    brightness: f32,
    contrast: f32,
    saturation: f32,
    blur_radius: f32,
    sharpness: f32,
}

impl Default for UncheckedParams {
    fn default() -> Self {
        let defaults = EnhancementParams::default();
        Self {
            brightness: defaults.brightness,
            contrast: defaults.contrast,
            saturation: defaults.saturation,
            blur_radius: defaults.blur_radius,
            sharpness: defaults.sharpness,
        }
    }
}

impl From<UncheckedParams> for EnhancementParams {
    fn from(raw: UncheckedParams) -> Self {
        Self::new(
            raw.brightness,
            raw.contrast,
            raw.saturation,
            raw.blur_radius,
            raw.sharpness,
        )
    }
}

/// Lossless formats offered for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Png,
    Tiff,
    Bmp,
}

impl ExportFormat {
    /// MIME type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::Bmp => "image/bmp",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Tiff => "tiff",
            Self::Bmp => "bmp",
        }
    }

    /// Infer the export format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_identity() {
        let params = EnhancementParams::default();
        assert!(params.is_identity());
        assert_eq!(params.brightness(), 100.0);
        assert_eq!(params.blur_radius(), 0.0);
    }

    #[test]
    fn new_clamps_every_field() {
        let params = EnhancementParams::new(300.0, -5.0, 250.0, 42.0, 101.0);
        assert_eq!(params.brightness(), 200.0);
        assert_eq!(params.contrast(), 0.0);
        assert_eq!(params.saturation(), 200.0);
        assert_eq!(params.blur_radius(), 10.0);
        assert_eq!(params.sharpness(), 100.0);
    }

    #[test]
    fn set_returns_stored_value() {
        let mut params = EnhancementParams::default();
        assert_eq!(params.set(ParamName::BlurRadius, 12.5), 10.0);
        assert_eq!(params.set(ParamName::Sharpness, 30.0), 30.0);
        assert_eq!(params.get(ParamName::Sharpness), 30.0);
        assert!(!params.is_identity());
    }

    #[test]
    fn nan_falls_back_to_default() {
        let params = EnhancementParams::default().with(ParamName::Contrast, f32::NAN);
        assert_eq!(params.contrast(), 100.0);
    }

    #[test]
    fn param_name_parses_aliases() {
        assert_eq!("Brightness".parse::<ParamName>().unwrap(), ParamName::Brightness);
        assert_eq!("saturate".parse::<ParamName>().unwrap(), ParamName::Saturation);
        assert_eq!("blurRadius".parse::<ParamName>().unwrap(), ParamName::BlurRadius);
        assert!(matches!(
            "hue".parse::<ParamName>(),
            Err(EnhanceError::UnknownParameter(name)) if name == "hue"
        ));
    }

    #[test]
    fn format_value_matches_slider_captions() {
        assert_eq!(ParamName::Brightness.format_value(150.0), "150%");
        assert_eq!(ParamName::BlurRadius.format_value(3.0), "3px");
        assert_eq!(ParamName::Sharpness.format_value(40.0), "40");
    }

    #[test]
    fn deserialization_clamps_and_fills_defaults() {
        let params: EnhancementParams =
            serde_json::from_str(r#"{"brightness": 999, "blur_radius": 2}"#).unwrap();
        assert_eq!(params.brightness(), 200.0);
        assert_eq!(params.blur_radius(), 2.0);
        assert_eq!(params.contrast(), 100.0);
    }

    #[test]
    fn export_format_extensions() {
        assert_eq!(ExportFormat::from_extension("TIF"), Some(ExportFormat::Tiff));
        assert_eq!(ExportFormat::from_extension("jpg"), None);
        assert_eq!(ExportFormat::default().mime_type(), "image/png");
    }
}
