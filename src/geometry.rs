//! Crop and focal-point geometry.
//!
//! Turns fractional crops into pixel rectangles and post-crop dimensions,
//! and remaps hotspots into post-crop space. Pure arithmetic, no
//! allocations, `no_std` compatible.
//!
//! # Example
//!
//! ```
//! use zensrcset::{CropFraction, Dimensions, geometry};
//!
//! let source = Dimensions::new(2000, 1000);
//! let crop = CropFraction::new(0.15, 0.05, 0.1, 0.25);
//!
//! let cropped = geometry::cropped_size(source, &crop).unwrap();
//! assert_eq!((cropped.width, cropped.height), (1300, 800));
//!
//! let rect = geometry::build_rect(source, &crop).unwrap();
//! assert_eq!(rect.to_string(), "200,150,1300,800");
//! ```

use core::fmt;

use crate::error::ImageUrlError;

/// Pixel dimensions with their aspect ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    /// `width / height`.
    pub aspect_ratio: f64,
}

impl Dimensions {
    /// Create dimensions, deriving the aspect ratio.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            aspect_ratio: width as f64 / height as f64,
        }
    }
}

/// Fractional trim from each edge of the source image.
///
/// `top + bottom` and `left + right` must each stay below 1.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropFraction {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl CropFraction {
    /// Crop in `top, bottom, left, right` order.
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Whether every edge is untouched.
    pub fn is_empty(&self) -> bool {
        self.top == 0.0 && self.bottom == 0.0 && self.left == 0.0 && self.right == 0.0
    }

    fn validate(&self) -> Result<(), ImageUrlError> {
        let edges = [self.top, self.bottom, self.left, self.right];
        let in_range = edges.iter().all(|v| v.is_finite() && *v >= 0.0);
        if !in_range || self.left + self.right >= 1.0 || self.top + self.bottom >= 1.0 {
            return Err(ImageUrlError::InvalidCrop {
                top: self.top,
                bottom: self.bottom,
                left: self.left,
                right: self.right,
            });
        }
        Ok(())
    }
}

/// Focal point in source image space, fractions of width and height.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
}

impl Hotspot {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Focal point in post-crop space, clamped to `0..=1` and rounded to
/// three decimals.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned rectangle in source pixel coordinates.
///
/// Displays as `x,y,w,h`, the CDN's `rect` value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this rect covers the full source (no actual crop).
    pub fn is_full(&self, source: Dimensions) -> bool {
        self.x == 0 && self.y == 0 && self.width == source.width && self.height == source.height
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// Dimensions of the source after trimming `crop`.
///
/// Width and height round independently; each is at least 1.
pub fn cropped_size(source: Dimensions, crop: &CropFraction) -> Result<Dimensions, ImageUrlError> {
    crop.validate()?;
    let width = round_px(source.width as f64 * (1.0 - crop.left - crop.right)).max(1);
    let height = round_px(source.height as f64 * (1.0 - crop.top - crop.bottom)).max(1);
    Ok(Dimensions::new(width, height))
}

/// Pixel rectangle selected by `crop`.
pub fn build_rect(source: Dimensions, crop: &CropFraction) -> Result<Rect, ImageUrlError> {
    let size = cropped_size(source, crop)?;
    Ok(Rect {
        x: round_px(crop.left * source.width as f64),
        y: round_px(crop.top * source.height as f64),
        width: size.width,
        height: size.height,
    })
}

/// Remap a source-space hotspot into post-crop space.
///
/// Without a crop the hotspot passes through; either way coordinates are
/// clamped to `0..=1` (non-finite values collapse to an edge) and rounded
/// to three decimals. `crop` must already be validated.
pub fn focal_point(hotspot: Hotspot, crop: Option<&CropFraction>) -> FocalPoint {
    let (x, y) = match crop {
        Some(c) => (
            (hotspot.x - c.left) / (1.0 - c.left - c.right),
            (hotspot.y - c.top) / (1.0 - c.top - c.bottom),
        ),
        None => (hotspot.x, hotspot.y),
    };
    FocalPoint {
        x: round_to_precision(clamp_unit(x)),
        y: round_to_precision(clamp_unit(y)),
    }
}

// ============================================================================
// Rounding
// ============================================================================

/// Round half up to a pixel count. Negative and NaN inputs give 0.
pub(crate) fn round_px(v: f64) -> u32 {
    let r = num_traits::Float::round(v);
    if r >= u32::MAX as f64 { u32::MAX } else { r.max(0.0) as u32 }
}

/// `+ 0.0` turns `-0.0` into `0.0` so it never serializes as `-0`.
fn clamp_unit(v: f64) -> f64 {
    v.max(0.0).min(1.0) + 0.0
}

fn round_to_precision(v: f64) -> f64 {
    let scale = num_traits::Float::powi(10.0_f64, crate::params::DEFAULTS.focal_point_precision);
    num_traits::Float::round(v * scale) / scale
}
