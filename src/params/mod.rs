//! CDN query parameter construction.
//!
//! Resolves a caller's [`ImageQuery`] (requested size, fit mode, crop,
//! hotspot, passthrough parameters) into the canonical [`QueryParams`]
//! for one image request, and serializes it.
//!
//! # Example
//!
//! ```
//! use zensrcset::params::{self, BuildOptions, ImageQuery};
//!
//! let query = ImageQuery::new("image-abc123-1000x1000-jpg").width(500);
//! let p = params::build(&query, BuildOptions::default()).unwrap();
//!
//! assert_eq!(p.to_query_string(), "auto=format&fit=max&q=75&w=500");
//! ```
//!
//! # Policy
//!
//! - A missing width defaults to half the (post-crop) source width.
//! - `cover` without both dimensions, or with the source aspect ratio,
//!   collapses to `contain`.
//! - `contain` is driven by width alone; a height only narrows the width.
//! - Output never exceeds the (post-crop) source. Clamping preserves the
//!   requested aspect ratio.

mod direct;
mod query;
mod resolve;

pub use direct::{DirectParams, Flip, OutputFormat, is_direct_key};
pub use query::serialize;
pub use resolve::build;
pub(crate) use resolve::resolve;

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use crate::geometry::{CropFraction, Dimensions, Hotspot};
use crate::identifier::Asset;

/// Parameter values every URL gets unless the request says otherwise.
///
/// One constant so the canonical URL shape can be audited in one place.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Defaults {
    /// `q` when no quality is passed through.
    pub quality: u32,
    /// `auto` value when no explicit `fm` is passed through.
    pub auto: &'static str,
    /// `fit` for [`FitMode::Contain`].
    pub contain_fit: &'static str,
    /// `fit` for [`FitMode::Cover`].
    pub cover_fit: &'static str,
    /// `crop` strategy for cover requests without a hotspot.
    pub cover_crop: &'static str,
    /// Decimal places kept in `fp-x`/`fp-y`.
    pub focal_point_precision: i32,
    /// Sub-1x srcset candidates narrower than this are dropped.
    pub min_variant_width: u32,
}

pub const DEFAULTS: Defaults = Defaults {
    quality: 75,
    auto: "format",
    contain_fit: "max",
    cover_fit: "crop",
    cover_crop: "entropy",
    focal_point_precision: 3,
    min_variant_width: 50,
};

/// How the requested box is applied.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FitMode {
    /// Fit within the box, keeping the source aspect ratio. Never upscales.
    #[default]
    Contain,
    /// Crop to exactly the requested aspect ratio.
    Cover,
}

/// A request for one image variant.
///
/// Built with chained setters; only `id` is required.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageQuery {
    /// Image identifier, `image-<hash>-<w>x<h>-<ext>`.
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: FitMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hotspot: Option<Hotspot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crop: Option<CropFraction>,
    /// Passthrough parameters.
    #[cfg_attr(feature = "serde", serde(default, alias = "queryParams"))]
    pub params: DirectParams,
}

impl ImageQuery {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode: FitMode::Contain,
            width: None,
            height: None,
            hotspot: None,
            crop: None,
            params: DirectParams::default(),
        }
    }

    /// Query for an asset object, carrying over its crop and hotspot.
    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            crop: asset.crop,
            hotspot: asset.hotspot,
            ..Self::new(asset.asset_id())
        }
    }

    /// Target width in pixels. Zero counts as unset.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Target height in pixels. Zero counts as unset.
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn mode(mut self, mode: FitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn crop(mut self, crop: CropFraction) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn hotspot(mut self, hotspot: Hotspot) -> Self {
        self.hotspot = Some(hotspot);
        self
    }

    pub fn params(mut self, params: DirectParams) -> Self {
        self.params = params;
        self
    }

    /// Same request at a different size, keeping mode, crop, hotspot and params.
    pub(crate) fn resized(&self, width: u32, height: Option<u32>) -> Self {
        Self {
            width: Some(width),
            height,
            ..self.clone()
        }
    }
}

/// Options for [`build`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Populate [`QueryParams::metadata`].
    pub include_metadata: bool,
}

impl BuildOptions {
    pub const fn with_metadata() -> Self {
        Self {
            include_metadata: true,
        }
    }
}

/// A single query parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(Cow<'static, str>),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&'static str> for ParamValue {
    fn from(s: &'static str) -> Self {
        Self::Str(Cow::Borrowed(s))
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Str(Cow::Owned(s))
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Source and output geometry, for diagnostics and `<img>` sizing.
///
/// Never serialized into the query string.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metadata {
    /// Native (uncropped) source dimensions.
    pub source: Dimensions,
    /// Dimensions the CDN will return.
    pub output: Dimensions,
}

/// Resolved CDN parameters for one image request.
///
/// Produced whole by [`build`]; read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryParams {
    entries: BTreeMap<&'static str, ParamValue>,
    width: u32,
    height: Option<u32>,
    metadata: Option<Metadata>,
}

impl QueryParams {
    /// Resolved `w`.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Resolved `h`, present only in cover mode.
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Side-channel geometry, when requested via [`BuildOptions`].
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Canonical query string, keys sorted, no leading `?`.
    pub fn to_query_string(&self) -> String {
        serialize(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::AssetRef;

    #[test]
    fn defaults_are_canonical() {
        assert_eq!(DEFAULTS.quality, 75);
        assert_eq!(DEFAULTS.auto, "format");
        assert_eq!(DEFAULTS.contain_fit, "max");
        assert_eq!(DEFAULTS.cover_fit, "crop");
    }

    #[test]
    fn query_builder_chains() {
        let q = ImageQuery::new("image-ab-10x10-png")
            .width(5)
            .height(4)
            .mode(FitMode::Cover)
            .hotspot(Hotspot::new(0.5, 0.5));
        assert_eq!(q.width, Some(5));
        assert_eq!(q.height, Some(4));
        assert_eq!(q.mode, FitMode::Cover);
        assert!(q.crop.is_none());
    }

    #[test]
    fn from_asset_carries_crop_and_hotspot() {
        let asset = Asset {
            asset: AssetRef::Ref(String::from("image-ab-10x10-png")),
            crop: Some(CropFraction::new(0.1, 0.0, 0.0, 0.0)),
            hotspot: Some(Hotspot::new(0.2, 0.3)),
        };
        let q = ImageQuery::from_asset(&asset);
        assert_eq!(q.id, "image-ab-10x10-png");
        assert_eq!(q.crop, asset.crop);
        assert_eq!(q.hotspot, asset.hotspot);
        assert_eq!(q.mode, FitMode::Contain);
    }

    #[test]
    fn param_value_display() {
        assert_eq!(alloc::format!("{}", ParamValue::from(500u32)), "500");
        assert_eq!(alloc::format!("{}", ParamValue::from(0.333)), "0.333");
        assert_eq!(alloc::format!("{}", ParamValue::from("max")), "max");
        assert_eq!(ParamValue::Int(3).as_float(), Some(3.0));
        assert_eq!(ParamValue::from("x").as_int(), None);
    }
}
