//! Image identifier parsing.
//!
//! Identifiers look like `image-<hash>-<width>x<height>-<ext>`, e.g.
//! `image-abcd1234-100x2000-jpg`. The hash is lowercase hex, dimensions are
//! decimal pixel counts and the extension is a word token.
//!
//! Hand-rolled matcher, no regex engine.
//!
//! # Example
//!
//! ```
//! use zensrcset::identifier;
//!
//! let parsed = identifier::parse("image-abcd1234-100x2000-jpg").unwrap();
//! assert_eq!(parsed.asset_id, "abcd1234");
//! assert_eq!(parsed.dimensions.width, 100);
//! assert_eq!(parsed.dimensions.aspect_ratio, 0.05);
//! assert_eq!(identifier::to_path("image-abcd1234-100x2000-jpg"), "abcd1234-100x2000.jpg");
//! ```

use alloc::string::String;

use crate::error::ImageUrlError;
use crate::geometry::{CropFraction, Dimensions, Hotspot};

const PREFIX: &str = "image-";

/// Components of a well-formed identifier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParsedId<'a> {
    /// Content hash.
    pub asset_id: &'a str,
    /// Native pixel dimensions.
    pub dimensions: Dimensions,
    /// File extension (`jpg`, `png`, `svg`, ...).
    pub format: &'a str,
}

impl ParsedId<'_> {
    /// Rebuild the URL path fragment `<hash>-<w>x<h>.<ext>`.
    pub fn path(&self) -> String {
        alloc::format!(
            "{}-{}x{}.{}",
            self.asset_id,
            self.dimensions.width,
            self.dimensions.height,
            self.format
        )
    }

    /// Whether the source is a vector image.
    pub fn is_svg(&self) -> bool {
        self.format == "svg"
    }
}

/// Parse an identifier into hash, dimensions and format.
pub fn parse(id: &str) -> Result<ParsedId<'_>, ImageUrlError> {
    let rest = id
        .strip_prefix(PREFIX)
        .ok_or_else(|| ImageUrlError::malformed(id, "missing `image-` prefix"))?;

    let mut parts = rest.split('-');
    let (Some(hash), Some(dims), Some(format), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ImageUrlError::malformed(
            id,
            "expected image-<hash>-<width>x<height>-<ext>",
        ));
    };

    if hash.is_empty() || !hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(ImageUrlError::malformed(id, "hash is not lowercase hex"));
    }
    if format.is_empty() || !format.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(ImageUrlError::malformed(id, "extension is not a word"));
    }

    let (w, h) = dims
        .split_once('x')
        .ok_or_else(|| ImageUrlError::malformed(id, "dimensions are not <width>x<height>"))?;
    let width = parse_dimension(w).ok_or_else(|| ImageUrlError::malformed(id, "invalid width"))?;
    let height =
        parse_dimension(h).ok_or_else(|| ImageUrlError::malformed(id, "invalid height"))?;

    Ok(ParsedId {
        asset_id: hash,
        dimensions: Dimensions::new(width, height),
        format,
    })
}

/// Digits only, no sign, nonzero.
fn parse_dimension(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().filter(|&v| v > 0)
}

/// Convert an identifier straight into its path fragment without validating it.
///
/// Drops the `image-` prefix and turns the last `-` into `.`. Garbage in,
/// garbage out: call [`parse`] first when the input is untrusted.
pub fn to_path(id: &str) -> String {
    let rest = id.strip_prefix(PREFIX).unwrap_or(id);
    match rest.rfind('-') {
        Some(pos) => {
            let mut out = String::with_capacity(rest.len());
            out.push_str(&rest[..pos]);
            out.push('.');
            out.push_str(&rest[pos + 1..]);
            out
        }
        None => String::from(rest),
    }
}

// ---- Asset adapter ----

/// Reference to an image asset: either an `_id` or a `_ref` field.
///
/// Both carry the same identifier string. Deserializes from an object with
/// either field (`_id` wins when both are present); other fields such as
/// `_type` are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "AssetRefFields", into = "AssetRefFields"))]
pub enum AssetRef {
    Id(String),
    Ref(String),
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct AssetRefFields {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<AssetRefFields> for AssetRef {
    type Error = ImageUrlError;

    fn try_from(f: AssetRefFields) -> Result<Self, Self::Error> {
        match (f.id, f.reference) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(reference)) => Ok(Self::Ref(reference)),
            (None, None) => Err(ImageUrlError::MissingRequiredInput {
                what: "asset `_id` or `_ref`",
            }),
        }
    }
}

#[cfg(feature = "serde")]
impl From<AssetRef> for AssetRefFields {
    fn from(r: AssetRef) -> Self {
        match r {
            AssetRef::Id(id) => Self {
                id: Some(id),
                reference: None,
            },
            AssetRef::Ref(reference) => Self {
                id: None,
                reference: Some(reference),
            },
        }
    }
}

impl AssetRef {
    /// The identifier string, whichever field carried it.
    pub fn asset_id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Ref(id) => id,
        }
    }

    /// Normalize to the `_id` form.
    pub fn normalize(self) -> Self {
        match self {
            Self::Ref(id) => Self::Id(id),
            id => id,
        }
    }
}

/// An image asset with editor-supplied crop and hotspot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Asset {
    pub asset: AssetRef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crop: Option<CropFraction>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hotspot: Option<Hotspot>,
}

impl Asset {
    pub fn new(asset: AssetRef) -> Self {
        Self {
            asset,
            crop: None,
            hotspot: None,
        }
    }

    pub fn asset_id(&self) -> &str {
        self.asset.asset_id()
    }
}
