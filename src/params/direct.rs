//! Direct CDN parameters the caller may pass through.
//!
//! Only a small allow-list is accepted. Everything else the CDN understands
//! is either computed by [`build`](super::build) or produces results callers
//! don't want (`dpr`, `or`, `pad`, ...), so unknown keys are rejected instead
//! of forwarded.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use super::ParamValue;
use super::query::{percent_decode, split_pair, split_query};
use crate::error::ImageUrlError;

/// Accepted passthrough keys, including long aliases. Sorted for binary search.
const DIRECT_KEYS: &[&str] = &[
    "blur",
    "flip",
    "fm",
    "format",
    "q",
    "quality",
    "sat",
    "saturation",
    "sharpen",
];

/// Whether `key` (case-insensitive) may be passed through.
pub fn is_direct_key(key: &str) -> bool {
    DIRECT_KEYS.binary_search(&ascii_lowercase(key).as_str()).is_ok()
}

/// Mirror the image horizontally, vertically or both.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Flip {
    H,
    V,
    Hv,
}

impl Flip {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::H => "h",
            Self::V => "v",
            Self::Hv => "hv",
        }
    }
}

/// Explicit output format. Suppresses `auto=format` negotiation.
///
/// Has no effect on SVG sources.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OutputFormat {
    Jpg,
    Pjpg,
    Png,
    Webp,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Pjpg => "pjpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow-listed passthrough parameters.
///
/// Construct with struct update syntax or parse with [`from_query`](Self::from_query).
/// Ranges are checked by [`validate`](Self::validate), which
/// [`build`](super::build) always runs.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DirectParams {
    /// Blur radius, 1–2000.
    pub blur: Option<u32>,
    pub flip: Option<Flip>,
    #[cfg_attr(feature = "serde", serde(alias = "format"))]
    pub fm: Option<OutputFormat>,
    /// Compression quality 0–100. Overrides the default of 75.
    #[cfg_attr(feature = "serde", serde(alias = "quality"))]
    pub q: Option<u32>,
    /// Saturation. The CDN only supports -100 (grayscale).
    #[cfg_attr(feature = "serde", serde(alias = "saturation"))]
    pub sat: Option<i32>,
    /// Sharpen 0–100.
    pub sharpen: Option<u32>,
}

impl DirectParams {
    /// Parse a query string fragment such as `blur=20&flip=hv&q=40`.
    pub fn from_query(query: &str) -> Result<Self, ImageUrlError> {
        let pairs: Vec<(String, String)> = split_query(query)
            .map(|pair| {
                let (k, v) = split_pair(pair);
                (percent_decode(k), percent_decode(v))
            })
            .collect();
        Self::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Parse key/value pairs. Keys are case-insensitive; the last duplicate wins.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ImageUrlError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            params.set(key, value)?;
        }
        params.validate()?;
        Ok(params)
    }

    /// Set one parameter from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ImageUrlError> {
        let key_lower = ascii_lowercase(key);
        let value = value.trim();
        match key_lower.as_str() {
            "blur" => self.blur = Some(parse_u32("blur", value)?),
            "flip" => {
                self.flip = Some(match value {
                    "h" => Flip::H,
                    "v" => Flip::V,
                    "hv" => Flip::Hv,
                    _ => return Err(invalid("flip", value, "expected h|v|hv")),
                });
            }
            "fm" | "format" => {
                self.fm = Some(match value {
                    "jpg" => OutputFormat::Jpg,
                    "pjpg" => OutputFormat::Pjpg,
                    "png" => OutputFormat::Png,
                    "webp" => OutputFormat::Webp,
                    _ => return Err(invalid("fm", value, "expected jpg|pjpg|png|webp")),
                });
            }
            "q" | "quality" => self.q = Some(parse_u32("q", value)?),
            "sat" | "saturation" => {
                self.sat = Some(
                    value
                        .parse::<i32>()
                        .map_err(|_| invalid("sat", value, "expected an integer"))?,
                );
            }
            "sharpen" => self.sharpen = Some(parse_u32("sharpen", value)?),
            _ => {
                return Err(ImageUrlError::InvalidQueryParameter {
                    key: String::from(key),
                });
            }
        }
        Ok(())
    }

    /// Check every set value against the range the CDN accepts.
    pub fn validate(&self) -> Result<(), ImageUrlError> {
        if let Some(b) = self.blur
            && !(1..=2000).contains(&b)
        {
            return Err(invalid("blur", &b.to_string(), "expected 1-2000"));
        }
        if let Some(q) = self.q
            && q > 100
        {
            return Err(invalid("q", &q.to_string(), "expected 0-100"));
        }
        if let Some(s) = self.sat
            && s != -100
        {
            return Err(invalid("sat", &s.to_string(), "only -100 is supported"));
        }
        if let Some(s) = self.sharpen
            && s > 100
        {
            return Err(invalid("sharpen", &s.to_string(), "expected 0-100"));
        }
        Ok(())
    }

    /// Whether no parameter is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set parameters as CDN query entries.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        let blur = self.blur.map(|v| ("blur", ParamValue::Int(v.into())));
        let flip = self
            .flip
            .map(|v| ("flip", ParamValue::Str(Cow::Borrowed(v.as_str()))));
        let fm = self
            .fm
            .map(|v| ("fm", ParamValue::Str(Cow::Borrowed(v.as_str()))));
        let q = self.q.map(|v| ("q", ParamValue::Int(v.into())));
        let sat = self.sat.map(|v| ("sat", ParamValue::Int(v.into())));
        let sharpen = self.sharpen.map(|v| ("sharpen", ParamValue::Int(v.into())));
        [blur, flip, fm, q, sat, sharpen].into_iter().flatten()
    }
}

fn parse_u32(key: &'static str, value: &str) -> Result<u32, ImageUrlError> {
    value
        .parse::<u32>()
        .map_err(|_| invalid(key, value, "expected a non-negative integer"))
}

fn invalid(key: &'static str, value: &str, reason: &'static str) -> ImageUrlError {
    ImageUrlError::InvalidQueryValue {
        key,
        value: String::from(value),
        reason,
    }
}

fn ascii_lowercase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        out.push(b.to_ascii_lowercase() as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_keys_is_sorted() {
        for w in DIRECT_KEYS.windows(2) {
            assert!(w[0] < w[1], "DIRECT_KEYS not sorted: {:?} >= {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn parse_all_keys() {
        let p = DirectParams::from_query("blur=20&flip=hv&fm=webp&q=20&sat=-100&sharpen=42").unwrap();
        assert_eq!(
            p,
            DirectParams {
                blur: Some(20),
                flip: Some(Flip::Hv),
                fm: Some(OutputFormat::Webp),
                q: Some(20),
                sat: Some(-100),
                sharpen: Some(42),
            }
        );
    }

    #[test]
    fn long_aliases_accepted() {
        let p = DirectParams::from_query("?Format=png&quality=30&saturation=-100").unwrap();
        assert_eq!(p.fm, Some(OutputFormat::Png));
        assert_eq!(p.q, Some(30));
        assert_eq!(p.sat, Some(-100));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = DirectParams::from_query("q=30&dpr=2").unwrap_err();
        assert_eq!(
            err,
            ImageUrlError::InvalidQueryParameter {
                key: String::from("dpr")
            }
        );
    }

    #[test]
    fn computed_keys_cannot_be_passed_through() {
        for key in ["w", "h", "fit", "rect", "auto", "crop", "fp-x", "fp-y"] {
            assert!(!is_direct_key(key), "{key} should not be passthrough");
            assert!(DirectParams::from_pairs([(key, "1")]).is_err());
        }
    }

    #[test]
    fn out_of_range_values_rejected() {
        assert!(matches!(
            DirectParams::from_query("blur=0"),
            Err(ImageUrlError::InvalidQueryValue { key: "blur", .. })
        ));
        assert!(DirectParams::from_query("blur=2001").is_err());
        assert!(DirectParams::from_query("q=101").is_err());
        assert!(DirectParams::from_query("sharpen=101").is_err());
        assert!(DirectParams::from_query("sat=-50").is_err());
        assert!(DirectParams::from_query("flip=x").is_err());
        assert!(DirectParams::from_query("fm=gif").is_err());
        assert!(DirectParams::from_query("q=high").is_err());
    }

    #[test]
    fn validate_catches_struct_literals() {
        let p = DirectParams {
            blur: Some(5000),
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn last_duplicate_wins() {
        let p = DirectParams::from_query("q=10&q=90").unwrap();
        assert_eq!(p.q, Some(90));
    }

    #[test]
    fn entries_in_field_order() {
        let p = DirectParams {
            q: Some(37),
            blur: Some(222),
            ..Default::default()
        };
        let keys: Vec<&str> = p.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, ["blur", "q"]);
        assert!(DirectParams::default().is_empty());
    }
}
