//! Responsive `srcset` candidates.
//!
//! The base request is resolved once to find the display width, then
//! re-resolved at each multiplier so the no-upscale clamp applies to every
//! candidate on its own. Candidates that clamp to an already emitted width
//! are dropped.
//!
//! # Example
//!
//! ```
//! use zensrcset::{CdnBase, ImageQuery, srcset};
//!
//! let base = CdnBase::url("/images/").unwrap();
//! let query = ImageQuery::new("image-abc123-1000x1000-jpg").width(600);
//! let set = srcset::build_srcset(&base, &query).unwrap();
//!
//! assert_eq!(set.len(), 4);
//! assert!(set[3].ends_with("w=1000 1000w"));
//! ```

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::ImageUrlError;
use crate::geometry::round_px;
use crate::identifier;
use crate::params::{self, BuildOptions, DEFAULTS, ImageQuery};
use crate::url::CdnBase;

/// Density multipliers for a given display width.
///
/// Narrow images get coarse steps; wide ones get finer steps at the low end,
/// where viewport-relative sizes vary most.
pub fn multipliers(width: u32) -> &'static [f64] {
    match width {
        0..160 => &[0.5, 1.0, 2.0],
        160..750 => &[0.5, 1.0, 1.5, 2.0],
        750..1400 => &[0.25, 0.5, 0.75, 1.0, 1.5, 2.0],
        _ => &[0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0],
    }
}

/// One resolved candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Full URL including query string.
    pub url: String,
    /// Output width, the `w` descriptor.
    pub width: u32,
}

impl Candidate {
    /// `<url> <width>w`.
    pub fn descriptor(&self) -> String {
        alloc::format!("{} {}w", self.url, self.width)
    }
}

/// Resolve every candidate for `query`, ascending by multiplier, one per width.
///
/// SVG sources yield no candidates.
pub fn candidates(base: &CdnBase, query: &ImageQuery) -> Result<Vec<Candidate>, ImageUrlError> {
    if query.id.is_empty() {
        return Err(ImageUrlError::MissingRequiredInput { what: "image id" });
    }
    let parsed = identifier::parse(&query.id)?;
    if parsed.is_svg() {
        return Ok(Vec::new());
    }

    let resolved = params::build(query, BuildOptions::default())?;
    let (w, h) = (resolved.width(), resolved.height());
    let image_url = base.image_url(&query.id);

    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for &multiplier in multipliers(w) {
        let scaled_width = round_px(w as f64 * multiplier);
        let scaled_height = h.map(|h| round_px(h as f64 * multiplier));

        if multiplier < 1.0 && scaled_width < DEFAULTS.min_variant_width {
            tracing::debug!(multiplier, scaled_width, "skipping tiny srcset candidate");
            continue;
        }

        let p = params::build(
            &query.resized(scaled_width, scaled_height),
            BuildOptions::default(),
        )?;
        if !seen.insert(p.width()) {
            tracing::debug!(multiplier, width = p.width(), "srcset candidate clamps to a duplicate width");
            continue;
        }
        out.push(Candidate {
            url: alloc::format!("{image_url}?{}", p.to_query_string()),
            width: p.width(),
        });
    }
    Ok(out)
}

/// Build `srcset` entries of the form `<url> <width>w`.
pub fn build_srcset(base: &CdnBase, query: &ImageQuery) -> Result<Vec<String>, ImageUrlError> {
    Ok(candidates(base, query)?
        .iter()
        .map(Candidate::descriptor)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CropFraction;
    use crate::params::FitMode;

    const ID: &str = "image-abc123-1000x1000-png";

    fn widths(query: &ImageQuery) -> Vec<u32> {
        let base = CdnBase::url("/image/").unwrap();
        candidates(&base, query)
            .unwrap()
            .into_iter()
            .map(|c| c.width)
            .collect()
    }

    #[test]
    fn multiplier_bands() {
        assert_eq!(multipliers(0).len(), 3);
        assert_eq!(multipliers(159), &[0.5, 1.0, 2.0]);
        assert_eq!(multipliers(160), &[0.5, 1.0, 1.5, 2.0]);
        assert_eq!(multipliers(749).len(), 4);
        assert_eq!(multipliers(750).len(), 6);
        assert_eq!(multipliers(1399).len(), 6);
        assert_eq!(multipliers(1400).len(), 8);
        assert_eq!(multipliers(u32::MAX).len(), 8);
    }

    #[test]
    fn mid_size_widths() {
        assert_eq!(widths(&ImageQuery::new(ID).width(500)), [250, 500, 750, 1000]);
    }

    #[test]
    fn never_upscales() {
        assert_eq!(widths(&ImageQuery::new(ID).width(1000)), [250, 500, 750, 1000]);
        assert_eq!(widths(&ImageQuery::new(ID).width(2000)), [250, 500, 750, 1000]);
        assert_eq!(widths(&ImageQuery::new(ID).width(600)), [300, 600, 900, 1000]);
    }

    #[test]
    fn small_and_tiny() {
        assert_eq!(widths(&ImageQuery::new(ID).width(100)), [50, 100, 200]);
        assert_eq!(widths(&ImageQuery::new(ID).width(60)), [60, 120]);
    }

    #[test]
    fn cover_candidates_track_height() {
        let q = ImageQuery::new(ID)
            .crop(CropFraction::new(0.0, 0.25, 0.0, 0.25))
            .width(300)
            .height(500)
            .mode(FitMode::Cover);
        let base = CdnBase::url("/image/").unwrap();
        let c = candidates(&base, &q).unwrap();
        assert_eq!(c.len(), 3);
        assert!(c[0].url.contains("h=250"));
        assert!(c[2].url.contains("h=750"));
        assert_eq!(c[2].width, 450);
    }

    #[test]
    fn svg_has_no_candidates() {
        assert!(widths(&ImageQuery::new("image-abc123-64x64-svg").width(64)).is_empty());
    }

    #[test]
    fn descriptor_format() {
        let c = Candidate {
            url: String::from("/a.png?w=10"),
            width: 10,
        };
        assert_eq!(c.descriptor(), "/a.png?w=10 10w");
    }
}
