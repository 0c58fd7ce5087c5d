//! Resolution of an [`ImageQuery`] into [`QueryParams`].

use alloc::collections::BTreeMap;
use alloc::string::ToString;

use super::{BuildOptions, DEFAULTS, FitMode, ImageQuery, Metadata, ParamValue, QueryParams};
use crate::error::ImageUrlError;
use crate::geometry::{self, Dimensions, round_px};
use crate::identifier;

/// Build the canonical parameter set for one image request.
///
/// Fails on a malformed identifier, an invalid crop, or passthrough
/// values outside the CDN's accepted ranges.
pub fn build(query: &ImageQuery, options: BuildOptions) -> Result<QueryParams, ImageUrlError> {
    let (mut params, metadata) = resolve(query)?;
    if options.include_metadata {
        params.metadata = Some(metadata);
    }
    Ok(params)
}

/// [`build`] plus the output geometry, always computed.
pub(crate) fn resolve(query: &ImageQuery) -> Result<(QueryParams, Metadata), ImageUrlError> {
    if query.id.is_empty() {
        return Err(ImageUrlError::MissingRequiredInput { what: "image id" });
    }
    let source = identifier::parse(&query.id)?.dimensions;
    query.params.validate()?;

    // Step 1: Effective bounds are the post-crop source.
    let bounds = match &query.crop {
        Some(crop) => geometry::cropped_size(source, crop)?,
        None => source,
    };
    let aspect = bounds.aspect_ratio;

    // Step 2: Resolve a missing width.
    let mut mode = query.mode;
    let mut height = query.height.filter(|&h| h > 0);
    let mut width = match query.width.filter(|&w| w > 0) {
        Some(w) => w,
        None => match height.take() {
            // Height alone: convert to width, contain mode follows below.
            Some(h) => round_px(h as f64 * aspect).max(1),
            None => {
                let w = round_px(bounds.width as f64 / 2.0).max(1);
                tracing::debug!(width = w, max_width = bounds.width, "defaulting to half source width");
                w
            }
        },
    };

    // Step 3: Mode normalization.
    if mode == FitMode::Cover
        && height.is_none_or(|h| width as f64 / h as f64 == aspect)
    {
        tracing::debug!(width, ?height, aspect, "cover request collapses to contain");
        mode = FitMode::Contain;
    } else if mode == FitMode::Contain
        && let Some(h) = height.take()
    {
        let folded = width.min(round_px(h as f64 * aspect).max(1));
        tracing::debug!(width, height = h, folded, "folding height into width");
        width = folded;
    }

    // Step 4: Never upscale; clamp preserving the requested aspect ratio.
    if width > bounds.width || height.is_some_and(|h| h > bounds.height) {
        let requested = match height {
            Some(h) => width as f64 / h as f64,
            None => aspect,
        };
        let (w, h) = if requested >= aspect {
            let w = bounds.width;
            (w, height.map(|_| round_px(w as f64 / requested).max(1)))
        } else {
            let h = bounds.height;
            (round_px(h as f64 * requested).max(1), Some(h))
        };
        tracing::debug!(
            width,
            ?height,
            clamped_width = w,
            clamped_height = ?h,
            "clamping to source bounds"
        );
        width = w;
        height = h;
    }

    // Step 5: Base parameters, passthrough on top of defaults.
    let mut entries: BTreeMap<&'static str, ParamValue> = BTreeMap::new();
    entries.insert("w", width.into());
    entries.insert("q", DEFAULTS.quality.into());
    entries.extend(query.params.entries());

    // Step 6: Content-negotiated format unless one is forced.
    if query.params.fm.is_none() {
        entries.insert("auto", DEFAULTS.auto.into());
    }

    // Step 7: Crop rectangle.
    if let Some(crop) = &query.crop {
        let rect = geometry::build_rect(source, crop)?;
        entries.insert("rect", rect.to_string().into());
    }

    // Step 8: Mode-specific parameters.
    let emitted_height = match mode {
        FitMode::Cover => {
            entries.insert("fit", DEFAULTS.cover_fit.into());
            if let Some(h) = height {
                entries.insert("h", h.into());
            }
            match query.hotspot {
                Some(hotspot) => {
                    let fp = geometry::focal_point(hotspot, query.crop.as_ref());
                    entries.insert("fp-x", fp.x.into());
                    entries.insert("fp-y", fp.y.into());
                }
                None => {
                    entries.insert("crop", DEFAULTS.cover_crop.into());
                }
            }
            height
        }
        FitMode::Contain => {
            entries.insert("fit", DEFAULTS.contain_fit.into());
            None
        }
    };

    // Step 9: Side-channel metadata.
    // Height survives here when cover collapsed on an exact aspect match.
    let output_height = height.unwrap_or_else(|| round_px(width as f64 / aspect).max(1));
    let metadata = Metadata {
        source,
        output: Dimensions::new(width, output_height),
    };

    let params = QueryParams {
        entries,
        width,
        height: emitted_height,
        metadata: None,
    };
    Ok((params, metadata))
}
