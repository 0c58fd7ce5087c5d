//! Responsive image URL computation for a query-parameter image CDN.
//!
//! Pure string and geometry work: no I/O, no pixel operations, `no_std`
//! compatible (with `alloc`).
//!
//! # Modules
//!
//! - [`identifier`]: Image id parsing (`image-<hash>-<w>x<h>-<ext>`) and asset references
//! - [`geometry`]: Fractional crops, pixel rects, hotspot remapping
//! - [`params`]: Query parameter resolution, passthrough allow-list, serialization
//! - [`srcset`]: Responsive candidate lists
//! - [`url`]: CDN base configuration and full `src` URLs
//! - [`attributes`]: `<img>` attribute sets
//!
//! # Example
//!
//! ```
//! use zensrcset::{CdnBase, FitMode, Hotspot, ImageQuery, build_src, build_srcset};
//!
//! let base = CdnBase::url("/images/").unwrap();
//! let query = ImageQuery::new("image-abc123-1000x1000-jpg")
//!     .width(300)
//!     .height(100)
//!     .mode(FitMode::Cover)
//!     .hotspot(Hotspot::new(0.25, 0.75));
//!
//! let image = build_src(&base, &query).unwrap();
//! assert_eq!(
//!     image.src,
//!     "/images/abc123-1000x1000.jpg?auto=format&fit=crop&fp-x=0.25&fp-y=0.75&h=100&q=75&w=300"
//! );
//! assert_eq!(build_srcset(&base, &query).unwrap().len(), 4);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod attributes;
pub mod error;
pub mod geometry;
pub mod identifier;
pub mod params;
pub mod srcset;
pub mod url;

pub use attributes::{HtmlOverrides, ImageAttributes};
pub use error::ImageUrlError;
pub use geometry::{CropFraction, Dimensions, FocalPoint, Hotspot, Rect};
pub use identifier::{Asset, AssetRef, ParsedId};
pub use params::{
    BuildOptions, DEFAULTS, DirectParams, FitMode, Flip, ImageQuery, Metadata, OutputFormat,
    ParamValue, QueryParams,
};
pub use srcset::build_srcset;
pub use url::{CdnBase, ComputedImage, build_src, build_svg_attributes};
