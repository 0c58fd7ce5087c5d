//! Full image URLs.
//!
//! A [`CdnBase`] says where a project's images live. [`build_src`] joins it
//! with the identifier's path fragment and the canonical query string, and
//! reports the output dimensions for `<img width height>`.
//!
//! # Example
//!
//! ```
//! use zensrcset::{CdnBase, ImageQuery, build_src};
//!
//! let base = CdnBase::project("abc", "production").unwrap();
//! let image = build_src(&base, &ImageQuery::new("image-abc123-1000x1000-jpg")).unwrap();
//!
//! assert_eq!(
//!     image.src,
//!     "https://cdn.sanity.io/images/abc/production/abc123-1000x1000.jpg?auto=format&fit=max&q=75&w=500"
//! );
//! assert_eq!((image.width, image.height), (500, 500));
//! ```

use alloc::string::String;

use crate::error::ImageUrlError;
use crate::identifier;
use crate::params::{self, ImageQuery};

/// CDN host for project/dataset addressing.
pub const CDN_HOST: &str = "https://cdn.sanity.io/images/";

/// Base URL images are served under, ending where the path fragment starts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "CdnConfig", into = "CdnConfig")
)]
pub struct CdnBase {
    base: String,
}

impl CdnBase {
    /// Use an explicit base URL such as `https://cdn.example.com/images/p/d/`.
    ///
    /// The value is used verbatim; include the trailing `/`.
    pub fn url(base: impl Into<String>) -> Result<Self, ImageUrlError> {
        let base = base.into();
        if base.is_empty() {
            return Err(ImageUrlError::MissingRequiredInput { what: "base url" });
        }
        Ok(Self { base })
    }

    /// Derive the base URL from a project id and dataset.
    pub fn project(project_id: &str, dataset: &str) -> Result<Self, ImageUrlError> {
        if project_id.is_empty() {
            return Err(ImageUrlError::MissingRequiredInput { what: "project id" });
        }
        if dataset.is_empty() {
            return Err(ImageUrlError::MissingRequiredInput { what: "dataset" });
        }
        Ok(Self {
            base: alloc::format!("{CDN_HOST}{project_id}/{dataset}/"),
        })
    }

    /// Pick an explicit base URL if given, else a project id and dataset.
    pub fn resolve(
        base_url: Option<&str>,
        project_id: Option<&str>,
        dataset: Option<&str>,
    ) -> Result<Self, ImageUrlError> {
        match (base_url, project_id, dataset) {
            (Some(base), _, _) if !base.is_empty() => Self::url(base),
            (_, Some(project_id), Some(dataset)) => Self::project(project_id, dataset),
            _ => Err(ImageUrlError::MissingRequiredInput {
                what: "base url or project id and dataset",
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Image URL without a query string.
    pub fn image_url(&self, id: &str) -> String {
        let mut out = self.base.clone();
        out.push_str(&identifier::to_path(id));
        out
    }
}

/// Serialized form of [`CdnBase`]: `{ base_url }` or `{ project_id, dataset }`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct CdnConfig {
    #[serde(default, alias = "baseUrl", skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, alias = "projectId", skip_serializing_if = "Option::is_none")]
    project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<CdnConfig> for CdnBase {
    type Error = ImageUrlError;

    fn try_from(c: CdnConfig) -> Result<Self, Self::Error> {
        Self::resolve(
            c.base_url.as_deref(),
            c.project_id.as_deref(),
            c.dataset.as_deref(),
        )
    }
}

#[cfg(feature = "serde")]
impl From<CdnBase> for CdnConfig {
    fn from(b: CdnBase) -> Self {
        Self {
            base_url: Some(b.base),
            project_id: None,
            dataset: None,
        }
    }
}

/// A single image URL with its output dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComputedImage {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

/// Build the default `src` for `query`.
///
/// SVG sources are routed to [`build_svg_attributes`].
pub fn build_src(base: &CdnBase, query: &ImageQuery) -> Result<ComputedImage, ImageUrlError> {
    if query.id.is_empty() {
        return Err(ImageUrlError::MissingRequiredInput { what: "image id" });
    }
    if identifier::parse(&query.id)?.is_svg() {
        return build_svg_attributes(base, &query.id);
    }

    let (p, metadata) = params::resolve(query)?;
    Ok(ComputedImage {
        src: alloc::format!("{}?{}", base.image_url(&query.id), p.to_query_string()),
        width: metadata.output.width,
        height: metadata.output.height,
    })
}

/// Bare URL and native dimensions for a vector source. No query string.
pub fn build_svg_attributes(base: &CdnBase, id: &str) -> Result<ComputedImage, ImageUrlError> {
    let parsed = identifier::parse(id)?;
    tracing::debug!(id, "svg source, skipping resize parameters");
    Ok(ComputedImage {
        src: alloc::format!("{}{}", base.as_str(), parsed.path()),
        width: parsed.dimensions.width,
        height: parsed.dimensions.height,
    })
}
