//! `<img>` attribute sets.
//!
//! Everything a rendering layer needs to emit one responsive image: the
//! default `src`, the joined `srcset`, intrinsic `width`/`height` to avoid
//! layout shift, and the usual `alt`/`loading` defaults. Rendering itself
//! is left to the caller.

use alloc::string::String;

use crate::error::ImageUrlError;
use crate::params::ImageQuery;
use crate::srcset;
use crate::url::{self, CdnBase};

/// Caller-supplied values that win over computed ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HtmlOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// HTML `id` attribute.
    pub id: Option<String>,
    pub alt: Option<String>,
    pub loading: Option<String>,
}

/// Resolved `<img>` attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageAttributes {
    pub src: String,
    /// Candidates joined with `", "`. Empty for SVG sources.
    pub srcset: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
    pub loading: String,
    pub id: Option<String>,
}

impl ImageAttributes {
    pub fn build(
        base: &CdnBase,
        query: &ImageQuery,
        overrides: &HtmlOverrides,
    ) -> Result<Self, ImageUrlError> {
        let image = url::build_src(base, query)?;
        let srcset = srcset::build_srcset(base, query)?;

        Ok(Self {
            src: image.src,
            srcset: srcset.join(", "),
            width: overrides.width.unwrap_or(image.width),
            height: overrides.height.unwrap_or(image.height),
            alt: overrides.alt.clone().unwrap_or_default(),
            loading: overrides
                .loading
                .clone()
                .unwrap_or_else(|| String::from("lazy")),
            id: overrides.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FitMode;

    const ID: &str = "image-abc123-1000x1000-jpg";

    fn base() -> CdnBase {
        CdnBase::url("/images/").unwrap()
    }

    #[test]
    fn defaults() {
        let attrs =
            ImageAttributes::build(&base(), &ImageQuery::new(ID).width(100), &HtmlOverrides::default())
                .unwrap();
        assert_eq!(attrs.src, "/images/abc123-1000x1000.jpg?auto=format&fit=max&q=75&w=100");
        assert_eq!(
            attrs.srcset,
            "/images/abc123-1000x1000.jpg?auto=format&fit=max&q=75&w=50 50w, \
             /images/abc123-1000x1000.jpg?auto=format&fit=max&q=75&w=100 100w, \
             /images/abc123-1000x1000.jpg?auto=format&fit=max&q=75&w=200 200w"
        );
        assert_eq!((attrs.width, attrs.height), (100, 100));
        assert_eq!(attrs.alt, "");
        assert_eq!(attrs.loading, "lazy");
        assert_eq!(attrs.id, None);
    }

    #[test]
    fn overrides_win() {
        let overrides = HtmlOverrides {
            width: Some(320),
            height: Some(180),
            id: Some(String::from("hero")),
            alt: Some(String::from("A hill")),
            loading: Some(String::from("eager")),
        };
        let q = ImageQuery::new(ID).width(640).height(360).mode(FitMode::Cover);
        let attrs = ImageAttributes::build(&base(), &q, &overrides).unwrap();
        assert!(attrs.src.contains("h=360"));
        assert_eq!((attrs.width, attrs.height), (320, 180));
        assert_eq!(attrs.alt, "A hill");
        assert_eq!(attrs.loading, "eager");
        assert_eq!(attrs.id.as_deref(), Some("hero"));
    }

    #[test]
    fn svg_has_empty_srcset() {
        let q = ImageQuery::new("image-abc123-64x64-svg");
        let attrs = ImageAttributes::build(&base(), &q, &HtmlOverrides::default()).unwrap();
        assert_eq!(attrs.src, "/images/abc123-64x64.svg");
        assert!(attrs.srcset.is_empty());
        assert_eq!((attrs.width, attrs.height), (64, 64));
    }
}
