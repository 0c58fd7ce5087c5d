//! Error type shared by every fallible operation in the crate.
//!
//! Nothing here is recoverable: all variants describe input the caller
//! built incorrectly, so they surface synchronously and are never retried.

use alloc::string::String;

/// Image URL computation error.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ImageUrlError {
    /// Identifier does not match `image-<hex>-<w>x<h>-<ext>`, or its
    /// dimensions are zero or out of range.
    #[error("could not parse image id {id:?}: {reason}")]
    MalformedIdentifier { id: String, reason: &'static str },

    /// Crop fractions sum to 1 or more on an axis, or are not finite
    /// non-negative numbers.
    #[error(
        "invalid crop (top={top}, bottom={bottom}, left={left}, right={right}): \
         fractions must be non-negative and sum to less than 1 per axis"
    )]
    InvalidCrop {
        top: f64,
        bottom: f64,
        left: f64,
        right: f64,
    },

    /// Passthrough key is not on the direct parameter allow-list.
    #[error("query parameter {key:?} is not supported")]
    InvalidQueryParameter { key: String },

    /// Allow-listed key with a value the CDN does not accept.
    #[error("query parameter {key}={value:?} is invalid: {reason}")]
    InvalidQueryValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Identifier or base URL missing at the boundary.
    #[error("missing required input: {what}")]
    MissingRequiredInput { what: &'static str },
}

impl ImageUrlError {
    pub(crate) fn malformed(id: &str, reason: &'static str) -> Self {
        Self::MalformedIdentifier {
            id: String::from(id),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_offending_input() {
        let e = ImageUrlError::malformed("image-zz-1x1-png", "hash is not hex");
        assert_eq!(
            e.to_string(),
            "could not parse image id \"image-zz-1x1-png\": hash is not hex"
        );

        let e = ImageUrlError::InvalidQueryParameter {
            key: String::from("dpr"),
        };
        assert_eq!(e.to_string(), "query parameter \"dpr\" is not supported");
    }
}
