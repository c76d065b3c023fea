//! Image inventory filtering.
//!
//! [`apply`] is a pure function over an already fetched inventory. Every
//! criterion is optional and the active ones combine with AND; the optional
//! limit is applied last and keeps the original order.

use crate::models::ImageSummary;

/// Bytes in one binary megabyte.
pub const BYTES_PER_MB: u64 = 1_048_576;

/// Caller-supplied filter criteria. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// At least one tag must start with this prefix (case-sensitive)
    pub tag_prefix: Option<String>,
    /// Inclusive lower bound on the creation time, Unix seconds
    pub created_since: Option<i64>,
    /// Inclusive lower bound on the size, binary megabytes
    pub min_size_mb: Option<u64>,
    /// Inclusive upper bound on the size, binary megabytes
    pub max_size_mb: Option<u64>,
    /// Maximum number of images returned
    pub limit: Option<usize>,
}

impl FilterCriteria {
    /// True when no criterion constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.tag_prefix.is_none()
            && self.created_since.is_none()
            && self.min_size_mb.is_none()
            && self.max_size_mb.is_none()
            && self.limit.is_none()
    }

    /// Evaluates the per-record predicates. The limit is not a predicate.
    pub fn matches(&self, image: &ImageSummary) -> bool {
        if let Some(prefix) = &self.tag_prefix {
            if !image.repo_tags.iter().any(|tag| tag.starts_with(prefix.as_str())) {
                return false;
            }
        }

        if let Some(since) = self.created_since {
            if image.created < since {
                return false;
            }
        }

        if let Some(min) = self.min_size_mb {
            if image.size < min.saturating_mul(BYTES_PER_MB) {
                return false;
            }
        }

        if let Some(max) = self.max_size_mb {
            if image.size > max.saturating_mul(BYTES_PER_MB) {
                return false;
            }
        }

        true
    }
}

/// Filters `images` by `criteria`, preserving relative order.
///
/// With no active criterion the inventory is returned as is.
pub fn apply(images: Vec<ImageSummary>, criteria: &FilterCriteria) -> Vec<ImageSummary> {
    if criteria.is_unconstrained() {
        return images;
    }

    let limit = criteria.limit.unwrap_or(usize::MAX);

    images
        .into_iter()
        .filter(|image| criteria.matches(image))
        .take(limit)
        .collect()
}
