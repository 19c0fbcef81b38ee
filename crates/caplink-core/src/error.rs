//! Warning and error types for the linking core.
//!
//! The core never fails on geometric input: every miss degrades to a fallback
//! region, a skipped merge, or an absent map entry. Issues that would
//! otherwise be silent are surfaced as [`LayoutWarning`]s so callers can
//! diagnose why a caption ended up without a region. The only hard failure
//! the core can produce is [`PatternError`], raised when user-supplied
//! caption prefixes compile into an invalid pattern.

use std::fmt;

/// Machine-readable warning code for categorizing linking issues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum LayoutWarningCode {
    /// A table caption had no usable rule evidence; a fixed-height region was
    /// synthesized below the caption.
    FallbackRegion,
    /// A resolved table candidate duplicated an existing region and all
    /// retries were exhausted; no region was recorded for the caption.
    DuplicateRegion,
    /// No rule run survived direction and neighbor-boundary filtering for a
    /// table caption; no region was recorded.
    RegionNotFound,
    /// A caption re-detected inside a cluster duplicated an existing label on
    /// the same page and was dropped.
    DuplicateCaption,
    /// A figure caption could not be matched to any cluster.
    UnmatchedCaption,
    /// An absorption candidate union would have conflicted with another
    /// drawn rectangle, table region, or caption; the cluster was left
    /// unmatched.
    AbsorptionConflict,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl LayoutWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            LayoutWarningCode::FallbackRegion => "FALLBACK_REGION",
            LayoutWarningCode::DuplicateRegion => "DUPLICATE_REGION",
            LayoutWarningCode::RegionNotFound => "REGION_NOT_FOUND",
            LayoutWarningCode::DuplicateCaption => "DUPLICATE_CAPTION",
            LayoutWarningCode::UnmatchedCaption => "UNMATCHED_CAPTION",
            LayoutWarningCode::AbsorptionConflict => "ABSORPTION_CONFLICT",
            LayoutWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for LayoutWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue encountered while linking one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutWarning {
    /// Category of the warning.
    pub code: LayoutWarningCode,
    /// Page the warning was produced on (0-based).
    pub page: usize,
    /// Human-readable description.
    pub message: String,
}

impl LayoutWarning {
    pub fn new(code: LayoutWarningCode, page: usize, message: impl Into<String>) -> Self {
        Self {
            code,
            page,
            message: message.into(),
        }
    }
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] page {}: {}", self.code, self.page, self.message)
    }
}

/// A caption pattern failed to compile.
///
/// Only reachable through user-supplied prefix synonyms; the built-in
/// defaults always compile.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternError(pub String);

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid caption pattern: {}", self.0)
    }
}

impl std::error::Error for PatternError {}
