//! Caption classification.
//!
//! A caption is a short labeled text block such as `"Table 1."` or
//! `"Fig. 3:"`. Classification is purely textual: strip all whitespace, match
//! a case-insensitive prefix synonym followed by a number, and require
//! exactly one trailing character that is neither alphanumeric nor
//! whitespace. The trailing-character guard rejects false positives like
//! `"Figure 3D"` or `"Table 2 is shown"`.

use regex::Regex;

use crate::error::PatternError;
use crate::geometry::BBox;

/// What a caption labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaptionKind {
    Table,
    Figure,
}

impl CaptionKind {
    pub fn as_str(&self) -> &str {
        match self {
            CaptionKind::Table => "Table",
            CaptionKind::Figure => "Figure",
        }
    }
}

impl std::fmt::Display for CaptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified caption on a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Caption {
    /// Bounding box of the caption text block.
    pub bbox: BBox,
    /// Normalized label, e.g. `"Table 1"` or `"Figure 2.1"`.
    pub label: String,
    /// Raw caption text as extracted.
    pub text: String,
    /// Page the caption appears on (0-based).
    pub page: usize,
    /// Whether the caption labels a table or a figure.
    pub kind: CaptionKind,
}

/// Prefix synonyms recognized by the classifier.
///
/// Localized synonyms can be appended to either list; entries are matched
/// literally (regex metacharacters are escaped), case-insensitively, with an
/// optional trailing period before the number.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptionRules {
    /// Figure prefix synonyms. Default: `fig`, `figure`.
    pub figure_prefixes: Vec<String>,
    /// Table prefix synonyms. Default: `table`.
    pub table_prefixes: Vec<String>,
}

impl Default for CaptionRules {
    fn default() -> Self {
        Self {
            figure_prefixes: vec!["fig".to_string(), "figure".to_string()],
            table_prefixes: vec!["table".to_string()],
        }
    }
}

/// Result of a successful classification.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionMatch {
    pub kind: CaptionKind,
    /// The caption number as written, e.g. `"1"` or `"2.3"`.
    pub number: String,
}

impl CaptionMatch {
    /// Normalized label used as the document-wide key, e.g. `"Figure 2.3"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.kind, self.number)
    }
}

/// Compiled caption classifier.
///
/// Built once per document from [`CaptionRules`] and shared across pages.
#[derive(Debug, Clone)]
pub struct CaptionClassifier {
    figure_re: Regex,
    table_re: Regex,
}

impl CaptionClassifier {
    /// Compile the prefix synonyms into match patterns.
    pub fn new(rules: &CaptionRules) -> Result<Self, PatternError> {
        Ok(Self {
            figure_re: compile_prefixes(&rules.figure_prefixes)?,
            table_re: compile_prefixes(&rules.table_prefixes)?,
        })
    }

    /// Classify a text block.
    ///
    /// Whitespace is stripped before matching, so `"Table 1."` and
    /// `"Table1."` classify identically. Returns `None` when the text is not
    /// a caption, including when the character after the number is
    /// alphanumeric (`"Figure 3D"`).
    pub fn classify(&self, text: &str) -> Option<CaptionMatch> {
        let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if let Some(number) = match_prefix(&self.figure_re, &stripped) {
            return Some(CaptionMatch {
                kind: CaptionKind::Figure,
                number,
            });
        }
        if let Some(number) = match_prefix(&self.table_re, &stripped) {
            return Some(CaptionMatch {
                kind: CaptionKind::Table,
                number,
            });
        }
        None
    }
}

fn compile_prefixes(prefixes: &[String]) -> Result<Regex, PatternError> {
    let alternation = prefixes
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)^(?:{alternation})\.?(\d+(?:\.\d+)?)(.)");
    Regex::new(&pattern).map_err(|e| PatternError(e.to_string()))
}

fn match_prefix(re: &Regex, stripped: &str) -> Option<String> {
    let caps = re.captures(stripped)?;
    let trailing = caps.get(2)?.as_str().chars().next()?;
    // One punctuation character must follow the number; an alphanumeric
    // continuation means the "number" was part of a longer token.
    if trailing.is_alphanumeric() || trailing.is_whitespace() {
        return None;
    }
    Some(caps.get(1)?.as_str().to_string())
}
