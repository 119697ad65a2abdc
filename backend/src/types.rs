//! Shared types: error taxonomy, extraction policy options and the
//! assembled monument record handed to the presentation layer.

use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::metadata::MonumentMetadata;

/// The one fatal, per-document error: the byte stream is not well-formed XML.
///
/// Everything past a successful parse is fail-soft and degrades to empty or
/// sentinel values instead of erroring.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed XML at byte {position}: {message}")]
pub struct MalformedXml {
    pub position: usize,
    pub message: String,
}

/// Advisory finding about missing top-level TEI structure.
///
/// One warning per missing expected section, never per missing leaf field,
/// so sparsely encoded legacy documents don't flood the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StructuralWarning {
    /// Root element is not `TEI` in the TEI namespace.
    UnexpectedRoot { found: String },
    /// No `teiHeader` under the root.
    MissingHeader,
    /// No `text` section under the root.
    MissingText,
    /// A `text` section exists but has no `body`.
    MissingBody,
}

impl std::fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructuralWarning::UnexpectedRoot { found } =>
                write!(f, "root element is {}, expected TEI", found),
            StructuralWarning::MissingHeader => write!(f, "missing teiHeader section"),
            StructuralWarning::MissingText => write!(f, "missing text section"),
            StructuralWarning::MissingBody => write!(f, "text section has no body"),
        }
    }
}

/// How apparatus entries are flattened to plain text.
///
/// The two digitization dashboards this replaces disagreed on the policy, so
/// the choice is an explicit flag rather than a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApparatusStyle {
    /// One line per `app` entry: `Line <loc>: <note>`, regardless of language.
    LocationBased,
    /// Only entries whose `xml:lang` matches the note language, note text only.
    LanguageFiltered,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid ApparatusStyle value: {0}")]
pub struct ParseApparatusStyleError(String);

impl FromStr for ApparatusStyle {
    type Err = ParseApparatusStyleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "location-based" => Ok(ApparatusStyle::LocationBased),
            "language-filtered" => Ok(ApparatusStyle::LanguageFiltered),
            _ => Err(ParseApparatusStyleError(s.to_string())),
        }
    }
}

/// How bibliography entries are flattened to plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BibliographyStyle {
    /// Assemble title, parenthesized date, place and volume/page fields.
    Structured,
    /// Use the direct text content of each `bibl` entry verbatim.
    Verbatim,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid BibliographyStyle value: {0}")]
pub struct ParseBibliographyStyleError(String);

impl FromStr for BibliographyStyle {
    type Err = ParseBibliographyStyleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "structured" => Ok(BibliographyStyle::Structured),
            "verbatim" => Ok(BibliographyStyle::Verbatim),
            _ => Err(ParseBibliographyStyleError(s.to_string())),
        }
    }
}

/// Toggles for the two Leiden rendering rules whose status is an open
/// question in the source conventions. Both default to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Suppress `lb` elements carrying `break="no"` entirely.
    pub suppress_unbroken_lb: bool,
    /// When a `div` wraps a single `ab` container, render that container
    /// instead of the div's own children.
    pub transparent_ab: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            suppress_unbroken_lb: true,
            transparent_ab: true,
        }
    }
}

/// All knobs for one batch run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub apparatus: ApparatusStyle,
    pub bibliography: BibliographyStyle,
    /// Language code of the ancient-language edition, used to disambiguate
    /// when a body carries several edition divisions.
    pub edition_lang: String,
    /// Language of the modern annotation layer (translation, commentary,
    /// apparatus notes, language-filtered metadata fields).
    pub note_lang: String,
    pub render: RenderOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            apparatus: ApparatusStyle::LocationBased,
            bibliography: BibliographyStyle::Structured,
            edition_lang: "grc".to_string(),
            note_lang: "en".to_string(),
            render: RenderOptions::default(),
        }
    }
}

/// One fully extracted inscription document, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct Monument {
    pub file_name: String,
    /// From `idno type="filename"` in the publication statement; used to
    /// key uploaded images and the re-download file name.
    pub monument_id: String,
    pub title: String,
    /// Leiden+ rendering of the edition division.
    pub leiden_text: String,
    pub translation: String,
    pub apparatus: String,
    pub commentary: String,
    pub bibliography: String,
    pub metadata: MonumentMetadata,
    /// The original document, kept verbatim for round-trip re-download.
    #[serde(skip)]
    pub raw_xml: String,
}

/// A document that failed to parse; the rest of the batch is unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub file_name: String,
    pub error: String,
}
