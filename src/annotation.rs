//! @ai:module:intent Define the records produced by annotation extraction
//! @ai:module:layer domain
//! @ai:module:public_api Location, BlockStyle, AnnotationBlock, Warning, WarningKind, Extraction, FileReport, ProjectReport
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent A 1-based line/column position; columns count Unicode scalar values
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// @ai:intent Location `chars` characters further along the same line
    /// @ai:effects pure
    pub fn advance(self, chars: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + chars,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// @ai:intent How an annotation block was delimited
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockStyle {
    SingleLine,
    BracedMultiline,
    NamedRegion,
}

impl BlockStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockStyle::SingleLine => "single_line",
            BlockStyle::BracedMultiline => "braced_multiline",
            BlockStyle::NamedRegion => "named_region",
        }
    }
}

/// @ai:intent One logical annotation, possibly spanning several comment lines
/// @ai:invariant start <= end; `end` is the last character that belongs to the block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationBlock {
    /// Canonical keyword (`TODO`, `FIXME`, ...) or the region name for named regions.
    pub keyword: String,
    pub style: BlockStyle,
    pub start: Location,
    pub end: Location,
    pub payload: Vec<String>,
}

/// @ai:intent Categories of recoverable anomalies found while extracting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    UnterminatedBlockComment,
    UnterminatedString,
    UnmatchedRegionStart,
    UnmatchedRegionEnd,
    UnclosedBrace,
}

/// @ai:intent A recoverable anomaly; extraction continues past it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub location: Location,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            message: message.into(),
        }
    }
}

/// @ai:intent Everything extracted from one input unit, in source order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Extraction {
    pub blocks: Vec<AnnotationBlock>,
    pub warnings: Vec<Warning>,
}

/// @ai:intent Extraction result for one file on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub language: String,
    pub blocks: Vec<AnnotationBlock>,
    pub warnings: Vec<Warning>,
}

/// @ai:intent A file that could not be extracted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// @ai:intent Extraction results for a set of files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectReport {
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    pub total_blocks: usize,
    pub total_warnings: usize,
}

impl ProjectReport {
    /// @ai:intent Append a file report and update the totals
    pub fn push(&mut self, report: FileReport) {
        self.total_blocks += report.blocks.len();
        self.total_warnings += report.warnings.len();
        self.files.push(report);
    }

    /// @ai:intent Check whether any file produced warnings or failed outright
    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0 || !self.failures.is_empty()
    }
}

/// Maps byte offsets to line/column locations.
#[derive(Debug)]
pub(crate) struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// @ai:pre offset <= source.len() and lies on a char boundary
    pub(crate) fn location(&self, offset: usize) -> Location {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self.source[line_start..offset].chars().count() + 1;
        Location::new(line, column)
    }
}
