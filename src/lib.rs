//! @ai:module:intent todoscan library for extracting annotation blocks from source comments
//! @ai:module:layer infrastructure
//! @ai:module:public_api extractor, profile, marker, annotation, project, config, language, output, error
//! @ai:module:stateless true
//!
//! # todoscan
//!
//! Finds `TODO`, `FIXME`, `XXX`, `HACK` and `NOTE` annotations in source comments, including
//! braced `TODO: { ... }` blocks and `TODOS.START` / `TODOS.END` regions. Text inside string
//! literals and ordinary code is never reported.
//!
//! The engine (`scanner`, `marker`, `aggregator`, `extractor`) works on in-memory text with a
//! caller-supplied [`CommentSyntaxProfile`] and performs no I/O. The `project` module adds
//! file reading, language detection and parallel directory scans on top.
//!
//! ## Example
//!
//! ```rust
//! use todoscan::{extract, Language};
//!
//! let source = "int x; /* TODO: { check bounds\n   log errors } */\n";
//! let result = extract(source, &Language::C.profile()).unwrap();
//! assert_eq!(result.blocks[0].payload, vec!["check bounds", "log errors"]);
//! ```

pub mod aggregator;
pub mod annotation;
pub mod comment;
pub mod config;
pub mod error;
pub mod extractor;
pub mod language;
pub mod marker;
pub mod output;
pub mod profile;
pub mod project;
pub mod scanner;

pub use annotation::{
    AnnotationBlock, BlockStyle, Extraction, FileFailure, FileReport, Location, ProjectReport,
    Warning, WarningKind,
};
pub use config::ScanConfig;
pub use error::{Error, Result};
pub use extractor::{extract, extract_with, Extractor};
pub use language::{detect_language, is_supported_file, Language};
pub use marker::{Keyword, MarkerSet};
pub use output::{format_extraction, format_project_report, to_json, OutputFormat};
pub use profile::{BlockDelimiters, CommentSyntaxProfile, StringDelimiter};
pub use project::{extract_file, extract_paths, ProfileRegistry};
pub use scanner::{scan, Span, SpanKind};
