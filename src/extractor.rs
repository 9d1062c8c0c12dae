//! @ai:module:intent Run scanner, recognizer and aggregator over one input unit
//! @ai:module:layer application
//! @ai:module:public_api extract, extract_with, Extractor
//! @ai:module:depends_on scanner, comment, marker, aggregator, annotation, profile, error
//! @ai:module:stateless true
//! @ai:module:thread_safe true

use crate::aggregator::aggregate;
use crate::annotation::{Extraction, LineIndex, Warning, WarningKind};
use crate::comment::{CommentCollector, CommentGroup};
use crate::error::Result;
use crate::marker::MarkerSet;
use crate::profile::CommentSyntaxProfile;
use crate::scanner::{Scanner, Span, SpanKind};

/// @ai:intent Extract annotation blocks from source text with the default keyword set
/// @ai:pre profile describes the language of `source`
/// @ai:post blocks and warnings are in source order; identical input gives identical output
/// @ai:example ("// TODO: fix\n", C profile) -> one SingleLine TODO block with payload ["fix"]
/// @ai:effects pure
pub fn extract(source: &str, profile: &CommentSyntaxProfile) -> Result<Extraction> {
    extract_with(source, profile, MarkerSet::standard())
}

/// @ai:intent Extract annotation blocks using a custom marker vocabulary
/// @ai:effects pure
pub fn extract_with(
    source: &str,
    profile: &CommentSyntaxProfile,
    markers: &MarkerSet,
) -> Result<Extraction> {
    profile.validate()?;
    Ok(run(source, profile, markers))
}

/// @ai:intent A validated profile and marker set, reusable across many inputs
/// @ai:context share one `Extractor` between worker threads; each call owns its result
#[derive(Debug, Clone)]
pub struct Extractor {
    profile: CommentSyntaxProfile,
    markers: MarkerSet,
}

impl Extractor {
    /// @ai:intent Validate the profile once up front
    /// @ai:effects pure
    pub fn new(profile: CommentSyntaxProfile, markers: MarkerSet) -> Result<Self> {
        profile.validate()?;
        Ok(Self { profile, markers })
    }

    pub fn profile(&self) -> &CommentSyntaxProfile {
        &self.profile
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// @ai:intent Extract from one input unit
    /// @ai:effects pure
    pub fn extract(&self, source: &str) -> Extraction {
        run(source, &self.profile, &self.markers)
    }
}

fn run(source: &str, profile: &CommentSyntaxProfile, markers: &MarkerSet) -> Extraction {
    let index = LineIndex::new(source);
    let mut collector = CommentCollector::new(source, profile, &index);
    let mut extraction = Extraction::default();

    for span in Scanner::new(source, profile) {
        if !span.terminated {
            extraction.warnings.push(unterminated(&span, &index, profile));
        }
        if let Some(group) = collector.push(span) {
            process_group(&group, markers, &mut extraction);
        }
    }
    if let Some(group) = collector.finish() {
        process_group(&group, markers, &mut extraction);
    }

    tracing::trace!(
        profile = %profile.name,
        blocks = extraction.blocks.len(),
        warnings = extraction.warnings.len(),
        "extraction finished"
    );
    extraction
}

fn process_group(group: &CommentGroup<'_>, markers: &MarkerSet, extraction: &mut Extraction) {
    let found = markers.recognize_group(group);
    if found.is_empty() {
        return;
    }
    let blocks = aggregate(group, &found, &mut extraction.warnings);
    extraction.blocks.extend(blocks);
}

fn unterminated(span: &Span, index: &LineIndex<'_>, profile: &CommentSyntaxProfile) -> Warning {
    let location = index.location(span.start);
    match span.kind {
        SpanKind::BlockComment => Warning::new(
            WarningKind::UnterminatedBlockComment,
            location,
            format!(
                "block comment is not closed by `{}`",
                profile.block_comments[span.delimiter].close
            ),
        ),
        _ => Warning::new(
            WarningKind::UnterminatedString,
            location,
            format!(
                "string literal is not closed by `{}`",
                profile.strings[span.delimiter].delimiter
            ),
        ),
    }
}
