//! @ai:module:intent Turn comment spans into groups of stripped comment lines
//! @ai:module:layer application
//! @ai:module:public_api CommentGroup, CommentLine, CommentCollector
//! @ai:module:depends_on scanner, profile, annotation
//! @ai:module:stateless false

use crate::annotation::{LineIndex, Location};
use crate::profile::CommentSyntaxProfile;
use crate::scanner::{Span, SpanKind};

/// @ai:intent One physical line of comment text with delimiters and decoration removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine<'a> {
    pub line_number: usize,
    /// Position of the first character of `content` (or of the line's end if empty).
    pub location: Location,
    pub content: &'a str,
}

/// @ai:intent A block comment, or a run of line comments separated only by whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup<'a> {
    pub kind: SpanKind,
    pub lines: Vec<CommentLine<'a>>,
    pub start_line: usize,
    pub end_line: usize,
}

/// @ai:intent Accumulates comment spans from the scanner into comment groups
/// @ai:context feed every span in order, then call `finish`
pub(crate) struct CommentCollector<'a, 'i> {
    source: &'a str,
    profile: &'a CommentSyntaxProfile,
    index: &'i LineIndex<'a>,
    pending: Option<CommentGroup<'a>>,
}

impl<'a, 'i> CommentCollector<'a, 'i> {
    pub(crate) fn new(
        source: &'a str,
        profile: &'a CommentSyntaxProfile,
        index: &'i LineIndex<'a>,
    ) -> Self {
        Self {
            source,
            profile,
            index,
            pending: None,
        }
    }

    /// @ai:intent Add the next span; returns a group once it can no longer grow
    pub(crate) fn push(&mut self, span: Span) -> Option<CommentGroup<'a>> {
        match span.kind {
            SpanKind::Code if span.text(self.source).trim().is_empty() => None,
            SpanKind::Code | SpanKind::StringLiteral => self.pending.take(),
            SpanKind::LineComment => {
                let line = self.line_comment(span);
                match &mut self.pending {
                    Some(group) if group.kind == SpanKind::LineComment => {
                        group.end_line = line.line_number;
                        group.lines.push(line);
                        None
                    }
                    _ => self.pending.replace(CommentGroup {
                        kind: SpanKind::LineComment,
                        start_line: line.line_number,
                        end_line: line.line_number,
                        lines: vec![line],
                    }),
                }
            }
            SpanKind::BlockComment => {
                let group = self.block_comment(span);
                self.pending.replace(group)
            }
        }
    }

    pub(crate) fn finish(&mut self) -> Option<CommentGroup<'a>> {
        self.pending.take()
    }

    fn line_comment(&self, span: Span) -> CommentLine<'a> {
        let prefix = &self.profile.line_comments[span.delimiter];
        let body_start = span.start + prefix.len();
        self.comment_line(body_start, &self.source[body_start..span.end], None)
    }

    fn block_comment(&self, span: Span) -> CommentGroup<'a> {
        let pair = &self.profile.block_comments[span.delimiter];
        let body_start = span.start + pair.open.len();
        let mut body = &self.source[body_start..span.end];
        if span.terminated {
            body = body.strip_suffix(pair.close.as_str()).unwrap_or(body);
        }

        let mut lines = Vec::new();
        let mut offset = body_start;
        for raw in body.split('\n') {
            lines.push(self.comment_line(offset, raw, pair.line_prefix.as_deref()));
            offset += raw.len() + 1;
        }

        let start_line = self.index.location(span.start).line;
        let end_line = lines.last().map(|l| l.line_number).unwrap_or(start_line);
        CommentGroup {
            kind: SpanKind::BlockComment,
            lines,
            start_line,
            end_line,
        }
    }

    /// @ai:intent Strip whitespace and continuation decoration from one raw line
    fn comment_line(&self, offset: usize, raw: &'a str, line_prefix: Option<&str>) -> CommentLine<'a> {
        let mut start = raw.len() - raw.trim_start().len();
        if let Some(prefix) = line_prefix {
            while raw[start..].starts_with(prefix) {
                start += prefix.len();
            }
            start = raw.len() - raw[start..].trim_start().len();
        }
        let content = raw[start..].trim_end();
        let location = self.index.location(offset + start);

        CommentLine {
            line_number: location.line,
            location,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::scanner::scan;
    use pretty_assertions::assert_eq;

    fn groups<'a>(source: &'a str, profile: &'a CommentSyntaxProfile) -> Vec<CommentGroup<'a>> {
        let index = LineIndex::new(source);
        let mut collector = CommentCollector::new(source, profile, &index);
        let mut out: Vec<CommentGroup<'a>> = scan(source, profile)
            .filter_map(|span| collector.push(span))
            .collect();
        out.extend(collector.finish());
        out
    }

    fn contents(group: &CommentGroup<'_>) -> Vec<String> {
        group.lines.iter().map(|l| l.content.to_string()).collect()
    }

    #[test]
    fn test_adjacent_line_comments_form_one_group() {
        let profile = Language::C.profile();
        let source = "// TODO: fix\n   // FIXME: leak\nint x;\n// NOTE: later";
        let found = groups(source, &profile);

        assert_eq!(found.len(), 2);
        assert_eq!(contents(&found[0]), vec!["TODO: fix", "FIXME: leak"]);
        assert_eq!(found[0].start_line, 1);
        assert_eq!(found[0].end_line, 2);
        assert_eq!(found[0].lines[1].location, Location::new(2, 7));
        assert_eq!(contents(&found[1]), vec!["NOTE: later"]);
    }

    #[test]
    fn test_string_between_comments_splits_groups() {
        let profile = Language::Python.profile();
        let source = "# a\n\"s\"\n# b";
        assert_eq!(groups(source, &profile).len(), 2);
    }

    #[test]
    fn test_block_comment_lines_are_stripped() {
        let profile = Language::C.profile();
        let source = "x;\n/**\n * TODO: first\n *   second\n */";
        let found = groups(source, &profile);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, SpanKind::BlockComment);
        assert_eq!(contents(&found[0]), vec!["", "TODO: first", "second", ""]);
        assert_eq!(found[0].lines[1].location, Location::new(3, 4));
        assert_eq!(found[0].start_line, 2);
        assert_eq!(found[0].end_line, 5);
    }

    #[test]
    fn test_block_comment_never_joins_line_comments() {
        let profile = Language::C.profile();
        let source = "// a\n/* b */\n// c";
        let found = groups(source, &profile);
        assert_eq!(found.len(), 3);
        assert_eq!(contents(&found[1]), vec!["b"]);
    }

    #[test]
    fn test_single_line_block_comment_location() {
        let profile = Language::C.profile();
        let source = "/* HACK: quick fix */";
        let found = groups(source, &profile);
        assert_eq!(contents(&found[0]), vec!["HACK: quick fix"]);
        assert_eq!(found[0].lines[0].location, Location::new(1, 4));
    }
}
