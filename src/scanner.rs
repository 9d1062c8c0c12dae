//! @ai:module:intent Split source text into code, comment and string-literal spans
//! @ai:module:layer application
//! @ai:module:public_api Scanner, Span, SpanKind, scan
//! @ai:module:depends_on profile
//! @ai:module:stateless true
//!
//! The scanner is a single left-to-right state machine. In code it looks for the longest
//! opener (line-comment prefix, block-comment opener or string delimiter) at each
//! character boundary; once inside a comment or string, every other opener is inert until
//! the matching closer. The spans it yields partition the input exactly.

use crate::profile::{CommentSyntaxProfile, StringDelimiter};
use serde::Serialize;

/// @ai:intent Classification of a span of source text
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Code,
    LineComment,
    BlockComment,
    StringLiteral,
}

/// @ai:intent A classified byte range `[start, end)` of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
    /// Index of the opening delimiter in the profile list matching `kind`; zero for code.
    pub delimiter: usize,
    /// False when the input or line ended before the closing delimiter.
    pub terminated: bool,
}

impl Span {
    /// @ai:intent Borrow the text covered by this span
    /// @ai:pre source is the text this span was scanned from
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenerKind {
    Line,
    Block,
    Str,
}

#[derive(Debug)]
struct Opener<'p> {
    text: &'p str,
    kind: OpenerKind,
    index: usize,
}

/// @ai:intent Lazy iterator over the spans of one source text
#[derive(Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    profile: &'a CommentSyntaxProfile,
    openers: Vec<Opener<'a>>,
    first_bytes: [bool; 256],
    pos: usize,
}

/// @ai:intent Start scanning `source` with `profile`
/// @ai:effects pure
pub fn scan<'a>(source: &'a str, profile: &'a CommentSyntaxProfile) -> Scanner<'a> {
    Scanner::new(source, profile)
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, profile: &'a CommentSyntaxProfile) -> Self {
        let mut openers: Vec<Opener<'a>> = Vec::new();
        openers.extend(profile.line_comments.iter().enumerate().map(|(index, p)| Opener {
            text: p.as_str(),
            kind: OpenerKind::Line,
            index,
        }));
        openers.extend(profile.block_comments.iter().enumerate().map(|(index, b)| Opener {
            text: b.open.as_str(),
            kind: OpenerKind::Block,
            index,
        }));
        openers.extend(profile.strings.iter().enumerate().map(|(index, s)| Opener {
            text: s.delimiter.as_str(),
            kind: OpenerKind::Str,
            index,
        }));
        openers.retain(|o| !o.text.is_empty());
        // Stable sort: longest first, declaration order breaks ties.
        openers.sort_by(|a, b| b.text.len().cmp(&a.text.len()));

        let mut first_bytes = [false; 256];
        for opener in &openers {
            first_bytes[opener.text.as_bytes()[0] as usize] = true;
        }

        Self {
            source,
            profile,
            openers,
            first_bytes,
            pos: 0,
        }
    }

    fn opener_at(&self, pos: usize) -> Option<&Opener<'a>> {
        if !self.first_bytes[self.source.as_bytes()[pos] as usize] {
            return None;
        }
        let rest = &self.source[pos..];
        self.openers.iter().find(|o| {
            rest.starts_with(o.text)
                && (o.kind != OpenerKind::Str
                    || !self.profile.strings[o.index].char_literal
                    || char_literal_closes(&self.profile.strings[o.index], &rest[o.text.len()..]))
        })
    }

    fn next_char_boundary(&self, pos: usize) -> usize {
        self.source[pos..]
            .chars()
            .next()
            .map(|c| pos + c.len_utf8())
            .unwrap_or(self.source.len())
    }

    /// @ai:intent Consume code up to the next opener or end of input
    fn code_end(&self, start: usize) -> usize {
        let mut pos = start;
        while pos < self.source.len() {
            if self.opener_at(pos).is_some() {
                return pos;
            }
            pos = self.next_char_boundary(pos);
        }
        pos
    }

    /// @ai:intent Find where a line comment ends (before the newline)
    fn line_comment_end(&self, body: usize) -> (usize, bool) {
        let end = self.source[body..]
            .find('\n')
            .map(|i| body + i)
            .unwrap_or(self.source.len());
        (end, true)
    }

    /// @ai:intent Find where a block comment closes, counting depth for nesting pairs
    fn block_comment_end(&self, index: usize, body: usize) -> (usize, bool) {
        let pair = &self.profile.block_comments[index];
        let close = pair.close.as_str();
        let open = pair.open.as_str();

        if !pair.nested {
            return match self.source[body..].find(close) {
                Some(i) => (body + i + close.len(), true),
                None => (self.source.len(), false),
            };
        }

        let mut depth = 1usize;
        let mut pos = body;
        while pos < self.source.len() {
            let rest = &self.source[pos..];
            if rest.starts_with(close) {
                pos += close.len();
                depth -= 1;
                if depth == 0 {
                    return (pos, true);
                }
            } else if rest.starts_with(open) {
                pos += open.len();
                depth += 1;
            } else {
                pos = self.next_char_boundary(pos);
            }
        }
        (self.source.len(), false)
    }

    /// @ai:intent Find where a string literal closes, honoring its escape character
    fn string_end(&self, index: usize, body: usize) -> (usize, bool) {
        let delimiter = &self.profile.strings[index];
        let close = delimiter.delimiter.as_str();

        let mut pos = body;
        while pos < self.source.len() {
            let rest = &self.source[pos..];
            let Some(c) = rest.chars().next() else {
                break;
            };

            if delimiter.escape == Some(c) {
                pos += c.len_utf8();
                if pos < self.source.len() {
                    pos = self.next_char_boundary(pos);
                }
            } else if rest.starts_with(close) {
                return (pos + close.len(), true);
            } else if c == '\n' && !delimiter.multiline {
                return (pos, false);
            } else {
                pos += c.len_utf8();
            }
        }
        (self.source.len(), false)
    }
}

/// Whether `body` holds one character (or one escape sequence) followed by the closer.
fn char_literal_closes(delimiter: &StringDelimiter, body: &str) -> bool {
    let close = delimiter.delimiter.as_str();
    let Some(c) = body.chars().next() else {
        return false;
    };

    if delimiter.escape == Some(c) {
        let after = &body[c.len_utf8()..];
        let Some(escaped) = after.chars().next() else {
            return false;
        };
        let tail = &after[escaped.len_utf8()..];
        // `'\u{10FFFF}'` is the longest escape.
        return tail
            .find(close)
            .is_some_and(|i| i <= 8 && !tail[..i].contains('\n'));
    }

    c != '\n' && body[c.len_utf8()..].starts_with(close)
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let start = self.pos;
        if start >= self.source.len() {
            return None;
        }

        let span = match self.opener_at(start) {
            Some(opener) => {
                let body = start + opener.text.len();
                let (kind, (end, terminated)) = match opener.kind {
                    OpenerKind::Line => (SpanKind::LineComment, self.line_comment_end(body)),
                    OpenerKind::Block => (
                        SpanKind::BlockComment,
                        self.block_comment_end(opener.index, body),
                    ),
                    OpenerKind::Str => (SpanKind::StringLiteral, self.string_end(opener.index, body)),
                };
                Span {
                    kind,
                    start,
                    end,
                    delimiter: opener.index,
                    terminated,
                }
            }
            None => Span {
                kind: SpanKind::Code,
                start,
                end: self.code_end(start),
                delimiter: 0,
                terminated: true,
            },
        };

        self.pos = span.end;
        Some(span)
    }
}
