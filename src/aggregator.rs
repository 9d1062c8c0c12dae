//! @ai:module:intent Merge markers and their continuation lines into annotation blocks
//! @ai:module:layer application
//! @ai:module:public_api aggregate
//! @ai:module:depends_on annotation, comment, marker
//! @ai:module:stateless true

use crate::annotation::{AnnotationBlock, BlockStyle, Location, Warning, WarningKind};
use crate::comment::CommentGroup;
use crate::marker::{strip_separator, AnnotationMarker, MarkerKind};

/// @ai:intent Build the blocks rooted at each marker of one comment group
/// @ai:pre markers were recognized on `group` and are ordered by line
/// @ai:post blocks never overlap; lines claimed by a braced or region block are not re-examined
/// @ai:effects pure (warnings are appended to `warnings`)
pub fn aggregate(
    group: &CommentGroup<'_>,
    markers: &[AnnotationMarker<'_>],
    warnings: &mut Vec<Warning>,
) -> Vec<AnnotationBlock> {
    let mut blocks = Vec::new();
    let mut next_free_line = 0;

    for marker in markers {
        if marker.line_index < next_free_line {
            continue;
        }
        next_free_line = marker.line_index + 1;

        match &marker.kind {
            MarkerKind::RegionStart(name) => {
                match close_region(group, marker, name) {
                    Some((block, end_line)) => {
                        blocks.push(block);
                        next_free_line = end_line + 1;
                    }
                    None => warnings.push(Warning::new(
                        WarningKind::UnmatchedRegionStart,
                        marker.location,
                        format!("`{}` has no matching `{}.END` in the same comment", marker.spelling, name),
                    )),
                }
            }
            MarkerKind::RegionEnd(name) => warnings.push(Warning::new(
                WarningKind::UnmatchedRegionEnd,
                marker.location,
                format!("`{}` has no preceding `{}.START`", marker.spelling, name),
            )),
            MarkerKind::Keyword(keyword) => {
                if let Some(after_brace) = marker.text.strip_prefix('{') {
                    match close_braces(group, marker, after_brace) {
                        Some((block, end_line)) => {
                            blocks.push(block);
                            next_free_line = end_line + 1;
                        }
                        None => {
                            warnings.push(Warning::new(
                                WarningKind::UnclosedBrace,
                                marker.location,
                                format!("`{} {{` is never closed in the same comment", marker.spelling),
                            ));
                            blocks.push(single_line(group, marker, keyword.as_str()));
                        }
                    }
                } else {
                    blocks.push(single_line(group, marker, keyword.as_str()));
                }
            }
        }
    }

    blocks
}

fn single_line(group: &CommentGroup<'_>, marker: &AnnotationMarker<'_>, keyword: &str) -> AnnotationBlock {
    let content = group.lines[marker.line_index].content;
    let payload = if marker.text.is_empty() {
        Vec::new()
    } else {
        vec![marker.text.to_string()]
    };

    AnnotationBlock {
        keyword: keyword.to_string(),
        style: BlockStyle::SingleLine,
        start: marker.location,
        end: last_char(marker.location, content),
        payload,
    }
}

/// @ai:intent Pair a region START with the next `<name>.END` anywhere later in the group
/// @ai:post returns the block and the group line index holding the END
fn close_region(
    group: &CommentGroup<'_>,
    start: &AnnotationMarker<'_>,
    name: &str,
) -> Option<(AnnotationBlock, usize)> {
    let end_marker = format!("{}.END", name);
    let mut payload = Vec::new();

    // The START spelling sits at byte 0 of its line, so the search resumes right after it.
    let segments = std::iter::once((start.line_index, start.spelling.len()))
        .chain((start.line_index + 1..group.lines.len()).map(|i| (i, 0)));

    for (line_index, from) in segments {
        let line = &group.lines[line_index];
        let text = &line.content[from..];
        let on_start_line = line_index == start.line_index;

        match find_region_end(text, &end_marker) {
            Some(at) => {
                push_region_text(&mut payload, &text[..at], on_start_line);
                let column = line.content[..from + at].chars().count() + end_marker.chars().count();
                let block = AnnotationBlock {
                    keyword: name.to_string(),
                    style: BlockStyle::NamedRegion,
                    start: start.location,
                    end: line.location.advance(column - 1),
                    payload,
                };
                return Some((block, line_index));
            }
            None => push_region_text(&mut payload, text, on_start_line),
        }
    }

    None
}

fn push_region_text(payload: &mut Vec<String>, text: &str, on_start_line: bool) {
    if on_start_line {
        push_payload(payload, strip_separator(text));
    } else {
        push_payload(payload, text);
    }
}

/// Byte index of the first word-bounded `end_marker` in `text`.
fn find_region_end(text: &str, end_marker: &str) -> Option<usize> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(end_marker).map(|(i, _)| i).find(|&i| {
        let before = text[..i].chars().next_back();
        let after = text[i + end_marker.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

/// @ai:intent Follow `{`/`}` depth from the marker's opening brace to its matching close
/// @ai:post depth returns to zero exactly at the block's end
fn close_braces(
    group: &CommentGroup<'_>,
    marker: &AnnotationMarker<'_>,
    after_brace: &str,
) -> Option<(AnnotationBlock, usize)> {
    let mut depth = 1usize;
    let mut payload = Vec::new();

    let marker_line = &group.lines[marker.line_index];
    // `after_brace` is a suffix of the marker line's content.
    let brace_column = marker_line.content.chars().count() - after_brace.chars().count() - 1;
    let mut segments = std::iter::once((marker.line_index, after_brace, brace_column + 1))
        .chain(
            group
                .lines
                .iter()
                .enumerate()
                .skip(marker.line_index + 1)
                .map(|(i, line)| (i, line.content, 0)),
        );

    segments.find_map(|(line_index, text, column_offset)| {
        match closing_brace(text, &mut depth) {
            Some(at) => {
                push_payload(&mut payload, &text[..at]);
                let line = &group.lines[line_index];
                let end = line
                    .location
                    .advance(column_offset + text[..at].chars().count());
                Some((line_index, end))
            }
            None => {
                push_payload(&mut payload, text);
                None
            }
        }
    })
    .map(|(end_line, end)| {
        let block = AnnotationBlock {
            keyword: keyword_text(marker),
            style: BlockStyle::BracedMultiline,
            start: marker.location,
            end,
            payload,
        };
        (block, end_line)
    })
}

/// Byte index of the `}` that brings `depth` to zero, updating `depth` otherwise.
fn closing_brace(text: &str, depth: &mut usize) -> Option<usize> {
    for (i, c) in text.char_indices() {
        match c {
            '{' => *depth += 1,
            '}' => {
                *depth -= 1;
                if *depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn keyword_text(marker: &AnnotationMarker<'_>) -> String {
    match &marker.kind {
        MarkerKind::Keyword(keyword) => keyword.as_str().to_string(),
        MarkerKind::RegionStart(name) | MarkerKind::RegionEnd(name) => name.clone(),
    }
}

fn push_payload(payload: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        payload.push(text.to_string());
    }
}

/// Location of the last character of `text` when it starts at `start`.
fn last_char(start: Location, text: &str) -> Location {
    start.advance(text.chars().count().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::LineIndex;
    use crate::comment::CommentCollector;
    use crate::language::Language;
    use crate::marker::MarkerSet;
    use crate::scanner::scan;
    use pretty_assertions::assert_eq;

    fn aggregate_source(source: &str) -> (Vec<AnnotationBlock>, Vec<Warning>) {
        let profile = Language::C.profile();
        let index = LineIndex::new(source);
        let mut collector = CommentCollector::new(source, &profile, &index);
        let mut groups: Vec<_> = scan(source, &profile)
            .filter_map(|span| collector.push(span))
            .collect();
        groups.extend(collector.finish());

        let mut warnings = Vec::new();
        let blocks = groups
            .iter()
            .flat_map(|group| {
                let markers = MarkerSet::standard().recognize_group(group);
                aggregate(group, &markers, &mut warnings)
            })
            .collect();
        (blocks, warnings)
    }

    #[test]
    fn test_braced_block_payload() {
        let (blocks, warnings) = aggregate_source("/* TODO: { a \n b \n } */");
        assert!(warnings.is_empty());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].style, BlockStyle::BracedMultiline);
        assert_eq!(blocks[0].keyword, "TODO");
        assert_eq!(blocks[0].payload, vec!["a", "b"]);
        assert_eq!(blocks[0].start, Location::new(1, 4));
        assert_eq!(blocks[0].end, Location::new(3, 2));
    }

    #[test]
    fn test_braced_block_counts_nested_braces() {
        let (blocks, _) = aggregate_source("// FIXME: {\n//   map { k: v }\n//   done }\n// NOTE: after");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].payload, vec!["map { k: v }", "done"]);
        assert_eq!(blocks[0].end, Location::new(3, 11));
        assert_eq!(blocks[1].keyword, "NOTE");
    }

    #[test]
    fn test_braced_block_on_one_line() {
        let (blocks, _) = aggregate_source("// TODO: { inline }");
        assert_eq!(blocks[0].style, BlockStyle::BracedMultiline);
        assert_eq!(blocks[0].payload, vec!["inline"]);
        assert_eq!(blocks[0].end, Location::new(1, 19));
    }

    #[test]
    fn test_unclosed_brace_degrades_to_single_line() {
        let (blocks, warnings) = aggregate_source("/* TODO: { a\n b */");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::UnclosedBrace);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].style, BlockStyle::SingleLine);
        assert_eq!(blocks[0].payload, vec!["{ a"]);
    }

    #[test]
    fn test_named_region_payload() {
        let (blocks, warnings) = aggregate_source("/* TODOS.START\nx\ny\nTODOS.END */");
        assert!(warnings.is_empty());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].style, BlockStyle::NamedRegion);
        assert_eq!(blocks[0].keyword, "TODOS");
        assert_eq!(blocks[0].payload, vec!["x", "y"]);
        assert_eq!(blocks[0].start, Location::new(1, 4));
        assert_eq!(blocks[0].end, Location::new(4, 9));
    }

    #[test]
    fn test_region_end_after_payload_text() {
        let (blocks, warnings) = aggregate_source("/* TODOS.START\nx\ny TODOS.END */");
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].style, BlockStyle::NamedRegion);
        assert_eq!(blocks[0].payload, vec!["x", "y"]);
        assert_eq!(blocks[0].end, Location::new(3, 11));
    }

    #[test]
    fn test_region_closed_on_its_own_line() {
        let (blocks, warnings) = aggregate_source("// TODOS.START a, b TODOS.END\n");
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].payload, vec!["a, b"]);
        assert_eq!(blocks[0].start, Location::new(1, 4));
        assert_eq!(blocks[0].end, Location::new(1, 29));
    }

    #[test]
    fn test_region_end_must_be_word_bounded() {
        let (blocks, warnings) = aggregate_source("/* TODOS.START\nsee TODOS.ENDING\nTODOS.END */");
        assert!(warnings.is_empty());
        assert_eq!(blocks[0].payload, vec!["see TODOS.ENDING"]);
        assert_eq!(blocks[0].end.line, 3);
    }

    #[test]
    fn test_region_swallows_inner_markers() {
        let (blocks, _) = aggregate_source("// TODOS.START\n// TODO: inside\n// TODOS.END\n// XXX: outside");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].payload, vec!["TODO: inside"]);
        assert_eq!(blocks[1].keyword, "XXX");
    }

    #[test]
    fn test_stray_region_start_is_discarded() {
        let (blocks, warnings) = aggregate_source("/* TODOS.START\nx */");
        assert!(blocks.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::UnmatchedRegionStart);
        assert_eq!(warnings[0].location, Location::new(1, 4));
    }

    #[test]
    fn test_region_is_not_closed_by_another_comment() {
        let (blocks, warnings) = aggregate_source("/* TODOS.START */\nint x;\n/* TODOS.END */");
        assert!(blocks.is_empty());
        let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::UnmatchedRegionStart, WarningKind::UnmatchedRegionEnd]
        );
    }

    #[test]
    fn test_adjacent_markers_stay_independent() {
        let (blocks, _) = aggregate_source("// TODO: fix\n// FIXME: leak");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].style, BlockStyle::SingleLine);
        assert_eq!(blocks[0].payload, vec!["fix"]);
        assert_eq!(blocks[0].end, Location::new(1, 12));
        assert_eq!(blocks[1].keyword, "FIXME");
        assert_eq!(blocks[1].start, Location::new(2, 4));
    }

    #[test]
    fn test_bare_keyword_has_empty_payload() {
        let (blocks, _) = aggregate_source("// HACK");
        assert_eq!(blocks[0].payload, Vec::<String>::new());
        assert_eq!(blocks[0].end, Location::new(1, 7));
    }
}
