//! @ai:module:intent Recognize annotation keywords at the start of comment lines
//! @ai:module:layer application
//! @ai:module:public_api Keyword, MarkerKind, AnnotationMarker, MarkerSet, MarkerSetBuilder
//! @ai:module:depends_on comment, error
//! @ai:module:stateless true

use crate::annotation::Location;
use crate::comment::{CommentGroup, CommentLine};
use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// @ai:intent The fixed set of annotation keywords
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Keyword {
    Todo,
    Fixme,
    Xxx,
    Hack,
    Note,
}

impl Keyword {
    pub const ALL: [Keyword; 5] = [
        Keyword::Todo,
        Keyword::Fixme,
        Keyword::Xxx,
        Keyword::Hack,
        Keyword::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Todo => "TODO",
            Keyword::Fixme => "FIXME",
            Keyword::Xxx => "XXX",
            Keyword::Hack => "HACK",
            Keyword::Note => "NOTE",
        }
    }
}

/// @ai:intent What a recognized marker stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    Keyword(Keyword),
    RegionStart(String),
    RegionEnd(String),
}

/// @ai:intent A keyword occurrence at the start of a comment line
/// @ai:invariant `location` lies inside a comment span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationMarker<'a> {
    pub kind: MarkerKind,
    /// The text that matched, e.g. `TODO`, `todo` or `@todo`.
    pub spelling: &'a str,
    pub location: Location,
    /// Index of the owning line within its comment group.
    pub line_index: usize,
    /// Same-line text after the keyword, with a leading `:` and whitespace removed.
    pub text: &'a str,
}

pub const DEFAULT_REGION: &str = "TODOS";

static STANDARD: LazyLock<MarkerSet> = LazyLock::new(|| {
    MarkerSet::builder()
        .build()
        .expect("standard marker set is valid")
});

/// @ai:intent Compiled keyword, alias and region vocabulary
/// @ai:context the extension point for case-insensitive matching and synonyms such as `@todo`
#[derive(Debug, Clone)]
pub struct MarkerSet {
    case_insensitive: bool,
    spellings: Vec<(String, Keyword)>,
    regions: Vec<String>,
    pattern: Regex,
}

/// @ai:intent Builder for a `MarkerSet`
#[derive(Debug, Clone)]
pub struct MarkerSetBuilder {
    case_insensitive: bool,
    aliases: Vec<(String, Keyword)>,
    regions: Vec<String>,
}

impl Default for MarkerSetBuilder {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            aliases: Vec::new(),
            regions: vec![DEFAULT_REGION.to_string()],
        }
    }
}

impl MarkerSetBuilder {
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// @ai:intent Register another spelling for a keyword, e.g. `@todo` for TODO
    pub fn alias(mut self, spelling: &str, keyword: Keyword) -> Self {
        self.aliases.push((spelling.to_string(), keyword));
        self
    }

    /// @ai:intent Accept `<name>.START` / `<name>.END` as region edges
    pub fn region(mut self, name: &str) -> Self {
        if !self.regions.iter().any(|r| r == name) {
            self.regions.push(name.to_string());
        }
        self
    }

    /// @ai:intent Compile the vocabulary into a single anchored pattern
    /// @ai:post spellings are tried longest first so `TODOS.START` never reads as `TODO`
    /// @ai:effects pure
    pub fn build(self) -> Result<MarkerSet> {
        for (alias, _) in &self.aliases {
            if alias.trim().is_empty() {
                return Err(Error::InvalidMarkers("empty keyword alias".to_string()));
            }
        }
        for region in &self.regions {
            let valid = !region.is_empty()
                && region.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(Error::InvalidMarkers(format!(
                    "region name `{}` must be a non-empty identifier",
                    region
                )));
            }
        }

        let mut spellings: Vec<(String, Keyword)> = Keyword::ALL
            .iter()
            .map(|k| (k.as_str().to_string(), *k))
            .chain(self.aliases)
            .collect();
        spellings.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut regions = self.regions;
        regions.sort_by(|a, b| b.len().cmp(&a.len()));

        let region_alternatives = regions
            .iter()
            .map(|r| regex::escape(r))
            .collect::<Vec<_>>()
            .join("|");
        let keyword_alternatives = spellings
            .iter()
            .map(|(s, _)| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");

        // Region names stay case-sensitive even when keywords are not.
        let pattern = format!(
            r"^(?:(?-i:(?P<region>{})\.(?P<edge>START|END))|(?P<keyword>{}))(?P<rest>.*)$",
            region_alternatives, keyword_alternatives
        );
        let pattern = RegexBuilder::new(&pattern)
            .case_insensitive(self.case_insensitive)
            .build()?;

        Ok(MarkerSet {
            case_insensitive: self.case_insensitive,
            spellings,
            regions,
            pattern,
        })
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        STANDARD.clone()
    }
}

impl MarkerSet {
    pub fn builder() -> MarkerSetBuilder {
        MarkerSetBuilder::default()
    }

    /// @ai:intent Shared instance of the default vocabulary
    pub fn standard() -> &'static MarkerSet {
        &STANDARD
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// @ai:intent Recognize a marker at the very start of one comment line
    /// @ai:example ("TODO: fix it") -> Some(Keyword(Todo), text "fix it")
    /// @ai:example ("TODOLIST cleanup") -> None
    /// @ai:example ("see TODO below") -> None
    /// @ai:effects pure
    pub fn recognize<'a>(&self, line: &CommentLine<'a>, line_index: usize) -> Option<AnnotationMarker<'a>> {
        let content = line.content;
        let captures = self.pattern.captures(content)?;
        let rest = captures.name("rest")?;

        if rest
            .as_str()
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            return None;
        }

        let (kind, spelling) = if let Some(region) = captures.name("region") {
            let name = region.as_str().to_string();
            let edge = captures.name("edge")?;
            let kind = if edge.as_str() == "START" {
                MarkerKind::RegionStart(name)
            } else {
                MarkerKind::RegionEnd(name)
            };
            (kind, &content[region.start()..edge.end()])
        } else {
            let matched = captures.name("keyword")?;
            let keyword = self.keyword_for(matched.as_str())?;
            (MarkerKind::Keyword(keyword), matched.as_str())
        };

        Some(AnnotationMarker {
            kind,
            spelling,
            location: line.location,
            line_index,
            text: strip_separator(rest.as_str()),
        })
    }

    /// @ai:intent Recognize markers on every line of a comment group
    /// @ai:post result is ordered by line
    /// @ai:effects pure
    pub fn recognize_group<'a>(&self, group: &CommentGroup<'a>) -> Vec<AnnotationMarker<'a>> {
        group
            .lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| self.recognize(line, i))
            .collect()
    }

    fn keyword_for(&self, spelling: &str) -> Option<Keyword> {
        self.spellings
            .iter()
            .find(|(s, _)| {
                if self.case_insensitive {
                    s.to_lowercase() == spelling.to_lowercase()
                } else {
                    s == spelling
                }
            })
            .map(|(_, k)| *k)
    }
}

/// Drops the conventional `:` after a keyword along with surrounding whitespace.
pub(crate) fn strip_separator(rest: &str) -> &str {
    let rest = rest.trim_start();
    rest.strip_prefix(':').unwrap_or(rest).trim()
}
