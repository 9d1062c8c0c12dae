//! @ai:module:intent Built-in comment syntax profiles for common languages
//! @ai:module:layer domain
//! @ai:module:public_api Language, detect_language, is_supported_file
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::profile::{BlockDelimiters, CommentSyntaxProfile, StringDelimiter};
use std::path::Path;

/// @ai:intent A language with a built-in comment syntax profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    TypeScript,
    JavaScript,
    Go,
    Java,
    C,
    Cpp,
    Ruby,
    Shell,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::Rust,
        Language::Python,
        Language::TypeScript,
        Language::JavaScript,
        Language::Go,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::Ruby,
        Language::Shell,
    ];

    /// @ai:intent Get the comment syntax profile for this language
    /// @ai:post result.validate() is Ok
    /// @ai:effects pure
    pub fn profile(&self) -> CommentSyntaxProfile {
        let c_block = BlockDelimiters::new("/*", "*/").with_line_prefix("*");

        match self {
            Language::Rust => CommentSyntaxProfile::new(self.name())
                .line_comment("///")
                .line_comment("//!")
                .line_comment("//")
                .block_comment(c_block.nested())
                .string(StringDelimiter::escaped("\"").multiline())
                .string(StringDelimiter::escaped("'").char_literal()),
            Language::Python => CommentSyntaxProfile::new(self.name())
                .line_comment("#")
                .string(StringDelimiter::escaped("\"\"\"").multiline())
                .string(StringDelimiter::escaped("'''").multiline())
                .string(StringDelimiter::escaped("\""))
                .string(StringDelimiter::escaped("'")),
            Language::TypeScript | Language::JavaScript => CommentSyntaxProfile::new(self.name())
                .line_comment("//")
                .block_comment(c_block)
                .string(StringDelimiter::escaped("\""))
                .string(StringDelimiter::escaped("'"))
                .string(StringDelimiter::escaped("`").multiline()),
            Language::Go => CommentSyntaxProfile::new(self.name())
                .line_comment("//")
                .block_comment(c_block)
                .string(StringDelimiter::escaped("\""))
                .string(StringDelimiter::escaped("'"))
                .string(StringDelimiter::raw("`").multiline()),
            Language::Java | Language::C | Language::Cpp => CommentSyntaxProfile::new(self.name())
                .line_comment("//")
                .block_comment(c_block)
                .string(StringDelimiter::escaped("\""))
                .string(StringDelimiter::escaped("'")),
            Language::Ruby => CommentSyntaxProfile::new(self.name())
                .line_comment("#")
                .block_comment(BlockDelimiters::new("=begin", "=end"))
                .string(StringDelimiter::escaped("\"").multiline())
                .string(StringDelimiter::escaped("'").multiline()),
            Language::Shell => CommentSyntaxProfile::new(self.name())
                .line_comment("#")
                .string(StringDelimiter::escaped("\"").multiline())
                .string(StringDelimiter::raw("'").multiline()),
        }
    }

    /// @ai:intent Get file extensions for this language
    /// @ai:effects pure
    pub fn extensions(&self) -> &[&str] {
        match self {
            Language::Rust => &["rs"],
            Language::Python => &["py", "pyi"],
            Language::TypeScript => &["ts", "tsx"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::Go => &["go"],
            Language::Java => &["java"],
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
            Language::Ruby => &["rb", "rake"],
            Language::Shell => &["sh", "bash", "zsh"],
        }
    }

    /// @ai:intent Get language name as string
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Go => "go",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Ruby => "ruby",
            Language::Shell => "shell",
        }
    }

    /// @ai:intent Look up a language by its name
    /// @ai:example ("Python") -> Ok(Python)
    /// @ai:example ("cobol") -> Err(UnknownLanguage)
    /// @ai:effects pure
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.name() == wanted)
            .ok_or_else(|| Error::UnknownLanguage(name.to_string()))
    }
}

/// @ai:intent Pick the built-in language for a file path by its extension
/// @ai:pre path is a valid file path
/// @ai:post result is Some if extension is recognized
/// @ai:example ("test.rs") -> Some(Rust)
/// @ai:example ("test.rb") -> Some(Ruby)
/// @ai:example ("test.txt") -> None
/// @ai:effects pure
pub fn detect_language(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;

    Language::ALL
        .into_iter()
        .find(|lang| lang.extensions().contains(&ext))
}

/// @ai:intent Check if a file has a built-in profile
/// @ai:effects pure
pub fn is_supported_file(path: &Path) -> bool {
    detect_language(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_c() {
        assert_eq!(detect_language(Path::new("sample.c")), Some(Language::C));
    }

    #[test]
    fn test_detect_ruby() {
        assert_eq!(detect_language(Path::new("utils.rb")), Some(Language::Ruby));
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(detect_language(Path::new("notes.txt")), None);
        assert!(!is_supported_file(Path::new("Makefile")));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Language::from_name("Python").unwrap(), Language::Python);
        assert!(matches!(
            Language::from_name("cobol"),
            Err(Error::UnknownLanguage(_))
        ));
    }

    fn keywords(source: &str, lang: Language) -> Vec<String> {
        crate::extractor::extract(source, &lang.profile())
            .unwrap()
            .blocks
            .into_iter()
            .map(|b| b.keyword)
            .collect()
    }

    #[test]
    fn test_go_raw_string_hides_keywords() {
        let source = "var s = `C:\\dir\\\n// TODO: inside raw`\n// FIXME: real\n";
        assert_eq!(keywords(source, Language::Go), vec!["FIXME"]);
    }

    #[test]
    fn test_shell_single_quotes_hide_keywords() {
        let source = "echo 'a\\\n# TODO: quoted'\n# NOTE: real\n";
        assert_eq!(keywords(source, Language::Shell), vec!["NOTE"]);
    }

    #[test]
    fn test_typescript_template_literal_hides_keywords() {
        let source = "const t = `line\n// XXX: ${inside}`;\n// HACK: real\n";
        assert_eq!(keywords(source, Language::TypeScript), vec!["HACK"]);
    }

    #[test]
    fn test_builtin_profiles_are_valid() {
        for lang in Language::ALL {
            assert!(lang.profile().validate().is_ok(), "{} profile", lang.name());
        }
    }
}
