//! @ai:module:intent Extract annotations from files and directory trees
//! @ai:module:layer infrastructure
//! @ai:module:public_api extract_file, extract_paths, ProfileRegistry
//! @ai:module:depends_on extractor, language, config, annotation, error
//! @ai:module:stateless true
//!
//! This is the caller side of the engine: it reads files, picks a profile per file and
//! fans the per-file extractions out over a rayon worker pool.

use crate::annotation::{FileFailure, FileReport, ProjectReport};
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::extractor::Extractor;
use crate::language::{detect_language, Language};
use crate::marker::MarkerSet;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Extract annotations from a single file
/// @ai:pre path exists and is readable as UTF-8
/// @ai:effects fs:read
pub fn extract_file(path: &Path, extractor: &Extractor) -> Result<FileReport> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let extraction = extractor.extract(&content);
    tracing::debug!(
        "{}: {} blocks, {} warnings",
        path.display(),
        extraction.blocks.len(),
        extraction.warnings.len()
    );

    Ok(FileReport {
        path: path.to_path_buf(),
        language: extractor.profile().name.clone(),
        blocks: extraction.blocks,
        warnings: extraction.warnings,
    })
}

/// @ai:intent Maps files to the extractor for their language
/// @ai:context custom profiles from config win over built-ins for the same extension
#[derive(Debug)]
pub struct ProfileRegistry {
    markers: MarkerSet,
    forced: Option<Extractor>,
    custom: Vec<(Vec<String>, Extractor)>,
    builtin: Vec<(Language, Extractor)>,
}

impl ProfileRegistry {
    /// @ai:intent Build extractors for every built-in language and custom profile
    /// @ai:effects pure
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let markers = config.markers.build()?;

        let custom = config
            .profiles
            .iter()
            .map(|c| {
                let extractor = Extractor::new(c.profile.clone(), markers.clone())?;
                Ok((c.extensions.clone(), extractor))
            })
            .collect::<Result<Vec<_>>>()?;

        let builtin = Language::ALL
            .into_iter()
            .map(|lang| Ok((lang, Extractor::new(lang.profile(), markers.clone())?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            markers,
            forced: None,
            custom,
            builtin,
        })
    }

    /// @ai:intent Use one language for every file regardless of extension
    /// @ai:pre name is a built-in language or a custom profile name
    pub fn force_language(mut self, name: &str) -> Result<Self> {
        let custom = self
            .custom
            .iter()
            .find(|(_, e)| e.profile().name.eq_ignore_ascii_case(name))
            .map(|(_, e)| e.clone());

        let extractor = match custom {
            Some(extractor) => extractor,
            None => {
                let lang = Language::from_name(name)?;
                Extractor::new(lang.profile(), self.markers.clone())?
            }
        };
        self.forced = Some(extractor);
        Ok(self)
    }

    /// @ai:intent Find the extractor for a path, if any profile applies
    /// @ai:effects pure
    pub fn resolve(&self, path: &Path) -> Option<&Extractor> {
        if let Some(forced) = &self.forced {
            return Some(forced);
        }

        let ext = path.extension().and_then(|e| e.to_str());
        if let Some(ext) = ext {
            if let Some((_, extractor)) = self
                .custom
                .iter()
                .find(|(exts, _)| exts.iter().any(|e| e == ext))
            {
                return Some(extractor);
            }
        }

        let lang = detect_language(path)?;
        self.builtin
            .iter()
            .find(|(l, _)| *l == lang)
            .map(|(_, extractor)| extractor)
    }
}

/// @ai:intent Expand files and directories into the sorted list of files with a profile
/// @ai:post explicitly named files are kept even without a matching profile;
///          missing paths and unreadable directory entries come back as failures
/// @ai:effects fs:read
pub fn collect_files(paths: &[PathBuf], registry: &ProfileRegistry) -> (Vec<PathBuf>, Vec<FileFailure>) {
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.exists() {
            failures.push(FileFailure {
                path: path.clone(),
                message: Error::PathNotFound(path.clone()).to_string(),
            });
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let failed = e.path().unwrap_or(path.as_path()).to_path_buf();
                    failures.push(FileFailure {
                        path: failed.clone(),
                        message: Error::Walk { path: failed, source: e }.to_string(),
                    });
                    continue;
                }
            };
            if entry.file_type().is_file() && registry.resolve(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }
    }

    (files, failures)
}

/// @ai:intent Extract every file under `paths` in parallel
/// @ai:post file reports keep the order of `collect_files`; unreadable paths become failures
/// @ai:effects fs:read
pub fn extract_paths(paths: &[PathBuf], registry: &ProfileRegistry) -> ProjectReport {
    let (files, walk_failures) = collect_files(paths, registry);
    tracing::info!("Extracting annotations from {} files", files.len());

    let results: Vec<std::result::Result<FileReport, FileFailure>> = files
        .par_iter()
        .map(|path| {
            let extractor = registry.resolve(path).ok_or_else(|| FileFailure {
                path: path.clone(),
                message: Error::UnsupportedFileType(path.display().to_string()).to_string(),
            })?;
            extract_file(path, extractor).map_err(|e| FileFailure {
                path: path.clone(),
                message: e.to_string(),
            })
        })
        .collect();

    let mut report = ProjectReport::default();
    let outcomes = walk_failures
        .into_iter()
        .map(Err)
        .chain(results);
    for result in outcomes {
        match result {
            Ok(file) => report.push(file),
            Err(failure) => {
                tracing::warn!("Skipping {}: {}", failure.path.display(), failure.message);
                report.failures.push(failure);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::BlockStyle;
    use std::fs;
    use tempfile::TempDir;

    fn registry() -> ProfileRegistry {
        ProfileRegistry::new(&ScanConfig::default()).unwrap()
    }

    #[test]
    fn test_extract_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.rs");
        fs::write(&path, "fn main() {\n    // TODO: wire up args\n}\n").unwrap();

        let registry = registry();
        let extractor = registry.resolve(&path).unwrap();
        let report = extract_file(&path, extractor).unwrap();

        assert_eq!(report.language, "rust");
        assert_eq!(report.blocks.len(), 1);
        assert_eq!(report.blocks[0].payload, vec!["wire up args"]);
    }

    #[test]
    fn test_extract_file_missing() {
        let registry = registry();
        let path = Path::new("does/not/exist.c");
        let err = extract_file(path, registry.resolve(path).unwrap()).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_extract_paths_walks_sorted_and_skips_unknown() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.py"), "# FIXME: b\n").unwrap();
        fs::write(dir.path().join("a.c"), "/* TODOS.START\nx\nTODOS.END */\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "TODO: not code\n").unwrap();
        fs::write(dir.path().join("sub").join("c.rb"), "# NOTE: c\n").unwrap();

        let report = extract_paths(&[dir.path().to_path_buf()], &registry());

        let names: Vec<String> = report
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.c", "b.py", "c.rb"]);
        assert_eq!(report.total_blocks, 3);
        assert_eq!(report.files[0].blocks[0].style, BlockStyle::NamedRegion);
        assert!(report.failures.is_empty());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_unknown_explicit_file_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "// TODO: x\n").unwrap();

        let report = extract_paths(&[path], &registry());
        assert!(report.files.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(report.has_warnings());
    }

    #[test]
    fn test_missing_path_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("typo");

        let report = extract_paths(&[missing.clone()], &registry());
        assert!(report.files.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, missing);
        assert!(report.failures[0].message.contains("Path not found"));
        assert!(report.has_warnings());
    }

    #[test]
    fn test_missing_path_does_not_hide_other_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ok.c");
        fs::write(&file, "// TODO: still scanned\n").unwrap();

        let report = extract_paths(&[dir.path().join("gone"), file], &registry());
        assert_eq!(report.total_blocks, 1);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_forced_language() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "# XXX: treat as shell\n").unwrap();

        let registry = registry().force_language("shell").unwrap();
        let report = extract_paths(&[path], &registry);
        assert_eq!(report.total_blocks, 1);
        assert_eq!(report.files[0].language, "shell");
    }

    #[test]
    fn test_custom_profile_by_extension() {
        let config: ScanConfig = toml::from_str(
            r#"[[profiles]]
name = "sql"
extensions = ["sql"]
line_comments = ["--"]
"#,
        )
        .unwrap();
        let registry = ProfileRegistry::new(&config).unwrap();
        let extractor = registry.resolve(Path::new("schema.sql")).unwrap();
        assert_eq!(extractor.profile().name, "sql");

        let extraction = extractor.extract("-- HACK: denormalized\nSELECT 1;\n");
        assert_eq!(extraction.blocks[0].keyword, "HACK");
    }
}
