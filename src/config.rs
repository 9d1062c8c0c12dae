//! @ai:module:intent Load marker vocabulary and custom language profiles from TOML
//! @ai:module:layer infrastructure
//! @ai:module:public_api ScanConfig, MarkerConfig, CustomProfile
//! @ai:module:depends_on marker, profile, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::marker::{Keyword, MarkerSet, DEFAULT_REGION};
use crate::profile::CommentSyntaxProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "todoscan.toml";

/// @ai:intent Top-level configuration for a scan
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub profiles: Vec<CustomProfile>,
}

/// @ai:intent Marker vocabulary settings
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    #[serde(default)]
    pub case_insensitive: bool,
    /// Extra spellings, e.g. `"@todo" = "TODO"`.
    #[serde(default)]
    pub aliases: BTreeMap<String, Keyword>,
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
}

/// @ai:intent A user-supplied profile and the file extensions it applies to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomProfile {
    #[serde(flatten)]
    pub profile: CommentSyntaxProfile,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            aliases: BTreeMap::new(),
            regions: default_regions(),
        }
    }
}

fn default_regions() -> Vec<String> {
    vec![DEFAULT_REGION.to_string()]
}

impl MarkerConfig {
    /// @ai:intent Compile these settings into a marker set
    /// @ai:effects pure
    pub fn build(&self) -> Result<MarkerSet> {
        let mut builder = MarkerSet::builder().case_insensitive(self.case_insensitive);
        for (spelling, keyword) in &self.aliases {
            builder = builder.alias(spelling, *keyword);
        }
        for region in &self.regions {
            builder = builder.region(region);
        }
        builder.build()
    }
}

impl ScanConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// @ai:intent Use the given file, else `todoscan.toml` in the working directory, else defaults
    /// @ai:effects fs:read
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    tracing::debug!("Using {}", default_path.display());
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// @ai:intent Check every custom profile and that the marker settings compile
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        for custom in &self.profiles {
            custom.profile.validate()?;
        }
        self.markers.build().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert!(!config.markers.case_insensitive);
        assert_eq!(config.markers.regions, vec!["TODOS".to_string()]);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_load_config_with_custom_profile() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"[markers]
case_insensitive = true
regions = ["TODOS", "PLAN"]

[markers.aliases]
"@todo" = "TODO"
"@bug" = "FIXME"

[[profiles]]
name = "sql"
extensions = ["sql"]
line_comments = ["--"]

[[profiles.block_comments]]
open = "/*"
close = "*/"

[[profiles.strings]]
delimiter = "'"
"#
        )
        .unwrap();

        let config = ScanConfig::load(file.path()).unwrap();
        assert!(config.markers.case_insensitive);
        assert_eq!(config.markers.aliases.get("@bug"), Some(&Keyword::Fixme));
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.profiles[0].profile.name, "sql");
        assert_eq!(config.profiles[0].extensions, vec!["sql".to_string()]);

        let markers = config.markers.build().unwrap();
        assert!(markers.is_case_insensitive());
        assert_eq!(markers.regions().len(), 2);
    }

    #[test]
    fn test_invalid_custom_profile_is_rejected() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"[[profiles]]
name = "nothing"
extensions = ["txt"]
"#
        )
        .unwrap();

        let err = ScanConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidProfile { .. }));
    }

    #[test]
    fn test_malformed_toml_reports_path() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[markers\ncase_insensitive = ").unwrap();

        let err = ScanConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
