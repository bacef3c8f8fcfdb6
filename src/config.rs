//! Configuration file support for ferro-gl.
//!
//! This module loads `.ferro-gl.toml` configuration files, which can set the
//! history file, default liftover policies and the GL Service endpoint.
//!
//! # Example Configuration
//!
//! ```toml
//! [history]
//! path = "/data/IMGTHLA/AllelelistGgroups_history.txt"
//!
//! [liftover]
//! target = "3.25.0"
//! duplicates = "collapse"
//! genotype = "degenerate"
//! unknown-source = "reject"
//!
//! [service]
//! url = "https://gl.nmdp.org"
//! namespace = "imgt-hla"
//! timeout-secs = 30
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-gl.toml` in current directory
//! 2. `~/.config/ferro-gl/config.toml`
//!
//! CLI flags take precedence over config file settings.

use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GlError;
use crate::history::default_history_path;
use crate::liftover::{
    DuplicatePolicy, GenotypePolicy, LiftoverConfig, UnknownSourcePolicy,
};

/// Default GL Service base URL
pub const DEFAULT_SERVICE_URL: &str = "https://gl.nmdp.org";

/// Default GL Service namespace
pub const DEFAULT_NAMESPACE: &str = "imgt-hla";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CWD_CONFIG: &str = ".ferro-gl.toml";

/// Parsed configuration from a `.ferro-gl.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlConfig {
    pub history: HistorySection,
    pub liftover: LiftoverSection,
    pub service: ServiceSection,
}

/// `[history]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySection {
    /// History file (plain or `.gz`)
    pub path: Option<PathBuf>,
}

/// `[liftover]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct LiftoverSection {
    /// Default target version
    pub target: Option<String>,
    pub duplicates: Option<DuplicatePolicy>,
    pub genotype: Option<GenotypePolicy>,
    pub unknown_source: Option<UnknownSourcePolicy>,
}

/// `[service]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ServiceSection {
    pub url: Option<String>,
    pub namespace: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Liftover switches given on the command line. `false` means "not given".
#[derive(Debug, Clone, Copy, Default)]
pub struct CliPolicies {
    pub collapse_duplicates: bool,
    pub degenerate_genotypes: bool,
    pub strict: bool,
}

impl GlConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.ferro-gl.toml` in current directory
    /// 2. `~/.config/ferro-gl/config.toml`
    ///
    /// A file that exists but cannot be parsed is skipped with a warning.
    pub fn load() -> Option<Self> {
        let candidates = std::iter::once(PathBuf::from(CWD_CONFIG)).chain(
            dirs_home().map(|home| home.join(".config").join("ferro-gl").join("config.toml")),
        );

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => {
                    debug!("Loaded config from {}", path.display());
                    return Some(config);
                }
                Err(e) => warn!("Ignoring {}: {}", path.display(), e),
            }
        }
        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, GlError> {
        let content = fs::read_to_string(path).map_err(|e| GlError::Config {
            msg: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, GlError> {
        toml::from_str(content).map_err(|e| GlError::Config { msg: e.to_string() })
    }

    /// History file to use: CLI, then config, then `$IMGTHLA`
    pub fn history_path(&self, cli: Option<&Path>) -> Option<PathBuf> {
        cli.map(Path::to_path_buf)
            .or_else(|| self.history.path.clone())
            .or_else(default_history_path)
    }

    /// Target version: CLI, then config
    pub fn target_version(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.liftover.target.clone())
    }

    /// Merge liftover policies with CLI switches.
    /// CLI switches take precedence.
    pub fn liftover_config(&self, cli: CliPolicies) -> LiftoverConfig {
        let section = &self.liftover;
        LiftoverConfig {
            duplicates: if cli.collapse_duplicates {
                DuplicatePolicy::Collapse
            } else {
                section.duplicates.unwrap_or_default()
            },
            genotype: if cli.degenerate_genotypes {
                GenotypePolicy::Degenerate
            } else {
                section.genotype.unwrap_or_default()
            },
            unknown_source: if cli.strict {
                UnknownSourcePolicy::Reject
            } else {
                section.unknown_source.unwrap_or_default()
            },
        }
    }

    pub fn service_url(&self) -> &str {
        self.service.url.as_deref().unwrap_or(DEFAULT_SERVICE_URL)
    }

    pub fn service_namespace(&self) -> &str {
        self.service
            .namespace
            .as_deref()
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn service_timeout_secs(&self) -> u64 {
        self.service.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[history]
path = "/data/history.txt.gz"

[liftover]
target = "3.25.0"
duplicates = "collapse"
genotype = "degenerate"
unknown-source = "reject"

[service]
url = "http://localhost:8080"
namespace = "kir"
timeout-secs = 5
"#;
        let config = GlConfig::parse(content).unwrap();
        assert_eq!(
            config.history.path.as_deref(),
            Some(Path::new("/data/history.txt.gz"))
        );
        assert_eq!(config.liftover.target.as_deref(), Some("3.25.0"));
        assert_eq!(config.liftover.duplicates, Some(DuplicatePolicy::Collapse));
        assert_eq!(config.liftover.genotype, Some(GenotypePolicy::Degenerate));
        assert_eq!(
            config.liftover.unknown_source,
            Some(UnknownSourcePolicy::Reject)
        );
        assert_eq!(config.service_url(), "http://localhost:8080");
        assert_eq!(config.service_namespace(), "kir");
        assert_eq!(config.service_timeout_secs(), 5);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = GlConfig::parse("").unwrap();
        assert_eq!(config, GlConfig::default());
        assert_eq!(config.service_url(), DEFAULT_SERVICE_URL);
        assert_eq!(config.service_namespace(), DEFAULT_NAMESPACE);
        assert_eq!(config.liftover_config(CliPolicies::default()), LiftoverConfig::default());
    }

    #[test]
    fn test_parse_with_comments() {
        let content = "# settings\n[liftover]\n# prefer newest\ntarget = \"3.30.0\"\n";
        let config = GlConfig::parse(content).unwrap();
        assert_eq!(config.target_version(None).as_deref(), Some("3.30.0"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(GlConfig::parse("[liftover]\nduplicates = \"sometimes\"\n").is_err());
        assert!(GlConfig::parse("[unknown]\nkey = 1\n").is_err());
        assert!(GlConfig::parse("[history\n").is_err());
    }

    #[test]
    fn test_cli_takes_precedence() {
        let config = GlConfig::parse(
            "[history]\npath = \"config.txt\"\n[liftover]\ntarget = \"3.25.0\"\n",
        )
        .unwrap();
        assert_eq!(
            config.history_path(Some(Path::new("cli.txt"))),
            Some(PathBuf::from("cli.txt"))
        );
        assert_eq!(config.history_path(None), Some(PathBuf::from("config.txt")));
        assert_eq!(config.target_version(Some("3.30.0")).as_deref(), Some("3.30.0"));
        assert_eq!(config.target_version(None).as_deref(), Some("3.25.0"));
    }

    #[test]
    fn test_merge_policies() {
        let config = GlConfig::parse("[liftover]\nduplicates = \"collapse\"\n").unwrap();
        let merged = config.liftover_config(CliPolicies {
            strict: true,
            ..Default::default()
        });
        assert_eq!(merged.duplicates, DuplicatePolicy::Collapse);
        assert_eq!(merged.genotype, GenotypePolicy::AllOrNothing);
        assert_eq!(merged.unknown_source, UnknownSourcePolicy::Reject);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service]\ntimeout-secs = 10\n").unwrap();
        let config = GlConfig::load_from_path(&path).unwrap();
        assert_eq!(config.service_timeout_secs(), 10);

        let err = GlConfig::load_from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, GlError::Config { .. }));
    }
}
