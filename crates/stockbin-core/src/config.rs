//! Configuration types for stockbin.
//!
//! [`Config::load`] reads `~/.config/stockbin/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then applies
//! `STOCKBIN__<SECTION>__<KEY>` environment overrides. [`Config::defaults`]
//! returns the same defaults without touching the filesystem (useful in
//! tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ingest::{IngestOptions, RowFilter};
use crate::search::{SearchOptions, Whitespace};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[source]
location = "public/data.xlsx"
autoload = true

[ingest]
drop_blank_rows = true

[search]
strip_whitespace = true
# limit = 120

[ui]
theme = "default"
"#;

/// Result cap used by the auto-fetch profile.
pub const FETCH_PROFILE_LIMIT: usize = 120;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// `http://` URL or filesystem path of the well-known workbook.
    #[serde(default = "default_location")]
    pub location: String,
    /// Load `location` at startup.
    #[serde(default = "default_true")]
    pub autoload: bool,
}

fn default_location() -> String { "public/data.xlsx".to_string() }
fn default_true() -> bool { true }

impl Default for SourceConfig {
    fn default() -> Self {
        Self { location: default_location(), autoload: true }
    }
}

/// `[ingest]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_true")]
    pub drop_blank_rows: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { drop_blank_rows: true }
    }
}

/// `[search]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_true")]
    pub strip_whitespace: bool,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { strip_whitespace: true, limit: None }
    }
}

/// `[ui]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self { theme: default_theme() }
    }
}

/// Named policy presets matching the two ways the page is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Fetch the well-known workbook at startup; drop blank rows, strip
    /// spaces, cap results at [`FETCH_PROFILE_LIMIT`].
    Fetch,
    /// Start empty and wait for `:open`; keep every row, keep spaces, no cap.
    Upload,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `path` (or the default location), layered on top of the
    /// built-in defaults and under environment overrides. Creates the
    /// default file with defaults if it does not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = config_path();
                if !p.exists() {
                    if let Some(parent) = p.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&p, DEFAULT_CONFIG.trim_start())?;
                }
                p
            }
        };

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix("STOCKBIN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Overwrite the policy fields with a preset.
    pub fn apply_profile(&mut self, profile: Profile) {
        match profile {
            Profile::Fetch => {
                self.source.autoload = true;
                self.ingest.drop_blank_rows = true;
                self.search.strip_whitespace = true;
                self.search.limit = Some(FETCH_PROFILE_LIMIT);
            }
            Profile::Upload => {
                self.source.autoload = false;
                self.ingest.drop_blank_rows = false;
                self.search.strip_whitespace = false;
                self.search.limit = None;
            }
        }
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            row_filter: if self.ingest.drop_blank_rows {
                RowFilter::DropBlank
            } else {
                RowFilter::KeepAll
            },
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            whitespace: if self.search.strip_whitespace {
                Whitespace::Strip
            } else {
                Whitespace::Keep
            },
            limit: self.search.limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("stockbin")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
