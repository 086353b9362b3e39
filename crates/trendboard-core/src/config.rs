//! Data-source configuration: which header spellings map to which record
//! field, which headquarters are excluded, and where the file lives.
//!
//! Stored as JSON at `~/.trendboard/config.json` (or an explicit
//! `--config` path). A missing file yields the defaults.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TrendboardError};

/// Default exclusion for non-US headquarters.
pub const DEFAULT_EXCLUDE_PATTERN: &str = r"Non-U\.S";

// ── ColumnMapping ─────────────────────────────────────────────────────────────

/// Accepted header spellings for every record field.
///
/// Header cells are compared case-insensitively after trimming; the first
/// spelling present in the header row wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub company: Vec<String>,
    pub laid_off: Vec<String>,
    pub date: Vec<String>,
    pub headquarter: Vec<String>,
    pub industry: Vec<String>,
    pub country: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        Self {
            company: names(&["Company"]),
            laid_off: names(&["# Laid Off", "layoffs", "Laid Off", "laid_off"]),
            date: names(&["Date"]),
            headquarter: names(&[
                "Location HQ",
                "Headquarter",
                "Headquarters",
                "Location",
                "City",
            ]),
            industry: names(&["Industry"]),
            country: names(&["Country"]),
        }
    }
}

/// Column positions resolved against one concrete header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub company: usize,
    pub laid_off: usize,
    pub date: usize,
    pub headquarter: Option<usize>,
    pub industry: Option<usize>,
    pub country: Option<usize>,
}

impl ColumnMapping {
    /// Resolve field positions in `headers`.
    ///
    /// Fails with [`TrendboardError::MissingColumn`] when the company, count
    /// or date column cannot be found; optional columns resolve to `None`.
    pub fn resolve<'a, I>(&self, headers: I) -> Result<ColumnIndices>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let normalised: Vec<String> = headers
            .into_iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();

        let find = |candidates: &[String]| -> Option<usize> {
            candidates.iter().find_map(|name| {
                let wanted = name.trim().to_lowercase();
                normalised.iter().position(|h| *h == wanted)
            })
        };
        let require = |candidates: &[String], field: &str| -> Result<usize> {
            find(candidates).ok_or_else(|| TrendboardError::MissingColumn(field.to_string()))
        };

        Ok(ColumnIndices {
            company: require(&self.company, "company")?,
            laid_off: require(&self.laid_off, "laid_off")?,
            date: require(&self.date, "date")?,
            headquarter: find(&self.headquarter),
            industry: find(&self.industry),
            country: find(&self.country),
        })
    }
}

// ── DataConfig ────────────────────────────────────────────────────────────────

/// Persisted data-source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Header-name mapping used by the parser.
    pub columns: ColumnMapping,
    /// Regular expression; rows whose headquarter matches are dropped.
    pub exclude_headquarter_pattern: String,
    /// Source used when `--source` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            exclude_headquarter_pattern: DEFAULT_EXCLUDE_PATTERN.to_string(),
            source: None,
        }
    }
}

impl DataConfig {
    /// Return the default path to the config file (`~/.trendboard/config.json`).
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".trendboard").join("config.json")
    }

    /// Load the config from `path`.
    ///
    /// A missing file is not an error. A file that exists but cannot be
    /// parsed is logged and replaced by the defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Could not read config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Compile the exclusion pattern. An empty pattern disables exclusion.
    pub fn exclude_regex(&self) -> Result<Option<Regex>> {
        if self.exclude_headquarter_pattern.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Regex::new(&self.exclude_headquarter_pattern)?))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
