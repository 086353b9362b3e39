//! Source fetching and CSV parsing for Trendboard.
//!
//! Retrieves the layoff CSV from a local path or an `http(s)` URL and turns
//! it into [`Record`]s. Rows that cannot be turned into a valid record are
//! dropped; the parse as a whole only fails when the header row lacks one of
//! the required columns.

use std::fmt;
use std::path::PathBuf;

use csv::StringRecord;
use regex::Regex;
use tracing::{debug, warn};
use trendboard_core::config::{ColumnIndices, ColumnMapping, DataConfig};
use trendboard_core::data_processors::{non_empty, CountParser, DateParser};
use trendboard_core::error::{Result, TrendboardError};
use trendboard_core::models::Record;

// ── DataSource ────────────────────────────────────────────────────────────────

/// Where the CSV text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A file on the local filesystem.
    File(PathBuf),
    /// A static file served over HTTP(S); fetched with a single `GET`.
    Url(String),
}

impl DataSource {
    /// Classify a user-supplied location: anything starting with `http://` or
    /// `https://` is a URL, everything else a path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

// ── ParseOptions ──────────────────────────────────────────────────────────────

/// Column mapping plus the headquarter exclusion rule.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub columns: ColumnMapping,
    /// Rows whose headquarter matches are dropped. `None` keeps everything.
    pub exclude_headquarter: Option<Regex>,
}

impl ParseOptions {
    /// Build options from a loaded [`DataConfig`].
    pub fn from_config(config: &DataConfig) -> Result<Self> {
        Ok(Self {
            columns: config.columns.clone(),
            exclude_headquarter: config.exclude_regex()?,
        })
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        // The built-in pattern is a constant known to compile.
        let exclude_headquarter = DataConfig::default().exclude_regex().ok().flatten();
        Self {
            columns: ColumnMapping::default(),
            exclude_headquarter,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Retrieve the raw CSV text from `source`.
///
/// Files and HTTP bodies are decoded the same way: invalid UTF-8 sequences
/// become U+FFFD instead of failing the load.
pub async fn fetch_text(source: &DataSource) -> Result<String> {
    let bytes = match source {
        DataSource::File(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|e| TrendboardError::FileRead {
                    path: path.clone(),
                    source: e,
                })?
        }
        DataSource::Url(url) => {
            let response = reqwest::get(url).await.map_err(|e| TrendboardError::Fetch {
                url: url.clone(),
                message: e.to_string(),
            })?;
            let status = response.status();
            if !status.is_success() {
                return Err(TrendboardError::HttpStatus {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            response
                .bytes()
                .await
                .map_err(|e| TrendboardError::Fetch {
                    url: url.clone(),
                    message: e.to_string(),
                })?
                .to_vec()
        }
    };
    Ok(decode_lossy(bytes, source))
}

/// Fetch and parse `source`, propagating fetch and header errors.
pub async fn try_load_records(source: &DataSource, options: &ParseOptions) -> Result<Vec<Record>> {
    let text = fetch_text(source).await?;
    let records = parse_records(&text, options)?;
    debug!("Loaded {} records from {}", records.len(), source);
    Ok(records)
}

/// Fetch and parse `source`, degrading every failure to an empty sequence.
///
/// The failure is logged; callers render their empty state.
pub async fn load_records(source: &DataSource, options: &ParseOptions) -> Vec<Record> {
    match try_load_records(source, options).await {
        Ok(records) => records,
        Err(e) => {
            warn!("Could not load layoff data from {}: {}", source, e);
            Vec::new()
        }
    }
}

/// Parse CSV text (header row first) into records, in input order.
///
/// Blank input yields an empty sequence. A header row missing the company,
/// count or date column yields [`TrendboardError::MissingColumn`].
pub fn parse_records(text: &str, options: &ParseOptions) -> Result<Vec<Record>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = options.columns.resolve(headers.iter())?;

    let mut records = Vec::new();
    let mut rows_read = 0u64;
    let mut rows_dropped = 0u64;

    for row in reader.records() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping unreadable CSV row: {}", e);
                rows_dropped += 1;
                continue;
            }
        };
        rows_read += 1;

        match map_row(&row, &columns, options) {
            Some(record) => records.push(record),
            None => rows_dropped += 1,
        }
    }

    debug!(
        "CSV parse: {} rows read, {} dropped, {} accepted",
        rows_read,
        rows_dropped,
        records.len()
    );

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn decode_lossy(bytes: Vec<u8>, source: &DataSource) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("{} is not valid UTF-8; replacing invalid bytes", source);
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Turn one CSV row into a [`Record`], or `None` when the row is rejected.
///
/// A row is rejected when:
/// * the company cell is blank,
/// * the count is not a positive integer,
/// * the date cannot be parsed,
/// * the headquarter matches the exclusion pattern.
fn map_row(row: &StringRecord, columns: &ColumnIndices, options: &ParseOptions) -> Option<Record> {
    let cell = |idx: usize| row.get(idx).unwrap_or("");
    let optional = |idx: Option<usize>| idx.and_then(|i| non_empty(cell(i)));

    let Some(company) = non_empty(cell(columns.company)) else {
        debug!("Dropping row without company");
        return None;
    };

    let laid_off = CountParser::parse_or_zero(cell(columns.laid_off));
    if laid_off == 0 {
        debug!("Dropping {}: no usable headcount", company);
        return None;
    }

    let Some(date) = DateParser::parse(cell(columns.date)) else {
        debug!("Dropping {}: unparseable date", company);
        return None;
    };

    let headquarter = optional(columns.headquarter);
    if let (Some(pattern), Some(hq)) = (&options.exclude_headquarter, headquarter.as_deref()) {
        if pattern.is_match(hq) {
            debug!("Dropping {}: excluded headquarter {}", company, hq);
            return None;
        }
    }

    Some(Record {
        company,
        headquarter,
        laid_off,
        date,
        industry: optional(columns.industry),
        country: optional(columns.country),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
