//! Delimited-text export of the filtered record set.

use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use tracing::{debug, info};
use trendboard_core::error::{Result, TrendboardError};
use trendboard_core::models::Record;

/// Column headers, in output order.
pub const EXPORT_HEADERS: [&str; 6] = [
    "Date", "Company", "Location", "Laid Off", "Industry", "Country",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub delimiter: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Serialise `records` as delimited text with a header row.
///
/// Fields containing the delimiter, a double quote, CR or LF are quoted and
/// inner quotes doubled. Returns `Ok(None)` for an empty record slice.
pub fn export_records(records: &[Record], options: &ExportOptions) -> Result<Option<String>> {
    if records.is_empty() {
        return Ok(None);
    }

    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        let date = record.date.format("%Y-%m-%d").to_string();
        let laid_off = record.laid_off.to_string();
        writer.write_record([
            date.as_str(),
            record.company.as_str(),
            record.headquarter.as_deref().unwrap_or(""),
            laid_off.as_str(),
            record.industry.as_deref().unwrap_or(""),
            record.country.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| {
        TrendboardError::Io(std::io::Error::new(e.error().kind(), e.to_string()))
    })?;
    let text = String::from_utf8(bytes).map_err(|e| {
        TrendboardError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;

    debug!(rows = records.len(), "Serialised export");
    Ok(Some(text))
}

/// Write the export of `records` to `path`.
///
/// Returns `false` without touching the filesystem when there is nothing to
/// export.
pub fn write_export(records: &[Record], path: &Path, options: &ExportOptions) -> Result<bool> {
    let Some(text) = export_records(records, options)? else {
        info!("Nothing to export");
        return Ok(false);
    };
    std::fs::write(path, text)?;
    info!(path = %path.display(), rows = records.len(), "Exported records");
    Ok(true)
}
