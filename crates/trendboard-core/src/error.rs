use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Trendboard.
#[derive(Error, Debug)]
pub enum TrendboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote data source could not be fetched.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The remote data source answered with a non-success status.
    #[error("Fetching {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The delimited text could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// None of the accepted header spellings for a required column were found.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The headquarter exclusion pattern is not a valid regular expression.
    #[error("Invalid exclusion pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the trendboard crates.
pub type Result<T> = std::result::Result<T, TrendboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = TrendboardError::FileRead {
            path: PathBuf::from("/data/layoffs.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/layoffs.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_fetch() {
        let err = TrendboardError::Fetch {
            url: "https://example.org/layoffs.csv".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch https://example.org/layoffs.csv: connection refused"
        );
    }

    #[test]
    fn test_error_display_http_status() {
        let err = TrendboardError::HttpStatus {
            url: "https://example.org/layoffs.csv".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Fetching https://example.org/layoffs.csv returned HTTP 404"
        );
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = TrendboardError::MissingColumn("company".to_string());
        assert_eq!(err.to_string(), "Missing required column: company");
    }

    #[test]
    fn test_error_display_config() {
        let err = TrendboardError::Config("empty delimiter".to_string());
        assert_eq!(err.to_string(), "Configuration error: empty delimiter");
    }

    #[test]
    fn test_error_from_regex() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: TrendboardError = regex_err.into();
        assert!(err.to_string().starts_with("Invalid exclusion pattern"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TrendboardError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: TrendboardError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
