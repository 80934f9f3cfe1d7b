use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("No invoice data to export")]
    NoData,

    #[error("Failed to load invoice after {attempts} attempt(s): {message}")]
    Fetch { attempts: u32, message: String },

    #[error("Request failed: {0}")]
    Http(String),

    #[error("No API base_url configured. Set [api] base_url in config.toml or use --file.")]
    ApiNotConfigured,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Specify one of --invoice-id, --company or --file")]
    NoSource,

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Failed to parse invoice data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write spreadsheet: {0}")]
    Csv(#[from] csv::Error),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    /// Already shown to the user; only the exit status is left to report
    #[error("{0}")]
    Reported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
