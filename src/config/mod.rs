mod company;
mod settings;

pub use company::{resolve_company_name, Company, CompanyDirectory};
pub use settings::{ApiSettings, Config, ExportSettings};

use crate::error::{InvoiceError, Result};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.invoice-details/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "invoice-details") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.invoice-details/
    let home = dirs_home().ok_or_else(|| {
        InvoiceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".invoice-details"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the configured output directory; relative paths hang off the config dir
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() || output_dir == "." {
        path
    } else {
        config_dir.join(path)
    }
}

/// Load config.toml, falling back to defaults when it does not exist
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })
}

/// Load companies.toml as a directory; a missing file is an empty directory
pub fn load_companies(config_dir: &Path) -> Result<CompanyDirectory> {
    let path = config_dir.join("companies.toml");
    if !path.exists() {
        return Ok(CompanyDirectory::default());
    }
    let content = fs::read_to_string(&path)?;
    let table: HashMap<String, Company> =
        toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })?;

    let mut companies: Vec<Company> = table
        .into_iter()
        .map(|(id, mut company)| {
            if company.id.is_empty() {
                company.id = id;
            }
            company
        })
        .collect();
    companies.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(CompanyDirectory::new(companies))
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
# base_url = "https://billing.example.com/api"
# token = "..."                 # optional bearer token
timeout_secs = 10
retries = 1                     # automatic retries after a failed fetch

[export]
output_dir = "~/.invoice-details/output"
"#;

/// Template content for companies.toml
pub const COMPANIES_TEMPLATE: &str = r#"# Local company directory. The table name is the company id as it
# appears on invoices (matched case-insensitively).
#
# Example:
#   invoice-details show --file invoice.json

["00000000-0000-0000-0000-000000000001"]
name = "Example Rentals"
stateId = "CA"                  # optional
"#;
