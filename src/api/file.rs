use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use super::http::CompanyInvoiceResponse;
use super::InvoiceProvider;
use crate::config::CompanyDirectory;
use crate::error::Result;
use crate::invoice::Invoice;

/// Reads an invoice snapshot saved as JSON; companies come from the local directory
#[derive(Debug)]
pub struct FileProvider {
    path: PathBuf,
    companies: CompanyDirectory,
}

impl FileProvider {
    pub fn new(path: impl AsRef<Path>, companies: CompanyDirectory) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            companies,
        }
    }

    fn read(&self) -> Result<String> {
        tracing::debug!(path = %self.path.display(), "reading invoice snapshot");
        Ok(fs::read_to_string(&self.path)?)
    }
}

impl InvoiceProvider for FileProvider {
    /// The snapshot is returned whatever id is asked for
    fn invoice_by_id(&self, _invoice_id: &str) -> Result<Invoice> {
        Ok(serde_json::from_str(&self.read()?)?)
    }

    fn invoice_by_company(&self, company_id: &str, date: NaiveDate) -> Result<Invoice> {
        let response: CompanyInvoiceResponse = serde_json::from_str(&self.read()?)?;
        Ok(response.into_invoice(company_id, date))
    }

    fn active_companies(&self) -> Result<CompanyDirectory> {
        Ok(self.companies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvoiceError;
    use tempfile::TempDir;

    #[test]
    fn test_reads_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invoice.json");
        fs::write(&path, r#"{"id":"x","number":"INV-5","fees":[{"amount":1}]}"#).unwrap();

        let provider = FileProvider::new(&path, CompanyDirectory::default());
        let invoice = provider.invoice_by_id("ignored").unwrap();
        assert_eq!(invoice.display_number(), "INV-5");
        assert_eq!(invoice.fees.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let provider = FileProvider::new("/nonexistent/invoice.json", CompanyDirectory::default());
        assert!(matches!(
            provider.invoice_by_id("x").unwrap_err(),
            InvoiceError::Io(_)
        ));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invoice.json");
        fs::write(&path, "{not json").unwrap();
        let provider = FileProvider::new(&path, CompanyDirectory::default());
        assert!(matches!(
            provider.invoice_by_id("x").unwrap_err(),
            InvoiceError::Json(_)
        ));
    }
}
