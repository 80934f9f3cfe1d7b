//! Invoice data providers.

mod file;
mod http;

pub use file::FileProvider;
pub use http::{CompanyInvoiceResponse, HttpProvider};

use chrono::NaiveDate;

use crate::config::CompanyDirectory;
use crate::error::{InvoiceError, Result};
use crate::invoice::Invoice;

/// Source of invoices and of the company directory
pub trait InvoiceProvider {
    fn invoice_by_id(&self, invoice_id: &str) -> Result<Invoice>;

    fn invoice_by_company(&self, company_id: &str, date: NaiveDate) -> Result<Invoice>;

    fn active_companies(&self) -> Result<CompanyDirectory>;
}

/// How the invoice to show was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceQuery {
    ById(String),
    ByCompany { company_id: String, date: NaiveDate },
}

impl InvoiceQuery {
    /// Company the user picked, if any
    pub fn selected_company(&self) -> Option<&str> {
        match self {
            InvoiceQuery::ById(_) => None,
            InvoiceQuery::ByCompany { company_id, .. } => Some(company_id),
        }
    }
}

/// Run `op`, retrying up to `retries` more times after a failure.
/// The last failure is returned as a `Fetch` error.
pub fn fetch_with_retry<T>(retries: u32, mut op: impl FnMut() -> Result<T>) -> Result<T> {
    let attempts = retries + 1;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                tracing::warn!(attempt, error = %e, "fetch failed, retrying");
            }
            Err(e) => {
                tracing::debug!(attempt, error = %e, "fetch failed");
                return Err(InvoiceError::Fetch {
                    attempts: attempt,
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Fetch the invoice a query points at, with bounded retries
pub fn load_invoice(
    provider: &dyn InvoiceProvider,
    query: &InvoiceQuery,
    retries: u32,
) -> Result<Invoice> {
    fetch_with_retry(retries, || match query {
        InvoiceQuery::ById(id) => provider.invoice_by_id(id),
        InvoiceQuery::ByCompany { company_id, date } => {
            provider.invoice_by_company(company_id, *date)
        }
    })
}
