use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use ureq::Agent;

use super::InvoiceProvider;
use crate::config::{ApiSettings, Company, CompanyDirectory};
use crate::error::{InvoiceError, Result};
use crate::invoice::{Fee, Invoice, Toll, Violation};

/// Blocking client for the billing API
pub struct HttpProvider {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProvider")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

/// Invoice as returned by the company + date lookup. Every field may be
/// missing; `violations` usually is.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInvoiceResponse {
    pub id: Option<String>,
    pub company_id: Option<String>,
    pub invoice_date: Option<String>,
    pub status: Option<i64>,
    pub total_amount: Option<Decimal>,
    pub number: Option<String>,
    pub tolls: Option<Vec<Toll>>,
    pub fees: Option<Vec<Fee>>,
    pub violations: Option<Vec<Violation>>,
}

impl CompanyInvoiceResponse {
    /// Fill the gaps from the query that produced this response
    pub fn into_invoice(self, company_id: &str, date: NaiveDate) -> Invoice {
        Invoice {
            id: self.id.unwrap_or_default(),
            company_id: self
                .company_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| company_id.to_string()),
            invoice_date: self
                .invoice_date
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| date.format("%Y-%m-%d").to_string()),
            status: Some(self.status.unwrap_or(0)),
            total_amount: Some(self.total_amount.unwrap_or_default()),
            number: self.number,
            tolls: self.tolls.unwrap_or_default(),
            fees: self.fees.unwrap_or_default(),
            violations: self.violations.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ActiveCompanies {
    #[serde(default)]
    result: Vec<Company>,
}

impl HttpProvider {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let base_url = settings
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(InvoiceError::ApiNotConfigured)?;

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .build()
            .into();

        Ok(Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");

        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(*key, value);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let mut response = request
            .call()
            .map_err(|e| InvoiceError::Http(format!("GET {url}: {e}")))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| InvoiceError::Http(format!("GET {url}: {e}")))?;

        Ok(serde_json::from_str(&body)?)
    }
}

impl InvoiceProvider for HttpProvider {
    fn invoice_by_id(&self, invoice_id: &str) -> Result<Invoice> {
        self.get_json(&format!("/invoices/{invoice_id}/details"), &[])
    }

    fn invoice_by_company(&self, company_id: &str, date: NaiveDate) -> Result<Invoice> {
        let response: CompanyInvoiceResponse = self.get_json(
            &format!("/invoices/company/{company_id}"),
            &[("date", date.format("%Y-%m-%d").to_string())],
        )?;
        Ok(response.into_invoice(company_id, date))
    }

    fn active_companies(&self) -> Result<CompanyDirectory> {
        let companies: ActiveCompanies = self.get_json("/companies/active", &[])?;
        Ok(CompanyDirectory::new(companies.result))
    }
}
