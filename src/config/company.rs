use serde::{Deserialize, Serialize};

/// A company invoices are issued to
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "state_id")]
    pub state_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Company {
    /// "Name (STATE)" when the company has a state id, otherwise just the name
    pub fn display_name(&self) -> String {
        match self.state_id.as_deref() {
            Some(state) if !state.is_empty() => format!("{} ({})", self.name, state),
            _ => self.name.clone(),
        }
    }
}

/// Lookup table of known companies
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    companies: Vec<Company>,
}

impl CompanyDirectory {
    pub fn new(companies: Vec<Company>) -> Self {
        Self { companies }
    }

    /// Case-insensitive match on the company id
    pub fn find(&self, id: &str) -> Option<&Company> {
        self.companies
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(id))
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

/// Resolve the company label shown on an invoice.
///
/// Tries the invoice's own company id, then the company the user selected,
/// then a caller-supplied name. `directory` is `None` while the directory
/// has not been loaded yet.
pub fn resolve_company_name(
    directory: Option<&CompanyDirectory>,
    invoice_company_id: &str,
    selected_company_id: Option<&str>,
    fallback_name: Option<&str>,
) -> String {
    let found = directory.and_then(|dir| {
        dir.find(invoice_company_id).or_else(|| {
            selected_company_id
                .filter(|id| !id.is_empty())
                .and_then(|id| dir.find(id))
        })
    });

    if let Some(company) = found {
        return company.display_name();
    }

    if let Some(name) = fallback_name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    if directory.is_none() {
        return "Loading...".to_string();
    }

    "Unknown Company".to_string()
}
