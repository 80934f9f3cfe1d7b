//! Terminal view of a single invoice.
//!
//! `InvoiceView` holds only ephemeral view state: the fetch outcome, which
//! categories are expanded, and the resolved company name.

use chrono::NaiveDate;
use tabled::{settings::Style, Table, Tabled};

use crate::invoice::{
    format_amount, format_long_date, Category, Invoice, InvoiceStatus, LineItem,
    Totals,
};

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Loading,
    Loaded(Invoice),
    Failed(String),
}

/// Which categories show their line items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandedSections {
    pub tolls: bool,
    pub fees: bool,
    pub violations: bool,
}

impl ExpandedSections {
    pub fn is_expanded(&self, category: Category) -> bool {
        match category {
            Category::Tolls => self.tolls,
            Category::Fees => self.fees,
            Category::Violations => self.violations,
        }
    }

    pub fn toggle(&mut self, category: Category) {
        let flag = match category {
            Category::Tolls => &mut self.tolls,
            Category::Fees => &mut self.fees,
            Category::Violations => &mut self.violations,
        };
        *flag = !*flag;
    }
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "DETAILS")]
    details: String,
    #[tabled(rename = "BOOKING NUMBER")]
    booking: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "PAYMENT STATUS")]
    status: String,
}

#[derive(Debug, Clone)]
pub struct InvoiceView {
    state: FetchState,
    expanded: ExpandedSections,
    company_name: String,
    selected_company: Option<String>,
    selected_date: Option<NaiveDate>,
}

impl Default for InvoiceView {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceView {
    pub fn new() -> Self {
        Self {
            state: FetchState::Loading,
            expanded: ExpandedSections::default(),
            company_name: String::new(),
            selected_company: None,
            selected_date: None,
        }
    }

    /// Remember the company and date the invoice was looked up by
    pub fn select(&mut self, company_id: Option<String>, date: Option<NaiveDate>) {
        self.selected_company = company_id;
        self.selected_date = date;
    }

    pub fn finish_loading(&mut self, result: crate::error::Result<Invoice>) {
        self.state = match result {
            Ok(invoice) => {
                let totals = Totals::of(&invoice);
                if let Some(stored) = totals.stored_mismatch(&invoice) {
                    tracing::warn!(
                        invoice = %invoice.display_number(),
                        stored = %stored,
                        computed = %totals.grand(),
                        "stored total disagrees with line items"
                    );
                }
                FetchState::Loaded(invoice)
            }
            Err(e) => FetchState::Failed(e.to_string()),
        };
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn invoice(&self) -> Option<&Invoice> {
        match &self.state {
            FetchState::Loaded(invoice) => Some(invoice),
            _ => None,
        }
    }

    pub fn set_company_name(&mut self, name: impl Into<String>) {
        self.company_name = name.into();
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn expanded(&self) -> ExpandedSections {
        self.expanded
    }

    pub fn toggle(&mut self, category: Category) {
        self.expanded.toggle(category);
    }

    /// Exports need loaded data
    pub fn exports_enabled(&self) -> bool {
        self.invoice().is_some()
    }

    /// Export actions are only offered for finished invoices
    pub fn export_actions_visible(&self) -> bool {
        self.invoice()
            .is_some_and(|inv| inv.status() == InvoiceStatus::Done)
    }

    /// Link back to the invoice list for the same company and date
    pub fn back_link(&self) -> String {
        let company = self
            .invoice()
            .map(|inv| inv.company_id.as_str())
            .filter(|id| !id.is_empty())
            .or(self.selected_company.as_deref());
        let date = self
            .invoice()
            .and_then(Invoice::issue_date)
            .or(self.selected_date);

        match (company, date) {
            (Some(company), Some(date)) => format!(
                "/invoice?companyId={}&date={}",
                company,
                date.format("%Y-%m-%d")
            ),
            _ => "/invoice".to_string(),
        }
    }

    pub fn render(&self) -> String {
        match &self.state {
            FetchState::Loading => "Loading invoice details...".to_string(),
            FetchState::Failed(message) => format!(
                "Error loading invoice details: {message}\nRun the command again to retry."
            ),
            FetchState::Loaded(invoice) => self.render_invoice(invoice),
        }
    }

    fn render_invoice(&self, invoice: &Invoice) -> String {
        let totals = Totals::of(invoice);
        let number = invoice.number.as_deref().filter(|n| !n.is_empty());

        let mut out = String::new();
        out.push_str("Invoice Details\n");
        out.push_str(&"-".repeat(50));
        out.push('\n');
        out.push_str(&format!("Invoice Number: {}\n", number.unwrap_or("N/A")));
        out.push_str(&format!("Company:        {}\n", self.company_name));
        out.push_str(&format!(
            "Invoice Date:   {}\n",
            format_long_date(&invoice.invoice_date)
        ));
        out.push_str(&format!("Status:         {}\n", invoice.status()));
        out.push_str(&format!(
            "Total Amount:   {}\n\n",
            format_amount(totals.grand())
        ));

        let mut rows = Vec::new();
        for category in Category::DOCUMENT_ORDER {
            let expanded = self.expanded.is_expanded(category);
            rows.push(ItemRow {
                kind: format!("{} {}", if expanded { "▼" } else { "▶" }, category.title()),
                details: format!("({} items)", invoice.len(category)),
                booking: String::new(),
                amount: format!("Subtotal: {}", format_amount(totals.subtotal(category))),
                status: String::new(),
            });
            if expanded {
                rows.extend(invoice.items(category).into_iter().map(item_row));
            }
        }
        if invoice.is_empty() {
            rows.push(ItemRow {
                kind: String::new(),
                details: "No invoice items found".to_string(),
                booking: String::new(),
                amount: String::new(),
                status: String::new(),
            });
        }

        out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
        out
    }
}

fn item_row(item: LineItem<'_>) -> ItemRow {
    let details = match item {
        LineItem::Toll(toll) => {
            let mut lines = vec![
                format!("License Plate: {}", toll.license_plate),
                format!("State: {}", toll.state),
                format!(
                    "Toll ID: {}",
                    toll.toll_id.map(|id| id.to_string()).unwrap_or_default()
                ),
            ];
            if let Some(date) = toll.toll_date.as_deref().filter(|d| !d.is_empty()) {
                lines.push(format!("Date: {}", format_long_date(date)));
            }
            lines.join("\n")
        }
        LineItem::Violation(violation) => [
            format!("Citation: {}", violation.citation),
            format!("License Plate: {}", violation.license_plate),
            format!("State: {}", violation.state),
            format!("Fee Type: {}", violation.fee_type()),
        ]
        .join("\n"),
        LineItem::Fee(fee) => {
            let mut lines = vec![format!("Fee Type: {}", fee.fee_type())];
            if let Some(description) = fee.description.as_deref().filter(|d| !d.is_empty()) {
                lines.push(format!("Description: {description}"));
            }
            lines.join("\n")
        }
    };

    let booking = match item.booking_number() {
        "" => "N/A".to_string(),
        other => other.to_string(),
    };

    ItemRow {
        kind: item.category().item_name().to_string(),
        details,
        booking,
        amount: format_amount(item.amount()),
        status: item.payment_status().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvoiceError;
    use crate::invoice::{Fee, Toll};
    use rust_decimal::Decimal;

    fn invoice() -> Invoice {
        Invoice {
            id: "i-1".to_string(),
            company_id: "C-1".to_string(),
            invoice_date: "2024-03-05T00:00:00Z".to_string(),
            status: Some(0),
            number: Some("INV-1".to_string()),
            tolls: vec![Toll {
                license_plate: "PLATE-77".to_string(),
                amount: Some(Decimal::new(1250, 2)),
                toll_date: Some("2024-03-01".to_string()),
                ..Default::default()
            }],
            fees: vec![Fee {
                fee_type: Some(3),
                description: Some("Card surcharge".to_string()),
                amount: Some(Decimal::new(500, 2)),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_loading_with_exports_disabled() {
        let view = InvoiceView::new();
        assert_eq!(view.render(), "Loading invoice details...");
        assert!(!view.exports_enabled());
        assert!(!view.export_actions_visible());
    }

    #[test]
    fn test_failure_offers_retry() {
        let mut view = InvoiceView::new();
        view.finish_loading(Err(InvoiceError::Http("timeout".to_string())));
        let out = view.render();
        assert!(out.contains("timeout"));
        assert!(out.contains("retry"));
        assert!(!view.exports_enabled());
    }

    #[test]
    fn test_collapsed_sections_hide_items() {
        let mut view = InvoiceView::new();
        view.finish_loading(Ok(invoice()));
        view.set_company_name("Acme (TX)");
        let out = view.render();

        assert!(out.contains("Acme (TX)"));
        assert!(out.contains("March 5, 2024"));
        assert!(out.contains("Total Amount:   $17.50"));
        assert!(out.contains("▶ Tolls"));
        assert!(out.contains("Subtotal: $12.50"));
        assert!(!out.contains("PLATE-77"));
        assert!(view.exports_enabled());
        assert!(view.export_actions_visible());
    }

    #[test]
    fn test_toggle_expands_one_section() {
        let mut view = InvoiceView::new();
        view.finish_loading(Ok(invoice()));
        view.toggle(Category::Tolls);
        let out = view.render();
        assert!(out.contains("▼ Tolls"));
        assert!(out.contains("PLATE-77"));
        assert!(out.contains("Date: March 1, 2024"));
        assert!(out.contains("N/A"));
        assert!(!out.contains("Card surcharge"));

        view.toggle(Category::Tolls);
        assert!(!view.render().contains("PLATE-77"));
    }

    #[test]
    fn test_sections_render_in_display_order() {
        let mut view = InvoiceView::new();
        view.finish_loading(Ok(invoice()));
        let out = view.render();
        let tolls = out.find("Tolls").unwrap();
        let violations = out.find("Violations").unwrap();
        let fees = out.find("Fees").unwrap();
        assert!(tolls < violations && violations < fees);
    }

    #[test]
    fn test_empty_invoice_shows_placeholder() {
        let mut view = InvoiceView::new();
        view.finish_loading(Ok(Invoice::default()));
        let out = view.render();
        assert!(out.contains("No invoice items found"));
        assert!(out.contains("Invoice Number: N/A"));
        assert!(out.contains("$0.00"));
    }

    #[test]
    fn test_export_actions_hidden_unless_done() {
        let mut view = InvoiceView::new();
        view.finish_loading(Ok(Invoice {
            status: Some(2),
            ..invoice()
        }));
        assert!(view.exports_enabled());
        assert!(!view.export_actions_visible());
    }

    #[test]
    fn test_back_link() {
        let mut view = InvoiceView::new();
        assert_eq!(view.back_link(), "/invoice");

        view.select(
            Some("C-9".to_string()),
            NaiveDate::from_ymd_opt(2024, 1, 2),
        );
        assert_eq!(view.back_link(), "/invoice?companyId=C-9&date=2024-01-02");

        view.finish_loading(Ok(invoice()));
        assert_eq!(view.back_link(), "/invoice?companyId=C-1&date=2024-03-05");
    }
}
