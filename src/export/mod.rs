pub mod document;
pub mod layout;
pub mod records;

pub use document::to_document;
pub use layout::Document;
pub use records::{to_flat_records, Cell, Record};

use chrono::NaiveDate;
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InvoiceError, Result};
use crate::invoice::Invoice;
use crate::notify::Notifier;
use crate::pdf;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Spreadsheet, one row per line item
    Csv,
    /// Spreadsheet rows as a JSON array
    Json,
    /// Paginated PDF document (needs the typst CLI)
    Pdf,
    /// Typst source of the PDF document
    Typ,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Typ => "typ",
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Json)
    }
}

/// Keep an invoice number usable as a single path component
fn file_safe(number: &str) -> String {
    number
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// `Invoice_Details_{number-or-id}_{date}`
pub fn spreadsheet_file_stem(invoice: &Invoice, today: NaiveDate) -> String {
    format!(
        "Invoice_Details_{}_{}",
        file_safe(invoice.display_number()),
        today.format("%Y-%m-%d")
    )
}

/// `Invoice_{number-or-id-prefix}_{date}`
pub fn document_file_stem(invoice: &Invoice, today: NaiveDate) -> String {
    let number = match invoice.number.as_deref() {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => invoice.id.chars().take(8).collect(),
    };
    format!("Invoice_{}_{}", file_safe(&number), today.format("%Y-%m-%d"))
}

pub fn file_name(invoice: &Invoice, format: ExportFormat, today: NaiveDate) -> String {
    let stem = if format.is_spreadsheet() {
        spreadsheet_file_stem(invoice, today)
    } else {
        document_file_stem(invoice, today)
    };
    format!("{}.{}", stem, format.extension())
}

/// Write fully rendered bytes; never leaves a partial file behind
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Err(e) = fs::write(path, bytes) {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }
    Ok(())
}

fn render(
    invoice: &Invoice,
    company_name: &str,
    format: ExportFormat,
    path: &Path,
) -> Result<()> {
    match format {
        ExportFormat::Csv => write_output(path, &records::to_csv(&to_flat_records(invoice))?),
        ExportFormat::Json => write_output(path, &records::to_json(&to_flat_records(invoice))?),
        ExportFormat::Typ => {
            let source = pdf::render(&to_document(invoice, company_name));
            write_output(path, source.as_bytes())
        }
        ExportFormat::Pdf => {
            let document = to_document(invoice, company_name);
            tracing::debug!(pages = document.page_count(), "document laid out");
            pdf::compile(&pdf::render(&document), path)
        }
    }
}

/// Export the loaded invoice into `output_dir`.
///
/// Refuses when no invoice is loaded. Every outcome is reported through
/// `notifier` exactly once (plus a progress message for documents).
pub fn run(
    invoice: Option<&Invoice>,
    company_name: &str,
    format: ExportFormat,
    output_dir: &Path,
    today: NaiveDate,
    notifier: &dyn Notifier,
) -> Result<PathBuf> {
    let Some(invoice) = invoice else {
        notifier.error("No invoice data to export");
        return Err(InvoiceError::NoData);
    };

    let (failure, success) = if format.is_spreadsheet() {
        (
            "Failed to export data to spreadsheet",
            "Data exported to spreadsheet successfully",
        )
    } else {
        notifier.loading("Generating PDF...");
        ("Failed to export PDF", "PDF exported successfully")
    };

    let path = output_dir.join(file_name(invoice, format, today));
    tracing::info!(invoice = %invoice.display_number(), path = %path.display(), ?format, "exporting");

    let result = fs::create_dir_all(output_dir)
        .map_err(InvoiceError::from)
        .and_then(|()| render(invoice, company_name, format, &path));

    match result {
        Ok(()) => {
            notifier.success(success);
            Ok(path)
        }
        Err(e) => {
            tracing::debug!(error = %e, "export failed");
            notifier.error(failure);
            Err(e)
        }
    }
}
