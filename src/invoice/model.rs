use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::labels::{FeeType, InvoiceStatus, PaymentStatus};

/// Read an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A toll charge billed back to the company
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Toll {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub payment_status: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub license_plate: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default)]
    pub toll_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub booking_number: String,
    #[serde(default)]
    pub toll_date: Option<String>,
    #[serde(default)]
    pub toll_time: Option<String>,
    #[serde(default)]
    pub toll_authority: Option<String>,
}

/// An administrative or service fee
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub payment_status: Option<i64>,
    #[serde(default)]
    pub fee_type: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub booking_number: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A traffic citation passed through to the company
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub citation: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub payment_status: Option<i64>,
    #[serde(default)]
    pub fee_type: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub booking_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub license_plate: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
}

/// Invoice snapshot as delivered by the billing API
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice_date: String,
    #[serde(default)]
    pub status: Option<i64>,
    /// Upstream total. Never trusted for display; see `Totals`.
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tolls: Vec<Toll>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fees: Vec<Fee>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub violations: Vec<Violation>,
}

/// Line item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Tolls,
    Fees,
    Violations,
}

impl Category {
    /// Order used by the spreadsheet export
    pub const SPREADSHEET_ORDER: [Category; 3] =
        [Category::Tolls, Category::Fees, Category::Violations];

    /// Order used by the PDF document and the on-screen table
    pub const DOCUMENT_ORDER: [Category; 3] =
        [Category::Tolls, Category::Violations, Category::Fees];

    pub fn title(&self) -> &'static str {
        match self {
            Category::Tolls => "Tolls",
            Category::Fees => "Fees",
            Category::Violations => "Violations",
        }
    }

    /// Singular name used in the `Type` column and row badges
    pub fn item_name(&self) -> &'static str {
        match self {
            Category::Tolls => "Toll",
            Category::Fees => "Fee",
            Category::Violations => "Violation",
        }
    }
}

/// Borrowed view over one line item of any category
#[derive(Debug, Clone, Copy)]
pub enum LineItem<'a> {
    Toll(&'a Toll),
    Fee(&'a Fee),
    Violation(&'a Violation),
}

impl<'a> LineItem<'a> {
    pub fn category(&self) -> Category {
        match self {
            LineItem::Toll(_) => Category::Tolls,
            LineItem::Fee(_) => Category::Fees,
            LineItem::Violation(_) => Category::Violations,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            LineItem::Toll(t) => &t.id,
            LineItem::Fee(f) => &f.id,
            LineItem::Violation(v) => &v.id,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            LineItem::Toll(t) => t.amount.unwrap_or_default(),
            LineItem::Fee(f) => f.amount.unwrap_or_default(),
            LineItem::Violation(v) => v.amount.unwrap_or_default(),
        }
    }

    pub fn payment_status(&self) -> PaymentStatus {
        let code = match self {
            LineItem::Toll(t) => t.payment_status,
            LineItem::Fee(f) => f.payment_status,
            LineItem::Violation(v) => v.payment_status,
        };
        code.map_or(PaymentStatus::Unpaid, PaymentStatus::from_code)
    }

    pub fn booking_number(&self) -> &'a str {
        match self {
            LineItem::Toll(t) => &t.booking_number,
            LineItem::Fee(f) => &f.booking_number,
            LineItem::Violation(v) => &v.booking_number,
        }
    }
}

impl Fee {
    pub fn fee_type(&self) -> FeeType {
        self.fee_type.map_or(FeeType::Unknown(None), FeeType::from_code)
    }
}

impl Violation {
    pub fn fee_type(&self) -> FeeType {
        self.fee_type.map_or(FeeType::Unknown(None), FeeType::from_code)
    }
}

impl Invoice {
    /// Invoice number when present, otherwise the identifier
    pub fn display_number(&self) -> &str {
        match self.number.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ => &self.id,
        }
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
            .map_or(InvoiceStatus::Unknown(None), InvoiceStatus::from_code)
    }

    pub fn issue_date(&self) -> Option<NaiveDate> {
        parse_date(&self.invoice_date)
    }

    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Tolls => self.tolls.len(),
            Category::Fees => self.fees.len(),
            Category::Violations => self.violations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tolls.is_empty() && self.fees.is_empty() && self.violations.is_empty()
    }

    /// Line items of one category, in their upstream order
    pub fn items(&self, category: Category) -> Vec<LineItem<'_>> {
        match category {
            Category::Tolls => self.tolls.iter().map(LineItem::Toll).collect(),
            Category::Fees => self.fees.iter().map(LineItem::Fee).collect(),
            Category::Violations => self.violations.iter().map(LineItem::Violation).collect(),
        }
    }

    /// All line items, category by category in the given order
    pub fn line_items(&self, order: [Category; 3]) -> Vec<LineItem<'_>> {
        order.iter().flat_map(|c| self.items(*c)).collect()
    }
}

/// Parse the date shapes the API emits: plain dates, RFC 3339 and naive timestamps
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Render a date as "Month D, YYYY", falling back to the raw text
pub fn format_long_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}
