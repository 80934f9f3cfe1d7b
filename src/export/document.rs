use crate::invoice::{
    format_amount, format_long_date, Category, Invoice, LineItem, Totals,
};

use super::layout::{truncate, Document, Layout, Weight};

const ROW_HEIGHT: f64 = 7.0;
/// Space a row must find below the cursor before it is drawn
const ROW_CLEARANCE: f64 = 8.0;
/// Space a section header must find so it is not orphaned at a page bottom
const SECTION_CLEARANCE: f64 = 20.0;
const HEADER_GRAY: u8 = 240;
const STRIPE_GRAY: u8 = 250;
const LABEL_OFFSET: f64 = 30.0;

struct Column {
    title: &'static str,
    dx: f64,
}

const fn col(title: &'static str, dx: f64) -> Column {
    Column { title, dx }
}

const TOLL_COLUMNS: [Column; 6] = [
    col("License Plate", 2.0),
    col("State", 40.0),
    col("Toll ID", 60.0),
    col("Booking #", 80.0),
    col("Amount", 120.0),
    col("Status", 145.0),
];

const VIOLATION_COLUMNS: [Column; 6] = [
    col("Citation", 2.0),
    col("License Plate", 40.0),
    col("State", 80.0),
    col("Booking #", 100.0),
    col("Amount", 130.0),
    col("Status", 155.0),
];

const FEE_COLUMNS: [Column; 4] = [
    col("Fee Type", 2.0),
    col("Booking Number", 60.0),
    col("Amount", 120.0),
    col("Payment Status", 145.0),
];

fn columns(category: Category) -> &'static [Column] {
    match category {
        Category::Tolls => &TOLL_COLUMNS,
        Category::Violations => &VIOLATION_COLUMNS,
        Category::Fees => &FEE_COLUMNS,
    }
}

/// Longest booking reference printed in each section
pub fn booking_limit(category: Category) -> usize {
    match category {
        Category::Tolls => 15,
        Category::Violations => 12,
        Category::Fees => 20,
    }
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Cell texts for one row, matching `columns(category)`
fn row_cells(item: LineItem<'_>) -> Vec<String> {
    let booking = truncate(&or_dash(item.booking_number()), booking_limit(item.category()));
    let amount = format_amount(item.amount());
    let status = item.payment_status().label().text.to_string();

    match item {
        LineItem::Toll(toll) => vec![
            or_dash(&toll.license_plate),
            or_dash(&toll.state),
            toll.toll_id
                .filter(|id| *id != 0)
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            booking,
            amount,
            status,
        ],
        LineItem::Violation(violation) => vec![
            or_dash(&violation.citation),
            or_dash(&violation.license_plate),
            or_dash(&violation.state),
            booking,
            amount,
            status,
        ],
        LineItem::Fee(fee) => vec![fee.fee_type().label().to_string(), booking, amount, status],
    }
}

fn header_line(layout: &mut Layout, label: &str, value: String, advance: f64) {
    layout.text(0.0, 10.0, Weight::Bold, label);
    layout.text(LABEL_OFFSET, 10.0, Weight::Normal, value);
    layout.advance(advance);
}

fn section(layout: &mut Layout, invoice: &Invoice, totals: &Totals, category: Category) {
    let items = invoice.items(category);
    if items.is_empty() {
        return;
    }

    layout.ensure_space(SECTION_CLEARANCE);

    layout.text(
        0.0,
        16.0,
        Weight::Bold,
        format!("{} ({} items)", category.title(), items.len()),
    );
    let subtotal_x = layout.width() - layout.margin() - 40.0;
    layout.text_at(
        subtotal_x,
        12.0,
        Weight::Bold,
        format!("Subtotal: {}", format_amount(totals.subtotal(category))),
    );
    layout.advance(8.0);

    layout.band(5.0, ROW_HEIGHT, HEADER_GRAY);
    for column in columns(category) {
        layout.text(column.dx, 9.0, Weight::Bold, column.title);
    }
    layout.advance(5.0);

    for (index, item) in items.into_iter().enumerate() {
        layout.ensure_space(ROW_CLEARANCE);

        if index % 2 == 0 {
            layout.band(4.0, ROW_HEIGHT, STRIPE_GRAY);
        }
        for (column, cell) in columns(category).iter().zip(row_cells(item)) {
            layout.text(column.dx, 9.0, Weight::Normal, cell);
        }
        layout.advance(ROW_HEIGHT);
    }

    layout.advance(8.0);
}

/// Lay out the invoice as a paginated A4 document.
///
/// The total shown is recomputed from the line items. Sections run tolls,
/// violations, fees; empty categories are left out.
pub fn to_document(invoice: &Invoice, company_name: &str) -> Document {
    let totals = Totals::of(invoice);
    let mut layout = Layout::default();

    layout.text(
        0.0,
        24.0,
        Weight::Bold,
        format!("Invoice {}", invoice.display_number()),
    );
    layout.advance(12.0);

    let number = match invoice.number.as_deref() {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => invoice.id.chars().take(24).collect(),
    };
    header_line(&mut layout, "Invoice Number:", number, 6.0);
    header_line(&mut layout, "Company:", company_name.to_string(), 6.0);
    header_line(
        &mut layout,
        "Invoice Date:",
        format_long_date(&invoice.invoice_date),
        6.0,
    );
    header_line(
        &mut layout,
        "Status:",
        invoice.status().label().text.to_string(),
        10.0,
    );

    layout.text(
        0.0,
        14.0,
        Weight::Bold,
        format!("Total Amount: {}", format_amount(totals.grand())),
    );
    layout.advance(12.0);

    layout.rule(0.5);
    layout.advance(10.0);

    for category in Category::DOCUMENT_ORDER {
        section(&mut layout, invoice, &totals, category);
    }

    layout.finish()
}
