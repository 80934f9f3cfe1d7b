mod labels;
mod model;
mod totals;

pub use labels::{
    resolve_fee_type, resolve_invoice_status, resolve_payment_status, FeeType, InvoiceStatus,
    PaymentStatus, StatusLabel,
};
pub use model::{
    format_long_date, parse_date, Category, Fee, Invoice, LineItem, Toll, Violation,
};
pub use totals::{format_amount, round_cents, sum, Billable, Totals};
