pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod invoice;
pub mod logging;
pub mod notify;
pub mod pdf;
pub mod view;

pub use config::{Company, CompanyDirectory, Config};
pub use error::{InvoiceError, Result};
pub use export::ExportFormat;
pub use invoice::{Category, Invoice, Totals};
pub use view::InvoiceView;
