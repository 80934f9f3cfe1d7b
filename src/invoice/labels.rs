use std::fmt;

/// Display text plus the badge class the view styles it with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLabel {
    pub text: &'static str,
    pub style: &'static str,
}

/// Payment state of a single line item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Processing,
    Failed,
}

impl PaymentStatus {
    /// Unrecognized codes read as `Unpaid`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => PaymentStatus::Paid,
            2 => PaymentStatus::Processing,
            3 => PaymentStatus::Failed,
            _ => PaymentStatus::Unpaid,
        }
    }

    pub fn label(&self) -> StatusLabel {
        match self {
            PaymentStatus::Paid => StatusLabel {
                text: "Paid",
                style: "badge bg-success",
            },
            PaymentStatus::Unpaid => StatusLabel {
                text: "Unpaid",
                style: "badge bg-warning text-dark",
            },
            PaymentStatus::Processing => StatusLabel {
                text: "Processing",
                style: "badge bg-info",
            },
            PaymentStatus::Failed => StatusLabel {
                text: "Failed",
                style: "badge bg-danger",
            },
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().text)
    }
}

/// Lifecycle state of the invoice itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Done,
    New,
    PaymentRequested,
    Paid,
    Failed,
    /// Any other code, or no code at all
    Unknown(Option<i64>),
}

impl InvoiceStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => InvoiceStatus::Done,
            1 => InvoiceStatus::New,
            2 => InvoiceStatus::PaymentRequested,
            3 => InvoiceStatus::Paid,
            4 => InvoiceStatus::Failed,
            other => InvoiceStatus::Unknown(Some(other)),
        }
    }

    pub fn label(&self) -> StatusLabel {
        match self {
            InvoiceStatus::Done => StatusLabel {
                text: "Done",
                style: "badge bg-primary",
            },
            InvoiceStatus::New => StatusLabel {
                text: "New (finalized)",
                style: "badge bg-warning text-dark",
            },
            InvoiceStatus::PaymentRequested => StatusLabel {
                text: "PaymentRequested",
                style: "badge bg-info",
            },
            InvoiceStatus::Paid => StatusLabel {
                text: "Paid",
                style: "badge bg-success",
            },
            InvoiceStatus::Failed => StatusLabel {
                text: "Failed",
                style: "badge bg-danger",
            },
            InvoiceStatus::Unknown(_) => StatusLabel {
                text: "Unknown",
                style: "badge bg-secondary",
            },
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().text)
    }
}

/// Kind of fee on a fee or violation line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeType {
    Administrative,
    LatePayment,
    Processing,
    Service,
    /// Any other code, or no code at all
    Unknown(Option<i64>),
}

impl FeeType {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => FeeType::Administrative,
            1 => FeeType::LatePayment,
            2 => FeeType::Processing,
            3 => FeeType::Service,
            other => FeeType::Unknown(Some(other)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeeType::Administrative => "Administrative",
            FeeType::LatePayment => "Late Payment",
            FeeType::Processing => "Processing",
            FeeType::Service => "Service",
            FeeType::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for FeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn resolve_payment_status(code: i64) -> StatusLabel {
    PaymentStatus::from_code(code).label()
}

pub fn resolve_invoice_status(code: i64) -> StatusLabel {
    InvoiceStatus::from_code(code).label()
}

pub fn resolve_fee_type(code: i64) -> &'static str {
    FeeType::from_code(code).label()
}
