use rust_decimal::{Decimal, RoundingStrategy};

use super::model::{Category, Fee, Invoice, Toll, Violation};

/// Anything carrying a billable amount
pub trait Billable {
    /// Amount of the item; absent amounts count as zero
    fn amount(&self) -> Decimal;
}

impl Billable for Toll {
    fn amount(&self) -> Decimal {
        self.amount.unwrap_or_default()
    }
}

impl Billable for Fee {
    fn amount(&self) -> Decimal {
        self.amount.unwrap_or_default()
    }
}

impl Billable for Violation {
    fn amount(&self) -> Decimal {
        self.amount.unwrap_or_default()
    }
}

/// Sum the amounts of a collection of line items.
///
/// Saturates at `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
pub fn sum<'a, T, I>(items: I) -> Decimal
where
    T: Billable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(Billable::amount)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Per-category subtotals recomputed from the line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub tolls: Decimal,
    pub fees: Decimal,
    pub violations: Decimal,
}

impl Totals {
    pub fn of(invoice: &Invoice) -> Self {
        Self {
            tolls: sum(&invoice.tolls),
            fees: sum(&invoice.fees),
            violations: sum(&invoice.violations),
        }
    }

    pub fn subtotal(&self, category: Category) -> Decimal {
        match category {
            Category::Tolls => self.tolls,
            Category::Fees => self.fees,
            Category::Violations => self.violations,
        }
    }

    /// Grand total; the invoice's stored `totalAmount` is never consulted.
    pub fn grand(&self) -> Decimal {
        self.tolls
            .saturating_add(self.fees)
            .saturating_add(self.violations)
    }

    /// Stored total when it disagrees with the recomputed one
    pub fn stored_mismatch(&self, invoice: &Invoice) -> Option<Decimal> {
        invoice
            .total_amount
            .filter(|stored| stored.round_dp(2) != self.grand().round_dp(2))
    }
}

/// Round a money value to cents
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a money value as `$X.YY`
pub fn format_amount(amount: Decimal) -> String {
    format!("${:.2}", round_cents(amount))
}
