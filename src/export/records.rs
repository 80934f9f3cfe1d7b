use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::invoice::{Category, Invoice, LineItem};

/// One spreadsheet cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Number(Decimal),
}

impl Cell {
    fn to_field(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Integer(n) => n.to_string(),
            Cell::Number(d) => d.normalize().to_string(),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Integer(n) => serializer.serialize_i64(*n),
            Cell::Number(d) => {
                let value: serde_json::Number = d
                    .normalize()
                    .to_string()
                    .parse()
                    .map_err(serde::ser::Error::custom)?;
                value.serialize(serializer)
            }
        }
    }
}

/// One spreadsheet row: named cells in column order. Rows of different
/// categories carry different columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(&'static str, Cell)>,
}

impl Record {
    fn with(mut self, name: &'static str, cell: Cell) -> Self {
        self.fields.push((name, cell));
        self
    }

    fn text(self, name: &'static str, value: &str) -> Self {
        self.with(name, Cell::Text(value.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, cell)| cell)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(key, _)| *key)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, cell) in &self.fields {
            map.serialize_entry(key, cell)?;
        }
        map.end()
    }
}

fn to_record(item: LineItem<'_>) -> Record {
    let record = Record::default().text("Type", item.category().item_name());
    let record = match item {
        LineItem::Toll(toll) => {
            let record = record
                .text("License Plate", &toll.license_plate)
                .text("State", &toll.state);
            match toll.toll_id {
                Some(id) => record.with("Toll ID", Cell::Integer(id)),
                None => record,
            }
        }
        LineItem::Fee(fee) => record.text("Fee Type", fee.fee_type().label()),
        LineItem::Violation(violation) => record
            .text("Citation", &violation.citation)
            .text("License Plate", &violation.license_plate)
            .text("State", &violation.state)
            .text("Fee Type", violation.fee_type().label()),
    };
    record
        .text("Booking Number", item.booking_number())
        .with("Amount", Cell::Number(item.amount()))
        .text("Payment Status", item.payment_status().label().text)
}

/// Flatten an invoice into spreadsheet rows: tolls, then fees, then violations
pub fn to_flat_records(invoice: &Invoice) -> Vec<Record> {
    invoice
        .line_items(Category::SPREADSHEET_ORDER)
        .into_iter()
        .map(to_record)
        .collect()
}

/// Union of all record keys, in the order they are first seen
pub fn columns(records: &[Record]) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = Vec::new();
    for key in records.iter().flat_map(|record| record.keys()) {
        if !columns.contains(&key) {
            columns.push(key);
        }
    }
    columns
}

/// Render records as CSV; cells a row does not carry are left blank
pub fn to_csv(records: &[Record]) -> Result<Vec<u8>> {
    let columns = columns(records);
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(&columns)?;
    }
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|col| record.get(col).map(Cell::to_field).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| crate::error::InvoiceError::Io(e.into_error()))
}

/// Render records as a JSON array of objects
pub fn to_json(records: &[Record]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}
