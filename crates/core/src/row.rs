//! Raw imported rows: what a spreadsheet cell holds after decoding, keyed
//! by normalized header. The import layer produces these; the recon crate
//! turns them into typed records.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::normalize::normalize_header;

/// A decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

impl RawValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Cell content as text, the way it would display in the grid.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Bool(b) => {
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
        }
    }
}

/// One imported row: normalized header → decoded cell.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    values: HashMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell under its (raw) header. Headers are normalized here so
    /// lookups never have to care about casing, accents, or spacing.
    pub fn insert(&mut self, header: &str, value: RawValue) {
        let key = normalize_header(header);
        if key.is_empty() {
            return;
        }
        // First header wins when a sheet repeats a column name.
        self.values.entry(key).or_insert(value);
    }

    /// The cell stored under a normalized field name, if any.
    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.values.get(field)
    }

    /// First non-empty cell among the given field spellings.
    pub fn first(&self, fields: &[&str]) -> Option<&RawValue> {
        fields
            .iter()
            .filter_map(|f| self.values.get(*f))
            .find(|v| !v.is_empty())
    }

    /// Text of the first non-empty cell among `fields`, or empty string.
    pub fn text(&self, fields: &[&str]) -> String {
        self.first(fields).map(RawValue::as_text).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(RawValue::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_normalize_on_insert() {
        let mut row = RawRow::new();
        row.insert("FECHA EXPEDICIÓN", RawValue::Text("2023-01-05".into()));
        assert!(row.get("fechaexpedicion").is_some());
        assert!(row.get("FECHA EXPEDICIÓN").is_none());
    }

    #[test]
    fn first_skips_blank_cells() {
        let mut row = RawRow::new();
        row.insert("Valor", RawValue::Text("  ".into()));
        row.insert("Pendiente", RawValue::Number(1234.0));
        assert_eq!(row.text(&["valor", "pendiente"]), "1234");
    }

    #[test]
    fn number_text_drops_float_noise() {
        assert_eq!(RawValue::Number(125000.0).as_text(), "125000");
        assert_eq!(RawValue::Number(0.5).as_text(), "0.5");
    }
}
