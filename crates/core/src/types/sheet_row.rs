//! Spreadsheet row layout for persisted lookups.

use crate::types::{CertNumber, CertificateRecord};

/// Number of columns in a persisted row.
pub const SHEET_COLUMNS: usize = 7;

/// Column order of a persisted row, usable as a header line.
pub const SHEET_HEADER: [&str; SHEET_COLUMNS] = [
    "cert",
    "card_name",
    "grade",
    "set",
    "card_number",
    "population",
    "image_link",
];

/// One row appended to the shared spreadsheet per lookup.
///
/// Values are always in [`SHEET_HEADER`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    values: [String; SHEET_COLUMNS],
}

impl SheetRow {
    /// Lay out a certificate and its record as a row.
    #[must_use]
    pub fn new(cert: &CertNumber, record: &CertificateRecord) -> Self {
        Self {
            values: [
                cert.as_str().to_owned(),
                record.card_name.clone(),
                record.grade.clone(),
                record.set.clone(),
                record.card_number.clone(),
                record.population.clone(),
                record.image_link.clone(),
            ],
        }
    }

    /// The certificate number column.
    #[must_use]
    pub fn cert(&self) -> &str {
        &self.values[0]
    }

    /// Borrow the row values in column order.
    #[must_use]
    pub const fn values(&self) -> &[String; SHEET_COLUMNS] {
        &self.values
    }

    /// Consume the row into its values in column order.
    #[must_use]
    pub fn into_values(self) -> [String; SHEET_COLUMNS] {
        self.values
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_column_order() {
        let cert = CertNumber::parse("12345678").unwrap();
        let record = CertificateRecord {
            card_name: "1998 Pokemon Base Set Charizard".to_string(),
            grade: "GEM MT 10".to_string(),
            set: "1998 Pokemon Base Set #4".to_string(),
            card_number: "4".to_string(),
            population: "312".to_string(),
            image_link: "https://img/x.jpg".to_string(),
        };

        let row = SheetRow::new(&cert, &record);
        assert_eq!(row.cert(), "12345678");
        assert_eq!(
            row.into_values(),
            [
                "12345678",
                "1998 Pokemon Base Set Charizard",
                "GEM MT 10",
                "1998 Pokemon Base Set #4",
                "4",
                "312",
                "https://img/x.jpg",
            ]
        );
    }

    #[test]
    fn test_failed_lookup_row() {
        let cert = CertNumber::parse("1").unwrap();
        let row = SheetRow::new(&cert, &CertificateRecord::lookup_failed("boom"));
        assert_eq!(
            row.values(),
            &["1", "Error fetching data", "boom", "-", "-", "-", ""]
        );
    }
}
