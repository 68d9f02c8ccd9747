//! Normalized certificate record.

use serde::{Deserialize, Serialize};

/// Card name reported when a lookup could not produce a real record.
pub const LOOKUP_FAILED_CARD_NAME: &str = "Error fetching data";

/// Value written to the set, card number and population columns of a failed lookup.
pub const LOOKUP_FAILED_PLACEHOLDER: &str = "-";

/// The normalized result of one certificate lookup.
///
/// Every field is always present. Data the grading site did not provide is
/// an empty string, so templates and the spreadsheet never branch on
/// presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub card_name: String,
    /// Grade label, or the failure reason for an error-shaped record.
    pub grade: String,
    pub set: String,
    pub card_number: String,
    pub population: String,
    pub image_link: String,
}

impl CertificateRecord {
    /// Build the error-shaped record shown in place of a failed lookup.
    ///
    /// The failure reason lands in `grade`; the remaining descriptive fields
    /// carry a `-` placeholder and the image link stays empty.
    #[must_use]
    pub fn lookup_failed(reason: impl ToString) -> Self {
        Self {
            card_name: LOOKUP_FAILED_CARD_NAME.to_owned(),
            grade: reason.to_string(),
            set: LOOKUP_FAILED_PLACEHOLDER.to_owned(),
            card_number: LOOKUP_FAILED_PLACEHOLDER.to_owned(),
            population: LOOKUP_FAILED_PLACEHOLDER.to_owned(),
            image_link: String::new(),
        }
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fully_populated_with_empty_strings() {
        let json = serde_json::to_value(CertificateRecord::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 6);
        assert!(object.values().all(|v| v.as_str() == Some("")));
    }

    #[test]
    fn test_lookup_failed_shape() {
        let record = CertificateRecord::lookup_failed("operation timed out");
        assert_eq!(record.card_name, "Error fetching data");
        assert_eq!(record.grade, "operation timed out");
        assert_eq!(record.set, "-");
        assert_eq!(record.card_number, "-");
        assert_eq!(record.population, "-");
        assert_eq!(record.image_link, "");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&CertificateRecord::default()).unwrap();
        for key in [
            "card_name",
            "grade",
            "set",
            "card_number",
            "population",
            "image_link",
        ] {
            assert!(json.contains(&format!("\"{key}\"")), "missing {key}");
        }
    }
}
