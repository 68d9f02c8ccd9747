//! Certificate number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CertNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CertNumberError {
    /// The input is empty once surrounding whitespace is removed.
    #[error("certificate number cannot be empty")]
    Empty,
}

/// A certificate number issued by the grading authority.
///
/// Input is trimmed of surrounding whitespace and otherwise kept verbatim.
/// No format validation happens here: the grading site is the judge of
/// whether a number exists, and an unknown number simply produces an
/// error-shaped record at lookup time.
///
/// ## Examples
///
/// ```
/// use cert_lookup_core::CertNumber;
///
/// assert_eq!(CertNumber::parse(" 12345678 ").unwrap().as_str(), "12345678");
/// assert_eq!(CertNumber::parse("abc-1").unwrap().as_str(), "abc-1");
/// assert!(CertNumber::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CertNumber(String);

impl CertNumber {
    /// Parse a `CertNumber` from user input.
    ///
    /// # Errors
    ///
    /// Returns [`CertNumberError::Empty`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, CertNumberError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CertNumberError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the certificate number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CertNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CertNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CertNumber {
    type Err = CertNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CertNumber {
    type Error = CertNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CertNumber> for String {
    fn from(value: CertNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for CertNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
