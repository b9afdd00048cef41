//! Brazilian postal code (CEP).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The input contains something other than ASCII digits.
    #[error("postal code must contain only digits")]
    NonDigit,
    /// The input does not have exactly 8 digits.
    #[error("postal code must have exactly {expected} digits (got {actual})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Length found.
        actual: usize,
    },
}

/// A CEP: exactly eight ASCII digits, no mask.
///
/// ```
/// use client_registry_core::PostalCode;
///
/// let cep = PostalCode::parse("01001000").unwrap();
/// assert_eq!(cep.formatted(), "01001-000");
///
/// assert!(PostalCode::parse("01001-000").is_err());
/// assert!(PostalCode::parse("123").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a CEP.
    pub const DIGITS: usize = 8;

    /// Parse a `PostalCode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains non-digits or is not exactly
    /// eight characters long.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostalCodeError::NonDigit);
        }

        if s.len() != Self::DIGITS {
            return Err(PostalCodeError::WrongLength {
                expected: Self::DIGITS,
                actual: s.len(),
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the postal code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PostalCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the code in the `NNNNN-NNN` display form.
    #[must_use]
    pub fn formatted(&self) -> String {
        let (region, suffix) = self.0.split_at(self.0.len().min(5));
        format!("{region}-{suffix}")
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
