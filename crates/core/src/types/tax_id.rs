//! Brazilian taxpayer identifier (CPF).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TaxId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxIdError {
    /// The input string is empty.
    #[error("CPF cannot be empty")]
    Empty,
    /// The input contains characters other than digits (outside the mask).
    #[error("CPF must contain only digits or use the 000.000.000-00 mask")]
    NonDigit,
    /// The input does not have 11 digits.
    #[error("CPF must have {expected} digits (got {actual})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digit count found.
        actual: usize,
    },
    /// All digits are the same, which the checksum accepts but is never issued.
    #[error("CPF cannot be a repeated digit sequence")]
    RepeatedDigits,
    /// The check digits do not match the first nine digits.
    #[error("CPF check digits do not match")]
    ChecksumMismatch,
}

/// A CPF number.
///
/// Accepts 11 bare digits or the masked form `000.000.000-00`. The value is
/// stored as supplied; [`TaxId::digits`] and [`TaxId::formatted`] give the
/// normalized renderings.
///
/// ## Check digits
///
/// The tenth digit is computed over the first nine with weights 10 down to 2,
/// the eleventh over the first ten with weights 11 down to 2. For each, the
/// digit is `(sum * 10) % 11`, with 10 mapping to 0.
///
/// ## Examples
///
/// ```
/// use client_registry_core::TaxId;
///
/// assert!(TaxId::parse("52998224725").is_ok());
/// assert!(TaxId::parse("529.982.247-25").is_ok());
///
/// assert!(TaxId::parse("52998224724").is_err()); // wrong check digit
/// assert!(TaxId::parse("11111111111").is_err()); // repeated digits
/// assert!(TaxId::parse("000").is_err());         // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Number of digits in a CPF.
    pub const DIGITS: usize = 11;

    /// Length of the masked form `000.000.000-00`.
    const MASKED_LENGTH: usize = 14;

    /// Parse a `TaxId`, verifying its check digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains stray characters, does
    /// not have 11 digits, is a single repeated digit, or fails the checksum.
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        let digits = normalize(s)?;

        if digits.len() != Self::DIGITS {
            return Err(TaxIdError::WrongLength {
                expected: Self::DIGITS,
                actual: digits.len(),
            });
        }

        let lead = digits.first();
        if digits.iter().all(|d| Some(d) == lead) {
            return Err(TaxIdError::RepeatedDigits);
        }

        let (body, checks) = digits.split_at(9);
        let (head, _) = digits.split_at(10);
        let expected = [check_digit(body), check_digit(head)];
        if checks != expected.as_slice() {
            return Err(TaxIdError::ChecksumMismatch);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns `true` if the input is a CPF that passes every rule of
    /// [`TaxId::parse`].
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Returns the value as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TaxId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the 11 digits without the mask.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }

    /// Returns the masked form `000.000.000-00`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let digits = self.digits();
        let mut out = String::with_capacity(Self::MASKED_LENGTH);
        for (i, c) in digits.chars().enumerate() {
            match i {
                3 | 6 => out.push('.'),
                9 => out.push('-'),
                _ => {}
            }
            out.push(c);
        }
        out
    }
}

/// Strip the optional mask and convert to digit values.
fn normalize(s: &str) -> Result<Vec<u8>, TaxIdError> {
    if s.is_empty() {
        return Err(TaxIdError::Empty);
    }

    let masked = s.len() == TaxId::MASKED_LENGTH
        && s.char_indices().all(|(i, c)| match i {
            3 | 7 => c == '.',
            11 => c == '-',
            _ => c.is_ascii_digit(),
        });

    let bare: String = if masked {
        s.chars().filter(char::is_ascii_digit).collect()
    } else {
        s.to_owned()
    };

    bare.chars()
        .map(|c| {
            c.to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .ok_or(TaxIdError::NonDigit)
        })
        .collect()
}

/// Compute the check digit following `body`.
fn check_digit(body: &[u8]) -> u8 {
    let top_weight = body.len() + 1;
    let sum: usize = body
        .iter()
        .enumerate()
        .map(|(i, &d)| usize::from(d) * (top_weight - i))
        .sum();

    match (sum * 10) % 11 {
        10 => 0,
        // remainder of % 11 below 10 always fits in u8
        r => u8::try_from(r).unwrap_or(0),
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
