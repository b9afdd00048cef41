//! Client record identifier.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ClientId`] from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientIdError {
    /// The input is not a base-10 unsigned integer.
    #[error("id must be a positive integer")]
    NotANumber,
    /// The input parsed as zero.
    #[error("id must be greater than zero")]
    Zero,
}

/// Identifier of a client record.
///
/// Ids are positive integers assigned by the repository; they are never
/// supplied by API callers. The wrapper serializes transparently as a JSON
/// number.
///
/// ## Examples
///
/// ```
/// use client_registry_core::ClientId;
///
/// let id: ClientId = "42".parse().unwrap();
/// assert_eq!(id.as_u32(), 42);
///
/// assert!("0".parse::<ClientId>().is_err());
/// assert!("abc".parse::<ClientId>().is_err());
/// assert!("-1".parse::<ClientId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(u32);

impl ClientId {
    /// The id given to the first record of an empty collection.
    pub const FIRST: Self = Self(1);

    /// Create a new ID from a u32 value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the underlying u32 value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// The id following this one, or `None` past `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientId {
    type Err = ClientIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // u32::from_str accepts a leading '+', which is not a valid path id
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClientIdError::NotANumber);
        }

        match s.parse::<u32>() {
            Ok(0) => Err(ClientIdError::Zero),
            Ok(id) => Ok(Self(id)),
            Err(_) => Err(ClientIdError::NotANumber),
        }
    }
}

impl From<u32> for ClientId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ClientId> for u32 {
    fn from(id: ClientId) -> Self {
        id.0
    }
}
