//! Egyptian mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number is not exactly 11 digits long.
    #[error("phone number must be exactly 11 digits (got {got})")]
    WrongLength {
        /// Number of characters in the input.
        got: usize,
    },
    /// The input contains a non-digit character.
    #[error("phone number must contain only digits")]
    NonDigit,
    /// The number does not start with a valid Egyptian mobile prefix.
    #[error("phone number must start with 010, 011, 012 or 015")]
    InvalidPrefix,
}

/// An Egyptian mobile number.
///
/// Equivalent to the pattern `^01[0125][0-9]{8}$`: eleven digits, a `01`
/// prefix, and a carrier digit of 0, 1, 2 or 5.
///
/// ## Examples
///
/// ```
/// use amara_core::Phone;
///
/// assert!(Phone::parse("01012345678").is_ok());
/// assert!(Phone::parse("01512345678").is_ok());
///
/// assert!(Phone::parse("02012345678").is_err()); // landline prefix
/// assert!(Phone::parse("0101234567").is_err());  // 10 digits
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Exact length of an Egyptian mobile number.
    pub const LENGTH: usize = 11;

    /// Carrier digits valid after the `01` prefix.
    const CARRIER_DIGITS: [char; 4] = ['0', '1', '2', '5'];

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not exactly 11 digits,
    /// contains non-digit characters, or does not start with a valid
    /// mobile prefix.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if s.len() != Self::LENGTH {
            return Err(PhoneError::WrongLength { got: s.len() });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        let mut chars = s.chars();
        let prefix_ok = chars.next() == Some('0')
            && chars.next() == Some('1')
            && chars.next().is_some_and(|c| Self::CARRIER_DIGITS.contains(&c));

        if !prefix_ok {
            return Err(PhoneError::InvalidPrefix);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
