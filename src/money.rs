//! Fixed-point money type stored as signed integer cents.
//!
//! Parsing truncates to two fractional digits and never rounds. Formatting
//! goes through `rust_decimal` with a fixed scale of 2 so every value prints
//! as `[-]whole.frac` with exactly two fractional digits.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced by [`Money::parse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    /// Input was empty (or only whitespace).
    #[error("empty amount")]
    Empty,

    /// Input is not a decimal number.
    #[error("invalid amount '{0}'")]
    InvalidFormat(String),

    /// Input does not fit in 64-bit cents.
    #[error("amount '{0}' is out of range")]
    Overflow(String),
}

/// A monetary amount in cents.
///
/// # Examples
///
/// ```
/// use pix_ledger::Money;
///
/// let amount = Money::parse("-3.999").unwrap();
/// assert_eq!(amount.cents(), -399);
/// assert_eq!(amount.to_string(), "-3.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Number of fractional digits carried.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(0);

    /// Creates an amount from a raw cent count.
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the raw cent count.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Subtracts two amounts, returning `None` on overflow.
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Returns the amount as a `Decimal` with scale 2.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, Self::SCALE)
    }

    /// Parses a decimal string into cents.
    ///
    /// Accepts an optional `+`/`-` sign, integer digits, and an optional `.`
    /// followed by fractional digits. Only the first two fractional digits are
    /// kept; the rest are dropped without rounding. Trailing whitespace is
    /// tolerated, anything else is rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let body = s.trim_end_matches(|c: char| c.is_ascii_whitespace());
        if body.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let overflow = || MoneyParseError::Overflow(s.to_string());

        let (negative, unsigned) = if let Some(rest) = body.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = body.strip_prefix('+') {
            (false, rest)
        } else {
            (false, body)
        };

        let (whole_digits, frac_digits) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole_digits) || !all_digits(frac_digits) {
            return Err(invalid());
        }
        if whole_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let mut whole: i64 = 0;
        for b in whole_digits.bytes() {
            whole = whole
                .checked_mul(10)
                .and_then(|w| w.checked_add(i64::from(b - b'0')))
                .ok_or_else(overflow)?;
        }

        let frac = match frac_digits.as_bytes() {
            [] => 0,
            [tenths] => i64::from(tenths - b'0') * 10,
            [tenths, hundredths, ..] => {
                i64::from(tenths - b'0') * 10 + i64::from(hundredths - b'0')
            }
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::parse(&s).map_err(serde::de::Error::custom)
    }
}
