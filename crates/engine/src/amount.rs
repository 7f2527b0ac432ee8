use std::{fmt, iter::Sum, ops::Add, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Expense amount represented as **integer cents**.
///
/// Amounts are never negative: an expense records money spent, the sign is
/// implied. Wire and user values in major units are converted once at the
/// boundary so totals do not suffer floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    ///
    /// Negative values are clamped to zero.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        if cents < 0 { Self(0) } else { Self(cents) }
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Converts a major-unit value (e.g. `12.5`) rounding to the nearest cent.
    pub fn from_major(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!("{value} is not a number")));
        }
        if value < 0.0 {
            return Err(EngineError::InvalidAmount(format!("{value} is negative")));
        }
        let cents = (value * 100.0).round();
        if cents > i64::MAX as f64 {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }
        Ok(Self(cents as i64))
    }

    /// Returns the value in major units.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}.{:02}", self.0 / 100, self.0 % 100))
    }
}

impl TryFrom<f64> for Amount {
    type Error = EngineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_major(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.to_major()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects negative, empty or invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }
        if trimmed.starts_with('-') {
            return Err(EngineError::InvalidAmount(
                "amount must not be negative".to_string(),
            ));
        }

        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed).trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .map(Amount)
            .ok_or_else(overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Amount::new(0).to_string(), "0.00");
        assert_eq!(Amount::new(1).to_string(), "0.01");
        assert_eq!(Amount::new(10).to_string(), "0.10");
        assert_eq!(Amount::new(1050).to_string(), "10.50");
        assert_eq!(format!("{:>7}", Amount::new(1050)), "  10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("+1.00".parse::<Amount>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<Amount>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_negative_and_garbage() {
        assert!("-1".parse::<Amount>().is_err());
        assert!("12.345".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());
    }

    #[test]
    fn from_major_rounds_to_cents() {
        assert_eq!(Amount::from_major(59.99).unwrap().cents(), 5999);
        assert_eq!(Amount::from_major(0.125).unwrap().cents(), 13);
        assert_eq!(Amount::from_major(12.0).unwrap().to_major(), 12.0);
    }

    #[test]
    fn from_major_rejects_non_finite_and_negative() {
        assert!(Amount::from_major(f64::NAN).is_err());
        assert!(Amount::from_major(f64::INFINITY).is_err());
        assert!(Amount::from_major(-0.5).is_err());
    }

    #[test]
    fn sum_totals_cents() {
        let total: Amount = [Amount::new(150), Amount::new(250)].iter().sum();
        assert_eq!(total, Amount::new(400));
    }
}
