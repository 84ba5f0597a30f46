//! Amount type for non-negative monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. The direction of a cash flow is
//! never stored in the amount itself, it comes from the transaction type, so an `Amount` can never
//! be negative.
//!
//! An `Amount` has at most two decimal places and at most fifteen significant digits. Every such
//! value survives the trip through a JSON number unchanged, and sums of them cannot overflow.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Currency symbols that are tolerated, and ignored, when parsing.
const CURRENCY_SYMBOLS: &[char] = &['₽', '$'];

/// Decimal places an amount may have.
const MAX_SCALE: u32 = 2;

/// Integers up to this size are exactly representable as `f64`.
const MAX_EXACT_F64_INTEGER: u64 = 1 << 53;

/// Represents a magnitude of money in an unspecified currency.
///
/// # Examples
///
/// Parsing tolerates a currency symbol, thousands separators and surrounding whitespace:
/// ```
/// # use smartfinance::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str(" 60,000 ₽ ").unwrap();
/// assert_eq!(amount.to_string(), "60,000.00");
/// ```
///
/// Negative values, blank input and fractions of a kopeck are rejected:
/// ```
/// # use smartfinance::model::Amount;
/// # use std::str::FromStr;
/// assert!(Amount::from_str("-50.00").is_err());
/// assert!(Amount::from_str(" ").is_err());
/// assert!(Amount::from_str("0.125").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// The largest amount, `9,999,999,999,999.99`.
    pub const MAX: Amount = Amount(Decimal::from_parts(
        // 999_999_999_999_999 split into its low and middle 32 bits.
        2_764_472_319,
        232_830,
        0,
        false,
        MAX_SCALE,
    ));

    /// Creates a new `Amount`.
    ///
    /// # Errors
    /// - `value` is negative.
    /// - `value` has more than two decimal places, e.g. `0.125`.
    /// - `value` is larger than `Amount::MAX`.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_zero() {
            return Ok(Self(Decimal::ZERO));
        }
        if value.is_sign_negative() {
            return Err(AmountError::Negative(value));
        }
        let value = value.normalize();
        if value.scale() > MAX_SCALE {
            return Err(AmountError::TooPrecise(value));
        }
        if value > Amount::MAX.0 {
            return Err(AmountError::TooLarge(value));
        }
        Ok(Self(value))
    }

    /// Creates an `Amount` from a whole number of currency units.
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// An error that can occur when parsing or constructing an `Amount`.
pub enum AmountError {
    Empty,
    Parse(rust_decimal::Error),
    Negative(Decimal),
    TooPrecise(Decimal),
    TooLarge(Decimal),
    NotRepresentable(String),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => f.write_str("An amount is required"),
            AmountError::Parse(e) => Display::fmt(e, f),
            AmountError::Negative(v) => write!(f, "An amount cannot be negative, got {v}"),
            AmountError::TooPrecise(v) => {
                write!(f, "An amount has at most {MAX_SCALE} decimal places, got {v}")
            }
            AmountError::TooLarge(v) => {
                write!(f, "An amount cannot exceed {}, got {v}", Amount::MAX.0)
            }
            AmountError::NotRepresentable(s) => write!(f, "'{s}' is not a representable amount"),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Drop currency symbols, whitespace (including the no-break spaces of grouped numbers) and
        // comma thousands separators.
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',' && !CURRENCY_SYMBOLS.contains(c))
            .collect();

        if cleaned.is_empty() {
            return Err(AmountError::Empty);
        }

        let value = Decimal::from_str(&cleaned).map_err(AmountError::Parse)?;
        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&format_decimal(self.0))
    }
}

/// Formats `value` with thousands separators and two decimal places, e.g. `-1,234.50`. Used for
/// sums, which unlike an `Amount` may be negative.
///
/// The cents are taken from the decimal itself, so only the whole part goes through `f64`. Whole
/// parts beyond 2^53 are printed without separators.
pub fn format_decimal(value: Decimal) -> String {
    let rounded = value.round_dp(MAX_SCALE);
    let magnitude = rounded.abs();
    let whole = magnitude.trunc();
    let cents = ((magnitude - whole) * Decimal::ONE_HUNDRED)
        .to_u64()
        .unwrap_or_default();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match whole.to_u64().filter(|w| *w <= MAX_EXACT_F64_INTEGER) {
        Some(units) => {
            let grouped = format_num::format_num!(",.2", units as f64);
            let grouped = grouped.strip_suffix(".00").unwrap_or(&grouped);
            format!("{sign}{grouped}.{cents:02}")
        }
        None => format!("{rounded:.2}"),
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Stored as a JSON number; whole amounts are written without a fractional part. Parsing
        // the decimal text gives the nearest `f64`, whose shortest form is the same text again.
        let normalized = self.0.normalize();
        if normalized.fract().is_zero() {
            if let Some(units) = normalized.to_u64() {
                return serializer.serialize_u64(units);
            }
        }
        match normalized.to_string().parse::<f64>() {
            Ok(f) => serializer.serialize_f64(f),
            Err(_) => Err(serde::ser::Error::custom(format!(
                "Unable to serialize amount {normalized}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Accepts JSON numbers as well as strings, so hand-edited files still load.
struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number or a string containing one")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        // The shortest text that reads back as `v`, which is the text that was written.
        let text = v.to_string();
        let value = Decimal::from_str(&text)
            .map_err(|_| E::custom(AmountError::NotRepresentable(text.clone())))?;
        Amount::new(value).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
