//! # Decimal Module
//!
//! Fixed-point decimal numbers for grade arithmetic.
//!
//! The engine never uses floating point: every score, weight and credit is a
//! [`Decimal`] holding an `i64` count of ten-thousandths. Rounding is always
//! half away from zero on the exact decimal value.
//!
//! Deserialization is lenient. A JSON number, a numeric string, `null` or a
//! missing field are all accepted; anything that is not a finite decimal in
//! range becomes [`Decimal::ZERO`] instead of failing the whole record.

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Number of fractional digits carried by every [`Decimal`].
pub const FRACTION_DIGITS: u32 = 4;

/// Raw units per whole number.
pub const SCALE: i64 = 10_i64.pow(FRACTION_DIGITS);

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from parsing a decimal literal with [`str::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    /// The literal was empty or whitespace.
    #[error("empty decimal literal")]
    Empty,

    /// The literal is not of the form `[+-]digits[.digits]`.
    #[error("invalid decimal literal: {0}")]
    Invalid(String),

    /// The value does not fit in the fixed-point range.
    #[error("decimal out of range: {0}")]
    Overflow(String),
}

// =============================================================================
// DECIMAL
// =============================================================================

/// A fixed-point decimal with [`FRACTION_DIGITS`] fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(i64);

impl Decimal {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One hundred, the nominal total of an assessment weight set.
    pub const ONE_HUNDRED: Self = Self(100 * SCALE);

    /// Create from raw ten-thousandths.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw ten-thousandths.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Create from a whole number, saturating at the range limits.
    #[must_use]
    pub const fn from_int(value: i64) -> Self {
        Self(value.saturating_mul(SCALE))
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Whole part as a count. Negative values become 0.
    #[must_use]
    pub fn to_count(self) -> u32 {
        if self.0 <= 0 {
            0
        } else {
            u32::try_from(self.0 / SCALE).unwrap_or(u32::MAX)
        }
    }

    /// Format with exactly `decimals` fractional digits (capped at
    /// [`FRACTION_DIGITS`]), rounding half away from zero.
    #[must_use]
    pub fn to_fixed(self, decimals: u32) -> String {
        let decimals = decimals.min(FRACTION_DIGITS);
        let divisor = 10_i128.pow(FRACTION_DIGITS - decimals);
        format_units(div_round(i128::from(self.0), divisor), decimals)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixed = self.to_fixed(FRACTION_DIGITS);
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        f.write_str(trimmed)
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DecimalError::Empty);
        }

        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

        let invalid = || DecimalError::Invalid(trimmed.to_string());
        let overflow = || DecimalError::Overflow(trimmed.to_string());

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut whole: i128 = 0;
        for digit in int_part.bytes() {
            whole = whole * 10 + i128::from(digit - b'0');
            if whole > i128::from(i64::MAX) {
                return Err(overflow());
            }
        }

        let mut digits = frac_part.bytes();
        let mut frac: i128 = 0;
        for _ in 0..FRACTION_DIGITS {
            let digit = digits.next().map_or(0, |b| i128::from(b - b'0'));
            frac = frac * 10 + digit;
        }
        // First dropped digit decides rounding of the magnitude.
        if digits.next().is_some_and(|b| b >= b'5') {
            frac += 1;
        }

        let magnitude = whole * i128::from(SCALE) + frac;
        let signed = if negative { -magnitude } else { magnitude };
        i64::try_from(signed).map(Self).map_err(|_| overflow())
    }
}

// =============================================================================
// SERDE
// =============================================================================

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % SCALE == 0 {
            serializer.serialize_i64(self.0 / SCALE)
        } else {
            let value: f64 = self
                .to_string()
                .parse()
                .map_err(serde::ser::Error::custom)?;
            serializer.serialize_f64(value)
        }
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientDecimalVisitor)
    }
}

struct LenientDecimalVisitor;

impl<'de> Visitor<'de> for LenientDecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(v.checked_mul(SCALE).map(Decimal).unwrap_or_default())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(SCALE))
            .map(Decimal)
            .unwrap_or_default())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        if !v.is_finite() {
            return Ok(Decimal::ZERO);
        }
        // f64 Display is the shortest round-trip form and never uses an exponent.
        Ok(v.to_string().parse().unwrap_or_default())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        Ok(v.parse().unwrap_or_default())
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Decimal, D::Error> {
        Decimal::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Decimal, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Decimal::ZERO)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Decimal, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Decimal::ZERO)
    }
}

// =============================================================================
// FIXED-POINT HELPERS
// =============================================================================

/// Integer division rounding half away from zero. `denominator` must be positive.
pub(crate) fn div_round(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.unsigned_abs() * 2 >= denominator.unsigned_abs() {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

/// Render `units` (value times 10^decimals) with exactly `decimals` digits.
pub(crate) fn format_units(units: i128, decimals: u32) -> String {
    let sign = if units < 0 { "-" } else { "" };
    let magnitude = units.unsigned_abs();
    let unit = 10_u128.pow(decimals);
    let whole = magnitude / unit;
    let frac = magnitude % unit;
    if decimals == 0 {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{frac:0width$}", width = decimals as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================
