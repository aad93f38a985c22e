//! WAD fixed-point arithmetic
//!
//! Every price, size, fee and strike is a signed integer scaled by `10^18`.
//! Products and quotients are widened to 256 bits and truncated toward zero,
//! which is what the protocol's contracts do when they charge fees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::big_num::U256;
use crate::common::error::MathError;

/// Scale factor of one whole unit.
pub const WAD: i128 = 1_000_000_000_000_000_000;

const WAD_DECIMALS: usize = 18;

/// Signed 18-decimal fixed-point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Wad(i128);

impl Wad {
    pub const ZERO: Wad = Wad(0);
    pub const ONE: Wad = Wad(WAD);

    /// Wraps an already-scaled value.
    pub const fn from_raw(raw: i128) -> Self {
        Wad(raw)
    }

    /// Scales a whole number by `WAD`.
    pub const fn from_int(units: i64) -> Self {
        Wad(units as i128 * WAD)
    }

    pub const fn raw(self) -> i128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Result<Wad, MathError> {
        self.0.checked_abs().map(Wad).ok_or(MathError::Overflow)
    }

    pub fn checked_add(self, rhs: Wad) -> Result<Wad, MathError> {
        self.0.checked_add(rhs.0).map(Wad).ok_or(MathError::Overflow)
    }

    pub fn checked_sub(self, rhs: Wad) -> Result<Wad, MathError> {
        self.0.checked_sub(rhs.0).map(Wad).ok_or(MathError::Overflow)
    }

    /// `self * rhs / WAD`, truncated toward zero.
    pub fn mul(self, rhs: Wad) -> Result<Wad, MathError> {
        let product = magnitude(self.0) * magnitude(rhs.0);
        let quotient = product / magnitude(WAD);
        signed(quotient, (self.0 < 0) != (rhs.0 < 0))
    }

    /// `self * WAD / rhs`, truncated toward zero.
    pub fn div(self, rhs: Wad) -> Result<Wad, MathError> {
        if rhs.0 == 0 {
            return Err(MathError::DivisionByZero);
        }
        let scaled = magnitude(self.0) * magnitude(WAD);
        let quotient = scaled / magnitude(rhs.0);
        signed(quotient, (self.0 < 0) != (rhs.0 < 0))
    }

    /// `self * numerator / denominator` with a single truncation at the end.
    pub fn mul_div(self, numerator: Wad, denominator: Wad) -> Result<Wad, MathError> {
        if denominator.0 == 0 {
            return Err(MathError::DivisionByZero);
        }
        let product = magnitude(self.0)
            .checked_mul(magnitude(numerator.0))
            .ok_or(MathError::Overflow)?;
        let quotient = product / magnitude(denominator.0);
        let negative = (self.0 < 0) ^ (numerator.0 < 0) ^ (denominator.0 < 0);
        signed(quotient, negative)
    }

    /// Returns `true` when the value is an exact multiple of `step`.
    pub fn is_multiple_of(self, step: Wad) -> bool {
        step.0 != 0 && self.0 % step.0 == 0
    }
}

/// Index of the candidate closest to `target`.
///
/// Ties go to the lowest index, so the result only depends on the order of
/// `candidates`.
pub fn closest_index(target: Wad, candidates: &[Wad]) -> Option<usize> {
    let mut best: Option<(usize, u128)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let distance = target.0.abs_diff(candidate.0);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

fn magnitude(v: i128) -> U256 {
    U256::from(v.unsigned_abs())
}

fn signed(magnitude: U256, negative: bool) -> Result<Wad, MathError> {
    if magnitude > U256::from(i128::MAX as u128) {
        return Err(MathError::Overflow);
    }
    let v = magnitude.as_u128() as i128;
    Ok(Wad(if negative { -v } else { v }))
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / WAD as u128;
        let frac = abs % WAD as u128;
        if frac == 0 {
            return write!(f, "{sign}{units}");
        }
        let digits = format!("{frac:018}");
        write!(f, "{sign}{units}.{}", digits.trim_end_matches('0'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fixed-point literal `{0}`")]
pub struct ParseWadError(String);

impl FromStr for Wad {
    type Err = ParseWadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseWadError(s.to_string());
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if frac_part.len() > WAD_DECIMALS
            || !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(err());
        }

        let units: i128 = if int_part.is_empty() { 0 } else { int_part.parse().map_err(|_| err())? };
        let frac: i128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{frac_part:0<width$}", width = WAD_DECIMALS);
            padded.parse().map_err(|_| err())?
        };

        let raw = units
            .checked_mul(WAD)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(err)?;
        Ok(Wad(if negative { -raw } else { raw }))
    }
}

impl Serialize for Wad {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Wad {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Wad {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(w("0.003").raw(), 3_000_000_000_000_000);
        assert_eq!(w("1").raw(), WAD);
        assert_eq!(w("-2.5").raw(), -2_500_000_000_000_000_000);
        assert_eq!(w(".5"), w("0.5"));
        assert_eq!(w("1234.000100").to_string(), "1234.0001");
        assert_eq!(Wad::from_int(-3).to_string(), "-3");
        assert_eq!(Wad::from_raw(1).to_string(), "0.000000000000000001");

        assert!("".parse::<Wad>().is_err());
        assert!("1.2.3".parse::<Wad>().is_err());
        assert!("0.0000000000000000001".parse::<Wad>().is_err());
        assert!("abc".parse::<Wad>().is_err());
    }

    #[test]
    fn test_mul_truncates_toward_zero() {
        // 1e-18 * 0.5 = 0.5e-18 -> 0
        assert_eq!(Wad::from_raw(1).mul(w("0.5")).unwrap(), Wad::ZERO);
        assert_eq!(Wad::from_raw(-1).mul(w("0.5")).unwrap(), Wad::ZERO);
        assert_eq!(Wad::from_raw(3).mul(w("0.5")).unwrap(), Wad::from_raw(1));
        assert_eq!(Wad::from_raw(-3).mul(w("0.5")).unwrap(), Wad::from_raw(-1));
        assert_eq!(w("1000").mul(w("0.003")).unwrap(), w("3"));
    }

    #[test]
    fn test_mul_widens_before_dividing() {
        // 3000 * 3000 would overflow i128 if multiplied raw
        assert_eq!(w("3000").mul(w("3000")).unwrap(), w("9000000"));
    }

    #[test]
    fn test_mul_overflow() {
        let big = Wad::from_raw(i128::MAX);
        assert_eq!(big.mul(w("2")), Err(MathError::Overflow));
    }

    #[test]
    fn test_abs() {
        assert_eq!(w("-1.5").abs(), Ok(w("1.5")));
        assert_eq!(Wad::ZERO.abs(), Ok(Wad::ZERO));
        assert_eq!(Wad::from_raw(i128::MIN).abs(), Err(MathError::Overflow));
    }

    #[test]
    fn test_div() {
        assert_eq!(w("0.0034").div(w("0.001")).unwrap(), w("3.4"));
        assert_eq!(w("1").div(w("3")).unwrap().raw(), 333_333_333_333_333_333);
        assert_eq!(w("-1").div(w("3")).unwrap().raw(), -333_333_333_333_333_333);
        assert_eq!(w("1").div(Wad::ZERO), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_mul_div_sign() {
        let r = w("2").mul_div(w("-3"), w("-4")).unwrap();
        assert_eq!(r, w("1.5"));
        let r = w("2").mul_div(w("3"), w("-4")).unwrap();
        assert_eq!(r, w("-1.5"));
        assert_eq!(w("1").mul_div(w("1"), Wad::ZERO), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_closest_index_prefers_first_on_tie() {
        let candidates = [Wad::from_int(1), Wad::from_int(3), Wad::from_int(5)];
        assert_eq!(closest_index(Wad::from_int(4), &candidates), Some(1));
        assert_eq!(closest_index(w("3.4"), &candidates), Some(1));
        assert_eq!(closest_index(w("4.6"), &candidates), Some(2));
        assert_eq!(closest_index(Wad::ZERO, &[]), None);
    }

    #[test]
    fn test_multiple_of() {
        assert!(w("0.004").is_multiple_of(w("0.001")));
        assert!(!w("0.0045").is_multiple_of(w("0.001")));
        assert!(!w("1").is_multiple_of(Wad::ZERO));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&w("1.25")).unwrap();
        assert_eq!(json, "\"1.25\"");
        let back: Wad = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w("1.25"));
    }
}
