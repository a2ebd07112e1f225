//! Leverage multipliers and their wire encoding.
//!
//! Exchanges expect leverage as a decimal string. Values are held as
//! `Decimal` so that `30`, `30.0` and `"30.00"` all encode to `"30"`.

use crate::error::{ExchangeError, Result};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A strictly positive leverage multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Leverage(Decimal);

impl Leverage {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(ExchangeError::InvalidLeverage(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Canonical decimal string: no exponent, no trailing zeros.
    pub fn to_wire_string(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

impl FromStr for Leverage {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| ExchangeError::InvalidLeverage(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<Decimal> for Leverage {
    type Error = ExchangeError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<f64> for Leverage {
    type Error = ExchangeError;

    /// Goes through the shortest round-trip representation of the float,
    /// so `0.1` becomes `0.1` rather than its binary expansion.
    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(ExchangeError::InvalidLeverage(value.to_string()));
        }
        value.to_string().parse()
    }
}

macro_rules! leverage_from_int {
    ($($int:ty),*) => {
        $(
            impl TryFrom<$int> for Leverage {
                type Error = ExchangeError;

                fn try_from(value: $int) -> Result<Self> {
                    Self::new(Decimal::from(value))
                }
            }
        )*
    };
}

leverage_from_int!(i32, i64, u32, u64);

impl Serialize for Leverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire_string())
    }
}

/// Requested leverage for the long (buy) and short (sell) side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeveragePair {
    buy: Leverage,
    sell: Leverage,
}

impl LeveragePair {
    pub fn new(buy: Leverage, sell: Leverage) -> Self {
        Self { buy, sell }
    }

    /// Same multiplier on both sides.
    pub fn symmetric(leverage: Leverage) -> Self {
        Self::new(leverage, leverage)
    }

    pub fn buy(&self) -> Leverage {
        self.buy
    }

    pub fn sell(&self) -> Leverage {
        self.sell
    }

    pub fn is_symmetric(&self) -> bool {
        self.buy == self.sell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_float_encode_identically() {
        let from_int = Leverage::try_from(30_i64).unwrap();
        let from_float = Leverage::try_from(30.0_f64).unwrap();

        assert_eq!(from_int.to_wire_string(), "30");
        assert_eq!(from_float.to_wire_string(), "30");
        assert_eq!(from_int, from_float);
    }

    #[test]
    fn test_fractional_values_keep_their_digits() {
        assert_eq!(Leverage::try_from(12.5_f64).unwrap().to_wire_string(), "12.5");
        assert_eq!(Leverage::try_from(0.1_f64).unwrap().to_wire_string(), "0.1");
        assert_eq!("25.500".parse::<Leverage>().unwrap().to_wire_string(), "25.5");
    }

    #[test]
    fn test_no_exponent_notation() {
        let tiny = Leverage::try_from(1e-7_f64).unwrap();
        assert_eq!(tiny.to_wire_string(), "0.0000001");

        let large = Leverage::try_from(1e6_f64).unwrap();
        assert_eq!(large.to_wire_string(), "1000000");
    }

    #[test]
    fn test_rejects_non_positive_and_non_finite() {
        assert!(matches!(
            Leverage::try_from(0_i32),
            Err(ExchangeError::InvalidLeverage(_))
        ));
        assert!(Leverage::try_from(-5.0_f64).is_err());
        assert!(Leverage::try_from(f64::NAN).is_err());
        assert!(Leverage::try_from(f64::INFINITY).is_err());
        assert!("ten".parse::<Leverage>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let pair = LeveragePair::new(
            Leverage::try_from(30_u32).unwrap(),
            Leverage::try_from(20.0_f64).unwrap(),
        );
        let json = serde_json::to_value(pair).unwrap();
        assert_eq!(json["buy"], "30");
        assert_eq!(json["sell"], "20");
        assert!(!pair.is_symmetric());
        assert!(LeveragePair::symmetric(pair.buy()).is_symmetric());
    }
}
