use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Exact, non-negative item quantity.
///
/// Whole values serialize as JSON integers (`2`), everything else as a JSON
/// float (`0.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity(Decimal);

impl Quantity {
    pub const ONE: Quantity = Quantity(Decimal::ONE);

    pub fn new(value: Decimal) -> Self {
        Quantity(value.normalize())
    }

    pub fn is_whole(&self) -> bool {
        self.0.fract().is_zero()
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Quantity::new(value)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Quantity(Decimal::from(value))
    }
}

impl Add for Quantity {
    type Output = Quantity;

    /// Saturates at `Decimal::MAX`.
    fn add(self, rhs: Quantity) -> Quantity {
        Quantity::new(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        *self = *self + rhs;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidQuantity(pub String);

impl fmt::Display for InvalidQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid quantity '{}'", self.0)
    }
}

impl std::error::Error for InvalidQuantity {}

impl FromStr for Quantity {
    type Err = InvalidQuantity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| InvalidQuantity(s.to_string()))?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(InvalidQuantity(s.to_string()));
        }
        Ok(Quantity::new(value))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            if let Some(whole) = self.0.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        match self.0.to_f64() {
            Some(v) => serializer.serialize_f64(v),
            None => Err(serde::ser::Error::custom(format!("quantity {} out of range", self.0))),
        }
    }
}

struct QuantityVisitor;

impl<'de> Visitor<'de> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
        Ok(Quantity::new(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
        if v < 0 {
            return Err(E::custom(format!("negative quantity {v}")));
        }
        Ok(Quantity::new(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
        Quantity::from_str(&v.to_string()).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

/// One recognised order line. On the wire the keyword travels as
/// `product_guess`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedItem {
    #[serde(rename = "product_guess")]
    pub keyword: String,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseRequest {
    pub text: String,
    pub product_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    #[serde(default)]
    pub items: Vec<ParsedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
}
