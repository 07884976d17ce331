//! Numeric coordinate values

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{Location, ShapeError, ViolationKind};

/// Magnitude from which an `f64` no longer fits in an `i128`
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// A coordinate value: a signed or unsigned integer, or a finite floating point number
///
/// The representation survives decoding and encoding, so `1` stays `1`, `1.0` stays
/// `1.0` and integers up to `u64::MAX` keep every digit. NaN and infinities cannot be
/// represented since JSON has no literal for them.
///
/// Equality is exact across representations: `1 == 1.0`, but an integer never equals a
/// float it merely rounds to.
#[derive(Debug, Clone, Copy)]
pub struct Number(Repr);

#[derive(Debug, Clone, Copy)]
enum Repr {
    Int(i64),
    /// Only holds values above `i64::MAX`
    UInt(u64),
    /// Always finite
    Float(f64),
}

impl Number {
    /// A float number, or `None` for NaN and infinities
    pub fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then_some(Number(Repr::Float(value)))
    }

    pub fn as_f64(&self) -> f64 {
        match self.0 {
            Repr::Int(value) => value as f64,
            Repr::UInt(value) => value as f64,
            Repr::Float(value) => value,
        }
    }

    /// The value as `i64` if it is an integer in range
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            Repr::Int(value) => Some(value),
            _ => None,
        }
    }

    /// The value as `u64` if it is a non-negative integer
    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            Repr::Int(value) => u64::try_from(value).ok(),
            Repr::UInt(value) => Some(value),
            Repr::Float(_) => None,
        }
    }

    /// Whether the value is held as an integer (`1`, not `1.0`)
    pub fn is_integer(&self) -> bool {
        !matches!(self.0, Repr::Float(_))
    }

    /// Convert a decoded JSON number
    pub(crate) fn from_json(number: &serde_json::Number) -> Option<Self> {
        if let Some(value) = number.as_i64() {
            Some(Number::from(value))
        } else if let Some(value) = number.as_u64() {
            Some(Number::from(value))
        } else {
            number.as_f64().and_then(Number::from_f64)
        }
    }

    /// The exact integer value, also for floats without a fractional part
    fn exact_integer(&self) -> Option<i128> {
        match self.0 {
            Repr::Int(value) => Some(value.into()),
            Repr::UInt(value) => Some(value.into()),
            Repr::Float(value) if value.fract() == 0.0 && value.abs() < I128_LIMIT => {
                Some(value as i128)
            }
            Repr::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Repr::Float(a), Repr::Float(b)) => a == b,
            _ => match (self.exact_integer(), other.exact_integer()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Int(value) => write!(f, "{}", value),
            Repr::UInt(value) => write!(f, "{}", value),
            Repr::Float(value) => write!(f, "{:?}", value),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number(Repr::Int(value))
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::from(i64::from(value))
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::from(i64::from(value))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => Number(Repr::Int(value)),
            Err(_) => Number(Repr::UInt(value)),
        }
    }
}

impl TryFrom<f64> for Number {
    type Error = ShapeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Number::from_f64(value)
            .ok_or_else(|| ShapeError::single(Location::root(), ViolationKind::NonFiniteNumber))
    }
}

impl TryFrom<f32> for Number {
    type Error = ShapeError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Number::try_from(f64::from(value))
    }
}

impl From<Number> for serde_json::Value {
    fn from(number: Number) -> Self {
        match number.0 {
            Repr::Int(value) => serde_json::Value::from(value),
            Repr::UInt(value) => serde_json::Value::from(value),
            Repr::Float(value) => serde_json::Value::from(value),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Repr::Int(value) => serializer.serialize_i64(value),
            Repr::UInt(value) => serializer.serialize_u64(value),
            Repr::Float(value) => serializer.serialize_f64(value),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl Visitor<'_> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or finite floating point number")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Number, E> {
                Ok(Number::from(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Number, E> {
                Ok(Number::from(value))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Number, E> {
                Number::from_f64(value)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}
