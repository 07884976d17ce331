//! Positions (RFC 7946 §3.1.1)

use serde::de;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Number;
use crate::error::{Location, ShapeError, ViolationKind};

/// An `(x, y[, z])` tuple of numbers
///
/// No range checks are applied; longitude and latitude outside the usual bounds are
/// accepted. Float values go through [`Number::try_from`] first, so a position never
/// holds NaN or an infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    x: Number,
    y: Number,
    z: Option<Number>,
}

/// GeoJSON uses "position" and "coordinate" interchangeably
pub type Coordinate = Position;

impl Position {
    /// Create a 2D position
    pub fn new(x: impl Into<Number>, y: impl Into<Number>) -> Self {
        Self { x: x.into(), y: y.into(), z: None }
    }

    /// Create a 3D position
    pub fn with_z(x: impl Into<Number>, y: impl Into<Number>, z: impl Into<Number>) -> Self {
        Self { x: x.into(), y: y.into(), z: Some(z.into()) }
    }

    pub fn x(&self) -> Number {
        self.x
    }

    pub fn y(&self) -> Number {
        self.y
    }

    pub fn z(&self) -> Option<Number> {
        self.z
    }

    /// Number of values in the tuple, 2 or 3
    pub fn dimensions(&self) -> usize {
        if self.z.is_some() {
            3
        } else {
            2
        }
    }

    pub fn to_vec(&self) -> Vec<Number> {
        let mut values = vec![self.x, self.y];
        values.extend(self.z);
        values
    }
}

impl TryFrom<Vec<Number>> for Position {
    type Error = ShapeError;

    fn try_from(values: Vec<Number>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [x, y] => Ok(Self::new(*x, *y)),
            [x, y, z] => Ok(Self::with_z(*x, *y, *z)),
            _ => Err(ShapeError::single(
                Location::root(),
                ViolationKind::WrongArity { found: values.len() },
            )),
        }
    }
}

impl<T: Into<Number>> From<[T; 2]> for Position {
    fn from([x, y]: [T; 2]) -> Self {
        Self::new(x, y)
    }
}

impl<T: Into<Number>> From<[T; 3]> for Position {
    fn from([x, y, z]: [T; 3]) -> Self {
        Self::with_z(x, y, z)
    }
}

impl<T: Into<Number>> From<(T, T)> for Position {
    fn from((x, y): (T, T)) -> Self {
        Self::new(x, y)
    }
}

impl<T: Into<Number>> From<(T, T, T)> for Position {
    fn from((x, y, z): (T, T, T)) -> Self {
        Self::with_z(x, y, z)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.dimensions()))?;
        seq.serialize_element(&self.x)?;
        seq.serialize_element(&self.y)?;
        if let Some(z) = &self.z {
            seq.serialize_element(z)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<Number>::deserialize(deserializer)?;
        let found = values.len();
        Position::try_from(values)
            .map_err(|_| de::Error::invalid_length(found, &"a position of 2 or 3 numbers"))
    }
}
