//! Bounding boxes (RFC 7946 §5)

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::Number;
use crate::error::{Location, ShapeError, ViolationKind};

/// The optional `bbox` member of a geometry
///
/// All minima followed by all maxima: `[west, south, east, north]` or, with elevation,
/// `[west, south, low, east, north, high]`. The values are not compared; a west edge
/// greater than the east edge is legal for boxes crossing the antimeridian.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    values: Vec<Number>,
}

impl BoundingBox {
    /// Accepted value counts, for 2 and 3 dimensions
    pub const LENGTHS: [usize; 2] = [4, 6];

    pub fn new(values: Vec<Number>) -> Result<Self, ShapeError> {
        if Self::LENGTHS.contains(&values.len()) {
            Ok(Self { values })
        } else {
            Err(ShapeError::single(
                Location::root(),
                ViolationKind::BboxLength { found: values.len() },
            ))
        }
    }

    pub fn values(&self) -> &[Number] {
        &self.values
    }

    /// 2 or 3
    pub fn dimensions(&self) -> usize {
        self.values.len() / 2
    }

    /// The south-west (and low) corner
    pub fn min(&self) -> &[Number] {
        &self.values[..self.dimensions()]
    }

    /// The north-east (and high) corner
    pub fn max(&self) -> &[Number] {
        &self.values[self.dimensions()..]
    }
}

impl From<&BoundingBox> for Value {
    fn from(bbox: &BoundingBox) -> Self {
        Value::Array(bbox.values.iter().map(|n| Value::from(*n)).collect())
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BoundingBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<Number>::deserialize(deserializer)?;
        let found = values.len();
        BoundingBox::new(values)
            .map_err(|_| de::Error::invalid_length(found, &"a bbox of 4 or 6 numbers"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners() {
        let flat = BoundingBox::new(vec![1.into(), 2.into(), 3.into(), 4.into()]).unwrap();
        assert_eq!(flat.dimensions(), 2);
        assert_eq!(flat.min(), [Number::from(1), Number::from(2)].as_slice());
        assert_eq!(flat.max(), [Number::from(3), Number::from(4)].as_slice());

        let raised: BoundingBox = serde_json::from_str("[0, 0, -5, 10, 10, 5]").unwrap();
        assert_eq!(raised.dimensions(), 3);
        assert_eq!(raised.max()[2], Number::from(5));
    }

    #[test]
    fn test_length_is_checked() {
        let err = BoundingBox::new(vec![Number::from(0); 5]).unwrap_err();
        assert_eq!(err.first().unwrap().kind, ViolationKind::BboxLength { found: 5 });
        assert!(serde_json::from_str::<BoundingBox>("[0, 0]").is_err());
    }

    #[test]
    fn test_encoding() {
        let bbox: BoundingBox = serde_json::from_str("[-180, -90.0, 180, 90.0]").unwrap();
        assert_eq!(serde_json::to_string(&bbox).unwrap(), "[-180,-90.0,180,90.0]");
        assert_eq!(Value::from(&bbox), serde_json::json!([-180, -90.0, 180, 90.0]));
    }
}
