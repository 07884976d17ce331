//! The `__geo_interface__` convention used by spatial tooling for interoperability.

use serde_json::{Map, Value};

use crate::models::{BoundingBox, Position};

/// Exposes a geometry as a plain mapping
///
/// The mapping holds `type` first, then `coordinates` (or `geometries` for a collection),
/// then `bbox` when the geometry has one, and is exactly what the geometry encodes to.
pub trait GeoInterface {
    fn geo_interface(&self) -> Map<String, Value>;

    /// The mapping as a JSON value
    fn to_value(&self) -> Value {
        Value::Object(self.geo_interface())
    }

    /// The mapping as compact JSON text
    fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

/// Conversion of coordinate payloads of any nesting depth into JSON values
pub(crate) trait CoordinatesValue {
    fn coordinates_value(&self) -> Value;
}

impl CoordinatesValue for Position {
    fn coordinates_value(&self) -> Value {
        Value::Array(self.to_vec().into_iter().map(Value::from).collect())
    }
}

impl<T: CoordinatesValue> CoordinatesValue for Vec<T> {
    fn coordinates_value(&self) -> Value {
        Value::Array(self.iter().map(CoordinatesValue::coordinates_value).collect())
    }
}

/// Build the `{"type": ..., <payload>: ..., "bbox": ...}` mapping shared by every geometry
pub(crate) fn tagged_mapping(
    type_name: &str,
    payload: &str,
    value: Value,
    bbox: Option<&BoundingBox>,
) -> Map<String, Value> {
    let mut map = Map::with_capacity(3);
    map.insert("type".to_string(), Value::from(type_name));
    map.insert(payload.to_string(), value);
    if let Some(bbox) = bbox {
        map.insert("bbox".to_string(), Value::from(bbox));
    }
    map
}
