//! Canonical GeoJSON geometry types (RFC 7946 §3.1).
//!
//! Each variant is an immutable value object. Construction goes through validation, so a
//! value of any of these types is always well-formed.

use serde::de;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use super::{BoundingBox, Position};
use crate::error::{Location, ShapeError};
use crate::geo_interface::{tagged_mapping, CoordinatesValue, GeoInterface};
use crate::validation::{FromGeoJson, ValidationOptions, Validator};

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    pub const ALL: [GeometryType; 7] = [
        GeometryType::Point,
        GeometryType::MultiPoint,
        GeometryType::LineString,
        GeometryType::MultiLineString,
        GeometryType::Polygon,
        GeometryType::MultiPolygon,
        GeometryType::GeometryCollection,
    ];

    /// The `type` tag used in GeoJSON text
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::LineString => "LineString",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// Look up a `type` tag; matching is case-sensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|geometry_type| geometry_type.name() == name)
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single position
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    coordinates: Position,
    bbox: Option<BoundingBox>,
}

impl Point {
    pub fn new(coordinates: impl Into<Position>) -> Self {
        Self { coordinates: coordinates.into(), bbox: None }
    }
}

/// Any number of unrelated positions
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPoint {
    coordinates: Vec<Position>,
    bbox: Option<BoundingBox>,
}

impl MultiPoint {
    pub fn new(coordinates: Vec<Position>) -> Self {
        Self { coordinates, bbox: None }
    }
}

/// Two or more connected positions
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    coordinates: Vec<Position>,
    bbox: Option<BoundingBox>,
}

impl LineString {
    /// Create a LineString; fails with fewer than two positions
    pub fn new(coordinates: Vec<Position>) -> Result<Self, ShapeError> {
        let mut validator = Validator::new(ValidationOptions::default());
        validator.check_line_string(&coordinates, &Location::root().member("coordinates"));
        validator.finish(Self::TYPE, Some(Self { coordinates, bbox: None }))
    }

    pub(crate) fn from_validated(coordinates: Vec<Position>) -> Self {
        Self { coordinates, bbox: None }
    }

    /// Whether the first and last positions are equal
    pub fn is_closed(&self) -> bool {
        self.coordinates.first() == self.coordinates.last()
    }
}

/// Any number of lines, each an unchecked sequence of positions
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLineString {
    coordinates: Vec<Vec<Position>>,
    bbox: Option<BoundingBox>,
}

impl MultiLineString {
    pub fn new(coordinates: Vec<Vec<Position>>) -> Self {
        Self { coordinates, bbox: None }
    }
}

/// An exterior linear ring followed by any number of interior rings (holes)
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    coordinates: Vec<Vec<Position>>,
    bbox: Option<BoundingBox>,
}

impl Polygon {
    /// Create a Polygon; every ring needs at least four positions and must be closed
    pub fn new(coordinates: Vec<Vec<Position>>) -> Result<Self, ShapeError> {
        let mut validator = Validator::new(ValidationOptions::default());
        validator.check_rings(&coordinates, &Location::root().member("coordinates"));
        validator.finish(Self::TYPE, Some(Self { coordinates, bbox: None }))
    }

    pub(crate) fn from_validated(coordinates: Vec<Vec<Position>>) -> Self {
        Self { coordinates, bbox: None }
    }

    /// The bounding ring, absent for a polygon without rings
    pub fn exterior(&self) -> Option<&[Position]> {
        self.coordinates.first().map(Vec::as_slice)
    }

    /// The holes
    pub fn interiors(&self) -> &[Vec<Position>] {
        self.coordinates.get(1..).unwrap_or_default()
    }
}

/// Any number of polygon coordinate arrays
///
/// By default the rings are only checked for shape, not for length or closure. Use
/// [`MultiPolygon::new_with`] with [`crate::ValidityMode::Strict`] to check them.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPolygon {
    coordinates: Vec<Vec<Vec<Position>>>,
    bbox: Option<BoundingBox>,
}

impl MultiPolygon {
    pub fn new(coordinates: Vec<Vec<Vec<Position>>>) -> Self {
        Self { coordinates, bbox: None }
    }

    pub fn new_with(
        coordinates: Vec<Vec<Vec<Position>>>,
        options: &ValidationOptions,
    ) -> Result<Self, ShapeError> {
        let mut validator = Validator::new(*options);
        validator.check_polygons(&coordinates, &Location::root().member("coordinates"));
        validator.finish(Self::TYPE, Some(Self { coordinates, bbox: None }))
    }

    pub(crate) fn from_validated(coordinates: Vec<Vec<Vec<Position>>>) -> Self {
        Self { coordinates, bbox: None }
    }
}

macro_rules! coordinate_geometry {
    ($($name:ident, $coordinates:ty, $validate:ident;)*) => {$(
        impl $name {
            /// Value of the `type` member
            pub const TYPE: &'static str = stringify!($name);

            pub fn coordinates(&self) -> &$coordinates {
                &self.coordinates
            }

            pub fn into_coordinates(self) -> $coordinates {
                self.coordinates
            }

            pub fn bbox(&self) -> Option<&BoundingBox> {
                self.bbox.as_ref()
            }

            /// Attach a bounding box; its values are not checked against the coordinates
            pub fn with_bbox(self, bbox: BoundingBox) -> Self {
                self.with_optional_bbox(Some(bbox))
            }

            pub(crate) fn with_optional_bbox(mut self, bbox: Option<BoundingBox>) -> Self {
                self.bbox = bbox;
                self
            }
        }

        impl FromGeoJson for $name {
            fn from_value_with(
                value: &Value,
                options: &ValidationOptions,
            ) -> Result<Self, ShapeError> {
                let mut validator = Validator::new(*options);
                let geometry = validator.$validate(value, &Location::root());
                validator.finish(Self::TYPE, geometry)
            }
        }

        impl GeoInterface for $name {
            fn geo_interface(&self) -> Map<String, Value> {
                let coordinates = self.coordinates.coordinates_value();
                tagged_mapping(Self::TYPE, "coordinates", coordinates, self.bbox.as_ref())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let len = if self.bbox.is_some() { 3 } else { 2 };
                let mut state = serializer.serialize_struct(Self::TYPE, len)?;
                state.serialize_field("type", Self::TYPE)?;
                state.serialize_field("coordinates", &self.coordinates)?;
                if let Some(bbox) = &self.bbox {
                    state.serialize_field("bbox", bbox)?;
                }
                state.end()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                Self::from_value(&value).map_err(de::Error::custom)
            }
        }

        impl From<$name> for Geometry {
            fn from(geometry: $name) -> Self {
                Geometry::$name(geometry)
            }
        }
    )*};
}

coordinate_geometry! {
    Point, Position, point;
    MultiPoint, Vec<Position>, multi_point;
    LineString, Vec<Position>, line_string;
    MultiLineString, Vec<Vec<Position>>, multi_line_string;
    Polygon, Vec<Vec<Position>>, polygon;
    MultiPolygon, Vec<Vec<Vec<Position>>>, multi_polygon;
}

/// Any geometry that may appear inside a GeometryCollection
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    MultiPoint(MultiPoint),
    LineString(LineString),
    MultiLineString(MultiLineString),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.geometry_type().name()
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        match self {
            Geometry::Point(g) => g.bbox(),
            Geometry::MultiPoint(g) => g.bbox(),
            Geometry::LineString(g) => g.bbox(),
            Geometry::MultiLineString(g) => g.bbox(),
            Geometry::Polygon(g) => g.bbox(),
            Geometry::MultiPolygon(g) => g.bbox(),
        }
    }
}

impl FromGeoJson for Geometry {
    fn from_value_with(value: &Value, options: &ValidationOptions) -> Result<Self, ShapeError> {
        let mut validator = Validator::new(*options);
        let geometry = validator.geometry(value, &Location::root());
        validator.finish("Geometry", geometry)
    }
}

impl GeoInterface for Geometry {
    fn geo_interface(&self) -> Map<String, Value> {
        match self {
            Geometry::Point(g) => g.geo_interface(),
            Geometry::MultiPoint(g) => g.geo_interface(),
            Geometry::LineString(g) => g.geo_interface(),
            Geometry::MultiLineString(g) => g.geo_interface(),
            Geometry::Polygon(g) => g.geo_interface(),
            Geometry::MultiPolygon(g) => g.geo_interface(),
        }
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Geometry::Point(g) => g.serialize(serializer),
            Geometry::MultiPoint(g) => g.serialize(serializer),
            Geometry::LineString(g) => g.serialize(serializer),
            Geometry::MultiLineString(g) => g.serialize(serializer),
            Geometry::Polygon(g) => g.serialize(serializer),
            Geometry::MultiPolygon(g) => g.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;
    use crate::models::Number;
    use serde_json::json;

    fn float(value: f64) -> Number {
        Number::try_from(value).unwrap()
    }

    fn square() -> Vec<Position> {
        vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(0, 1),
            Position::new(0, 0),
        ]
    }

    #[test]
    fn test_geometry_type_names() {
        for geometry_type in GeometryType::ALL {
            assert_eq!(GeometryType::from_name(geometry_type.name()), Some(geometry_type));
        }
        assert_eq!(GeometryType::from_name("point"), None);
        assert_eq!(GeometryType::MultiLineString.to_string(), "MultiLineString");
    }

    #[test]
    fn test_line_string_constructor() {
        let line = LineString::new(vec![Position::new(0, 0), Position::new(1, 1)]).unwrap();
        assert_eq!(line.coordinates().len(), 2);
        assert!(!line.is_closed());

        let err = LineString::new(vec![Position::new(0, 0)]).unwrap_err();
        assert_eq!(
            err.first().unwrap().kind,
            ViolationKind::InsufficientPoints { min: 2, found: 1 }
        );
        assert_eq!(err.first().unwrap().location.to_string(), "coordinates");
    }

    #[test]
    fn test_polygon_constructor_and_rings() {
        let hole = vec![
            Position::new(float(0.25), float(0.25)),
            Position::new(float(0.5), float(0.25)),
            Position::new(float(0.5), float(0.5)),
            Position::new(float(0.25), float(0.25)),
        ];
        let polygon = Polygon::new(vec![square(), hole.clone()]).unwrap();
        assert_eq!(polygon.exterior(), Some(square().as_slice()));
        assert_eq!(polygon.interiors(), [hole].as_slice());

        let empty = Polygon::new(Vec::new()).unwrap();
        assert_eq!(empty.exterior(), None);
        assert!(empty.interiors().is_empty());

        let mut open = square();
        open.pop();
        let err = Polygon::new(vec![open]).unwrap_err();
        assert_eq!(err.first().unwrap().kind, ViolationKind::RingNotClosed);
    }

    #[test]
    fn test_multi_polygon_constructors() {
        let short = vec![vec![vec![Position::new(0, 0), Position::new(0, 0)]]];
        assert!(MultiPolygon::new_with(short.clone(), &ValidationOptions::default()).is_ok());
        assert_eq!(MultiPolygon::new(short.clone()).coordinates().len(), 1);

        let err = MultiPolygon::new_with(short, &ValidationOptions::strict()).unwrap_err();
        assert_eq!(err.first().unwrap().kind, ViolationKind::RingTooShort { found: 2 });
        assert_eq!(err.first().unwrap().location.to_string(), "coordinates[0][0]");
    }

    #[test]
    fn test_serialization_key_order() {
        let point = Point::new([float(1.0), float(2.0)]);
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"type":"Point","coordinates":[1.0,2.0]}"#
        );

        let line = Geometry::from(LineString::new(square()).unwrap());
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"type":"LineString","coordinates":[[0,0],[1,0],[1,1],[0,1],[0,0]]}"#
        );
    }

    #[test]
    fn test_geo_interface_matches_serialization() {
        let polygon = Polygon::new(vec![square()]).unwrap();
        let mapping = polygon.geo_interface();
        assert_eq!(Value::Object(mapping), serde_json::to_value(&polygon).unwrap());
        assert_eq!(polygon.to_json_string(), serde_json::to_string(&polygon).unwrap());
    }

    #[test]
    fn test_geometry_dispatch() {
        let input = json!({"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]], []]});
        let geometry = Geometry::from_value(&input).unwrap();
        assert_eq!(geometry.geometry_type(), GeometryType::MultiLineString);
        assert_eq!(geometry.type_name(), "MultiLineString");
        assert_eq!(geometry.to_value(), input);
    }

    #[test]
    fn test_deserialize_reports_violation() {
        let err = serde_json::from_str::<LineString>(r#"{"type":"LineString","coordinates":[]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("insufficient points"));

        let err = serde_json::from_str::<Geometry>(r#"{"type":"Circle","coordinates":[0,0]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unrecognized geometry type \"Circle\""));
    }

    #[test]
    fn test_into_coordinates() {
        let multi = MultiPoint::new(vec![Position::new(1, 2), Position::with_z(3, 4, 5)]);
        let positions = multi.into_coordinates();
        assert_eq!(positions[1].z(), Some(Number::from(5)));
    }

    #[test]
    fn test_typed_geometries_always_round_trip() {
        assert!(Number::try_from(f64::NAN).is_err());

        let point = Point::new([float(1e300), float(-0.5)]);
        let text = point.to_json_string();
        assert_eq!(Point::from_json_str(&text).unwrap(), point);

        let unsigned = Point::new([Number::from(u64::MAX), Number::from(1)]);
        let text = unsigned.to_json_string();
        assert_eq!(text, r#"{"type":"Point","coordinates":[18446744073709551615,1]}"#);
        assert_eq!(Point::from_json_str(&text).unwrap(), unsigned);
    }

    #[test]
    fn test_bbox_is_kept() {
        let input = json!({
            "type": "LineString",
            "coordinates": [[0, 0], [2, 1]],
            "bbox": [0, 0, 2, 1]
        });
        let line = LineString::from_value(&input).unwrap();
        assert_eq!(line.bbox().map(BoundingBox::dimensions), Some(2));
        assert_eq!(line.to_value(), input);
        assert_eq!(serde_json::to_value(&line).unwrap(), input);

        let geometry = Geometry::from(line.clone());
        assert_eq!(geometry.bbox(), line.bbox());

        let bbox = BoundingBox::new(vec![Number::from(0); 6]).unwrap();
        let point = Point::new([0, 0, 0]).with_bbox(bbox);
        assert_eq!(
            point.to_json_string(),
            r#"{"type":"Point","coordinates":[0,0,0],"bbox":[0,0,0,0,0,0]}"#
        );
    }

    #[test]
    fn test_bbox_is_validated() {
        let input = json!({"type": "Point", "coordinates": [0, 0], "bbox": [0, "a", 0]});
        let err = Point::from_value(&input).unwrap_err();
        assert_eq!(err.first().unwrap().kind, ViolationKind::NotANumber);
        assert_eq!(err.first().unwrap().location.to_string(), "bbox[1]");

        let input = json!({"type": "Point", "coordinates": [0, 0], "bbox": [0, 0, 0]});
        let err = Point::from_value_with(&input, &ValidationOptions::strict()).unwrap_err();
        assert_eq!(err.first().unwrap().kind, ViolationKind::BboxLength { found: 3 });
    }
}
