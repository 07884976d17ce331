//! Construction-time validation of decoded GeoJSON values.
//!
//! Every geometry is built by walking a `serde_json::Value` once. Shape checks (object
//! members, type tags, nesting depth, position arity) run first; the semantic checks of
//! a geometry (minimum point counts, ring closure) only run when its shape is sound.
//! All violations found along the way are collected into a single [`ShapeError`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Location, ShapeError, Violation, ViolationKind};
use crate::models::{
    BoundingBox, Geometry, GeometryCollection, GeometryType, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Number, Point, Polygon, Position,
};

/// Minimum number of positions in a LineString
pub const MIN_LINE_STRING_POSITIONS: usize = 2;

/// Minimum number of positions in a linear ring
pub const MIN_RING_POSITIONS: usize = 4;

/// Handling of members that RFC 7946 does not define for a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ForeignMembers {
    /// Drop them silently
    #[default]
    Ignore,
    /// Report each one as a violation
    Reject,
}

/// Geometry validation mode for MultiPolygon rings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValidityMode {
    /// Rings of every polygon get the same length and closure checks as Polygon rings
    Strict,
    /// Rings are only checked for nesting depth and position validity
    #[default]
    Lenient,
}

/// Knobs applied while validating input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationOptions {
    pub foreign_members: ForeignMembers,
    pub multipolygon_validity: ValidityMode,
}

impl ValidationOptions {
    /// Reject foreign members and check MultiPolygon rings
    pub fn strict() -> Self {
        Self {
            foreign_members: ForeignMembers::Reject,
            multipolygon_validity: ValidityMode::Strict,
        }
    }
}

/// Construction of a validated geometry from decoded JSON
pub trait FromGeoJson: Sized {
    /// Validate `value` and build the geometry, or report every violation found
    fn from_value_with(value: &Value, options: &ValidationOptions) -> Result<Self, ShapeError>;

    fn from_value(value: &Value) -> Result<Self, ShapeError> {
        Self::from_value_with(value, &ValidationOptions::default())
    }

    /// Parse JSON text and build the geometry
    fn from_json_str(json: &str) -> crate::Result<Self> {
        Self::from_json_str_with(json, &ValidationOptions::default())
    }

    fn from_json_str_with(json: &str, options: &ValidationOptions) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value_with(&value, options)?)
    }
}

/// Accumulates violations while walking an input value
pub(crate) struct Validator {
    options: ValidationOptions,
    violations: Vec<Violation>,
}

impl Validator {
    pub(crate) fn new(options: ValidationOptions) -> Self {
        Self { options, violations: Vec::new() }
    }

    /// Turn the walk result into the construction result
    pub(crate) fn finish<T>(self, type_name: &str, value: Option<T>) -> Result<T, ShapeError> {
        match value {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => {
                tracing::debug!(
                    geometry = type_name,
                    violations = self.violations.len(),
                    "Rejected geometry"
                );
                Err(ShapeError::new(self.violations))
            }
        }
    }

    fn report(&mut self, location: Location, kind: ViolationKind) {
        self.violations.push(Violation::new(location, kind));
    }

    fn checkpoint(&self) -> usize {
        self.violations.len()
    }

    fn clean_since(&self, checkpoint: usize) -> bool {
        self.violations.len() == checkpoint
    }

    // JSON shape

    fn object<'v>(
        &mut self,
        value: &'v Value,
        location: &Location,
    ) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.report(location.clone(), ViolationKind::NotAnObject);
        }
        object
    }

    fn member<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        name: &'static str,
        location: &Location,
    ) -> Option<&'v Value> {
        let value = object.get(name);
        if value.is_none() {
            self.report(location.member(name), ViolationKind::MissingMember { name });
        }
        value
    }

    fn foreign_members(
        &mut self,
        object: &Map<String, Value>,
        known: &[&str],
        location: &Location,
    ) {
        for name in object.keys().filter(|name| !known.contains(&name.as_str())) {
            match self.options.foreign_members {
                ForeignMembers::Ignore => {
                    tracing::trace!(
                        member = %name,
                        location = %location,
                        "Ignoring foreign member"
                    );
                }
                ForeignMembers::Reject => self.report(
                    location.member(name),
                    ViolationKind::ForeignMember { name: name.clone() },
                ),
            }
        }
    }

    fn tag(&mut self, object: &Map<String, Value>, expected: &'static str, location: &Location) {
        match self.member(object, "type", location) {
            None => {}
            Some(Value::String(found)) if found == expected => {}
            Some(Value::String(found)) => self.report(
                location.member("type"),
                ViolationKind::WrongTag { expected, found: found.clone() },
            ),
            Some(_) => self.report(location.member("type"), ViolationKind::NotAString),
        }
    }

    fn array<'v>(&mut self, value: &'v Value, location: &Location) -> Option<&'v Vec<Value>> {
        let array = value.as_array();
        if array.is_none() {
            self.report(location.clone(), ViolationKind::NotAnArray);
        }
        array
    }

    /// Validate every element of an array, continuing past failures so that all of them
    /// are reported
    fn sequence<T>(
        &mut self,
        value: &Value,
        location: &Location,
        mut element: impl FnMut(&mut Self, &Value, &Location) -> Option<T>,
    ) -> Option<Vec<T>> {
        let items = self.array(value, location)?;
        let mut elements = Vec::with_capacity(items.len());
        let mut complete = true;
        for (index, item) in items.iter().enumerate() {
            match element(self, item, &location.index(index)) {
                Some(validated) => elements.push(validated),
                None => complete = false,
            }
        }
        complete.then_some(elements)
    }

    fn number(&mut self, value: &Value, location: &Location) -> Option<Number> {
        let number = value.as_number().and_then(Number::from_json);
        if number.is_none() {
            self.report(location.clone(), ViolationKind::NotANumber);
        }
        number
    }

    fn position(&mut self, value: &Value, location: &Location) -> Option<Position> {
        let items = self.array(value, location)?;
        if !(2..=3).contains(&items.len()) {
            self.report(location.clone(), ViolationKind::WrongArity { found: items.len() });
            return None;
        }
        let numbers = self.sequence(value, location, Self::number)?;
        Position::try_from(numbers).ok()
    }

    fn positions(&mut self, value: &Value, location: &Location) -> Option<Vec<Position>> {
        self.sequence(value, location, Self::position)
    }

    fn rings(&mut self, value: &Value, location: &Location) -> Option<Vec<Vec<Position>>> {
        self.sequence(value, location, Self::positions)
    }

    fn polygons(
        &mut self,
        value: &Value,
        location: &Location,
    ) -> Option<Vec<Vec<Vec<Position>>>> {
        self.sequence(value, location, Self::rings)
    }

    fn bbox(&mut self, value: &Value, location: &Location) -> Option<BoundingBox> {
        let values = self.sequence(value, location, Self::number)?;
        let found = values.len();
        let bbox = BoundingBox::new(values).ok();
        if bbox.is_none() {
            self.report(location.clone(), ViolationKind::BboxLength { found });
        }
        bbox
    }

    /// Check the envelope of a geometry object and return its payload member and bbox
    fn envelope<'v>(
        &mut self,
        value: &'v Value,
        expected: &'static str,
        payload: &'static str,
        location: &Location,
    ) -> Option<(&'v Value, Option<BoundingBox>)> {
        let object = self.object(value, location)?;
        self.tag(object, expected, location);
        self.foreign_members(object, &["type", payload, "bbox"], location);
        let bbox = object.get("bbox").and_then(|bbox| self.bbox(bbox, &location.member("bbox")));
        let payload = self.member(object, payload, location)?;
        Some((payload, bbox))
    }

    // Semantic checks

    pub(crate) fn check_line_string(&mut self, positions: &[Position], location: &Location) {
        if positions.len() < MIN_LINE_STRING_POSITIONS {
            self.report(
                location.clone(),
                ViolationKind::InsufficientPoints {
                    min: MIN_LINE_STRING_POSITIONS,
                    found: positions.len(),
                },
            );
        }
    }

    /// Length checks for every ring, then closure checks for every ring
    pub(crate) fn check_rings(&mut self, rings: &[Vec<Position>], location: &Location) {
        for (index, ring) in rings.iter().enumerate() {
            if ring.len() < MIN_RING_POSITIONS {
                self.report(
                    location.index(index),
                    ViolationKind::RingTooShort { found: ring.len() },
                );
            }
        }
        for (index, ring) in rings.iter().enumerate() {
            if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
                if first != last {
                    self.report(location.index(index), ViolationKind::RingNotClosed);
                }
            }
        }
    }

    pub(crate) fn check_polygons(&mut self, polygons: &[Vec<Vec<Position>>], location: &Location) {
        if self.options.multipolygon_validity == ValidityMode::Strict {
            for (index, rings) in polygons.iter().enumerate() {
                self.check_rings(rings, &location.index(index));
            }
        }
    }

    // Geometries

    pub(crate) fn point(&mut self, value: &Value, location: &Location) -> Option<Point> {
        let payload = location.member("coordinates");
        let (coordinates, bbox) = self.envelope(value, Point::TYPE, "coordinates", location)?;
        let position = self.position(coordinates, &payload)?;
        Some(Point::new(position).with_optional_bbox(bbox))
    }

    pub(crate) fn multi_point(&mut self, value: &Value, location: &Location) -> Option<MultiPoint> {
        let payload = location.member("coordinates");
        let (coordinates, bbox) =
            self.envelope(value, MultiPoint::TYPE, "coordinates", location)?;
        let positions = self.positions(coordinates, &payload)?;
        Some(MultiPoint::new(positions).with_optional_bbox(bbox))
    }

    pub(crate) fn line_string(&mut self, value: &Value, location: &Location) -> Option<LineString> {
        let start = self.checkpoint();
        let payload = location.member("coordinates");
        let (coordinates, bbox) =
            self.envelope(value, LineString::TYPE, "coordinates", location)?;
        let positions = self.positions(coordinates, &payload)?;
        self.check_line_string(&positions, &payload);
        self.clean_since(start)
            .then(|| LineString::from_validated(positions).with_optional_bbox(bbox))
    }

    pub(crate) fn multi_line_string(
        &mut self,
        value: &Value,
        location: &Location,
    ) -> Option<MultiLineString> {
        let payload = location.member("coordinates");
        let (coordinates, bbox) =
            self.envelope(value, MultiLineString::TYPE, "coordinates", location)?;
        let lines = self.rings(coordinates, &payload)?;
        Some(MultiLineString::new(lines).with_optional_bbox(bbox))
    }

    pub(crate) fn polygon(&mut self, value: &Value, location: &Location) -> Option<Polygon> {
        let start = self.checkpoint();
        let payload = location.member("coordinates");
        let (coordinates, bbox) = self.envelope(value, Polygon::TYPE, "coordinates", location)?;
        let rings = self.rings(coordinates, &payload)?;
        self.check_rings(&rings, &payload);
        self.clean_since(start).then(|| Polygon::from_validated(rings).with_optional_bbox(bbox))
    }

    pub(crate) fn multi_polygon(
        &mut self,
        value: &Value,
        location: &Location,
    ) -> Option<MultiPolygon> {
        let start = self.checkpoint();
        let payload = location.member("coordinates");
        let (coordinates, bbox) =
            self.envelope(value, MultiPolygon::TYPE, "coordinates", location)?;
        let polygons = self.polygons(coordinates, &payload)?;
        self.check_polygons(&polygons, &payload);
        self.clean_since(start)
            .then(|| MultiPolygon::from_validated(polygons).with_optional_bbox(bbox))
    }

    /// Dispatch on the element's own `type` member to one of the six variants
    pub(crate) fn geometry(&mut self, value: &Value, location: &Location) -> Option<Geometry> {
        let object = self.object(value, location)?;
        let tag = match self.member(object, "type", location)? {
            Value::String(tag) => tag,
            _ => {
                self.report(location.member("type"), ViolationKind::NotAString);
                return None;
            }
        };
        match GeometryType::from_name(tag) {
            Some(GeometryType::Point) => self.point(value, location).map(Geometry::Point),
            Some(GeometryType::MultiPoint) => {
                self.multi_point(value, location).map(Geometry::MultiPoint)
            }
            Some(GeometryType::LineString) => {
                self.line_string(value, location).map(Geometry::LineString)
            }
            Some(GeometryType::MultiLineString) => {
                self.multi_line_string(value, location).map(Geometry::MultiLineString)
            }
            Some(GeometryType::Polygon) => self.polygon(value, location).map(Geometry::Polygon),
            Some(GeometryType::MultiPolygon) => {
                self.multi_polygon(value, location).map(Geometry::MultiPolygon)
            }
            Some(GeometryType::GeometryCollection) | None => {
                self.report(
                    location.member("type"),
                    ViolationKind::UnknownGeometryType { found: tag.clone() },
                );
                None
            }
        }
    }

    pub(crate) fn geometry_collection(
        &mut self,
        value: &Value,
        location: &Location,
    ) -> Option<GeometryCollection> {
        let payload = location.member("geometries");
        let (members, bbox) =
            self.envelope(value, GeometryCollection::TYPE, "geometries", location)?;
        let geometries = self.sequence(members, &payload, Self::geometry)?;
        Some(GeometryCollection::new(geometries).with_optional_bbox(bbox))
    }
}
