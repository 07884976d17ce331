//! Heterogeneous geometry collections (RFC 7946 §3.1.8)

use serde::de;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{BoundingBox, Geometry};
use crate::error::{Location, ShapeError};
use crate::geo_interface::{tagged_mapping, GeoInterface};
use crate::validation::{FromGeoJson, ValidationOptions, Validator};

/// A heterogeneous list of geometries
///
/// Members are any of the six coordinate-carrying variants; collections do not nest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryCollection {
    geometries: Vec<Geometry>,
    bbox: Option<BoundingBox>,
}

impl GeometryCollection {
    /// Value of the `type` member
    pub const TYPE: &'static str = "GeometryCollection";

    pub fn new(geometries: Vec<Geometry>) -> Self {
        Self { geometries, bbox: None }
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn into_geometries(self) -> Vec<Geometry> {
        self.geometries
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Geometry> {
        self.geometries.iter()
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn with_bbox(self, bbox: BoundingBox) -> Self {
        self.with_optional_bbox(Some(bbox))
    }

    pub(crate) fn with_optional_bbox(mut self, bbox: Option<BoundingBox>) -> Self {
        self.bbox = bbox;
        self
    }
}

impl FromIterator<Geometry> for GeometryCollection {
    fn from_iter<I: IntoIterator<Item = Geometry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a GeometryCollection {
    type Item = &'a Geometry;
    type IntoIter = std::slice::Iter<'a, Geometry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromGeoJson for GeometryCollection {
    fn from_value_with(value: &Value, options: &ValidationOptions) -> Result<Self, ShapeError> {
        let mut validator = Validator::new(*options);
        let collection = validator.geometry_collection(value, &Location::root());
        validator.finish(Self::TYPE, collection)
    }
}

impl GeoInterface for GeometryCollection {
    fn geo_interface(&self) -> Map<String, Value> {
        let geometries = self.geometries.iter().map(GeoInterface::to_value).collect();
        tagged_mapping(Self::TYPE, "geometries", Value::Array(geometries), self.bbox.as_ref())
    }
}

impl Serialize for GeometryCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.bbox.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct(Self::TYPE, len)?;
        state.serialize_field("type", Self::TYPE)?;
        state.serialize_field("geometries", &self.geometries)?;
        if let Some(bbox) = &self.bbox {
            state.serialize_field("bbox", bbox)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for GeometryCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}
