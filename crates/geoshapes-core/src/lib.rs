//! geoshapes core - validated GeoJSON geometry models
//!
//! This crate contains strongly-typed GeoJSON (RFC 7946) geometry objects that are
//! validated once at construction and immutable afterwards.

pub mod config;
pub mod error;
pub mod geo_interface;
pub mod models;
pub mod validation;

pub use error::{GeoshapesError, Location, Result, ShapeError, Violation, ViolationKind};
pub use geo_interface::GeoInterface;
pub use models::{
    BoundingBox, Geometry, GeometryCollection, GeometryType, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Number, Point, Polygon, Position,
};
pub use validation::{FromGeoJson, ForeignMembers, ValidationOptions, ValidityMode};
