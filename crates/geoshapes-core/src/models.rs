pub mod bbox;
pub mod collection;
pub mod geometry;
pub mod number;
pub mod position;

pub use bbox::BoundingBox;
pub use collection::GeometryCollection;
pub use geometry::{
    Geometry, GeometryType, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
pub use number::Number;
pub use position::{Coordinate, Position};
