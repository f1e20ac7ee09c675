//! Geometry algorithms on GeoJSON coordinates.

/// Calculate the geodesic area of polygonal geometries.
pub mod area;
pub use area::{geodesic_area, polygon_area, ring_area};

/// Calculate the bounding box of a geometry.
pub mod bounding_rect;
pub use bounding_rect::{bounding_rect, BoundingRect};

/// Flatten nested coordinate arrays into scalar values.
pub mod flatten;
pub use flatten::FlatCoords;
