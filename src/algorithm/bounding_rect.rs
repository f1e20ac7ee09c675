use geojson::{Bbox, Geometry, Position, Value};
use serde_json::Value as JsonValue;

use crate::algorithm::flatten::FlatCoords;
use crate::error::{GeoShardError, Result};

/// An axis-aligned bounding box.
///
/// Converts into a GeoJSON [`Bbox`] in `[min_x, min_y, max_x, max_y]` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRect {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl BoundingRect {
    /// New, empty bounding box that any coordinate will expand.
    pub fn new() -> Self {
        BoundingRect {
            minx: f64::INFINITY,
            miny: f64::INFINITY,
            maxx: -f64::INFINITY,
            maxy: -f64::INFINITY,
        }
    }

    /// Whether no coordinate has been added yet.
    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx || self.miny > self.maxy
    }

    fn update_x(&mut self, x: f64) {
        if x < self.minx {
            self.minx = x;
        }
        if x > self.maxx {
            self.maxx = x;
        }
    }

    fn update_y(&mut self, y: f64) {
        if y < self.miny {
            self.miny = y;
        }
        if y > self.maxy {
            self.maxy = y;
        }
    }
}

impl Default for BoundingRect {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BoundingRect> for Bbox {
    fn from(value: BoundingRect) -> Self {
        vec![value.minx, value.miny, value.maxx, value.maxy]
    }
}

/// Compute the bounding box of a geometry from its flattened coordinates.
///
/// The flattened sequence is split by position: even indices are x values and odd indices
/// are y values. This only holds for 2D positions, so any position with another number of
/// components is rejected up front.
///
/// # Errors
///
/// [`GeoShardError::MalformedGeometry`] when a position is not 2D or the geometry holds no
/// coordinates at all.
pub fn bounding_rect(geometry: &Geometry) -> Result<BoundingRect> {
    ensure_2d(&geometry.value)?;
    let coords = coordinates(&geometry.value)?;
    let flat = FlatCoords::new(&coords);

    let mut rect = BoundingRect::new();
    flat.clone().step_by(2).for_each(|x| rect.update_x(x));
    flat.skip(1).step_by(2).for_each(|y| rect.update_y(y));

    if rect.is_empty() {
        return Err(GeoShardError::malformed("geometry has no coordinates"));
    }
    Ok(rect)
}

/// The nested coordinate arrays of a geometry as raw JSON.
///
/// A `GeometryCollection` becomes an array of its members' coordinates.
pub(crate) fn coordinates(value: &Value) -> Result<JsonValue> {
    Ok(match value {
        Value::Point(position) => serde_json::to_value(position)?,
        Value::MultiPoint(positions) | Value::LineString(positions) => {
            serde_json::to_value(positions)?
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => serde_json::to_value(lines)?,
        Value::MultiPolygon(polygons) => serde_json::to_value(polygons)?,
        Value::GeometryCollection(geometries) => JsonValue::Array(
            geometries
                .iter()
                .map(|geometry| coordinates(&geometry.value))
                .collect::<Result<_>>()?,
        ),
    })
}

fn ensure_2d(value: &Value) -> Result<()> {
    let is_2d = |position: &Position| position.len() == 2;
    let all_2d = match value {
        Value::Point(position) => is_2d(position),
        Value::MultiPoint(positions) | Value::LineString(positions) => positions.iter().all(is_2d),
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter().flatten().all(is_2d)
        }
        Value::MultiPolygon(polygons) => polygons.iter().flatten().flatten().all(is_2d),
        Value::GeometryCollection(geometries) => {
            return geometries
                .iter()
                .try_for_each(|geometry| ensure_2d(&geometry.value));
        }
    };

    if all_2d {
        Ok(())
    } else {
        Err(GeoShardError::malformed(
            "coordinates must have exactly two components",
        ))
    }
}
