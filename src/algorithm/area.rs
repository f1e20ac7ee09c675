use geo::{ChamberlainDuquetteArea, Coord, LineString, Polygon};
use geojson::{Geometry, Position, PolygonType, Value};

use crate::error::{GeoShardError, Result};

/// Approximate geodesic area of a single ring, always non-negative.
///
/// Uses the spherical algorithm of Chamberlain and Duquette on a sphere with the WGS84
/// equatorial radius. The ring is closed implicitly if its last position differs from the
/// first.
///
/// # Units
///
/// - return value: meters²
pub fn ring_area(ring: &[Position]) -> Result<f64> {
    let exterior = ring
        .iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(GeoShardError::malformed("position with fewer than two components")),
        })
        .collect::<Result<LineString>>()?;
    Ok(Polygon::new(exterior, vec![]).chamberlain_duquette_unsigned_area())
}

/// Geodesic area of one polygon given as its rings.
///
/// The first ring counts positively and every following ring (a hole) negatively,
/// regardless of winding order. A polygon without rings has zero area.
pub fn polygon_area(rings: &[Vec<Position>]) -> Result<f64> {
    let Some((exterior, interiors)) = rings.split_first() else {
        return Ok(0.);
    };
    interiors
        .iter()
        .try_fold(ring_area(exterior)?, |total, hole| -> Result<f64> {
            Ok(total - ring_area(hole)?)
        })
}

/// Geodesic area of a `Polygon` or `MultiPolygon` geometry.
///
/// The area of a `MultiPolygon` is the sum of the areas of its polygons.
///
/// # Examples
///
/// ```
/// use geojson::{Geometry, Value};
/// use geoshard::algorithm::geodesic_area;
///
/// // The O2 in London
/// let polygon = Geometry::new(Value::Polygon(vec![vec![
///     vec![0.00388383, 51.501574],
///     vec![0.00538587, 51.502278],
///     vec![0.00553607, 51.503299],
///     vec![0.00467777, 51.504181],
///     vec![0.00327229, 51.504435],
///     vec![0.00187754, 51.504168],
///     vec![0.00087976, 51.503380],
///     vec![0.00107288, 51.502324],
///     vec![0.00185608, 51.501770],
///     vec![0.00388383, 51.501574],
/// ]]));
///
/// // 78,478 meters²
/// assert_eq!(78_478., geodesic_area(&polygon).unwrap().round());
/// ```
///
/// # Errors
///
/// [`GeoShardError::UnsupportedGeometryType`] for any other geometry type.
pub fn geodesic_area(geometry: &Geometry) -> Result<f64> {
    match &geometry.value {
        Value::Polygon(rings) => polygon_area(rings),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .try_fold(0., |total, rings: &PolygonType| -> Result<f64> {
                Ok(total + polygon_area(rings)?)
            }),
        other => Err(GeoShardError::UnsupportedGeometryType {
            shape: None,
            geometry_type: geometry_type_name(other),
        }),
    }
}

pub(crate) fn geometry_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
