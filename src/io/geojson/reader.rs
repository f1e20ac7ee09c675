use geojson::{FeatureCollection, GeoJson};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{GeoShardError, Result};

/// Read a GeoJSON document whose root must be a `FeatureCollection`.
pub fn read_feature_collection<R: Read>(reader: R) -> Result<FeatureCollection> {
    let geojson: GeoJson = serde_json::from_reader(reader)?;
    into_feature_collection(geojson)
}

/// Read a `FeatureCollection` from the file at `path`.
pub fn read_feature_collection_path(path: &Path) -> Result<FeatureCollection> {
    let file = File::open(path).map_err(GeoShardError::io_at(path))?;
    let geojson: GeoJson =
        serde_json::from_reader(BufReader::new(file)).map_err(GeoShardError::parse_at(path))?;
    into_feature_collection(geojson)
}

fn into_feature_collection(geojson: GeoJson) -> Result<FeatureCollection> {
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(GeoShardError::InvalidRootType { found: "Feature" }),
        GeoJson::Geometry(_) => Err(GeoShardError::InvalidRootType { found: "Geometry" }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_collection() {
        let input = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "Ross Island"},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}
            }]
        }"#;
        let collection = read_feature_collection(input.as_bytes()).unwrap();
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn rejects_other_roots() {
        let feature = r#"{"type": "Feature", "properties": null, "geometry": null}"#;
        let err = read_feature_collection(feature.as_bytes()).unwrap_err();
        assert!(matches!(err, GeoShardError::InvalidRootType { found: "Feature" }));
        assert_eq!(
            err.to_string(),
            "Input file should contain FeatureCollection at its root but it contains Feature"
        );

        let point = r#"{"type": "Point", "coordinates": [1, 2]}"#;
        assert!(matches!(
            read_feature_collection(point.as_bytes()),
            Err(GeoShardError::InvalidRootType { found: "Geometry" })
        ));
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_feature_collection_path(Path::new("/nonexistent/shapes.geojson"))
            .unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/shapes.geojson"));
    }
}
