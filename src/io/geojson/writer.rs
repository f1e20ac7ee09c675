use geojson::Feature;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::io::replace_file;

/// Write a single feature as a GeoJSON document.
pub fn write_feature<W: Write>(feature: &Feature, writer: W) -> Result<()> {
    serde_json::to_writer(writer, feature)?;
    Ok(())
}

/// Write a single feature to the file at `path`, replacing any existing file in one
/// rename.
pub fn write_feature_path(feature: &Feature, path: &Path) -> Result<()> {
    let contents = serde_json::to_vec(feature)?;
    replace_file(path, &contents)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::feature;

    #[test]
    fn test_write() {
        let mut output_buffer = Vec::new();
        write_feature(&feature::ross_island(), &mut output_buffer).unwrap();

        let output: serde_json::Value = serde_json::from_slice(&output_buffer).unwrap();
        assert_eq!(output["type"], "Feature");
        assert_eq!(output["properties"]["name"], "Ross Island");
        assert_eq!(output["geometry"]["type"], "Polygon");
    }

    #[test]
    fn replaces_existing_shape_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Ross_Island.json");
        std::fs::write(&path, " ".repeat(4096)).unwrap();

        let ross = feature::ross_island();
        write_feature_path(&ross, &path).unwrap();

        let written: Feature = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, ross);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
