//! A complete conversion run: load the input collection, normalize every feature, merge the
//! new names into the index and write all outputs.
//!
//! Every check happens before anything is written. Shape files are written first and the
//! index last, so a failed write never leaves the index pointing at missing files. Each
//! file is replaced in one rename, but the set of shape files is not: a crash halfway can
//! leave some of them on disk without an index entry.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use geojson::{Feature, FeatureCollection};
use indexmap::IndexMap;
use tracing::{info, info_span, warn};

use crate::error::{GeoShardError, Result};
use crate::index::{IndexEntry, ShapeIndex};
use crate::io::geojson::{read_feature_collection_path, write_feature_path};
use crate::normalize::{feature_filename, FeatureNormalizer};

/// Default input property holding the display name of a shape.
pub const DEFAULT_NAME_PROPERTY: &str = "name";

/// Parameters of one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// GeoJSON file with a `FeatureCollection` at its root.
    pub input_file: PathBuf,
    /// Directory receiving one file per shape.
    pub output_dir: PathBuf,
    /// Existing index file to merge into.
    pub index_file: PathBuf,
    /// Prefix recorded in front of every filename in the index, independent of
    /// `output_dir`.
    pub outputs_prefix: String,
    /// Input property used as the shape name.
    pub name_property: String,
    /// Type stamped onto every shape.
    pub type_name: String,
}

impl ConvertOptions {
    pub fn new(
        input_file: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        index_file: impl Into<PathBuf>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            input_file: input_file.into(),
            output_dir: output_dir.into(),
            index_file: index_file.into(),
            outputs_prefix: String::new(),
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
            type_name: type_name.into(),
        }
    }

    pub fn with_outputs_prefix(self, outputs_prefix: impl Into<String>) -> Self {
        Self {
            outputs_prefix: outputs_prefix.into(),
            ..self
        }
    }

    pub fn with_name_property(self, name_property: impl Into<String>) -> Self {
        Self {
            name_property: name_property.into(),
            ..self
        }
    }
}

/// A normalized feature and the file it will be written to.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedShape {
    pub filename: String,
    pub feature: Feature,
}

/// Everything produced from one input collection, before any output is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedShapes {
    /// New index entries in input order.
    pub index: IndexMap<String, IndexEntry>,
    pub shapes: Vec<ProcessedShape>,
}

/// What a successful run wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSummary {
    pub shapes_written: usize,
    pub index_entries: usize,
}

/// Normalize every feature of `collection`.
///
/// # Errors
///
/// Fails on the first feature without a usable name or measurable geometry, on the first
/// name seen twice ([`GeoShardError::DuplicateNameInBatch`]), on a name that is not a
/// plain filename ([`GeoShardError::InvalidShapeName`]) and on two names sharing an
/// output filename ([`GeoShardError::FilenameCollision`]).
pub fn process_features(
    collection: FeatureCollection,
    normalizer: &FeatureNormalizer,
    outputs_prefix: &str,
) -> Result<ProcessedShapes> {
    let mut processed = ProcessedShapes::default();
    let mut filenames: HashMap<String, String> = HashMap::new();

    for (position, mut feature) in collection.features.into_iter().enumerate() {
        let name = normalizer.shape_name(position, &feature)?;
        if processed.index.contains_key(&name) {
            return Err(GeoShardError::DuplicateNameInBatch { name });
        }

        let filename = feature_filename(&name);
        if !is_plain_filename(&filename) {
            return Err(GeoShardError::InvalidShapeName { name });
        }
        if let Some(other) = filenames.get(&filename) {
            return Err(GeoShardError::FilenameCollision {
                name,
                other: other.clone(),
                filename,
            });
        }

        let properties = normalizer.apply(name, &mut feature)?;
        filenames.insert(filename.clone(), properties.name.clone());
        processed
            .index
            .insert(properties.name, IndexEntry::new(outputs_prefix, &filename));
        processed.shapes.push(ProcessedShape { filename, feature });
    }

    Ok(processed)
}

/// Whether `filename` names an entry directly inside a directory.
fn is_plain_filename(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Merge `processed` into the index at `index_file` and write every shape into `out_dir`.
///
/// The index is validated before any file is touched and rewritten last. Returns the
/// committed index.
pub fn write_processed(
    processed: ProcessedShapes,
    index_file: &Path,
    out_dir: &Path,
) -> Result<ShapeIndex> {
    let merge = ShapeIndex::read(index_file)?.validate(processed.index)?;

    fs::create_dir_all(out_dir).map_err(GeoShardError::io_at(out_dir))?;
    for shape in &processed.shapes {
        write_feature_path(&shape.feature, &out_dir.join(&shape.filename))?;
    }
    info!(
        count = processed.shapes.len(),
        dir = %out_dir.display(),
        "wrote shape files"
    );

    merge.commit(index_file)
}

/// Run a whole conversion.
pub fn convert(options: &ConvertOptions) -> Result<ConvertSummary> {
    let span = info_span!("convert", input = %options.input_file.display());
    let _guard = span.enter();

    let collection = read_feature_collection_path(&options.input_file)?;
    info!(features = collection.features.len(), "loaded feature collection");
    if collection.features.is_empty() {
        warn!("input contains no features");
    }

    let normalizer = FeatureNormalizer::new(&options.name_property, &options.type_name);
    let processed = process_features(collection, &normalizer, &options.outputs_prefix)?;
    let shapes_written = processed.shapes.len();

    let index = write_processed(processed, &options.index_file, &options.output_dir)?;
    Ok(ConvertSummary {
        shapes_written,
        index_entries: index.len(),
    })
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::test::{feature, polygon};

    fn normalizer() -> FeatureNormalizer {
        FeatureNormalizer::new("name", "island")
    }

    #[test]
    fn ross_island_round_trip() {
        let collection = feature::collection(vec![feature::ross_island()]);
        let processed = process_features(collection, &normalizer(), "islands").unwrap();

        assert_eq!(processed.shapes.len(), 1);
        assert_eq!(processed.shapes[0].filename, "Ross_Island.json");
        assert_eq!(
            processed.index["Ross Island"].relative_path,
            "islands/Ross_Island.json"
        );
    }

    #[test]
    fn duplicate_name_in_batch() {
        let collection = feature::collection(vec![
            feature::named("name", "Foo", polygon::rectangle(0., 0., 1., 1.)),
            feature::named("name", "Foo", polygon::rectangle(2., 2., 3., 3.)),
        ]);
        let err = process_features(collection, &normalizer(), "").unwrap_err();
        assert!(matches!(err, GeoShardError::DuplicateNameInBatch { name } if name == "Foo"));
    }

    #[test]
    fn names_sharing_a_filename() {
        let collection = feature::collection(vec![
            feature::named("name", "Foo Bar", polygon::rectangle(0., 0., 1., 1.)),
            feature::named("name", "Foo_Bar", polygon::rectangle(2., 2., 3., 3.)),
        ]);
        let err = process_features(collection, &normalizer(), "").unwrap_err();
        assert!(matches!(
            err,
            GeoShardError::FilenameCollision { ref filename, .. } if filename == "Foo_Bar.json"
        ));
    }

    #[test]
    fn names_that_are_paths_write_nothing() {
        for bad_name in ["../escaped", "a/b"] {
            let dir = tempfile::tempdir().unwrap();
            let index_file = dir.path().join("index.json");
            fs::write(&index_file, "{}").unwrap();
            let options = ConvertOptions::new(
                dir.path().join("input.geojson"),
                dir.path().join("shapes"),
                &index_file,
                "island",
            );

            let collection = feature::collection(vec![
                feature::named("name", "Ok", polygon::rectangle(0., 0., 1., 1.)),
                feature::named("name", bad_name, polygon::rectangle(2., 2., 3., 3.)),
            ]);
            fs::write(&options.input_file, serde_json::to_vec(&collection).unwrap()).unwrap();

            let err = convert(&options).unwrap_err();
            assert!(
                matches!(err, GeoShardError::InvalidShapeName { ref name } if name == bad_name),
                "{err}"
            );
            assert!(!options.output_dir.exists());
            assert!(!dir.path().join("escaped.json").exists());
            assert_eq!(fs::read_to_string(&index_file).unwrap(), "{}");
        }
    }

    #[test]
    fn plain_filenames() {
        assert!(is_plain_filename("Ross_Island.json"));
        assert!(is_plain_filename("...json"));
        assert!(!is_plain_filename("../escaped.json"));
        assert!(!is_plain_filename("a/b.json"));
        assert!(!is_plain_filename("/abs.json"));
    }

    #[test]
    fn collision_with_index_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let index_file = dir.path().join("index.json");
        let original = r#"{"Ross Island":{"relative_path":"old/Ross_Island.json"}}"#;
        fs::write(&index_file, original).unwrap();
        let out_dir = dir.path().join("shapes");

        let collection = feature::collection(vec![
            feature::named("name", "Anvers Island", polygon::rectangle(-64.6, -64.8, -63., -64.)),
            feature::ross_island(),
        ]);
        let processed = process_features(collection, &normalizer(), "").unwrap();
        let err = write_processed(processed, &index_file, &out_dir).unwrap_err();

        assert!(matches!(err, GeoShardError::DuplicateNameInIndex { name } if name == "Ross Island"));
        assert_eq!(fs::read_to_string(&index_file).unwrap(), original);
        assert!(!out_dir.exists());
    }

    #[test]
    fn writes_shapes_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let index_file = dir.path().join("index.json");
        fs::write(&index_file, "{}").unwrap();
        let out_dir = dir.path().join("shapes");

        let collection = feature::collection(vec![feature::ross_island()]);
        let processed = process_features(collection, &normalizer(), "islands").unwrap();
        let index = write_processed(processed, &index_file, &out_dir).unwrap();

        assert_eq!(index.len(), 1);
        let shape: serde_json::Value =
            serde_json::from_slice(&fs::read(out_dir.join("Ross_Island.json")).unwrap()).unwrap();
        assert_eq!(shape["bbox"], serde_json::json!([166., -77.8, 169.5, -77.]));
        assert_eq!(shape["properties"]["type"], "island");
        assert_eq!(shape["geometry"]["type"], "Polygon");
    }
}
