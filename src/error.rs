//! Defines [`GeoShardError`], representing all errors returned by this crate.

use std::borrow::Cow;
use std::fmt::Debug;
use std::path::PathBuf;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoShardError {
    /// The input document's root is not a `FeatureCollection`.
    #[error("Input file should contain FeatureCollection at its root but it contains {found}")]
    InvalidRootType { found: &'static str },

    /// A feature lacks the configured name property.
    #[error("Feature at position {position} has no {property:?} property")]
    MissingNameProperty { property: String, position: usize },

    /// The configured name property exists but does not hold a string.
    #[error("Feature at position {position} has a non-string {property:?} property")]
    InvalidNameProperty { property: String, position: usize },

    /// Two features of the same input share a name.
    #[error("Shape of name {name:?} appears multiple times in the input file")]
    DuplicateNameInBatch { name: String },

    /// Two distinct names of the same input map to the same output filename.
    #[error("Shapes {name:?} and {other:?} would both be written to {filename}")]
    FilenameCollision {
        name: String,
        other: String,
        filename: String,
    },

    /// A name whose output filename is not a single plain path component.
    #[error("Shape name {name:?} cannot be used as a filename")]
    InvalidShapeName { name: String },

    /// A name of the batch is already recorded in the persisted index.
    #[error("Shape of name {name:?} already exists in the index")]
    DuplicateNameInIndex { name: String },

    /// Geometry cannot be reduced to a bounding box or an area.
    #[error("Malformed geometry{}: {reason}", describe_shape(.shape))]
    MalformedGeometry {
        shape: Option<String>,
        reason: Cow<'static, str>,
    },

    /// Area is only defined here for `Polygon` and `MultiPolygon`.
    #[error("Unsupported geometry type {geometry_type}{}", describe_shape(.shape))]
    UnsupportedGeometryType {
        shape: Option<String>,
        geometry_type: &'static str,
    },

    /// I/O failure on a known file.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A JSON document on disk could not be parsed.
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, GeoShardError>;

impl GeoShardError {
    pub(crate) fn malformed(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedGeometry {
            shape: None,
            reason: reason.into(),
        }
    }

    /// Attach the shape name to a geometry error raised below the normalizer.
    pub(crate) fn in_shape(self, name: &str) -> Self {
        match self {
            Self::MalformedGeometry { shape: None, reason } => Self::MalformedGeometry {
                shape: Some(name.to_string()),
                reason,
            },
            Self::UnsupportedGeometryType {
                shape: None,
                geometry_type,
            } => Self::UnsupportedGeometryType {
                shape: Some(name.to_string()),
                geometry_type,
            },
            other => other,
        }
    }

    pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn parse_at(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> Self {
        let path = path.into();
        move |source| Self::Parse { path, source }
    }
}

fn describe_shape(shape: &Option<String>) -> String {
    match shape {
        Some(name) => format!(" in shape {name:?}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn in_shape_names_geometry_errors() {
        let err = GeoShardError::malformed("no coordinates").in_shape("Ross Island");
        assert_eq!(
            err.to_string(),
            "Malformed geometry in shape \"Ross Island\": no coordinates"
        );

        let err = GeoShardError::UnsupportedGeometryType {
            shape: None,
            geometry_type: "LineString",
        };
        assert_eq!(err.to_string(), "Unsupported geometry type LineString");
    }

    #[test]
    fn in_shape_leaves_other_errors_alone() {
        let err = GeoShardError::DuplicateNameInBatch {
            name: "Foo".to_string(),
        }
        .in_shape("Bar");
        assert!(matches!(err, GeoShardError::DuplicateNameInBatch { name } if name == "Foo"));
    }
}
