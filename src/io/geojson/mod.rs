//! Read from and write to [GeoJSON](https://geojson.org/) files.

pub use reader::{read_feature_collection, read_feature_collection_path};
pub use writer::{write_feature, write_feature_path};

mod reader;
mod writer;
