//! Split a GeoJSON `FeatureCollection` into one file per named shape, plus a shared index
//! mapping every shape name to its file.
//!
//! Each shape is normalized on the way: it gets a `bbox`, and its properties are replaced
//! by its name, its geodesic area and a fixed type tag. Names must be unique within one
//! input and across every run recorded in the index.
//!
//! ```no_run
//! use geoshard::pipeline::{convert, ConvertOptions};
//!
//! let options = ConvertOptions::new("islands.geojson", "out", "index.json", "island")
//!     .with_outputs_prefix("islands");
//! let summary = convert(&options)?;
//! println!("wrote {} shapes", summary.shapes_written);
//! # Ok::<(), geoshard::error::GeoShardError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use error::{GeoShardError, Result};

pub mod algorithm;
pub mod error;
pub mod index;
pub mod io;
pub mod normalize;
pub mod pipeline;
