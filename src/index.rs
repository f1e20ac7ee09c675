//! The persistent index mapping every shape name to the location of its file.
//!
//! The index is a single JSON object shared by all conversion runs:
//!
//! ```json
//! {"Ross Island": {"relative_path": "islands/Ross_Island.json"}}
//! ```
//!
//! Runs only ever add names. A merge is split into two steps: [`ShapeIndex::validate`]
//! checks the whole batch against the current contents and computes the union in memory,
//! and [`ValidatedMerge::commit`] persists that union. Nothing is written when any name of
//! the batch is already present.
//!
//! No locking is performed. Callers must not run two conversions against the same index
//! file concurrently; the last writer would win.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use geojson::JsonObject;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GeoShardError, Result};
use crate::io::replace_file;

/// Where the file of one shape lives, relative to wherever the index is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub relative_path: String,
    /// Members written by other tools, kept as-is.
    #[serde(flatten)]
    extra: JsonObject,
}

impl IndexEntry {
    /// Entry for `filename` under `outputs_prefix`.
    ///
    /// The path is joined with `/`: an empty prefix yields the bare filename and a prefix
    /// already ending in `/` is not doubled.
    ///
    /// ```
    /// use geoshard::index::IndexEntry;
    ///
    /// assert_eq!(IndexEntry::new("", "Chile.json").relative_path, "Chile.json");
    /// assert_eq!(IndexEntry::new("countries", "Chile.json").relative_path, "countries/Chile.json");
    /// assert_eq!(IndexEntry::new("countries/", "Chile.json").relative_path, "countries/Chile.json");
    /// ```
    pub fn new(outputs_prefix: &str, filename: &str) -> Self {
        let relative_path = if outputs_prefix.is_empty() || outputs_prefix.ends_with('/') {
            format!("{outputs_prefix}{filename}")
        } else {
            format!("{outputs_prefix}/{filename}")
        };
        Self {
            relative_path,
            extra: JsonObject::new(),
        }
    }
}

/// Contents of an index file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeIndex {
    entries: IndexMap<String, IndexEntry>,
}

impl ShapeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load the index file at `path`, which must already exist.
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(GeoShardError::io_at(path))?;
        serde_json::from_reader(BufReader::new(file)).map_err(GeoShardError::parse_at(path))
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Replace the index file at `path` with these contents in one rename.
    pub fn write(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_vec(self)?;
        replace_file(path, &contents)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Check every name of `batch` against this index and compute the union.
    ///
    /// Existing entries keep their position and new ones follow in batch order.
    ///
    /// # Errors
    ///
    /// [`GeoShardError::DuplicateNameInIndex`] for the first batch name already present.
    pub fn validate(self, batch: IndexMap<String, IndexEntry>) -> Result<ValidatedMerge> {
        if let Some(name) = batch.keys().find(|name| self.contains(name)) {
            return Err(GeoShardError::DuplicateNameInIndex { name: name.clone() });
        }

        let added = batch.len();
        let mut merged = self;
        merged.entries.extend(batch);
        Ok(ValidatedMerge { merged, added })
    }
}

/// A batch known to be disjoint from the index it was validated against.
#[derive(Debug)]
#[must_use = "a validated merge does nothing until committed"]
pub struct ValidatedMerge {
    merged: ShapeIndex,
    added: usize,
}

impl ValidatedMerge {
    /// The union that [`commit`](Self::commit) will persist.
    pub fn merged(&self) -> &ShapeIndex {
        &self.merged
    }

    /// Number of names the batch adds.
    pub fn added(&self) -> usize {
        self.added
    }

    /// Persist the union to `path`, replacing the previous contents.
    pub fn commit(self, path: &Path) -> Result<ShapeIndex> {
        self.merged.write(path)?;
        info!(
            path = %path.display(),
            added = self.added,
            total = self.merged.len(),
            "committed index"
        );
        Ok(self.merged)
    }
}
