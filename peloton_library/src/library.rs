// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The set of tiles available to the editor.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use peloton_core::terrain::TileAsset;
use peloton_svg::{DrawingSource, TileDrawing};

use crate::error::LibraryError;
use crate::manifest::{TileRecord, parse_manifest};

/// Manifest file name inside a tile directory.
pub const MANIFEST_FILE: &str = "tiles.json";

/// A loaded tile: its metadata and its drawing.
#[derive(Clone, Debug)]
pub struct LibraryEntry {
    /// Core metadata, shared with every placement.
    pub asset: Arc<TileAsset>,
    /// Pristine drawing.
    pub drawing: TileDrawing,
    /// Drawing file as named in the manifest.
    pub file: String,
}

/// A manifest entry that was left out of the library.
#[derive(Debug)]
pub struct SkippedTile {
    /// Manifest id.
    pub id: String,
    /// Why it was skipped.
    pub error: LibraryError,
}

/// Tiles in manifest order, addressable by id.
#[derive(Debug, Default)]
pub struct TileLibrary {
    entries: Vec<LibraryEntry>,
    by_id: BTreeMap<String, usize>,
    skipped: Vec<SkippedTile>,
}

impl TileLibrary {
    /// Builds a library from manifest records.
    ///
    /// `load` returns the SVG text for a record. Records whose text cannot be
    /// loaded or parsed, and repeated ids, are skipped and listed in
    /// [`skipped`](Self::skipped).
    pub fn from_records(
        records: impl IntoIterator<Item = TileRecord>,
        mut load: impl FnMut(&TileRecord) -> Result<String, LibraryError>,
    ) -> Self {
        let mut library = Self::default();
        for record in records {
            if library.by_id.contains_key(&record.id) {
                library.skip(&record.id, LibraryError::DuplicateTile(record.id.clone()));
                continue;
            }
            let drawing = load(&record).and_then(|text| {
                TileDrawing::parse(&text).map_err(|source| LibraryError::Svg {
                    tile_id: record.id.clone(),
                    source,
                })
            });
            match drawing {
                Ok(drawing) => library.insert(LibraryEntry {
                    asset: Arc::new(record.to_asset()),
                    drawing,
                    file: record.file,
                }),
                Err(error) => library.skip(&record.id, error),
            }
        }
        library
    }

    /// Parses manifest JSON and builds the library with
    /// [`from_records`](Self::from_records).
    ///
    /// # Errors
    ///
    /// Fails only if the manifest itself is malformed.
    pub fn from_manifest_str(
        manifest: &str,
        load: impl FnMut(&TileRecord) -> Result<String, LibraryError>,
    ) -> Result<Self, LibraryError> {
        Ok(Self::from_records(parse_manifest(manifest)?, load))
    }

    /// Loads `dir/tiles.json` and the drawings it names, relative to `dir`.
    ///
    /// # Errors
    ///
    /// Fails if the manifest cannot be read or parsed. Unreadable drawings
    /// are skipped.
    pub fn load_dir(dir: &Path) -> Result<Self, LibraryError> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = read(&manifest_path)?;
        Self::from_manifest_str(&manifest, |record| read(&dir.join(&record.file)))
    }

    fn insert(&mut self, entry: LibraryEntry) {
        self.by_id.insert(entry.asset.id.clone(), self.entries.len());
        self.entries.push(entry);
    }

    fn skip(&mut self, id: &str, error: LibraryError) {
        self.skipped.push(SkippedTile {
            id: id.to_owned(),
            error,
        });
    }

    /// Number of loaded tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tile loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LibraryEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Looks up `id`, failing with [`LibraryError::UnknownTile`].
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::UnknownTile`] if `id` is not loaded.
    pub fn require(&self, id: &str) -> Result<&LibraryEntry, LibraryError> {
        self.get(id)
            .ok_or_else(|| LibraryError::UnknownTile(id.to_owned()))
    }

    /// Entries in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &LibraryEntry> + '_ {
        self.entries.iter()
    }

    /// Manifest entries that did not load.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedTile] {
        &self.skipped
    }
}

impl DrawingSource for TileLibrary {
    fn drawing(&self, tile_id: &str) -> Option<&TileDrawing> {
        self.get(tile_id).map(|e| &e.drawing)
    }
}

fn read(path: &Path) -> Result<String, LibraryError> {
    fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const STRAIGHT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <rect id="road" width="400" height="100"/>
  <circle id="entry-point" cx="0" cy="50"/>
  <circle id="entry-dir" cx="10" cy="50"/>
  <circle id="exit-point" cx="400" cy="50"/>
  <circle id="exit-dir" cx="410" cy="50"/>
  <circle id="center-point" cx="200" cy="50"/>
  <circle id="goal-1" cx="100" cy="0"/>
  <circle id="goal-1b" cx="100" cy="100"/>
  <circle id="goal-2" cx="300" cy="0"/>
  <circle id="goal-2b" cx="300" cy="100"/>
</svg>"#;

    pub(crate) const MANIFEST: &str = r#"[
  {"id": "a", "file": "a.svg", "label": "A", "track": ["flat", "flat"]},
  {"id": "b", "file": "b.svg", "track": ["asc", "asc", "flat"]},
  {"id": "broken", "file": "broken.svg"},
  {"id": "missing", "file": "missing.svg"},
  {"id": "a", "file": "a2.svg"}
]"#;

    /// In-memory loader for [`MANIFEST`].
    pub(crate) fn load(record: &TileRecord) -> Result<String, LibraryError> {
        match record.file.as_str() {
            "a.svg" | "b.svg" | "a2.svg" => Ok(STRAIGHT.to_owned()),
            "broken.svg" => Ok("<svg".to_owned()),
            other => Err(LibraryError::Io {
                path: other.into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
        }
    }

    pub(crate) fn library() -> TileLibrary {
        TileLibrary::from_manifest_str(MANIFEST, load).unwrap()
    }

    #[test]
    fn broken_entries_are_skipped_and_reported() {
        let lib = library();
        assert_eq!(lib.len(), 2);
        let ids: Vec<_> = lib.iter().map(|e| e.asset.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        let skipped: Vec<_> = lib.skipped().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(skipped, ["broken", "missing", "a"]);
        assert!(matches!(lib.skipped()[0].error, LibraryError::Svg { .. }));
        assert!(matches!(lib.skipped()[1].error, LibraryError::Io { .. }));
        assert!(matches!(lib.skipped()[2].error, LibraryError::DuplicateTile(_)));
        assert_eq!(lib.get("a").unwrap().file, "a.svg");
    }

    #[test]
    fn lookups() {
        let lib = library();
        assert_eq!(lib.get("b").unwrap().asset.label, "b");
        assert!(lib.drawing("a").is_some());
        assert!(matches!(lib.require("zz"), Err(LibraryError::UnknownTile(_))));
    }

    #[test]
    fn malformed_manifest_fails() {
        assert!(matches!(
            TileLibrary::from_manifest_str("{", load),
            Err(LibraryError::Json(_))
        ));
    }
}
