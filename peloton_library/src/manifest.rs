// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tile manifest: a JSON array describing every tile drawing.
//!
//! ```json
//! [
//!   { "id": "c", "file": "c.svg", "label": "C", "theme": "light",
//!     "stats": { "flat": 6 }, "track": ["flat", "flat", "asc"] }
//! ]
//! ```
//!
//! Only `id` and `file` are required. Missing fields take defaults: the label
//! is the id, the theme is light, every stat is zero, and the track is empty.
//! A `track` that is not an array is treated as empty, and `stats` that is not
//! an object reads as all zeros. A stat that is not a non-negative whole
//! number counts as zero.

use serde::{Deserialize, Deserializer, Serialize};

use peloton_core::terrain::{StatBundle, TerrainStep, Theme, TileAsset};

use crate::error::LibraryError;

/// Square counts as written in the manifest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    /// Flat squares.
    pub flat: u32,
    /// Ascent squares.
    pub asc: u32,
    /// Descent squares.
    pub desc: u32,
    /// Supply squares.
    pub supply: u32,
    /// Cobblestone squares.
    pub cobb: u32,
    /// Slippery squares.
    pub slip: u32,
}

impl From<StatsRecord> for StatBundle {
    fn from(s: StatsRecord) -> Self {
        Self {
            flat: s.flat,
            asc: s.asc,
            desc: s.desc,
            supply: s.supply,
            cobb: s.cobb,
            slip: s.slip,
        }
    }
}

/// One manifest entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Tile id, unique within the manifest.
    pub id: String,
    /// Drawing file, relative to the manifest.
    pub file: String,
    /// Badge label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Badge theme tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Square counts.
    #[serde(default, deserialize_with = "lenient_stats")]
    pub stats: StatsRecord,
    /// Terrain step tokens in track order.
    #[serde(default, deserialize_with = "lenient_track")]
    pub track: Vec<String>,
}

impl TileRecord {
    /// Builds the core asset with every default applied.
    #[must_use]
    pub fn to_asset(&self) -> TileAsset {
        TileAsset::new(self.id.as_str())
            .with_label(self.label.as_deref().unwrap_or(&self.id))
            .with_theme(self.theme.as_deref().map_or(Theme::Light, Theme::from_token))
            .with_stats(self.stats.into())
            .with_track(self.track.iter().map(|t| TerrainStep::from_token(t)))
    }
}

/// Parses manifest JSON.
///
/// # Errors
///
/// Returns [`LibraryError::Json`] if the text is not an array of records.
pub fn parse_manifest(text: &str) -> Result<Vec<TileRecord>, LibraryError> {
    Ok(serde_json::from_str(text)?)
}

fn lenient_track<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_stats<'de, D: Deserializer<'de>>(d: D) -> Result<StatsRecord, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    let count = |key: &str| {
        value
            .get(key)
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    };
    Ok(StatsRecord {
        flat: count("flat"),
        asc: count("asc"),
        desc: count("desc"),
        supply: count("supply"),
        cobb: count("cobb"),
        slip: count("slip"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let records = parse_manifest(r#"[{"id": "b", "file": "b.svg"}]"#).unwrap();
        let asset = records[0].to_asset();
        assert_eq!(asset.id, "b");
        assert_eq!(asset.label, "b");
        assert_eq!(asset.theme, Theme::Light);
        assert_eq!(asset.stats, StatBundle::default());
        assert!(asset.track.is_empty());
    }

    #[test]
    fn full_record() {
        let records = parse_manifest(
            r#"[{"id": "c-upp", "file": "c-upp.svg", "label": "c", "theme": "dark",
                 "stats": {"asc": 2, "flat": 4, "unknown": 9},
                 "track": ["flat", "asc", "yellow", "mud"]}]"#,
        )
        .unwrap();
        let asset = records[0].to_asset();
        assert_eq!(asset.label, "c");
        assert_eq!(asset.theme, Theme::Dark);
        assert_eq!(asset.stats.asc, 2);
        assert_eq!(asset.stats.flat, 4);
        assert_eq!(
            asset.track,
            [
                TerrainStep::Flat,
                TerrainStep::Ascent,
                TerrainStep::Decorative,
                TerrainStep::Other
            ]
        );
    }

    #[test]
    fn non_array_track_is_empty() {
        let records =
            parse_manifest(r#"[{"id": "d", "file": "d.svg", "track": "flat"}]"#).unwrap();
        assert!(records[0].track.is_empty());
    }

    #[test]
    fn null_stats_and_label_take_defaults() {
        let records = parse_manifest(
            r#"[{"id": "a", "file": "a.svg", "stats": null, "label": null, "theme": null},
                {"id": "b", "file": "b.svg"}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        let asset = records[0].to_asset();
        assert_eq!(asset.stats, StatBundle::default());
        assert_eq!(asset.label, "a");
        assert_eq!(asset.theme, Theme::Light);
    }

    #[test]
    fn malformed_stat_counts_read_as_zero() {
        let records = parse_manifest(
            r#"[{"id": "a", "file": "a.svg",
                 "stats": {"flat": 1.5, "asc": -1, "desc": "3", "supply": 2, "cobb": null}}]"#,
        )
        .unwrap();
        let stats = records[0].stats;
        assert_eq!(
            stats,
            StatsRecord {
                supply: 2,
                ..StatsRecord::default()
            }
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            parse_manifest(r#"[{"id": "d"}]"#),
            Err(LibraryError::Json(_))
        ));
    }
}
