//! Dataset snapshot types and JSON ingestion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

use crate::error::{Error, Result};

/// Road name -> encoded rule string, for one administrative area.
pub type AreaRoads = BTreeMap<String, String>;

/// Area name -> roads, for one city.
pub type CityAreas = BTreeMap<String, AreaRoads>;

/// City name -> areas: the full road-level mapping.
pub type CityAreaData = BTreeMap<String, CityAreas>;

/// City name -> area name -> 3-digit zip code.
pub type Zip3Map = BTreeMap<String, BTreeMap<String, String>>;

/// One dataset snapshot: the two mappings a directory is built from.
///
/// Mirrors the packaged JSON document:
///
/// ```json
/// {
///   "zip3": { "臺北市": { "中正區": "100" } },
///   "data": { "臺北市": { "中正區": { "三元街": "053,0,0,0|..." } } }
/// }
/// ```
///
/// Keys are stored in sorted order, so every enumeration over a snapshot
/// is deterministic. Both mappings must come from the same snapshot;
/// [`Dataset::validate`] checks the consistency a loader is expected to
/// uphold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// 3-digit codes per city and area
    #[serde(default)]
    pub zip3: Zip3Map,
    /// Road-level rule strings per city and area
    #[serde(default)]
    pub data: CityAreaData,
}

impl Dataset {
    /// Parse a snapshot from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a snapshot from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let dataset: Dataset = serde_json::from_reader(reader)?;
        log::debug!(
            "loaded dataset snapshot: {} cities, {} roads",
            dataset.data.len(),
            dataset.road_count()
        );
        Ok(dataset)
    }

    /// Serialize the snapshot back to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check the cross-mapping contract.
    ///
    /// Every city/area pair present in `data` must have an entry in `zip3`,
    /// and every such entry must be exactly three ASCII digits. Extra
    /// `zip3` entries without road data are fine; some districts have no
    /// road-level rules.
    pub fn validate(&self) -> Result<()> {
        for (city, areas) in &self.data {
            for area in areas.keys() {
                let code = self
                    .zip3
                    .get(city)
                    .and_then(|areas| areas.get(area))
                    .ok_or_else(|| Error::MissingZip3 {
                        city: city.clone(),
                        area: area.clone(),
                    })?;
                if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::InvalidZip3 {
                        city: city.clone(),
                        area: area.clone(),
                        code: code.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Total number of roads across all cities and areas.
    pub fn road_count(&self) -> usize {
        self.data
            .values()
            .flat_map(|areas| areas.values())
            .map(|roads| roads.len())
            .sum()
    }
}
