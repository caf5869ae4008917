//! Road-level directory with rule-based 6-digit resolution.

use ahash::AHashSet;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Read;

use crate::dataset::{AreaRoads, CityAreaData, CityAreas, Dataset};
use crate::error::Result;
use crate::query::{AddressQuery, Zip6Result};
use crate::rule::{select, RuleCache};
use crate::zip3::Zip3Directory;

/// Shape gate for 6-digit codes: exactly six ASCII digits. The class is
/// spelled out because `\d` would also accept other Unicode digits.
static ZIP6_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new("^[0-9]{6}$").unwrap());

/// One road-search hit, borrowing the dataset's own keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoadEntry<'a> {
    /// City name (縣市)
    pub city: &'a str,
    /// Administrative area name (區)
    pub area: &'a str,
    /// Road name (路街段)
    pub road: &'a str,
}

/// Cache occupancy snapshot for a [`ZipDirectory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct rule strings parsed so far
    pub parsed_rules: usize,
    /// Whether the valid-code index has been built
    pub valid_index_built: bool,
}

/// Road-level postal directory with rule-based 6-digit resolution.
///
/// Owns one dataset snapshot together with both lazily filled caches, so
/// separate directories never share state and tests reset by constructing
/// a fresh one. A directory is immutable after construction and can be
/// shared across threads behind an `Arc`.
///
/// Road-level lookups match keys verbatim, without trimming; the
/// district-level surface behind [`ZipDirectory::zip3`] trims.
///
/// # Examples
/// ```
/// use twzip::{AddressQuery, Dataset, ZipDirectory};
///
/// let dataset = Dataset::from_json_str(r#"{
///     "zip3": { "臺北市": { "中正區": "100" } },
///     "data": { "臺北市": { "中正區": {
///         "三元街": "053,0,0,0|060,0,0,0,0,0,131,0,9999"
///     } } }
/// }"#)?;
/// let directory = ZipDirectory::new(dataset);
///
/// let query = AddressQuery::new("臺北市", "中正區", "三元街").with_number(145);
/// let result = directory.resolve(&query).unwrap();
/// assert_eq!(result.zipcode, "100060");
/// # Ok::<(), twzip::Error>(())
/// ```
pub struct ZipDirectory {
    data: CityAreaData,
    zip3: Zip3Directory,
    rules: RuleCache,
    valid_codes: OnceCell<AHashSet<String>>,
}

impl ZipDirectory {
    /// Create a directory over a dataset snapshot.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            data: dataset.data,
            zip3: Zip3Directory::new(dataset.zip3),
            rules: RuleCache::new(),
            valid_codes: OnceCell::new(),
        }
    }

    /// Read a JSON dataset snapshot and build a directory over it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(Dataset::from_reader(reader)?))
    }

    /// The district-level (3-digit) directory of the same snapshot.
    pub fn zip3(&self) -> &Zip3Directory {
        &self.zip3
    }

    /// The road-level mapping.
    pub fn data(&self) -> &CityAreaData {
        &self.data
    }

    /// City names with road-level data, in sorted order.
    pub fn cities(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    /// Area names of a city, in sorted order. Unknown cities yield
    /// nothing.
    pub fn areas(&self, city: &str) -> Vec<&str> {
        self.data
            .get(city)
            .map(|areas| areas.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Road names of an area, in sorted order. Unknown cities and areas
    /// yield nothing.
    pub fn roads(&self, city: &str, area: &str) -> Vec<&str> {
        self.data
            .get(city)
            .and_then(|areas| areas.get(area))
            .map(|roads| roads.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Resolve a structured address to its 6-digit zip code.
    ///
    /// Returns `None` when the city, area, or road is unknown, when the
    /// road's rule string is empty, or when the area has no 3-digit code.
    /// Otherwise the matched clause's suffix (or the first clause's, when
    /// nothing matches) is appended to the area's 3-digit code.
    pub fn resolve(&self, query: &AddressQuery<'_>) -> Option<Zip6Result> {
        let rule_string = self
            .data
            .get(query.city)?
            .get(query.area)?
            .get(query.road)
            .filter(|raw| !raw.is_empty())?;
        let zip3 = self.area_zip3(query.city, query.area)?;
        let clauses = self.rules.parse(rule_string);
        let clause = select(&clauses, query.detail())?;
        Some(Zip6Result {
            zipcode: format!("{}{}", zip3, clause.suffix),
            zip3: zip3.to_string(),
            city: query.city.to_string(),
            area: query.area.to_string(),
            road: query.road.to_string(),
        })
    }

    /// Every 6-digit code reachable on a road, deduplicated and sorted.
    ///
    /// Enumerates the suffix of every clause without matching any address
    /// detail. Unknown roads and empty rule strings yield nothing.
    pub fn zip_codes_for_road(&self, city: &str, area: &str, road: &str) -> Vec<String> {
        let Some(rule_string) = self
            .data
            .get(city)
            .and_then(|areas| areas.get(area))
            .and_then(|roads| roads.get(road))
            .filter(|raw| !raw.is_empty())
        else {
            return Vec::new();
        };
        let Some(zip3) = self.area_zip3(city, area) else {
            return Vec::new();
        };
        let clauses = self.rules.parse(rule_string);
        let codes: BTreeSet<String> = clauses
            .iter()
            .map(|clause| format!("{}{}", zip3, clause.suffix))
            .collect();
        codes.into_iter().collect()
    }

    /// Substring search over road names, optionally scoped to a city or
    /// a city/area pair.
    ///
    /// The keyword is trimmed and an empty or whitespace-only keyword
    /// matches nothing rather than everything. Scope levels that don't
    /// exist yield nothing.
    pub fn search_roads(
        &self,
        keyword: &str,
        city: Option<&str>,
        area: Option<&str>,
    ) -> Vec<RoadEntry<'_>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Vec::new();
        }
        let mut hits = Vec::new();
        for (city_name, areas) in scoped(&self.data, city) {
            for (area_name, roads) in scoped(areas, area) {
                for road in roads.keys() {
                    if road.contains(keyword) {
                        hits.push(RoadEntry {
                            city: city_name,
                            area: area_name,
                            road,
                        });
                    }
                }
            }
        }
        hits
    }

    /// Validate a 6-digit code against every code the dataset can
    /// produce.
    ///
    /// The shape gate runs first, so malformed input never triggers the
    /// index build. The index is built at most once per directory by
    /// walking every road's clauses through the shared parse cache;
    /// afterwards validation is a single set probe.
    pub fn is_valid_zip6(&self, code: &str) -> bool {
        if !ZIP6_SHAPE.is_match(code) {
            return false;
        }
        self.valid_index().contains(code)
    }

    /// Current cache occupancy.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            parsed_rules: self.rules.len(),
            valid_index_built: self.valid_codes.get().is_some(),
        }
    }

    /// The 3-digit code of a city/area pair, matched verbatim.
    fn area_zip3(&self, city: &str, area: &str) -> Option<&str> {
        self.zip3
            .map()
            .get(city)?
            .get(area)
            .map(String::as_str)
    }

    fn valid_index(&self) -> &AHashSet<String> {
        self.valid_codes.get_or_init(|| {
            let mut codes = AHashSet::new();
            for (city, areas) in &self.data {
                for (area, roads) in areas {
                    let Some(zip3) = self.area_zip3(city, area) else {
                        continue;
                    };
                    for rule_string in roads.values() {
                        let clauses = self.rules.parse(rule_string);
                        for clause in clauses.iter() {
                            codes.insert(format!("{}{}", zip3, clause.suffix));
                        }
                    }
                }
            }
            log::debug!("built valid zip6 index: {} codes", codes.len());
            codes
        })
    }
}

/// Scope a map iteration to one key, or to every entry.
fn scoped<'a, V>(
    map: &'a std::collections::BTreeMap<String, V>,
    key: Option<&str>,
) -> Vec<(&'a String, &'a V)> {
    match key {
        Some(key) => map.get_key_value(key).into_iter().collect(),
        None => map.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_directory() -> ZipDirectory {
        let dataset = Dataset::from_json_str(
            r#"{
                "zip3": {
                    "臺北市": { "中正區": "100", "大安區": "106" },
                    "高雄市": { "三民區": "807" }
                },
                "data": {
                    "臺北市": {
                        "中正區": {
                            "三元街": "053,0,0,0|060,0,0,0,0,0,131,0,9999",
                            "仁愛路１段": "051,1,0,0|052,2,0,0",
                            "寧波西街": "058,0,0,0,0,0,1,0,74|059,0,0,0,0,0,75,0,9999",
                            "金山南路１段": "055,0,1,50,0,0,0,0,0|056,0,51,0,0,0,0,0,9999",
                            "泉州街": "057,0,10,0,5,0,0,0,0|058,0,0,0|057,0,20,0,0,0,0,0,0",
                            "廈門街": ""
                        }
                    },
                    "高雄市": {
                        "三民區": {
                            "大昌一路": "001,0,0,0"
                        }
                    }
                }
            }"#,
        )
        .unwrap();
        ZipDirectory::new(dataset)
    }

    #[test]
    fn test_enumeration() {
        let directory = sample_directory();
        assert_eq!(directory.cities(), vec!["臺北市", "高雄市"]);
        assert_eq!(directory.areas("臺北市"), vec!["中正區"]);
        assert_eq!(directory.areas("不存在市"), Vec::<&str>::new());
        assert_eq!(directory.roads("臺北市", "中正區").len(), 6);
        assert_eq!(
            directory.roads("不存在市", "中正區"),
            Vec::<&str>::new()
        );
        assert_eq!(
            directory.roads("臺北市", "不存在區"),
            Vec::<&str>::new()
        );
    }

    #[test]
    fn test_resolve_without_detail_takes_first_clause() {
        let directory = sample_directory();
        let query = AddressQuery::new("臺北市", "中正區", "三元街");
        let result = directory.resolve(&query).unwrap();
        assert_eq!(result.zipcode, "100053");
        assert_eq!(result.zip3, "100");
        assert_eq!(result.city, "臺北市");
        assert_eq!(result.area, "中正區");
        assert_eq!(result.road, "三元街");
    }

    #[test]
    fn test_resolve_number_in_open_range() {
        let directory = sample_directory();
        let query = AddressQuery::new("臺北市", "中正區", "三元街").with_number(145);
        assert_eq!(directory.resolve(&query).unwrap().zipcode, "100060");
    }

    #[test]
    fn test_resolve_falls_back_below_range() {
        let directory = sample_directory();
        let query = AddressQuery::new("臺北市", "中正區", "三元街").with_number(50);
        assert_eq!(directory.resolve(&query).unwrap().zipcode, "100053");
    }

    #[test]
    fn test_resolve_parity_road() {
        let directory = sample_directory();
        let base = AddressQuery::new("臺北市", "中正區", "仁愛路１段");
        assert_eq!(
            directory.resolve(&base.with_number(3)).unwrap().zipcode,
            "100051"
        );
        assert_eq!(
            directory.resolve(&base.with_number(8)).unwrap().zipcode,
            "100052"
        );
        // No number: the first clause has no applicable constraint left.
        assert_eq!(directory.resolve(&base).unwrap().zipcode, "100051");
    }

    #[test]
    fn test_resolve_number_ranges() {
        let directory = sample_directory();
        let base = AddressQuery::new("臺北市", "中正區", "寧波西街");
        assert_eq!(
            directory.resolve(&base.with_number(74)).unwrap().zipcode,
            "100058"
        );
        assert_eq!(
            directory.resolve(&base.with_number(75)).unwrap().zipcode,
            "100059"
        );
    }

    #[test]
    fn test_resolve_lane_forms() {
        let directory = sample_directory();
        let base = AddressQuery::new("臺北市", "中正區", "金山南路１段");
        assert_eq!(
            directory.resolve(&base.with_lane(30)).unwrap().zipcode,
            "100055"
        );
        assert_eq!(
            directory.resolve(&base.with_lane(80)).unwrap().zipcode,
            "100056"
        );
        // Both clauses need a lane; its absence falls back to the first.
        assert_eq!(directory.resolve(&base).unwrap().zipcode, "100055");
        assert_eq!(
            directory.resolve(&base.with_lane(0)).unwrap().zipcode,
            "100055"
        );
    }

    #[test]
    fn test_resolve_lane_and_alley() {
        let directory = sample_directory();
        let base = AddressQuery::new("臺北市", "中正區", "泉州街");
        assert_eq!(
            directory
                .resolve(&base.with_lane(10).with_alley(5))
                .unwrap()
                .zipcode,
            "100057"
        );
        // Missing alley skips the constrained clause.
        assert_eq!(
            directory.resolve(&base.with_lane(10)).unwrap().zipcode,
            "100058"
        );
        assert_eq!(directory.resolve(&base).unwrap().zipcode, "100058");
    }

    #[test]
    fn test_resolve_unknown_levels() {
        let directory = sample_directory();
        assert!(directory
            .resolve(&AddressQuery::new("不存在市", "中正區", "三元街"))
            .is_none());
        assert!(directory
            .resolve(&AddressQuery::new("臺北市", "不存在區", "三元街"))
            .is_none());
        assert!(directory
            .resolve(&AddressQuery::new("臺北市", "中正區", "不存在路"))
            .is_none());
        assert!(directory
            .resolve(&AddressQuery::new("", "", ""))
            .is_none());
    }

    #[test]
    fn test_resolve_empty_rule_string() {
        let directory = sample_directory();
        assert!(directory
            .resolve(&AddressQuery::new("臺北市", "中正區", "廈門街"))
            .is_none());
    }

    #[test]
    fn test_resolve_does_not_trim() {
        let directory = sample_directory();
        assert!(directory
            .resolve(&AddressQuery::new(" 臺北市 ", "中正區", "三元街"))
            .is_none());
    }

    #[test]
    fn test_resolve_extreme_numbers_still_produce_a_code() {
        let directory = sample_directory();
        let base = AddressQuery::new("臺北市", "中正區", "三元街");
        assert!(directory.resolve(&base.with_number(0)).is_some());
        assert!(directory.resolve(&base.with_number(-1)).is_some());
        assert_eq!(
            directory.resolve(&base.with_number(999_999)).unwrap().zipcode,
            "100060"
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let directory = sample_directory();
        let query = AddressQuery::new("臺北市", "中正區", "三元街").with_number(145);
        let first = directory.resolve(&query).unwrap();
        let second = directory.resolve(&query).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zip_codes_for_road_sorted_and_deduplicated() {
        let directory = sample_directory();
        assert_eq!(
            directory.zip_codes_for_road("臺北市", "中正區", "三元街"),
            vec!["100053", "100060"]
        );
        // 泉州街 carries 057 twice; the duplicate collapses.
        assert_eq!(
            directory.zip_codes_for_road("臺北市", "中正區", "泉州街"),
            vec!["100057", "100058"]
        );
        assert!(directory
            .zip_codes_for_road("臺北市", "中正區", "不存在路")
            .is_empty());
        assert!(directory
            .zip_codes_for_road("臺北市", "中正區", "廈門街")
            .is_empty());
        assert!(directory.zip_codes_for_road("", "", "").is_empty());
    }

    #[test]
    fn test_search_roads() {
        let directory = sample_directory();
        let hits = directory.search_roads("三元", None, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].city, "臺北市");
        assert_eq!(hits[0].area, "中正區");
        assert_eq!(hits[0].road, "三元街");

        let scoped = directory.search_roads("路", Some("高雄市"), None);
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].road, "大昌一路");

        assert!(directory
            .search_roads("路", Some("不存在市"), None)
            .is_empty());
        assert!(directory
            .search_roads("路", Some("臺北市"), Some("不存在區"))
            .is_empty());
    }

    #[test]
    fn test_search_roads_keyword_edge_cases() {
        let directory = sample_directory();
        assert!(directory.search_roads("", None, None).is_empty());
        assert!(directory.search_roads("   ", None, None).is_empty());
        assert!(directory.search_roads("\u{0}", None, None).is_empty());
        let long = "路".repeat(1000);
        assert!(directory.search_roads(&long, None, None).is_empty());
        // The keyword itself is trimmed before matching.
        assert_eq!(directory.search_roads("  三元  ", None, None).len(), 1);
    }

    #[test]
    fn test_is_valid_zip6() {
        let directory = sample_directory();
        assert!(directory.is_valid_zip6("100053"));
        assert!(directory.is_valid_zip6("100060"));
        assert!(directory.is_valid_zip6("807001"));
        assert!(!directory.is_valid_zip6("999999"));
        assert!(!directory.is_valid_zip6("100"));
        assert!(!directory.is_valid_zip6("10006"));
        assert!(!directory.is_valid_zip6("1000600"));
        assert!(!directory.is_valid_zip6("10005a"));
        assert!(!directory.is_valid_zip6(""));
        // Full-width digits are not ASCII digits.
        assert!(!directory.is_valid_zip6("１００053"));
    }

    #[test]
    fn test_cache_stats_progression() {
        let directory = sample_directory();
        assert_eq!(
            directory.cache_stats(),
            CacheStats {
                parsed_rules: 0,
                valid_index_built: false
            }
        );

        directory.resolve(&AddressQuery::new("臺北市", "中正區", "三元街"));
        let stats = directory.cache_stats();
        assert_eq!(stats.parsed_rules, 1);
        assert!(!stats.valid_index_built);

        // Malformed input is rejected by shape alone.
        assert!(!directory.is_valid_zip6("abc"));
        assert!(!directory.cache_stats().valid_index_built);

        assert!(directory.is_valid_zip6("100053"));
        let stats = directory.cache_stats();
        assert!(stats.valid_index_built);
        // The index build parsed every remaining rule string.
        assert_eq!(stats.parsed_rules, 6);
    }

    #[test]
    fn test_directories_do_not_share_caches() {
        let first = sample_directory();
        let second = sample_directory();
        first.resolve(&AddressQuery::new("臺北市", "中正區", "三元街"));
        assert_eq!(first.cache_stats().parsed_rules, 1);
        assert_eq!(second.cache_stats().parsed_rules, 0);
    }
}
