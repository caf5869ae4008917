//! District-level (3-digit) postal code directory.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::dataset::Zip3Map;

/// One district entry: a 3-digit code with its city and district names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistrictEntry<'a> {
    /// 3-digit postal code
    pub zip3: &'a str,
    /// City name (縣市)
    pub city: &'a str,
    /// District name (行政區)
    pub district: &'a str,
}

/// Lookup directory over the city -> district -> 3-digit code mapping.
///
/// Unlike road-level resolution, district-level lookups trim surrounding
/// whitespace from their inputs before matching; an empty or
/// whitespace-only input never matches anything. Misses come back as
/// `None`, empty collections, or `false`, never as errors.
#[derive(Debug, Clone, Default)]
pub struct Zip3Directory {
    map: Zip3Map,
}

impl Zip3Directory {
    /// Create a directory over a 3-digit code mapping.
    pub fn new(map: Zip3Map) -> Self {
        Self { map }
    }

    /// The underlying mapping.
    pub fn map(&self) -> &Zip3Map {
        &self.map
    }

    /// City names, in sorted order.
    pub fn cities(&self) -> Vec<&str> {
        self.map.keys().map(String::as_str).collect()
    }

    /// District entries for one city, or for every city.
    ///
    /// Unknown cities yield an empty list.
    pub fn districts(&self, city: Option<&str>) -> Vec<DistrictEntry<'_>> {
        match city {
            Some(city) => self
                .map
                .get_key_value(city.trim())
                .map(|(city, districts)| {
                    districts
                        .iter()
                        .map(|(district, zip3)| DistrictEntry {
                            zip3,
                            city,
                            district,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            None => self.entries().collect(),
        }
    }

    /// The 3-digit code for a city/district pair.
    pub fn code(&self, city: &str, district: &str) -> Option<&str> {
        self.map
            .get(city.trim())?
            .get(district.trim())
            .map(String::as_str)
    }

    /// Find the first district whose name or 3-digit code equals `query`.
    ///
    /// Cities are scanned in sorted order, so a district name shared by
    /// several cities resolves to the first city carrying it.
    pub fn find(&self, query: &str) -> Option<DistrictEntry<'_>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.entries()
            .find(|entry| entry.district == query || entry.zip3 == query)
    }

    /// Every district whose name or 3-digit code equals `query`.
    ///
    /// District names repeat across cities (中正區 exists in both 台北市
    /// and 基隆市), and some codes cover several districts, so this can
    /// return more than one entry.
    pub fn find_all(&self, query: &str) -> Vec<DistrictEntry<'_>> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries()
            .filter(|entry| entry.district == query || entry.zip3 == query)
            .collect()
    }

    /// Every district whose name contains `keyword`.
    ///
    /// The keyword is trimmed; an empty or whitespace-only keyword matches
    /// nothing rather than everything.
    pub fn search(&self, keyword: &str) -> Vec<DistrictEntry<'_>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Vec::new();
        }
        self.entries()
            .filter(|entry| entry.district.contains(keyword))
            .collect()
    }

    /// Whether `city` names a known city.
    pub fn is_valid_city(&self, city: &str) -> bool {
        self.map.contains_key(city.trim())
    }

    /// Whether `district` names a known district, optionally within one
    /// city.
    pub fn is_valid_district(&self, district: &str, city: Option<&str>) -> bool {
        let district = district.trim();
        match city {
            Some(city) => self
                .map
                .get(city.trim())
                .map_or(false, |districts| districts.contains_key(district)),
            None => self
                .map
                .values()
                .any(|districts| districts.contains_key(district)),
        }
    }

    /// Whether `code` is the 3-digit code of some district.
    pub fn is_valid_code(&self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            return false;
        }
        self.entries().any(|entry| entry.zip3 == code)
    }

    /// Total number of district entries.
    pub fn len(&self) -> usize {
        self.map.values().map(BTreeMap::len).sum()
    }

    /// Whether the directory holds no districts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> impl Iterator<Item = DistrictEntry<'_>> {
        self.map.iter().flat_map(|(city, districts)| {
            districts.iter().map(move |(district, zip3)| DistrictEntry {
                zip3,
                city,
                district,
            })
        })
    }
}
