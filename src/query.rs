//! Address query and resolution result types.

use serde::Serialize;

/// Optional refinements of an address below the road level.
///
/// Rule clauses are matched against these three fields only. `None` means
/// the caller did not supply the field; the matcher additionally treats a
/// lane or alley of 0 as not supplied, while a house number of 0 or below
/// is a real value and flows through the number checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressDetail {
    /// House number (號)
    pub number: Option<i32>,
    /// Lane (巷)
    pub lane: Option<i32>,
    /// Alley (弄)
    pub alley: Option<i32>,
}

/// A structured address to resolve to a 6-digit zip code.
///
/// `city`, `area`, and `road` are matched verbatim against the dataset
/// keys, without trimming or normalization. The optional detail fields
/// refine which rule clause applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressQuery<'a> {
    /// City name (縣市)
    pub city: &'a str,
    /// Administrative area name (區)
    pub area: &'a str,
    /// Road name (路街段)
    pub road: &'a str,
    /// House number (號)
    pub number: Option<i32>,
    /// Lane (巷)
    pub lane: Option<i32>,
    /// Alley (弄)
    pub alley: Option<i32>,
}

impl<'a> AddressQuery<'a> {
    /// Create a query for a road with no house-number detail.
    pub fn new(city: &'a str, area: &'a str, road: &'a str) -> Self {
        AddressQuery {
            city,
            area,
            road,
            number: None,
            lane: None,
            alley: None,
        }
    }

    /// Set the house number.
    pub fn with_number(mut self, number: i32) -> Self {
        self.number = Some(number);
        self
    }

    /// Set the lane.
    pub fn with_lane(mut self, lane: i32) -> Self {
        self.lane = Some(lane);
        self
    }

    /// Set the alley.
    pub fn with_alley(mut self, alley: i32) -> Self {
        self.alley = Some(alley);
        self
    }

    /// The detail fields the rule matcher consumes.
    pub fn detail(&self) -> AddressDetail {
        AddressDetail {
            number: self.number,
            lane: self.lane,
            alley: self.alley,
        }
    }
}

/// A successful 6-digit resolution.
///
/// `zipcode` is always the area's 3-digit code followed by the matched
/// clause's 3-digit suffix. Results are built fresh on every call and own
/// their strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zip6Result {
    /// Full 6-digit zip code
    pub zipcode: String,
    /// 3-digit code of the city/area
    pub zip3: String,
    /// City the query matched
    pub city: String,
    /// Area the query matched
    pub area: String,
    /// Road the query matched
    pub road: String,
}
