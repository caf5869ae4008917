//! TwZip - Taiwan postal code lookup and resolution.
//!
//! This crate resolves Taiwanese administrative geography to postal
//! codes: a 3-digit code per city/district, and a rule-based 6-digit
//! (3+3) code resolved from a structured address with optional house
//! number, lane, and alley.
//!
//! # Features
//!
//! - **6-digit resolution**: Per-road rule clauses matched against house
//!   number, lane, and alley; the first match wins, with a fallback to
//!   the road's first clause
//! - **Directory enumeration**: Cities, areas, and roads in sorted order
//! - **Road search**: Substring search, optionally scoped to a city or
//!   a city/area pair
//! - **Code validation**: Lazily built index of every reachable 6-digit
//!   code
//! - **District directory**: 3-digit lookups, reverse lookups, and
//!   substring search over district names
//! - **Thread-safe**: A directory is immutable after construction and
//!   can be shared behind an `Arc`
//!
//! # Quick Start
//!
//! ```ignore
//! use twzip::{AddressQuery, ZipDirectory};
//!
//! let file = std::fs::File::open("tw-zip.json")?;
//! let directory = ZipDirectory::from_reader(std::io::BufReader::new(file))?;
//!
//! // Resolve an address to its 6-digit code
//! let query = AddressQuery::new("臺北市", "中正區", "三元街").with_number(145);
//! if let Some(result) = directory.resolve(&query) {
//!     println!("{}", result.zipcode); // "100060"
//! }
//!
//! // Validate codes and search roads
//! assert!(directory.is_valid_zip6("100060"));
//! let hits = directory.search_roads("三元", None, None);
//!
//! // District-level (3-digit) lookups
//! let entry = directory.zip3().find("中正區");
//! ```
//!
//! # Rule encoding
//!
//! Each road maps to a `|`-delimited rule string; each clause is a
//! comma-separated tuple of a 3-digit suffix followed by parity, lane,
//! alley, and house-number bounds. A bound of 0 leaves its axis
//! unconstrained, and an upper house-number bound of 9999 or 9998 marks
//! an open-ended range. See [`rule::RuleClause`] for the full field
//! layout.
//!
//! # Matching priority
//!
//! 1. Clauses are scanned in encoding order; lane, alley, and number
//!    checks must all pass
//! 2. A supplied house number passes only clauses that carry a number
//!    bound or a parity; clauses without either serve numberless
//!    queries
//! 3. The first matching clause wins
//! 4. When none match, the road's first clause is the fallback; only a
//!    road with no clauses at all resolves to nothing

mod directory;
mod error;
mod query;
mod zip3;

pub mod dataset;
pub mod rule;

// Re-export core types
pub use error::{Error, Result};
pub use query::{AddressDetail, AddressQuery, Zip6Result};

// Re-export the directories
pub use directory::{CacheStats, RoadEntry, ZipDirectory};
pub use zip3::{DistrictEntry, Zip3Directory};

// Re-export dataset types for loader integration
pub use dataset::{AreaRoads, CityAreaData, CityAreas, Dataset, Zip3Map};

// Re-export rule primitives for advanced usage
pub use rule::{parse_rule_string, Parity, RuleCache, RuleClause};
