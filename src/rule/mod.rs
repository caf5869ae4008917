//! Road rule encoding: clause parsing, matching, and the parse cache.
//!
//! Every road in the dataset carries an encoded rule string describing
//! which 3-digit suffix applies to which house-number/lane/alley span.
//! [`parse_rule_string`] turns the string into ordered [`RuleClause`]s,
//! [`select`] picks the clause for a query, and [`RuleCache`] memoizes
//! parses across roads that share a rule string.

mod cache;
mod clause;
mod matcher;

pub use cache::RuleCache;
pub use clause::{parse_rule_string, Parity, RuleClause};
pub use matcher::select;
