//! Parsed-rule cache.

use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use super::clause::{parse_rule_string, RuleClause};

/// Cache of parsed rule strings.
///
/// Many roads share the same rule string, and parsing is a pure function
/// of it, so entries are filled lazily and never evicted or invalidated.
/// Two threads racing on the same miss both parse; the first insert wins
/// and the results are identical either way.
#[derive(Debug, Default)]
pub struct RuleCache {
    parsed: RwLock<AHashMap<String, Arc<[RuleClause]>>>,
}

impl RuleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `raw`, reusing the cached clauses for a seen string.
    ///
    /// Empty strings parse to an empty sequence and never enter the cache.
    pub fn parse(&self, raw: &str) -> Arc<[RuleClause]> {
        if raw.is_empty() {
            return Vec::new().into();
        }
        if let Some(clauses) = self.parsed.read().get(raw) {
            return Arc::clone(clauses);
        }
        let clauses: Arc<[RuleClause]> = parse_rule_string(raw).into();
        Arc::clone(
            self.parsed
                .write()
                .entry(raw.to_string())
                .or_insert(clauses),
        )
    }

    /// Number of distinct rule strings parsed so far.
    pub fn len(&self) -> usize {
        self.parsed.read().len()
    }

    /// Whether nothing has been parsed yet.
    pub fn is_empty(&self) -> bool {
        self.parsed.read().is_empty()
    }
}
