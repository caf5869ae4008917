//! First-match-wins clause selection.

use super::RuleClause;
use crate::query::AddressDetail;

/// Select the clause that applies to `detail`.
///
/// Clauses are scanned in encoding order and the first one whose lane,
/// alley, and number checks all pass wins. When none match, a non-empty
/// sequence falls back to its first clause, so a road that has clauses at
/// all always yields a code. An empty sequence selects nothing.
pub fn select<'a>(clauses: &'a [RuleClause], detail: AddressDetail) -> Option<&'a RuleClause> {
    clauses
        .iter()
        .find(|clause| clause.matches(detail))
        .or_else(|| clauses.first())
}
