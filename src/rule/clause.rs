//! Rule clause parsing and per-clause matching.

use crate::query::AddressDetail;

/// Odd/even constraint on house numbers.
///
/// Encoded as 0 (none), 1 (odd, 單), 2 (even, 雙). Unknown codes behave
/// as no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Parity {
    /// No parity constraint
    #[default]
    Any,
    /// Odd house numbers only (單號)
    Odd,
    /// Even house numbers only (雙號)
    Even,
}

impl Parity {
    /// Parse a parity field code.
    ///
    /// Returns `Any` for unknown codes.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Parity::Odd,
            2 => Parity::Even,
            _ => Parity::Any,
        }
    }

    /// Convert to the numeric field code.
    pub fn as_code(self) -> i32 {
        match self {
            Parity::Any => 0,
            Parity::Odd => 1,
            Parity::Even => 2,
        }
    }

    /// Check whether a house number violates this constraint.
    ///
    /// The checks compare exact remainders. `%` keeps the sign of the
    /// dividend, so a negative odd number such as -3 (remainder -1) slips
    /// past both checks, while a negative even number still trips the
    /// odd-only check.
    pub fn rejects(self, number: i32) -> bool {
        match self {
            Parity::Any => false,
            Parity::Odd => number % 2 == 0,
            Parity::Even => number % 2 == 1,
        }
    }
}

/// One clause of a road's encoded rule string.
///
/// A road's value in the dataset is a `|`-delimited list of clauses, each
/// a comma-separated tuple:
///
/// ```text
/// suffix,parity,lane_min,lane_max,alley_min,alley_max,number_min,number_min2,number_max,number_max2
/// ```
///
/// The suffix is the 3-digit zip suffix and stays a string because its
/// leading zeros are significant. Every numeric field defaults to 0 when
/// missing or malformed, and 0 leaves that axis unconstrained. A
/// `number_max` of 9999 or 9998 marks an open-ended range with no upper
/// bound.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleClause {
    /// 3-digit zip suffix appended to the area's 3-digit code
    pub suffix: String,
    /// Odd/even constraint on the house number
    pub parity: Parity,
    /// Lane lower bound, or the exact lane when `lane_max` is 0
    pub lane_min: i32,
    /// Lane upper bound
    pub lane_max: i32,
    /// Alley lower bound, or the exact alley when `alley_max` is 0
    pub alley_min: i32,
    /// Alley upper bound
    pub alley_max: i32,
    /// House-number lower bound
    pub number_min: i32,
    /// Reserved secondary lower bound; parsed but never matched against
    pub number_min2: i32,
    /// House-number upper bound; 9999 and 9998 mean no upper bound
    pub number_max: i32,
    /// Reserved secondary upper bound; parsed but never matched against
    pub number_max2: i32,
}

impl RuleClause {
    /// Parse one comma-separated clause.
    ///
    /// The first field is taken verbatim as the suffix; missing or
    /// non-numeric fields coerce to 0. Parsing never fails.
    pub fn parse(clause: &str) -> Self {
        let mut fields = clause.split(',');
        let suffix = fields.next().unwrap_or("").to_string();
        let mut next_field = || {
            fields
                .next()
                .and_then(|field| field.trim().parse::<i32>().ok())
                .unwrap_or(0)
        };
        let parity = Parity::from_code(next_field());
        let lane_min = next_field();
        let lane_max = next_field();
        let alley_min = next_field();
        let alley_max = next_field();
        let number_min = next_field();
        let number_min2 = next_field();
        let number_max = next_field();
        let number_max2 = next_field();
        RuleClause {
            suffix,
            parity,
            lane_min,
            lane_max,
            alley_min,
            alley_max,
            number_min,
            number_min2,
            number_max,
            number_max2,
        }
    }

    /// Whether `number_max` carries one of the open-range sentinels the
    /// dataset uses for "no upper bound".
    pub fn open_ended(&self) -> bool {
        self.number_max == 9999 || self.number_max == 9998
    }

    /// Check this clause against the supplied address detail.
    ///
    /// All three axes must pass. Lane and alley treat a value of 0 as not
    /// supplied; a house number counts as supplied whenever present,
    /// including 0 and negative values. A supplied number passes only
    /// clauses whose number axis carries a bound or a parity; clauses
    /// without either serve numberless queries and the first-clause
    /// fallback.
    pub fn matches(&self, detail: AddressDetail) -> bool {
        let lane = detail.lane.filter(|&lane| lane != 0);
        let alley = detail.alley.filter(|&alley| alley != 0);
        self.lane_ok(lane) && self.alley_ok(alley) && self.number_ok(detail.number)
    }

    fn lane_ok(&self, lane: Option<i32>) -> bool {
        if self.lane_min <= 0 && self.lane_max <= 0 {
            return true;
        }
        // A lane-constrained clause never matches a query without a lane.
        let Some(lane) = lane else {
            return false;
        };
        if self.lane_min > 0 && self.lane_max > 0 {
            lane >= self.lane_min && lane <= self.lane_max
        } else if self.lane_min > 0 {
            // The open-range sentinel lives in number_max even when the
            // clause constrains lanes: min-only plus sentinel reads "this
            // lane and above", otherwise exactly this lane.
            if self.open_ended() {
                lane >= self.lane_min
            } else {
                lane == self.lane_min
            }
        } else {
            // Max-only clauses require a lane but accept any value.
            true
        }
    }

    fn alley_ok(&self, alley: Option<i32>) -> bool {
        if self.alley_min <= 0 && self.alley_max <= 0 {
            return true;
        }
        let Some(alley) = alley else {
            return false;
        };
        if self.alley_min > 0 && self.alley_max > 0 {
            alley >= self.alley_min && alley <= self.alley_max
        } else if self.alley_min > 0 {
            alley == self.alley_min
        } else {
            true
        }
    }

    fn number_ok(&self, number: Option<i32>) -> bool {
        // Number-constrained clauses still apply to queries without a
        // number; only lane and alley reject on missing input.
        let Some(number) = number else {
            return true;
        };
        if self.number_min > 0 || self.number_max > 0 {
            if self.parity.rejects(number) {
                return false;
            }
            if self.number_min > 0 && number < self.number_min {
                return false;
            }
            if !self.open_ended() && number > self.number_max {
                return false;
            }
            true
        } else if self.parity != Parity::Any {
            !self.parity.rejects(number)
        } else {
            // A supplied number only matches clauses that say something
            // about numbers. Clauses with a bare number axis serve
            // numberless queries and the first-clause fallback.
            false
        }
    }
}

/// Parse a road's encoded rule string into its ordered clause sequence.
///
/// Clause order is preserved: the matcher scans first to last and the
/// first clause doubles as the fallback. An empty string parses to an
/// empty sequence; empty `|` segments parse to all-zero clauses.
pub fn parse_rule_string(raw: &str) -> Vec<RuleClause> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split('|').map(RuleClause::parse).collect()
}
