//! Comma-separated lists of longs with optional `start..stop` ranges

use crate::constraints::Constraints;
use crate::flags::{AllowRanges, Deduplicate, Sort};
use crate::functors::Verdict;
use crate::value::ParamValue;
use std::collections::HashSet;

/// Largest number of values a single range token may expand to
pub const MAX_RANGE_EXPANSION: u64 = 1_000_000;

/// Largest number of values a whole list may hold after expansion
pub const MAX_LIST_VALUES: u64 = MAX_RANGE_EXPANSION;

#[derive(Debug, Clone, Copy)]
pub struct LongListValidator {
    pub allow_ranges: AllowRanges,
    pub deduplicate: Deduplicate,
    pub sort: Sort,
}

impl Default for LongListValidator {
    fn default() -> Self {
        Self {
            allow_ranges: AllowRanges::Allow,
            deduplicate: Deduplicate::Deduplicate,
            sort: Sort::Sort,
        }
    }
}

impl LongListValidator {
    pub fn new(allow_ranges: AllowRanges, deduplicate: Deduplicate, sort: Sort) -> Self {
        Self {
            allow_ranges,
            deduplicate,
            sort,
        }
    }

    pub fn validate(&self, raw: &str, constraints: &Constraints) -> Verdict {
        let mut values = Vec::new();

        for token in raw.split(',').map(str::trim) {
            if token.is_empty() {
                return Verdict::reject(format!("'{}' contains an empty element", raw));
            }

            match self.expand(token, &mut values) {
                Ok(()) => {}
                Err(detail) => return Verdict::Reject(detail),
            }
        }

        if let Some(bad) = values.iter().find(|v| !constraints.long_in_range(**v)) {
            return Verdict::reject(format!(
                "{} does not lie in range {}",
                bad,
                constraints.long_range_text()
            ));
        }

        if self.deduplicate.get() {
            let mut seen = HashSet::with_capacity(values.len());
            values.retain(|v| seen.insert(*v));
        }

        if self.sort.get() {
            values.sort_unstable();
        }

        Verdict::Accept(ParamValue::LongList(values))
    }

    /// Append the value(s) of one token
    fn expand(&self, token: &str, out: &mut Vec<i64>) -> Result<(), String> {
        let range = if self.allow_ranges.get() {
            token.split_once("..")
        } else {
            None
        };

        let Some((start, stop)) = range else {
            let value = parse_long(token)?;
            if out.len() as u64 >= MAX_LIST_VALUES {
                return Err(list_too_long());
            }
            out.push(value);
            return Ok(());
        };

        let start = parse_long(start.trim())?;
        let stop = parse_long(stop.trim())?;

        if start > stop {
            return Err(format!("range '{}' has start greater than stop", token));
        }

        let count = stop as i128 - start as i128 + 1;
        if count > MAX_RANGE_EXPANSION as i128 {
            return Err(format!(
                "range '{}' expands to more than {} values",
                token, MAX_RANGE_EXPANSION
            ));
        }
        if out.len() as i128 + count > MAX_LIST_VALUES as i128 {
            return Err(list_too_long());
        }

        out.extend(start..=stop);
        Ok(())
    }
}

fn list_too_long() -> String {
    format!("list expands to more than {} values", MAX_LIST_VALUES)
}

fn parse_long(token: &str) -> Result<i64, String> {
    token
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not parseable as a long", token))
}
