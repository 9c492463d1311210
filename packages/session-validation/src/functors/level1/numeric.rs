//! Long and double values

use crate::constraints::Constraints;
use crate::functors::Verdict;
use crate::value::ParamValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct LongValidator;

impl LongValidator {
    pub fn validate(&self, raw: &str, constraints: &Constraints) -> Verdict {
        match raw.trim().parse::<i64>() {
            Err(_) => Verdict::reject(format!("'{}' is not parseable as a long", raw)),
            Ok(v) if !constraints.long_in_range(v) => Verdict::reject(format!(
                "{} does not lie in range {}",
                v,
                constraints.long_range_text()
            )),
            Ok(v) => Verdict::Accept(ParamValue::Long(v)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleValidator;

impl DoubleValidator {
    pub fn validate(&self, raw: &str, constraints: &Constraints) -> Verdict {
        match raw.trim().parse::<f64>() {
            Err(_) => Verdict::reject(format!("'{}' is not parseable as a double", raw)),
            Ok(v) if !constraints.double_in_range(v) => Verdict::reject(format!(
                "{} does not lie in range {}",
                v,
                constraints.double_range_text()
            )),
            Ok(v) => Verdict::Accept(ParamValue::Double(v)),
        }
    }
}
