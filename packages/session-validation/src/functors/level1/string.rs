//! String values: length bounds plus an optional permitted character set

use crate::constraints::Constraints;
use crate::functors::Verdict;
use crate::value::ParamValue;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct StringValidator {
    permitted: Option<BTreeSet<char>>,
}

impl StringValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict values to the characters in `chars`
    pub fn permitted_chars(mut self, chars: &str) -> Self {
        self.permitted = Some(chars.chars().collect());
        self
    }

    pub fn validate(&self, raw: &str, constraints: &Constraints) -> Verdict {
        let value = if constraints.uppercase().get() {
            raw.to_uppercase()
        } else {
            raw.to_string()
        };

        let length = value.chars().count();
        if !constraints.length_in_range(length) {
            return Verdict::reject(format!(
                "'{}' has length {} which does not lie in range {}",
                value,
                length,
                constraints.long_range_text()
            ));
        }

        if let Some(permitted) = &self.permitted {
            if let Some((offset, c)) = value
                .chars()
                .enumerate()
                .find(|(_, c)| !permitted.contains(c))
            {
                return Verdict::reject(format!(
                    "'{}' contains illegal character '{}' at offset {} (0x{:X})",
                    value, c, offset, c as u32
                ));
            }
        }

        Verdict::Accept(ParamValue::Text(value))
    }
}
