//! Parameter constraints
//!
//! Numeric bounds double as length bounds for strings and paths.

use crate::errors::{ParameterError, ParameterResult};
use crate::flags::{IsDirectory, Uppercase};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Existence requirement for file parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MustExist {
    MustExist,
    MustNotExist,
    MayExist,
}

impl fmt::Display for MustExist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MustExist::MustExist => "MUST_EXIST",
            MustExist::MustNotExist => "MUST_NOT_EXIST",
            MustExist::MayExist => "MAY_EXIST",
        })
    }
}

/// Immutable constraint record
///
/// Deserialization goes through [`Constraints::new`], so bound checks apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConstraintsRecord")]
pub struct Constraints {
    min_long: i64,
    max_long: i64,
    min_double: f64,
    max_double: f64,
    uppercase: Uppercase,
    must_exist: MustExist,
    is_directory: IsDirectory,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConstraintsRecord {
    min_long: i64,
    max_long: i64,
    min_double: f64,
    max_double: f64,
    uppercase: Uppercase,
    must_exist: MustExist,
    is_directory: IsDirectory,
}

impl TryFrom<ConstraintsRecord> for Constraints {
    type Error = ParameterError;

    fn try_from(r: ConstraintsRecord) -> ParameterResult<Self> {
        Constraints::new(
            r.min_long,
            r.max_long,
            r.min_double,
            r.max_double,
            r.uppercase,
            r.must_exist,
            r.is_directory,
        )
    }
}

impl Constraints {
    /// No constraint: full range for both numeric kinds
    pub const NONE: Constraints = Constraints {
        min_long: i64::MIN,
        max_long: i64::MAX,
        min_double: f64::MIN,
        max_double: f64::MAX,
        uppercase: Uppercase::AsIs,
        must_exist: MustExist::MayExist,
        is_directory: IsDirectory::File,
    };

    pub fn new(
        min_long: i64,
        max_long: i64,
        min_double: f64,
        max_double: f64,
        uppercase: Uppercase,
        must_exist: MustExist,
        is_directory: IsDirectory,
    ) -> ParameterResult<Self> {
        if min_long > max_long {
            return Err(ParameterError::InvalidConstraints(format!(
                "minimum long {} exceeds maximum long {}",
                min_long, max_long
            )));
        }

        if min_double.is_nan() || max_double.is_nan() {
            return Err(ParameterError::InvalidConstraints(
                "double bounds cannot be NaN".to_string(),
            ));
        }

        if min_double > max_double {
            return Err(ParameterError::InvalidConstraints(format!(
                "minimum double {} exceeds maximum double {}",
                min_double, max_double
            )));
        }

        Ok(Self {
            min_long,
            max_long,
            min_double,
            max_double,
            uppercase,
            must_exist,
            is_directory,
        })
    }

    pub fn builder() -> ConstraintsBuilder {
        ConstraintsBuilder(Self::NONE)
    }

    /// Shorthand for long bounds only
    pub fn long_range(min: i64, max: i64) -> ParameterResult<Self> {
        Self::builder().long_range(min, max).build()
    }

    /// Shorthand for double bounds only
    pub fn double_range(min: f64, max: f64) -> ParameterResult<Self> {
        Self::builder().double_range(min, max).build()
    }

    pub fn min_long(&self) -> i64 {
        self.min_long
    }

    pub fn max_long(&self) -> i64 {
        self.max_long
    }

    pub fn min_double(&self) -> f64 {
        self.min_double
    }

    pub fn max_double(&self) -> f64 {
        self.max_double
    }

    pub fn uppercase(&self) -> Uppercase {
        self.uppercase
    }

    pub fn must_exist(&self) -> MustExist {
        self.must_exist
    }

    pub fn is_directory(&self) -> IsDirectory {
        self.is_directory
    }

    pub fn long_in_range(&self, value: i64) -> bool {
        (self.min_long..=self.max_long).contains(&value)
    }

    /// NaN never lies in range
    pub fn double_in_range(&self, value: f64) -> bool {
        (self.min_double..=self.max_double).contains(&value)
    }

    /// Length check against the long bounds
    pub fn length_in_range(&self, length: usize) -> bool {
        i64::try_from(length)
            .map(|len| self.long_in_range(len))
            .unwrap_or(false)
    }

    pub(crate) fn long_range_text(&self) -> String {
        format!("[{},{}]", self.min_long, self.max_long)
    }

    pub(crate) fn double_range_text(&self) -> String {
        format!("[{},{}]", self.min_double, self.max_double)
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::NONE
    }
}

/// Builder over [`Constraints`]; bounds are checked in `build`
#[derive(Debug, Clone)]
pub struct ConstraintsBuilder(Constraints);

impl ConstraintsBuilder {
    pub fn long_range(mut self, min: i64, max: i64) -> Self {
        self.0.min_long = min;
        self.0.max_long = max;
        self
    }

    pub fn double_range(mut self, min: f64, max: f64) -> Self {
        self.0.min_double = min;
        self.0.max_double = max;
        self
    }

    pub fn uppercase(mut self, uppercase: Uppercase) -> Self {
        self.0.uppercase = uppercase;
        self
    }

    pub fn must_exist(mut self, must_exist: MustExist) -> Self {
        self.0.must_exist = must_exist;
        self
    }

    pub fn is_directory(mut self, is_directory: IsDirectory) -> Self {
        self.0.is_directory = is_directory;
        self
    }

    pub fn build(self) -> ParameterResult<Constraints> {
        let c = self.0;
        Constraints::new(
            c.min_long,
            c.max_long,
            c.min_double,
            c.max_double,
            c.uppercase,
            c.must_exist,
            c.is_directory,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_full_range() {
        let c = Constraints::default();
        assert!(c.long_in_range(i64::MIN));
        assert!(c.long_in_range(i64::MAX));
        assert!(c.double_in_range(f64::MAX));
        assert!(!c.double_in_range(f64::NAN));
        assert_eq!(c.must_exist(), MustExist::MayExist);
    }

    #[test]
    fn test_inverted_long_bounds_rejected() {
        let err = Constraints::long_range(10, 1).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidConstraints(_)));
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_inverted_double_bounds_rejected() {
        assert!(Constraints::double_range(1.5, -1.5).is_err());
        assert!(Constraints::double_range(f64::NAN, 1.0).is_err());
        assert!(Constraints::double_range(-1.5, 1.5).is_ok());
    }

    #[test]
    fn test_builder() {
        let c = Constraints::builder()
            .long_range(1, 65535)
            .uppercase(Uppercase::Uppercase)
            .must_exist(MustExist::MustNotExist)
            .is_directory(IsDirectory::Directory)
            .build()
            .unwrap();
        assert_eq!(c.min_long(), 1);
        assert_eq!(c.max_long(), 65535);
        assert_eq!(c.uppercase(), Uppercase::Uppercase);
        assert_eq!(c.must_exist(), MustExist::MustNotExist);
        assert_eq!(c.is_directory(), IsDirectory::Directory);
        assert_eq!(c.long_range_text(), "[1,65535]");
    }

    #[test]
    fn test_length_in_range() {
        let c = Constraints::long_range(2, 4).unwrap();
        assert!(!c.length_in_range(1));
        assert!(c.length_in_range(2));
        assert!(c.length_in_range(4));
        assert!(!c.length_in_range(5));
    }

    #[test]
    fn test_deserialize_checks_bounds() {
        let c = Constraints::long_range(1, 65535).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(serde_json::from_str::<Constraints>(&json).unwrap(), c);

        let inverted = json.replace("\"min_long\":1", "\"min_long\":70000");
        let err = serde_json::from_str::<Constraints>(&inverted).unwrap_err();
        assert!(err.to_string().contains("minimum long 70000 exceeds maximum long 65535"));
    }
}
