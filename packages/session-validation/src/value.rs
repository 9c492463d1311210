//! Parameter values
//!
//! [`ParamValue`] is the closed set of values a parameter can carry, and
//! [`ValueHolder`] is the per-parameter slot the pipeline stages fill in.

use crate::errors::{ParameterError, ParameterResult};
use crate::functors::level1::normalize_choice;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Declared value type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Boolean,
    Long,
    Double,
    String,
    File,
    Enum,
    LongList,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::File => "file",
            ValueType::Enum => "enum",
            ValueType::LongList => "long list",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constant of an enumerated type, identified by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnumValue {
    pub type_name: String,
    pub name: String,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A parameter value
///
/// Raw command-line arguments enter the pipeline as `Text` and are replaced by
/// their typed form in Level 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Long(i64),
    Double(f64),
    LongList(Vec<i64>),
    Text(String),
    Path(PathBuf),
    Enum(EnumValue),
}

impl ParamValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            ParamValue::Bool(_) => ValueType::Boolean,
            ParamValue::Long(_) => ValueType::Long,
            ParamValue::Double(_) => ValueType::Double,
            ParamValue::LongList(_) => ValueType::LongList,
            ParamValue::Text(_) => ValueType::String,
            ParamValue::Path(_) => ValueType::File,
            ParamValue::Enum(_) => ValueType::Enum,
        }
    }

    /// Strings, paths and enum constants are quoted in messages
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            ParamValue::Text(_) | ParamValue::Path(_) | ParamValue::Enum(_)
        )
    }

    /// Display form used in error messages
    pub fn quoted(&self) -> String {
        if self.is_string_like() {
            format!("'{}'", self)
        } else {
            self.to_string()
        }
    }

    /// Loose equality for set membership: numbers compare numerically and
    /// string-like values compare by their text. Text compared against an
    /// enum constant is normalized the way enum input is, so `ops` and
    /// `selected dl` match `OPS` and `SELECTED_DL`.
    pub fn matches(&self, other: &ParamValue) -> bool {
        match (self, other) {
            (ParamValue::Long(a), ParamValue::Double(b))
            | (ParamValue::Double(b), ParamValue::Long(a)) => (*a as f64) == *b,
            (ParamValue::Enum(e), ParamValue::Enum(o)) => e.name == o.name,
            (ParamValue::Enum(e), text) | (text, ParamValue::Enum(e)) if text.is_string_like() => {
                normalize_choice(&text.to_string()) == e.name
            }
            (a, b) if a.is_string_like() && b.is_string_like() => a.to_string() == b.to_string(),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Long(v) => write!(f, "{}", v),
            ParamValue::Double(v) => write!(f, "{}", v),
            ParamValue::LongList(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                f.write_str(&parts.join(","))
            }
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Path(p) => write!(f, "{}", p.display()),
            ParamValue::Enum(e) => write!(f, "{}", e),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Long(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Double(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<PathBuf> for ParamValue {
    fn from(v: PathBuf) -> Self {
        ParamValue::Path(v)
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(v: Vec<i64>) -> Self {
        ParamValue::LongList(v)
    }
}

impl From<EnumValue> for ParamValue {
    fn from(v: EnumValue) -> Self {
        ParamValue::Enum(v)
    }
}

/// Typed extraction from a [`ParamValue`]
pub trait FromParamValue: Sized {
    const TYPE: ValueType;

    fn from_param(value: &ParamValue) -> Option<Self>;
}

macro_rules! impl_from_param {
    ($ty:ty, $variant:ident, $value_type:expr) => {
        impl FromParamValue for $ty {
            const TYPE: ValueType = $value_type;

            fn from_param(value: &ParamValue) -> Option<Self> {
                match value {
                    ParamValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_from_param!(bool, Bool, ValueType::Boolean);
impl_from_param!(i64, Long, ValueType::Long);
impl_from_param!(f64, Double, ValueType::Double);
impl_from_param!(String, Text, ValueType::String);
impl_from_param!(PathBuf, Path, ValueType::File);
impl_from_param!(Vec<i64>, LongList, ValueType::LongList);
impl_from_param!(EnumValue, Enum, ValueType::Enum);

// ═══════════════════════════════════════════════════════════════════════════
// ValueHolder
// ═══════════════════════════════════════════════════════════════════════════

/// Current value of one parameter plus whether the engine supplied it.
///
/// `defaulted` can only become true together with a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueHolder {
    value: Option<ParamValue>,
    defaulted: bool,
}

impl ValueHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_defaulted(&self) -> bool {
        self.defaulted
    }

    pub fn value(&self) -> Option<&ParamValue> {
        self.value.as_ref()
    }

    /// Store a user-supplied (or Level 1 converted) value
    pub fn set(&mut self, value: ParamValue) {
        self.value = Some(value);
        self.defaulted = false;
    }

    /// Store an engine-supplied value
    pub fn set_defaulted(&mut self, value: ParamValue) {
        self.value = Some(value);
        self.defaulted = true;
    }

    pub fn clear(&mut self) {
        self.value = None;
        self.defaulted = false;
    }

    /// Typed read; a value of another type is an internal error
    pub fn get<T: FromParamValue>(&self, parameter: &str) -> ParameterResult<Option<T>> {
        match &self.value {
            None => Ok(None),
            Some(v) => T::from_param(v)
                .map(Some)
                .ok_or_else(|| ParameterError::ValueType {
                    parameter: parameter.to_string(),
                    expected: T::TYPE.to_string(),
                    found: v.value_type().to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holder_lifecycle() {
        let mut holder = ValueHolder::new();
        assert!(!holder.has_value());
        assert!(!holder.is_defaulted());

        holder.set_defaulted(ParamValue::Long(5));
        assert!(holder.has_value());
        assert!(holder.is_defaulted());

        holder.set(ParamValue::Long(6));
        assert!(!holder.is_defaulted());

        holder.clear();
        assert!(!holder.has_value());
        assert!(!holder.is_defaulted());
    }

    #[test]
    fn test_typed_get() {
        let mut holder = ValueHolder::new();
        assert_eq!(holder.get::<i64>("--port").unwrap(), None);

        holder.set(ParamValue::Long(42));
        assert_eq!(holder.get::<i64>("--port").unwrap(), Some(42));

        let err = holder.get::<String>("--port").unwrap_err();
        assert!(matches!(err, ParameterError::ValueType { .. }));
        assert!(err.to_string().contains("long"));
    }

    #[test]
    fn test_quoting() {
        assert_eq!(ParamValue::from("abc").quoted(), "'abc'");
        assert_eq!(ParamValue::Long(7).quoted(), "7");
        assert_eq!(
            ParamValue::Enum(EnumValue::new("Venue", "TESTSET")).quoted(),
            "'TESTSET'"
        );
    }

    #[test]
    fn test_matches() {
        assert!(ParamValue::Long(3).matches(&ParamValue::Double(3.0)));
        assert!(ParamValue::Enum(EnumValue::new("Venue", "OPS")).matches(&ParamValue::from("OPS")));
        assert!(!ParamValue::from("ops").matches(&ParamValue::from("OPS")));
        assert!(ParamValue::from("ops").matches(&ParamValue::Enum(EnumValue::new("Venue", "OPS"))));
        assert!(ParamValue::Enum(EnumValue::new("Venue", "SELECTED_DL"))
            .matches(&ParamValue::from("selected dl")));
        assert!(!ParamValue::from("opsx").matches(&ParamValue::Enum(EnumValue::new("Venue", "OPS"))));
        assert!(!ParamValue::Long(3).matches(&ParamValue::from("3")));
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamValue::LongList(vec![1, 3, 4]).to_string(), "1,3,4");
        assert_eq!(ParamValue::Double(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<ParamValue> = serde_yaml::from_str("[1, 2.5, abc, true]").unwrap();
        assert_eq!(
            values,
            vec![
                ParamValue::Long(1),
                ParamValue::Double(2.5),
                ParamValue::from("abc"),
                ParamValue::Bool(true),
            ]
        );
    }
}
