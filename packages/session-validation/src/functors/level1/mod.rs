//! Level 1: syntax and type check of one raw value in isolation

mod choice;
mod file;
mod long_list;
mod numeric;
mod string;

pub use choice::{ChoiceEnum, EnumChoices, EnumeratedParse, EnumeratedRegistry, EnumeratedType};
pub use file::FileValidator;
pub use long_list::LongListValidator;
pub use numeric::{DoubleValidator, LongValidator};
pub use string::StringValidator;

use super::{StageContext, Verdict};
use crate::constraints::Constraints;
use crate::errors::ParameterResult;
use crate::value::ValueType;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied Level 1 check
pub type CustomLevel1 =
    Arc<dyn Fn(&str, &Constraints, &StageContext<'_>) -> ParameterResult<Verdict> + Send + Sync>;

/// Level 1 functor
#[derive(Clone)]
pub enum Level1 {
    String(StringValidator),
    Long(LongValidator),
    Double(DoubleValidator),
    File(FileValidator),
    Enum(EnumChoices),
    Enumerated(Arc<EnumeratedType>),
    LongList(LongListValidator),
    Custom(CustomLevel1),
}

impl Level1 {
    pub fn string() -> Self {
        Level1::String(StringValidator::new())
    }

    pub fn long() -> Self {
        Level1::Long(LongValidator)
    }

    pub fn double() -> Self {
        Level1::Double(DoubleValidator)
    }

    pub fn file() -> Self {
        Level1::File(FileValidator)
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &Constraints, &StageContext<'_>) -> ParameterResult<Verdict>
            + Send
            + Sync
            + 'static,
    {
        Level1::Custom(Arc::new(f))
    }

    /// Check `raw` and convert it on success.
    ///
    /// `Err` is reserved for internal errors; bad user input is a
    /// [`Verdict::Reject`].
    pub fn check(
        &self,
        raw: &str,
        constraints: &Constraints,
        ctx: &StageContext<'_>,
    ) -> ParameterResult<Verdict> {
        match self {
            Level1::String(v) => Ok(v.validate(raw, constraints)),
            Level1::Long(v) => Ok(v.validate(raw, constraints)),
            Level1::Double(v) => Ok(v.validate(raw, constraints)),
            Level1::File(v) => Ok(v.validate(raw, constraints)),
            Level1::Enum(v) => Ok(v.validate(raw, ctx.preview_limit)),
            Level1::Enumerated(v) => v.validate(raw, ctx.preview_limit),
            Level1::LongList(v) => Ok(v.validate(raw, constraints)),
            Level1::Custom(f) => f(raw, constraints, ctx),
        }
    }

    /// Value type produced on acceptance, when known statically
    pub fn produces(&self) -> Option<ValueType> {
        match self {
            Level1::String(_) => Some(ValueType::String),
            Level1::Long(_) => Some(ValueType::Long),
            Level1::Double(_) => Some(ValueType::Double),
            Level1::File(_) => Some(ValueType::File),
            Level1::Enum(_) => Some(ValueType::Enum),
            Level1::LongList(_) => Some(ValueType::LongList),
            Level1::Enumerated(_) | Level1::Custom(_) => None,
        }
    }
}

impl fmt::Debug for Level1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level1::String(v) => f.debug_tuple("String").field(v).finish(),
            Level1::Long(_) => f.write_str("Long"),
            Level1::Double(_) => f.write_str("Double"),
            Level1::File(_) => f.write_str("File"),
            Level1::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
            Level1::Enumerated(v) => f.debug_tuple("Enumerated").field(&v.tag()).finish(),
            Level1::LongList(v) => f.debug_tuple("LongList").field(v).finish(),
            Level1::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Fold a multi-word command-line value into constant form:
/// `"Selected DL"` becomes `"SELECTED_DL"`.
pub fn normalize_choice(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .collect::<String>()
        .to_uppercase()
}
