//! Stage functors
//!
//! One closed sum type per pipeline stage. Built-in variants cover the usual
//! value kinds; `Custom` variants take a closure for anything
//! registration-specific.
//!
//! | Stage      | Type               | Sees                              |
//! |------------|--------------------|-----------------------------------|
//! | Level 1    | [`Level1`]         | raw text + constraints            |
//! | Level 2    | [`Level2`]         | typed value + mission             |
//! | Default    | [`DefaultFunctor`] | session state                     |
//! | Level 3    | [`Level3`]         | the whole parameter table         |
//! | Special    | [`Special`]        | session state                     |
//! | Assignment | [`Assignment`]     | value + caller configuration      |

pub mod assignment;
pub mod cross;
pub mod level1;
pub mod level2;
pub mod supply;

pub use assignment::Assignment;
pub use cross::{CrossContext, Level3};
pub use level1::{
    ChoiceEnum, DoubleValidator, EnumChoices, EnumeratedParse, EnumeratedRegistry,
    EnumeratedType, FileValidator, Level1, LongListValidator, LongValidator, StringValidator,
};
pub use level2::{Level2, MissionValues};
pub use supply::{DefaultFunctor, Special};

use crate::state::ValidationState;
use crate::value::ParamValue;

/// Default cap on the number of choices listed in an error message
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// Outcome of a single-value check
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Value accepted, possibly converted
    Accept(ParamValue),
    /// Value rejected; the detail follows the option's display name
    Reject(String),
}

impl Verdict {
    pub fn reject(detail: impl Into<String>) -> Self {
        Verdict::Reject(detail.into())
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept(_))
    }
}

/// Read-only context shared by the per-parameter stages of one run
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub state: &'a ValidationState,
    pub preview_limit: usize,
}

impl<'a> StageContext<'a> {
    pub fn new(state: &'a ValidationState) -> Self {
        Self {
            state,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }

    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit.max(1);
        self
    }
}

/// Join at most `limit` choices, prefixed with "first N of M" when truncated.
///
/// Callers sort and de-duplicate beforehand when order matters.
pub fn choice_preview(choices: &[String], limit: usize) -> String {
    let limit = limit.max(1);
    if choices.len() <= limit {
        choices.join(", ")
    } else {
        format!(
            "first {} of {}: {}",
            limit,
            choices.len(),
            choices[..limit].join(", ")
        )
    }
}
