//! Session parameter validation engine
//!
//! Each configuration parameter of a session is declared once with its value
//! type, constraints, the modes in which it may or must be supplied, and a
//! set of stage functors. A [`ValidationPipeline`] then turns raw
//! command-line text into typed values and commits them into a caller-owned
//! configuration object.
//!
//! ```text
//! ValidationState::new   mode resolution (fail fast)
//!        │
//!        ▼
//! ValidationPipeline::run
//!        ├─ pass 1  Level 1 → Level 2 → Default     (per parameter)
//!        ├─ pass 2  Level 3                         (cross-parameter)
//!        ├─ pass 3  Special
//!        └─ pass 4  Assignment
//!        │
//!        ▼
//! ValidationReport { errors: ["Option --port 70000 does not lie in range [1,65535]"], .. }
//! ```
//!
//! User mistakes are collected as strings in the report. Declaration bugs and
//! other impossible states surface as [`ParameterError`] and end the run.

pub mod attributes;
pub mod config;
pub mod constraints;
pub mod errors;
pub mod flags;
pub mod functors;
pub mod mode;
pub mod pipeline;
pub mod state;
pub mod value;

pub use attributes::{ParameterAttributes, ParameterAttributesBuilder, ParameterId};
pub use config::ValidationConfig;
pub use constraints::{Constraints, MustExist};
pub use errors::{ParameterError, ParameterResult};
pub use functors::{
    Assignment, ChoiceEnum, CrossContext, DefaultFunctor, EnumChoices, EnumeratedParse,
    EnumeratedRegistry, EnumeratedType, Level1, Level2, Level3, MissionValues, Special,
    StageContext, Verdict,
};
pub use mode::{Capability, Mode, ModeSet};
pub use pipeline::{
    AssignmentPolicy, ErrorList, ParameterTable, RawInputs, RawValue, StageId, StageRecord,
    ValidationPipeline, ValidationReport,
};
pub use state::{resolve_mode, ValidationState};
pub use value::{EnumValue, FromParamValue, ParamValue, ValueHolder, ValueType};
