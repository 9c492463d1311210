//! Staged validation pipeline
//!
//! ```text
//! reset holders
//!   │
//!   ▼
//! pass 1, per parameter:  mode check → Level 1 → Level 2 → Default → required check
//!   │
//!   ▼
//! pass 2, whole table:    Level 3
//!   │
//!   ▼
//! pass 3, whole table:    Special
//!   │
//!   ▼
//! pass 4, whole table:    Assignment   (only if valid, or best effort)
//! ```
//!
//! Validation errors never stop a run; every pass completes so the caller
//! gets the full report. A [`ParameterError`] aborts the run immediately.

mod error_list;
mod report;
mod table;

pub use error_list::ErrorList;
pub use report::{StageRecord, ValidationReport};
pub use table::ParameterTable;

use crate::attributes::{ParameterAttributes, ParameterId};
use crate::config::ValidationConfig;
use crate::errors::{ParameterError, ParameterResult};
use crate::functors::{CrossContext, StageContext, Verdict, DEFAULT_PREVIEW_LIMIT};
use crate::state::ValidationState;
use crate::value::ParamValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

/// Pipeline stage identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Level1,
    Level2,
    Default,
    Level3,
    Special,
    Assignment,
}

impl StageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Level1 => "level1",
            StageId::Level2 => "level2",
            StageId::Default => "default",
            StageId::Level3 => "level3",
            StageId::Special => "special",
            StageId::Assignment => "assignment",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw input for one parameter, as produced by the command-line parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    /// Presence-only option, already resolved
    Flag(bool),
}

/// Raw inputs for one run; absent parameters are simply not present
#[derive(Debug, Clone)]
pub struct RawInputs<P> {
    values: BTreeMap<P, RawValue>,
}

impl<P: ParameterId> RawInputs<P> {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn text(mut self, parameter: P, raw: impl Into<String>) -> Self {
        self.insert(parameter, RawValue::Text(raw.into()));
        self
    }

    pub fn flag(mut self, parameter: P, present: bool) -> Self {
        self.insert(parameter, RawValue::Flag(present));
        self
    }

    pub fn insert(&mut self, parameter: P, raw: RawValue) {
        self.values.insert(parameter, raw);
    }

    pub fn get(&self, parameter: P) -> Option<&RawValue> {
        self.values.get(&parameter)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<P: ParameterId> Default for RawInputs<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// What to do with the Assignment pass when validation failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPolicy {
    /// Skip Assignment entirely if any error was recorded
    #[default]
    OnlyIfValid,
    /// Assign every parameter that is not blocked
    BestEffort,
}

/// Owns the parameter table and drives the stages over it
pub struct ValidationPipeline<P, C> {
    table: ParameterTable<P, C>,
    preview_limit: usize,
    assignment_policy: AssignmentPolicy,
}

/// Result of pass 1 for one parameter
struct ParameterPass {
    errors: ErrorList,
    blocked: bool,
}

impl ParameterPass {
    fn ok() -> Self {
        Self {
            errors: ErrorList::new(),
            blocked: false,
        }
    }

    fn blocked(display_name: &str, detail: impl fmt::Display) -> Self {
        let mut errors = ErrorList::new();
        errors.reject(display_name, detail);
        Self {
            errors,
            blocked: true,
        }
    }
}

impl<P: ParameterId, C> ValidationPipeline<P, C> {
    pub fn new(table: ParameterTable<P, C>) -> Self {
        Self {
            table,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            assignment_policy: AssignmentPolicy::default(),
        }
    }

    pub fn preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit.max(1);
        self
    }

    pub fn assignment_policy(mut self, policy: AssignmentPolicy) -> Self {
        self.assignment_policy = policy;
        self
    }

    /// Apply an engine configuration: preview limit, assignment policy and
    /// mission allowed-value tables (as Level 2 set membership)
    pub fn with_config(mut self, config: &ValidationConfig) -> ParameterResult<Self> {
        config.validate()?;
        self.preview_limit = config.preview_limit;
        self.assignment_policy = config.assignment;

        for name in config.parameter_names() {
            let id = self
                .table
                .iter()
                .find(|(_, a)| a.option_name() == Some(name) || a.display_name() == name)
                .map(|(id, _)| id)
                .ok_or_else(|| {
                    ParameterError::internal(format!(
                        "allowed_values names unknown parameter '{}'",
                        name
                    ))
                })?;

            if let (Some(values), Some(attrs)) = (config.allowed_for(name), self.table.get_mut(id)) {
                attrs.attach_allowed_values(values)?;
            }
        }

        Ok(self)
    }

    pub fn table(&self) -> &ParameterTable<P, C> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ParameterTable<P, C> {
        &mut self.table
    }

    /// Run every pass against `inputs` and commit into `target`
    pub fn run(
        &mut self,
        state: &ValidationState,
        inputs: &RawInputs<P>,
        target: &mut C,
    ) -> ParameterResult<ValidationReport<P>> {
        self.table.reset();

        let ctx = StageContext::new(state).with_preview_limit(self.preview_limit);
        let mut errors = ErrorList::new();
        let mut blocked = BTreeSet::new();
        let mut trace = Vec::new();

        for (id, attrs) in self.table.iter_mut() {
            let pass = validate_parameter(attrs, inputs.get(id), &ctx, &mut trace)?;
            errors.extend(pass.errors);
            if pass.blocked {
                blocked.insert(id);
            }
        }

        errors.extend(self.cross_check(state, &blocked, &mut trace)?);
        self.supply_special(state, &blocked, &mut trace)?;

        let assigned = errors.is_empty() || self.assignment_policy == AssignmentPolicy::BestEffort;
        if assigned {
            self.assign(target, &blocked, &mut trace)?;
        }

        info!(
            mode = %state.mode(),
            errors = errors.len(),
            blocked = blocked.len(),
            assigned,
            "validation finished"
        );

        Ok(ValidationReport {
            mode: state.mode(),
            errors,
            blocked: blocked.into_iter().collect(),
            trace,
            assigned,
        })
    }

    fn cross_check(
        &self,
        state: &ValidationState,
        blocked: &BTreeSet<P>,
        trace: &mut Vec<StageRecord<P>>,
    ) -> ParameterResult<ErrorList> {
        let mut errors = ErrorList::new();

        for (id, attrs) in self.table.iter() {
            let Some(level3) = attrs.level3() else {
                continue;
            };

            record(trace, id, StageId::Level3);
            let ctx = CrossContext {
                parameter: id,
                table: &self.table,
                blocked,
                state,
            };
            for detail in level3.check(&ctx)? {
                errors.reject(attrs.display_name(), detail);
            }
        }

        Ok(errors)
    }

    fn supply_special(
        &mut self,
        state: &ValidationState,
        blocked: &BTreeSet<P>,
        trace: &mut Vec<StageRecord<P>>,
    ) -> ParameterResult<()> {
        for (id, attrs) in self.table.iter_mut() {
            if attrs.has_value() || blocked.contains(&id) {
                continue;
            }
            let Some(special) = attrs.special().cloned() else {
                continue;
            };

            record(trace, id, StageId::Special);
            let display = attrs.display_name().to_string();
            special.apply(&display, attrs.value_mut(), state)?;
        }
        Ok(())
    }

    fn assign(
        &self,
        target: &mut C,
        blocked: &BTreeSet<P>,
        trace: &mut Vec<StageRecord<P>>,
    ) -> ParameterResult<()> {
        for (id, attrs) in self.table.iter() {
            if blocked.contains(&id) || !attrs.has_value() {
                continue;
            }
            if let Some(assignment) = attrs.assignment() {
                record(trace, id, StageId::Assignment);
                assignment.assign(target, attrs.value())?;
            }
        }
        Ok(())
    }
}

impl<P: fmt::Debug, C> fmt::Debug for ValidationPipeline<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationPipeline")
            .field("table", &self.table)
            .field("preview_limit", &self.preview_limit)
            .field("assignment_policy", &self.assignment_policy)
            .finish()
    }
}

fn record<P: ParameterId>(trace: &mut Vec<StageRecord<P>>, parameter: P, stage: StageId) {
    debug!(%parameter, %stage, "running stage");
    trace.push(StageRecord { parameter, stage });
}

/// Pass 1 for one parameter: mode check, Level 1, Level 2, Default,
/// required check
fn validate_parameter<P: ParameterId, C>(
    attrs: &mut ParameterAttributes<P, C>,
    raw: Option<&RawValue>,
    ctx: &StageContext<'_>,
    trace: &mut Vec<StageRecord<P>>,
) -> ParameterResult<ParameterPass> {
    let id = attrs.index();
    let mode = ctx.state.mode();
    let display = attrs.display_name().to_string();

    if !attrs.has_mode(mode) {
        return Ok(match raw {
            Some(_) => ParameterPass::blocked(&display, format!("is not allowed in mode {}", mode)),
            None => ParameterPass::ok(),
        });
    }

    match raw {
        Some(RawValue::Text(_)) if !attrs.needs_argument() => {
            return Err(ParameterError::internal(format!(
                "parameter {} takes no argument but received text",
                display
            )));
        }
        Some(RawValue::Flag(_)) if attrs.needs_argument() => {
            return Err(ParameterError::internal(format!(
                "parameter {} takes an argument but received a flag",
                display
            )));
        }
        Some(RawValue::Flag(_)) if attrs.option_name().is_none() => {
            return Err(ParameterError::internal(format!(
                "parameter {} cannot be supplied on the command line",
                display
            )));
        }
        _ => {}
    }

    if attrs.is_flag() {
        match raw {
            Some(RawValue::Flag(present)) => attrs.value_mut().set(ParamValue::Bool(*present)),
            _ => attrs.value_mut().set_defaulted(ParamValue::Bool(false)),
        }
    }

    if let Some(RawValue::Text(text)) = raw {
        match attrs.level1() {
            Some(level1) => {
                record(trace, id, StageId::Level1);
                match level1.check(text, attrs.constraints(), ctx)? {
                    Verdict::Accept(value) => {
                        if value.value_type() != attrs.value_type() {
                            return Err(ParameterError::ValueType {
                                parameter: display,
                                expected: attrs.value_type().to_string(),
                                found: value.value_type().to_string(),
                            });
                        }
                        attrs.value_mut().set(value);
                    }
                    Verdict::Reject(detail) => return Ok(ParameterPass::blocked(&display, detail)),
                }
            }
            None => attrs.value_mut().set(ParamValue::Text(text.clone())),
        }

        if let (Some(level2), Some(value)) = (attrs.level2(), attrs.value().value()) {
            record(trace, id, StageId::Level2);
            if let Some(detail) = level2.check(value, ctx)? {
                return Ok(ParameterPass::blocked(&display, detail));
            }
        }
    }

    if !attrs.has_value() {
        if let Some(default) = attrs.default_functor().cloned() {
            record(trace, id, StageId::Default);
            default.apply(&display, attrs.value_mut(), ctx.state)?;
        }
    }

    if attrs.is_required(mode) && !attrs.has_value() {
        return Ok(ParameterPass::blocked(&display, format!("is required in mode {}", mode)));
    }

    Ok(ParameterPass::ok())
}
