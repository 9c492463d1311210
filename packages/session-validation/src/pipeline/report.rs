//! Outcome of one validation run

use super::{ErrorList, StageId};
use crate::mode::Mode;
use serde::Serialize;

/// One executed stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageRecord<P> {
    pub parameter: P,
    pub stage: StageId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport<P> {
    pub(super) mode: Mode,
    pub(super) errors: ErrorList,
    pub(super) blocked: Vec<P>,
    pub(super) trace: Vec<StageRecord<P>>,
    pub(super) assigned: bool,
}

impl<P: Copy + PartialEq> ValidationReport<P> {
    /// True when no validation error was recorded
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Resolved mode the run validated against
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn errors(&self) -> &ErrorList {
        &self.errors
    }

    pub fn into_errors(self) -> ErrorList {
        self.errors
    }

    /// Parameters excluded from Assignment because of their own errors
    pub fn blocked(&self) -> &[P] {
        &self.blocked
    }

    pub fn is_blocked(&self, parameter: P) -> bool {
        self.blocked.contains(&parameter)
    }

    pub fn trace(&self) -> &[StageRecord<P>] {
        &self.trace
    }

    /// Stages executed for one parameter, in execution order
    pub fn stages_for(&self, parameter: P) -> Vec<StageId> {
        self.trace
            .iter()
            .filter(|r| r.parameter == parameter)
            .map(|r| r.stage)
            .collect()
    }

    /// Whether the Assignment pass ran
    pub fn assigned(&self) -> bool {
        self.assigned
    }
}
