//! Level 2: mission-specific semantic checks on a Level 1 value

use super::{choice_preview, StageContext};
use crate::errors::ParameterResult;
use crate::value::ParamValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Allowed values per mission; mission names compare case-insensitively
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissionValues {
    by_mission: BTreeMap<String, Vec<ParamValue>>,
}

impl MissionValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mission(mut self, mission: &str, values: Vec<ParamValue>) -> Self {
        self.insert(mission, values);
        self
    }

    pub fn insert(&mut self, mission: &str, values: Vec<ParamValue>) {
        self.by_mission
            .entry(mission.to_lowercase())
            .or_default()
            .extend(values);
    }

    pub fn for_mission(&self, mission: &str) -> Option<&[ParamValue]> {
        self.by_mission
            .get(&mission.to_lowercase())
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.by_mission.is_empty()
    }
}

pub type CustomLevel2 =
    Arc<dyn Fn(&ParamValue, &StageContext<'_>) -> ParameterResult<Option<String>> + Send + Sync>;

/// Level 2 functor
#[derive(Clone)]
pub enum Level2 {
    /// Value must be a member of the active mission's set
    OneOf(MissionValues),
    /// Returns a rejection detail, or `None` to accept
    Custom(CustomLevel2),
}

impl Level2 {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ParamValue, &StageContext<'_>) -> ParameterResult<Option<String>>
            + Send
            + Sync
            + 'static,
    {
        Level2::Custom(Arc::new(f))
    }

    /// `Ok(Some(detail))` rejects the value
    pub fn check(
        &self,
        value: &ParamValue,
        ctx: &StageContext<'_>,
    ) -> ParameterResult<Option<String>> {
        match self {
            Level2::OneOf(sets) => Ok(check_membership(sets, value, ctx)),
            Level2::Custom(f) => f(value, ctx),
        }
    }
}

fn check_membership(sets: &MissionValues, value: &ParamValue, ctx: &StageContext<'_>) -> Option<String> {
    let mission = ctx.state.mission();
    let allowed = match sets.for_mission(mission) {
        Some(allowed) => allowed,
        None => {
            debug!(mission, "no allowed-value set for mission, accepting");
            return None;
        }
    };

    if allowed.iter().any(|a| a.matches(value)) {
        return None;
    }

    let mut shown: Vec<String> = Vec::with_capacity(allowed.len());
    for a in allowed {
        let q = a.quoted();
        if !shown.contains(&q) {
            shown.push(q);
        }
    }

    Some(format!(
        "value {} is not valid for mission {}; allowed values: {}",
        value.quoted(),
        mission,
        choice_preview(&shown, ctx.preview_limit)
    ))
}

impl fmt::Debug for Level2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level2::OneOf(sets) => f.debug_tuple("OneOf").field(sets).finish(),
            Level2::Custom(_) => f.write_str("Custom"),
        }
    }
}
