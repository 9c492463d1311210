//! Engine configuration I/O (YAML)

use crate::errors::{ParameterError, ParameterResult};
use crate::functors::{MissionValues, DEFAULT_PREVIEW_LIMIT};
use crate::pipeline::AssignmentPolicy;
use crate::value::ParamValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Schema versions this build can read
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
///
/// ```yaml
/// version: 1
/// mission: msl
/// preview_limit: 10
/// assignment: only_if_valid
/// allowed_values:
///   msl:
///     host: [localhost, uplink1]
///     vcid: [32, 33]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Default mission when the caller does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,

    /// Cap on the number of choices listed in an error message
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,

    #[serde(default)]
    pub assignment: AssignmentPolicy,

    /// mission -> parameter -> allowed values
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub allowed_values: BTreeMap<String, BTreeMap<String, Vec<ParamValue>>>,
}

fn default_preview_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            version: Some(1),
            mission: None,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            assignment: AssignmentPolicy::default(),
            allowed_values: BTreeMap::new(),
        }
    }
}

impl ValidationConfig {
    pub fn from_yaml(path: impl AsRef<Path>) -> ParameterResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ParameterResult<Self> {
        let config: ValidationConfig = serde_yaml::from_str(content)?;

        match config.version {
            None => return Err(ParameterError::MissingVersion),
            Some(v) if !SUPPORTED_VERSIONS.contains(&v) => {
                return Err(ParameterError::UnsupportedVersion {
                    found: v,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                })
            }
            Some(_) => {}
        }

        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ParameterResult<String> {
        let export = Self {
            version: Some(1),
            ..self.clone()
        };
        serde_yaml::to_string(&export).map_err(ParameterError::Yaml)
    }

    pub fn validate(&self) -> ParameterResult<()> {
        if self.preview_limit == 0 {
            return Err(ParameterError::internal("preview_limit must be at least 1"));
        }
        if self.mission.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ParameterError::internal("mission must not be empty"));
        }
        if self.allowed_values.keys().any(|m| m.trim().is_empty()) {
            return Err(ParameterError::internal(
                "allowed_values contains an empty mission name",
            ));
        }
        Ok(())
    }

    /// Every parameter named under any mission, sorted
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.allowed_values
            .values()
            .flat_map(|params| params.keys().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
    }

    /// Allowed values of one parameter across missions
    pub fn allowed_for(&self, parameter: &str) -> Option<MissionValues> {
        let mut values = MissionValues::new();
        for (mission, params) in &self.allowed_values {
            if let Some(allowed) = params.get(parameter) {
                values.insert(mission, allowed.clone());
            }
        }
        (!values.is_empty()).then_some(values)
    }
}
