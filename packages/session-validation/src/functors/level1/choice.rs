//! Closed choice values
//!
//! Two flavours share one contract: code-level enums implementing
//! [`ChoiceEnum`], and enumerated types registered at runtime in an
//! [`EnumeratedRegistry`] with their own parse function. Input is normalized
//! with [`normalize_choice`] before lookup in both cases.

use super::{normalize_choice, Level1};
use crate::errors::{ParameterError, ParameterResult};
use crate::flags::AllowUnknown;
use crate::functors::{choice_preview, Verdict};
use crate::value::{EnumValue, ParamValue};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Implemented by caller enums usable as choice parameters
pub trait ChoiceEnum: Copy + 'static {
    const TYPE_NAME: &'static str;

    fn variants() -> &'static [Self];

    /// Constant name; matched against upper-cased input, so case is not significant
    fn name(&self) -> &'static str;

    /// True for the UNKNOWN sentinel, if the enum has one
    fn is_unknown(&self) -> bool {
        false
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Code enums
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct EnumChoices {
    type_name: String,
    names: Vec<String>,
    allowed: Option<BTreeSet<String>>,
    unknown: Option<String>,
    allow_unknown: AllowUnknown,
}

impl EnumChoices {
    pub fn of<E: ChoiceEnum>(allow_unknown: AllowUnknown) -> Self {
        Self {
            type_name: E::TYPE_NAME.to_string(),
            names: E::variants().iter().map(|v| v.name().to_uppercase()).collect(),
            allowed: None,
            unknown: E::variants()
                .iter()
                .find(|v| v.is_unknown())
                .map(|v| v.name().to_uppercase()),
            allow_unknown,
        }
    }

    /// Choices from plain names, e.g. loaded from configuration
    pub fn from_names(
        type_name: impl Into<String>,
        names: &[&str],
        unknown: Option<&str>,
        allow_unknown: AllowUnknown,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            names: names.iter().map(|n| n.to_uppercase()).collect(),
            allowed: None,
            unknown: unknown.map(|u| u.to_uppercase()),
            allow_unknown,
        }
    }

    /// Accept only a subset of the declared constants
    pub fn restrict_to<E: ChoiceEnum>(mut self, allowed: &[E]) -> Self {
        self.allowed = Some(allowed.iter().map(|v| v.name().to_uppercase()).collect());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    fn is_acceptable(&self, name: &str) -> bool {
        if !self.allow_unknown.get() && self.unknown.as_deref() == Some(name) {
            return false;
        }
        self.allowed.as_ref().map_or(true, |a| a.contains(name))
    }

    /// Acceptable names, sorted and de-duplicated
    pub fn choices(&self) -> Vec<String> {
        self.names
            .iter()
            .filter(|n| self.is_acceptable(n))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn validate(&self, raw: &str, preview_limit: usize) -> Verdict {
        let normalized = normalize_choice(raw);
        match self.names.iter().find(|n| **n == normalized) {
            Some(name) if self.is_acceptable(name) => Verdict::Accept(ParamValue::Enum(
                EnumValue::new(self.type_name.clone(), name.clone()),
            )),
            _ => Verdict::reject(format!(
                "'{}' is not a valid choice; allowed values: {}",
                raw,
                choice_preview(&self.choices(), preview_limit)
            )),
        }
    }
}

impl From<EnumChoices> for Level1 {
    fn from(choices: EnumChoices) -> Self {
        Level1::Enum(choices)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Registered enumerated types
// ═══════════════════════════════════════════════════════════════════════════

/// Failure of an enumerated type's parse function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumeratedParse {
    /// Input is not one of the type's values (user error)
    NotRecognized,
    /// Anything else (internal error)
    Failed(String),
}

pub type EnumeratedParser = Arc<dyn Fn(&str) -> Result<ParamValue, EnumeratedParse> + Send + Sync>;

/// An enumerated type known only at runtime: a parse function plus the list
/// of choices shown to the user.
pub struct EnumeratedType {
    tag: String,
    choices: Vec<String>,
    parse: EnumeratedParser,
}

impl EnumeratedType {
    pub fn new<F>(tag: impl Into<String>, choices: Vec<String>, parse: F) -> Self
    where
        F: Fn(&str) -> Result<ParamValue, EnumeratedParse> + Send + Sync + 'static,
    {
        let mut choices = choices;
        choices.sort();
        choices.dedup();
        Self {
            tag: tag.into(),
            choices,
            parse: Arc::new(parse),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn validate(&self, raw: &str, preview_limit: usize) -> ParameterResult<Verdict> {
        match (self.parse)(&normalize_choice(raw)) {
            Ok(value) => Ok(Verdict::Accept(value)),
            Err(EnumeratedParse::NotRecognized) => Ok(Verdict::reject(format!(
                "'{}' is not a valid choice; allowed values: {}",
                raw,
                choice_preview(&self.choices, preview_limit)
            ))),
            Err(EnumeratedParse::Failed(reason)) => Err(ParameterError::internal(format!(
                "enumerated type {} failed to parse '{}': {}",
                self.tag, raw, reason
            ))),
        }
    }
}

impl fmt::Debug for EnumeratedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumeratedType")
            .field("tag", &self.tag)
            .field("choices", &self.choices)
            .finish()
    }
}

/// Type tag -> enumerated type
#[derive(Debug, Default)]
pub struct EnumeratedRegistry {
    types: BTreeMap<String, Arc<EnumeratedType>>,
}

impl EnumeratedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, ty: EnumeratedType) -> ParameterResult<()> {
        if self.types.contains_key(ty.tag()) {
            return Err(ParameterError::internal(format!(
                "enumerated type {} registered twice",
                ty.tag()
            )));
        }
        self.types.insert(ty.tag().to_string(), Arc::new(ty));
        Ok(())
    }

    pub fn get(&self, tag: &str) -> ParameterResult<Arc<EnumeratedType>> {
        self.types
            .get(tag)
            .cloned()
            .ok_or_else(|| ParameterError::internal(format!("no enumerated type registered as {}", tag)))
    }

    /// Level 1 functor for a registered type
    pub fn level1(&self, tag: &str) -> ParameterResult<Level1> {
        self.get(tag).map(Level1::Enumerated)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
