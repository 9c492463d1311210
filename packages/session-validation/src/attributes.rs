//! Parameter declarations
//!
//! Four parameter shapes are legal. An *option* is a `--name` on the command
//! line; a *trailing* parameter is a positional value at the end of it.
//!
//! | Shape             | Name | Argument | Hooks                                   |
//! |-------------------|------|----------|-----------------------------------------|
//! | named + argument  | yes  | yes      | Level 1 required                        |
//! | named flag        | yes  | no       | no Level 1/2/Default, value is boolean  |
//! | ghost             | no   | no       | no Level 1/2, Default required          |
//! | trailing          | no   | yes      | Level 1 required                        |
//!
//! [`ParameterAttributesBuilder::build`] rejects everything else, so a
//! declared parameter can never carry a hook that has nothing to run on.

use crate::constraints::Constraints;
use crate::errors::{ParameterError, ParameterResult};
use crate::flags::{NeedsArgument, Trailing};
use crate::functors::{Assignment, DefaultFunctor, Level1, Level2, Level3, MissionValues, Special};
use crate::mode::{Mode, ModeSet};
use crate::value::{ValueHolder, ValueType};
use std::fmt;
use std::hash::Hash;

/// Identity of a parameter, normally a caller-defined fieldless enum
pub trait ParameterId: Copy + Ord + Hash + fmt::Debug + fmt::Display + 'static {}

impl<T> ParameterId for T where T: Copy + Ord + Hash + fmt::Debug + fmt::Display + 'static {}

/// Declaration of one parameter plus its per-run value
pub struct ParameterAttributes<P, C> {
    index: P,
    option_name: Option<String>,
    display_name: String,
    value_type: ValueType,
    constraints: Constraints,
    validity: ModeSet,
    required: ModeSet,
    value: ValueHolder,
    level1: Option<Level1>,
    level2: Option<Level2>,
    default: Option<DefaultFunctor>,
    level3: Option<Level3<P, C>>,
    special: Option<Special>,
    assignment: Option<Assignment<C>>,
    trailing: Trailing,
    needs_argument: NeedsArgument,
}

impl<P: ParameterId, C> ParameterAttributes<P, C> {
    /// Generic builder: unnamed, non-trailing, takes an argument, string typed
    pub fn builder(index: P) -> ParameterAttributesBuilder<P, C> {
        ParameterAttributesBuilder {
            index,
            option_name: None,
            display_name: None,
            value_type: ValueType::String,
            constraints: Constraints::NONE,
            validity: ModeSet::all(),
            required: ModeSet::empty(),
            level1: None,
            level2: None,
            default: None,
            level3: None,
            special: None,
            assignment: None,
            trailing: Trailing::Option,
            needs_argument: NeedsArgument::NeedsArgument,
        }
    }

    /// `--name <value>`
    pub fn option(
        index: P,
        option_name: &str,
        value_type: ValueType,
    ) -> ParameterAttributesBuilder<P, C> {
        Self::builder(index)
            .option_name(option_name)
            .value_type(value_type)
    }

    /// `--name` alone; presence means true
    pub fn flag(index: P, option_name: &str) -> ParameterAttributesBuilder<P, C> {
        Self::builder(index)
            .option_name(option_name)
            .value_type(ValueType::Boolean)
            .needs_argument(NeedsArgument::NoArgument)
    }

    /// Not settable by the user; filled by its Default functor
    pub fn ghost(index: P, value_type: ValueType) -> ParameterAttributesBuilder<P, C> {
        Self::builder(index)
            .value_type(value_type)
            .needs_argument(NeedsArgument::NoArgument)
    }

    /// Positional value at the end of the command line
    pub fn trailing(index: P, value_type: ValueType) -> ParameterAttributesBuilder<P, C> {
        Self::builder(index)
            .value_type(value_type)
            .trailing_parameter(Trailing::Trailing)
    }

    pub fn index(&self) -> P {
        self.index
    }

    pub fn option_name(&self) -> Option<&str> {
        self.option_name.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn validity(&self) -> ModeSet {
        self.validity
    }

    pub fn has_mode(&self, mode: Mode) -> bool {
        self.validity.contains(mode)
    }

    pub fn required(&self) -> ModeSet {
        self.required
    }

    pub fn is_required(&self, mode: Mode) -> bool {
        self.required.contains(mode)
    }

    pub fn value(&self) -> &ValueHolder {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ValueHolder {
        &mut self.value
    }

    pub fn has_value(&self) -> bool {
        self.value.has_value()
    }

    pub fn is_trailing(&self) -> bool {
        self.trailing.get()
    }

    pub fn needs_argument(&self) -> bool {
        self.needs_argument.get()
    }

    /// Named option without an argument
    pub fn is_flag(&self) -> bool {
        self.option_name.is_some() && !self.needs_argument()
    }

    pub fn level1(&self) -> Option<&Level1> {
        self.level1.as_ref()
    }

    pub fn level2(&self) -> Option<&Level2> {
        self.level2.as_ref()
    }

    pub fn default_functor(&self) -> Option<&DefaultFunctor> {
        self.default.as_ref()
    }

    pub fn level3(&self) -> Option<&Level3<P, C>> {
        self.level3.as_ref()
    }

    pub fn special(&self) -> Option<&Special> {
        self.special.as_ref()
    }

    pub fn assignment(&self) -> Option<&Assignment<C>> {
        self.assignment.as_ref()
    }

    /// Install a configured set-membership Level 2 check
    pub(crate) fn attach_allowed_values(&mut self, values: MissionValues) -> ParameterResult<()> {
        if !self.needs_argument() {
            return Err(ParameterError::declaration(
                &self.display_name,
                "Cannot attach allowed values to a parameter without an argument",
            ));
        }
        if self.level2.is_some() {
            return Err(ParameterError::declaration(
                &self.display_name,
                "Already has a level 2 functor",
            ));
        }
        self.level2 = Some(Level2::OneOf(values));
        Ok(())
    }
}

impl<P: fmt::Debug, C> fmt::Debug for ParameterAttributes<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterAttributes")
            .field("index", &self.index)
            .field("option_name", &self.option_name)
            .field("display_name", &self.display_name)
            .field("value_type", &self.value_type)
            .field("validity", &self.validity)
            .field("required", &self.required)
            .field("value", &self.value)
            .field("trailing", &self.trailing)
            .field("needs_argument", &self.needs_argument)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════

pub struct ParameterAttributesBuilder<P, C> {
    index: P,
    option_name: Option<String>,
    display_name: Option<String>,
    value_type: ValueType,
    constraints: Constraints,
    validity: ModeSet,
    required: ModeSet,
    level1: Option<Level1>,
    level2: Option<Level2>,
    default: Option<DefaultFunctor>,
    level3: Option<Level3<P, C>>,
    special: Option<Special>,
    assignment: Option<Assignment<C>>,
    trailing: Trailing,
    needs_argument: NeedsArgument,
}

impl<P: ParameterId, C> ParameterAttributesBuilder<P, C> {
    /// Empty names are treated as absent
    pub fn option_name(mut self, name: &str) -> Self {
        let name = name.trim();
        self.option_name = (!name.is_empty()).then(|| name.to_string());
        self
    }

    pub fn display_name(mut self, name: &str) -> Self {
        let name = name.trim();
        self.display_name = (!name.is_empty()).then(|| name.to_string());
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Modes in which the parameter may be supplied (default: all)
    pub fn valid_in(mut self, modes: ModeSet) -> Self {
        self.validity = modes;
        self
    }

    /// Modes in which the parameter must end up with a value
    pub fn required_in(mut self, modes: ModeSet) -> Self {
        self.required = modes;
        self
    }

    pub fn level1(mut self, functor: impl Into<Level1>) -> Self {
        self.level1 = Some(functor.into());
        self
    }

    pub fn level2(mut self, functor: Level2) -> Self {
        self.level2 = Some(functor);
        self
    }

    pub fn default_value(mut self, functor: DefaultFunctor) -> Self {
        self.default = Some(functor);
        self
    }

    pub fn level3(mut self, functor: Level3<P, C>) -> Self {
        self.level3 = Some(functor);
        self
    }

    pub fn special(mut self, functor: Special) -> Self {
        self.special = Some(functor);
        self
    }

    pub fn assignment(mut self, functor: Assignment<C>) -> Self {
        self.assignment = Some(functor);
        self
    }

    pub fn trailing_parameter(mut self, trailing: Trailing) -> Self {
        self.trailing = trailing;
        self
    }

    pub fn needs_argument(mut self, needs_argument: NeedsArgument) -> Self {
        self.needs_argument = needs_argument;
        self
    }

    /// Check the shape rules (first failure wins) and build
    pub fn build(self) -> ParameterResult<ParameterAttributes<P, C>> {
        let display_name = match (&self.display_name, &self.option_name) {
            (Some(d), _) => d.clone(),
            (None, Some(name)) => format!("--{}", name),
            (None, None) => self.index.to_string(),
        };

        self.check_shape(&display_name)?;
        self.check_consistency(&display_name)?;

        Ok(ParameterAttributes {
            index: self.index,
            option_name: self.option_name,
            display_name,
            value_type: self.value_type,
            constraints: self.constraints,
            validity: self.validity,
            required: self.required,
            value: ValueHolder::new(),
            level1: self.level1,
            level2: self.level2,
            default: self.default,
            level3: self.level3,
            special: self.special,
            assignment: self.assignment,
            trailing: self.trailing,
            needs_argument: self.needs_argument,
        })
    }

    fn check_shape(&self, display_name: &str) -> ParameterResult<()> {
        let has_name = self.option_name.is_some();
        let has1 = self.level1.is_some();
        let has2 = self.level2.is_some();
        let has_default = self.default.is_some();
        let fail = |reason: &str| Err(ParameterError::declaration(display_name, reason));

        match (self.trailing.get(), has_name, self.needs_argument.get()) {
            (false, true, true) if !has1 => {
                fail("Must have a level 1 functor for named options with argument")
            }
            (false, true, false) if has1 || has2 || has_default => fail(
                "Cannot have a level 1 or 2 or default functor for named options without an argument",
            ),
            (false, true, false) if self.value_type != ValueType::Boolean => {
                fail("Must have boolean value type for named options without an argument")
            }
            (false, false, false) if has1 || has2 || !has_default => fail(
                "Cannot have a level 1 or 2 functor but must have a default functor for unnamed options",
            ),
            (false, false, true) => fail("Unnamed options cannot have an argument"),
            (true, false, true) if !has1 => {
                fail("Must have a level 1 functor for trailing options")
            }
            (true, false, true) => Ok(()),
            (true, _, _) => fail("Must have an argument and cannot have a name for trailing options"),
            _ => Ok(()),
        }
    }

    /// Rules beyond the shape table
    fn check_consistency(&self, display_name: &str) -> ParameterResult<()> {
        if let Some(produced) = self.level1.as_ref().and_then(Level1::produces) {
            if produced != self.value_type {
                return Err(ParameterError::declaration(
                    display_name,
                    format!(
                        "Level 1 functor produces {} values but the value type is {}",
                        produced, self.value_type
                    ),
                ));
            }
        }

        if let Some(mode) = self.required.iter().find(|m| !self.validity.contains(*m)) {
            return Err(ParameterError::declaration(
                display_name,
                format!("Required in mode {} but not valid in it", mode),
            ));
        }

        Ok(())
    }
}
