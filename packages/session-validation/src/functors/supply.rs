//! Default and Special: engine-supplied values
//!
//! Both only ever fill an empty holder. Calling either on a holder that
//! already has a value is a registration bug and fails with
//! [`ParameterError::AlreadySet`].

use crate::errors::{ParameterError, ParameterResult};
use crate::mode::ModeSet;
use crate::state::ValidationState;
use crate::value::{ParamValue, ValueHolder};
use std::fmt;
use std::sync::Arc;

pub type CustomSupplier =
    Arc<dyn Fn(&ValidationState) -> ParameterResult<Option<ParamValue>> + Send + Sync>;

/// Default functor
#[derive(Clone)]
pub enum DefaultFunctor {
    /// Fixed value, supplied only in the listed ("secondary") modes
    Constant { value: ParamValue, modes: ModeSet },
    Custom(CustomSupplier),
}

impl DefaultFunctor {
    pub fn constant(value: impl Into<ParamValue>, modes: ModeSet) -> Self {
        DefaultFunctor::Constant {
            value: value.into(),
            modes,
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ValidationState) -> ParameterResult<Option<ParamValue>> + Send + Sync + 'static,
    {
        DefaultFunctor::Custom(Arc::new(f))
    }

    /// Fill `holder` if this functor applies; returns whether it did
    pub fn apply(
        &self,
        parameter: &str,
        holder: &mut ValueHolder,
        state: &ValidationState,
    ) -> ParameterResult<bool> {
        ensure_empty(parameter, holder, "Default")?;

        let supplied = match self {
            DefaultFunctor::Constant { value, modes } => {
                modes.contains(state.mode()).then(|| value.clone())
            }
            DefaultFunctor::Custom(f) => f(state)?,
        };

        Ok(fill(holder, supplied))
    }
}

impl fmt::Debug for DefaultFunctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultFunctor::Constant { value, modes } => f
                .debug_struct("Constant")
                .field("value", value)
                .field("modes", modes)
                .finish(),
            DefaultFunctor::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Special functor: supplies a value whether or not the parameter is valid
/// in the current mode
#[derive(Clone)]
pub enum Special {
    Constant(ParamValue),
    Custom(CustomSupplier),
}

impl Special {
    pub fn constant(value: impl Into<ParamValue>) -> Self {
        Special::Constant(value.into())
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ValidationState) -> ParameterResult<Option<ParamValue>> + Send + Sync + 'static,
    {
        Special::Custom(Arc::new(f))
    }

    pub fn apply(
        &self,
        parameter: &str,
        holder: &mut ValueHolder,
        state: &ValidationState,
    ) -> ParameterResult<bool> {
        ensure_empty(parameter, holder, "Special")?;

        let supplied = match self {
            Special::Constant(value) => Some(value.clone()),
            Special::Custom(f) => f(state)?,
        };

        Ok(fill(holder, supplied))
    }
}

impl fmt::Debug for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Special::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Special::Custom(_) => f.write_str("Custom"),
        }
    }
}

fn ensure_empty(parameter: &str, holder: &ValueHolder, stage: &str) -> ParameterResult<()> {
    if holder.has_value() {
        return Err(ParameterError::AlreadySet {
            parameter: parameter.to_string(),
            stage: stage.to_string(),
        });
    }
    Ok(())
}

fn fill(holder: &mut ValueHolder, supplied: Option<ParamValue>) -> bool {
    match supplied {
        Some(value) => {
            holder.set_defaulted(value);
            true
        }
        None => false,
    }
}
