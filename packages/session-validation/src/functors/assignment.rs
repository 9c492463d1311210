//! Assignment: commit a validated value into the caller's configuration
//!
//! The only stage allowed to touch state outside the parameter table.

use crate::errors::{ParameterError, ParameterResult};
use crate::value::{FromParamValue, ParamValue, ValueHolder};
use std::fmt;
use std::sync::Arc;

type AssignFn<C> = dyn Fn(&mut C, &ParamValue, bool) -> ParameterResult<()> + Send + Sync;

/// Assignment functor over configuration type `C`
pub struct Assignment<C> {
    assign: Arc<AssignFn<C>>,
}

impl<C> Assignment<C> {
    /// `f(target, value, defaulted)`
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut C, &ParamValue, bool) -> ParameterResult<()> + Send + Sync + 'static,
    {
        Self { assign: Arc::new(f) }
    }

    /// Typed setter: the value is extracted as `T` before `setter` runs, and a
    /// value of another type is an internal error.
    pub fn typed<T, F>(parameter: &'static str, setter: F) -> Self
    where
        T: FromParamValue,
        F: Fn(&mut C, T) + Send + Sync + 'static,
    {
        Self::new(move |target, value, _| {
            let v = T::from_param(value).ok_or_else(|| ParameterError::ValueType {
                parameter: parameter.to_string(),
                expected: T::TYPE.to_string(),
                found: value.value_type().to_string(),
            })?;
            setter(target, v);
            Ok(())
        })
    }

    /// Run against the holder's value; an empty holder is a no-op
    pub fn assign(&self, target: &mut C, holder: &ValueHolder) -> ParameterResult<()> {
        match holder.value() {
            Some(value) => (self.assign)(target, value, holder.is_defaulted()),
            None => Ok(()),
        }
    }
}

impl<C> Clone for Assignment<C> {
    fn clone(&self) -> Self {
        Self {
            assign: Arc::clone(&self.assign),
        }
    }
}

impl<C> fmt::Debug for Assignment<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Assignment")
    }
}
