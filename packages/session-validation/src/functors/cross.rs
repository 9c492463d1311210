//! Level 3: cross-parameter consistency over the whole table

use crate::attributes::{ParameterAttributes, ParameterId};
use crate::errors::{ParameterError, ParameterResult};
use crate::pipeline::ParameterTable;
use crate::state::ValidationState;
use crate::value::{ParamValue, ValueHolder};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// View handed to a Level 3 functor
pub struct CrossContext<'a, P, C> {
    /// Parameter whose functor is running
    pub parameter: P,
    pub table: &'a ParameterTable<P, C>,
    /// Parameters that already failed Level 1/2 or mode checks
    pub blocked: &'a BTreeSet<P>,
    pub state: &'a ValidationState,
}

impl<'a, P: ParameterId, C> CrossContext<'a, P, C> {
    pub fn is_blocked(&self, parameter: P) -> bool {
        self.blocked.contains(&parameter)
    }

    pub fn attributes(&self, parameter: P) -> ParameterResult<&'a ParameterAttributes<P, C>> {
        self.table.get(parameter).ok_or_else(|| {
            ParameterError::internal(format!(
                "Level 3 functor of {} refers to unregistered parameter {}",
                self.parameter, parameter
            ))
        })
    }

    pub fn value(&self, parameter: P) -> ParameterResult<Option<&'a ParamValue>> {
        Ok(self.attributes(parameter)?.value().value())
    }

    /// True when the user supplied the parameter: a value that is neither
    /// engine-supplied nor an absent flag
    pub fn is_supplied(&self, parameter: P) -> ParameterResult<bool> {
        Ok(supplied(self.attributes(parameter)?.value()))
    }
}

fn supplied(holder: &ValueHolder) -> bool {
    match holder.value() {
        Some(ParamValue::Bool(false)) => false,
        Some(_) => !holder.is_defaulted(),
        None => false,
    }
}

pub type CustomLevel3<P, C> =
    Arc<dyn Fn(&CrossContext<'_, P, C>) -> ParameterResult<Vec<String>> + Send + Sync>;

/// Level 3 functor
pub enum Level3<P, C> {
    /// Supplying this parameter requires the other one to have a value
    Requires(P),
    /// This parameter and the other cannot both be supplied
    Excludes(P),
    /// Returns zero or more rejection details
    Custom(CustomLevel3<P, C>),
}

impl<P: ParameterId, C> Level3<P, C> {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&CrossContext<'_, P, C>) -> ParameterResult<Vec<String>> + Send + Sync + 'static,
    {
        Level3::Custom(Arc::new(f))
    }

    /// Rejection details for `ctx.parameter`
    pub fn check(&self, ctx: &CrossContext<'_, P, C>) -> ParameterResult<Vec<String>> {
        match self {
            Level3::Requires(other) => {
                let other_attrs = ctx.attributes(*other)?;
                if ctx.is_blocked(ctx.parameter) || ctx.is_blocked(*other) {
                    return Ok(Vec::new());
                }
                if ctx.is_supplied(ctx.parameter)? && !other_attrs.has_value() {
                    return Ok(vec![format!(
                        "requires option {}",
                        other_attrs.display_name()
                    )]);
                }
                Ok(Vec::new())
            }
            Level3::Excludes(other) => {
                let other_attrs = ctx.attributes(*other)?;
                if ctx.is_blocked(ctx.parameter) || ctx.is_blocked(*other) {
                    return Ok(Vec::new());
                }
                if ctx.is_supplied(ctx.parameter)? && supplied(other_attrs.value()) {
                    return Ok(vec![format!(
                        "cannot be used with option {}",
                        other_attrs.display_name()
                    )]);
                }
                Ok(Vec::new())
            }
            Level3::Custom(f) => f(ctx),
        }
    }
}

impl<P: Clone, C> Clone for Level3<P, C> {
    fn clone(&self) -> Self {
        match self {
            Level3::Requires(p) => Level3::Requires(p.clone()),
            Level3::Excludes(p) => Level3::Excludes(p.clone()),
            Level3::Custom(f) => Level3::Custom(Arc::clone(f)),
        }
    }
}

impl<P: fmt::Debug, C> fmt::Debug for Level3<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level3::Requires(p) => f.debug_tuple("Requires").field(p).finish(),
            Level3::Excludes(p) => f.debug_tuple("Excludes").field(p).finish(),
            Level3::Custom(_) => f.write_str("Custom"),
        }
    }
}
