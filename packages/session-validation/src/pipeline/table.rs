//! Parameter table keyed by parameter identity

use crate::attributes::{ParameterAttributes, ParameterId};
use crate::errors::{ParameterError, ParameterResult};
use std::collections::BTreeMap;
use std::fmt;

/// Every declared parameter, iterated in identity order
pub struct ParameterTable<P, C> {
    entries: BTreeMap<P, ParameterAttributes<P, C>>,
}

impl<P: ParameterId, C> ParameterTable<P, C> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add one declaration; a second declaration for the same identity or
    /// option name is an error
    pub fn register(&mut self, attrs: ParameterAttributes<P, C>) -> ParameterResult<()> {
        if self.entries.contains_key(&attrs.index()) {
            return Err(ParameterError::declaration(
                attrs.display_name(),
                format!("Parameter {} is already registered", attrs.index()),
            ));
        }

        if let Some(name) = attrs.option_name() {
            if self.find_option(name).is_some() {
                return Err(ParameterError::declaration(
                    attrs.display_name(),
                    format!("Option name '{}' is already in use", name),
                ));
            }
        }

        self.entries.insert(attrs.index(), attrs);
        Ok(())
    }

    pub fn with(mut self, attrs: ParameterAttributes<P, C>) -> ParameterResult<Self> {
        self.register(attrs)?;
        Ok(self)
    }

    pub fn get(&self, parameter: P) -> Option<&ParameterAttributes<P, C>> {
        self.entries.get(&parameter)
    }

    pub fn get_mut(&mut self, parameter: P) -> Option<&mut ParameterAttributes<P, C>> {
        self.entries.get_mut(&parameter)
    }

    pub fn contains(&self, parameter: P) -> bool {
        self.entries.contains_key(&parameter)
    }

    /// Look a parameter up by its command-line option name
    pub fn find_option(&self, option_name: &str) -> Option<&ParameterAttributes<P, C>> {
        self.entries
            .values()
            .find(|a| a.option_name() == Some(option_name))
    }

    pub fn trailing(&self) -> impl Iterator<Item = &ParameterAttributes<P, C>> {
        self.entries.values().filter(|a| a.is_trailing())
    }

    pub fn ids(&self) -> impl Iterator<Item = P> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (P, &ParameterAttributes<P, C>)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (P, &mut ParameterAttributes<P, C>)> {
        self.entries.iter_mut().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty every value holder
    pub fn reset(&mut self) {
        for attrs in self.entries.values_mut() {
            attrs.value_mut().clear();
        }
    }
}

impl<P: ParameterId, C> Default for ParameterTable<P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: fmt::Debug, C> fmt::Debug for ParameterTable<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
