//! Request-scoped binding state.
//!
//! A [`BindingContext`] lives for one request. It owns the route
//! parameters the binder reads (and consumes) and the registry of fields
//! each bind pass populated, keyed by the target's type name. Nothing here
//! is process-wide, so concurrent requests never observe each other's
//! matches.

use crate::introspect::Bindable;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Route parameters of the matched request path, in route order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParameters {
    params: Vec<(String, String)>,
}

impl RouteParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove `name`. Removing an absent parameter is a no-op.
    pub fn forget(&mut self, name: &str) {
        self.params.retain(|(n, _)| n != name);
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RouteParameters::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Field names bound by the latest bind pass, per target type.
#[derive(Debug, Clone, Default)]
pub struct MatchedProperties {
    by_type: HashMap<&'static str, Vec<String>>,
}

impl MatchedProperties {
    /// Start a fresh, empty list for `type_name`.
    pub fn reset(&mut self, type_name: &'static str) {
        self.by_type.insert(type_name, Vec::new());
    }

    pub fn record(&mut self, type_name: &'static str, field: impl Into<String>) {
        self.by_type.entry(type_name).or_default().push(field.into());
    }

    pub fn get(&self, type_name: &str) -> Option<&[String]> {
        self.by_type.get(type_name).map(Vec::as_slice)
    }
}

/// Everything one request's bind/bound cycle reads and writes.
#[derive(Debug, Clone, Default)]
pub struct BindingContext {
    route: RouteParameters,
    matched: MatchedProperties,
}

impl BindingContext {
    pub fn new(route: RouteParameters) -> Self {
        Self {
            route,
            matched: MatchedProperties::default(),
        }
    }

    /// Route parameters not consumed by binding so far.
    pub fn route(&self) -> &RouteParameters {
        &self.route
    }

    pub fn route_mut(&mut self) -> &mut RouteParameters {
        &mut self.route
    }

    pub fn matched(&self) -> &MatchedProperties {
        &self.matched
    }

    pub fn matched_mut(&mut self) -> &mut MatchedProperties {
        &mut self.matched
    }

    /// Merge the fields bound on `target` into `seed`.
    ///
    /// Only names recorded for `T` by the latest bind pass are considered;
    /// unset fields are left out and existing `seed` keys are never
    /// overwritten.
    pub fn bound<T: Bindable>(
        &self,
        target: &T,
        mut seed: Map<String, Value>,
    ) -> Map<String, Value> {
        let Some(names) = self.matched.get(T::type_name()) else {
            return seed;
        };

        for name in names {
            if seed.contains_key(name) {
                continue;
            }
            if let Some(value) = target.field_value(name) {
                seed.insert(name.clone(), value);
            }
        }
        seed
    }

    pub fn into_route(self) -> RouteParameters {
        self.route
    }
}
