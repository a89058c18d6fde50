use crate::error::{BindError, Result};
use strum_macros::Display;

/// Why a field was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    NoMarker,
    NoDeclaredType,
    Ignored,
    NoRouteValue,
    Unresolvable,
}

#[derive(Debug)]
pub enum FieldStatus {
    Skipped(SkipReason),
    Bound,
    Failed(BindError),
}

#[derive(Debug)]
pub struct FieldOutcome {
    pub field: &'static str,
    pub status: FieldStatus,
}

/// Per-field outcome of one bind pass.
///
/// Fields after the first failure are not attempted and do not appear.
#[derive(Debug)]
pub struct BindReport {
    type_name: &'static str,
    outcomes: Vec<FieldOutcome>,
}

impl BindReport {
    pub(crate) fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, field: &'static str, status: FieldStatus) {
        self.outcomes.push(FieldOutcome { field, status });
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn outcomes(&self) -> &[FieldOutcome] {
        &self.outcomes
    }

    pub fn status(&self, field: &str) -> Option<&FieldStatus> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.field == field)
            .map(|outcome| &outcome.status)
    }

    pub fn bound_fields(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, FieldStatus::Bound))
            .map(|outcome| outcome.field)
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &BindError)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.status {
            FieldStatus::Failed(err) => Some((outcome.field, err)),
            _ => None,
        })
    }

    pub fn is_ok(&self) -> bool {
        self.failures().next().is_none()
    }

    /// The first failure, if any.
    ///
    /// # Errors
    /// Returns the error of the field that stopped the pass.
    pub fn into_result(self) -> Result<()> {
        self.outcomes
            .into_iter()
            .find_map(|outcome| match outcome.status {
                FieldStatus::Failed(err) => Some(err),
                _ => None,
            })
            .map_or(Ok(()), Err)
    }
}
