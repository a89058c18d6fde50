//! Compile-time field tables for bindable types.
//!
//! `#[derive(Bindable)]` generates the [`Bindable`] impl: one [`FieldSpec`]
//! per public field, in declaration order, plus typed setters and getters
//! for the fields carrying a `#[bind]` marker.

use crate::error::Result;
use crate::lookup::ModelInstance;
use crate::marker::BindableProperty;
use serde::Serialize;

/// Static description of one public field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Runtime type name of the model the field holds, `None` when the
    /// field's type has no nameable concrete type (e.g. a trait object).
    pub declared_type: Option<&'static str>,
    pub marker: Option<BindableProperty>,
}

impl FieldSpec {
    pub fn new(name: &'static str, declared_type: Option<&'static str>) -> Self {
        Self {
            name,
            declared_type,
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: BindableProperty) -> Self {
        self.marker = Some(marker);
        self
    }
}

/// Types whose public fields can be populated from route parameters.
///
/// This trait is typically implemented automatically via `#[derive(Bindable)]`.
///
/// # Example
/// ```rust,ignore
/// use autobind::Bindable;
///
/// #[derive(Bindable, Default)]
/// pub struct ShowPost {
///     #[bind]
///     pub post: Option<Post>,
///     #[bind(column = "email")]
///     pub author: Option<User>,
/// }
/// ```
pub trait Bindable: Send + 'static {
    /// Key used for the matched-property registry.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Public fields in declaration order.
    fn fields() -> Vec<FieldSpec>
    where
        Self: Sized;

    /// Store a looked-up model into `field`.
    ///
    /// # Errors
    /// `UnknownField` when `field` is not a marked field, `TypeMismatch`
    /// when `model` is not the field's model type.
    fn assign(&mut self, field: &str, model: ModelInstance) -> Result<()>;

    /// Current value of a marked field, `None` while it is unset.
    fn field_value(&self, field: &str) -> Option<serde_json::Value>;
}

/// Serialize a bound field's value for [`Bindable::field_value`].
///
/// A value that fails to serialize is logged and reported as unset.
#[doc(hidden)]
pub fn serialize_field<V: Serialize + ?Sized>(
    field: &str,
    value: &V,
) -> Option<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| tracing::warn!("Dropping bound field '{}': {}", field, e))
        .ok()
}
