//! Model lookup services.
//!
//! The binder never talks to a data layer directly. It asks a
//! [`ModelLookup`] for "exactly one `model` whose `column` equals `value`"
//! and receives the row as a type-erased [`ModelInstance`], which the
//! target's generated [`Bindable::assign`](crate::Bindable::assign)
//! downcasts back into the field's model type.

mod memory;
#[cfg(feature = "sea-orm-db")]
mod seaorm;

use crate::error::Result;
use crate::marker::DEFAULT_COLUMN;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

pub use memory::MemoryLookup;
#[cfg(feature = "sea-orm-db")]
pub use seaorm::SeaOrmLookup;

/// A looked-up row, erased to `Any` so one service can serve every model type.
pub type ModelInstance = Arc<dyn Any + Send + Sync>;

/// Query service backing the binder.
///
/// Models are addressed by their runtime type name
/// (`std::any::type_name::<M>()`), the same name `#[derive(Bindable)]`
/// records as a field's declared type.
#[async_trait]
pub trait ModelLookup: Send + Sync + 'static {
    /// Whether `model` names a concrete model this service can query.
    fn resolves(&self, model: &str) -> bool;

    /// Fetch exactly one `model` whose `column` equals `value`.
    ///
    /// # Errors
    /// `ModelNotFound` when no row matches.
    async fn find_one_where(&self, model: &str, column: &str, value: &str)
    -> Result<ModelInstance>;

    /// Fetch one `model` by its identity.
    async fn find_by_identity(&self, model: &str, id: &str) -> Result<ModelInstance> {
        self.find_one_where(model, DEFAULT_COLUMN, id).await
    }
}
