//! # Autobind
//!
//! Route model binding for axum handlers.
//!
//! Mark the public fields of a struct with `#[bind]`, and before the
//! handler runs every marked field whose name matches a route parameter is
//! replaced by the model that parameter identifies. The handler can later
//! fold the bound models into its response payload.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use autobind::prelude::*;
//! use axum::{Json, Router, routing::get};
//! use serde::{Deserialize, Serialize};
//! use serde_json::{Map, Value};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     id: i64,
//!     email: String,
//! }
//!
//! // 1. Declare what the route binds
//! #[derive(Bindable, Default)]
//! pub struct ShowUser {
//!     #[bind(column = "email")]
//!     pub user: Option<User>,
//! }
//!
//! // 2. Take it as an extractor
//! async fn show(page: AutoBind<ShowUser>) -> Json<Value> {
//!     Json(Value::Object(page.bound(Map::new())))
//! }
//!
//! // 3. Give the router a binder
//! #[tokio::main]
//! async fn main() {
//!     let lookup = MemoryLookup::new();
//!     lookup.insert(&User { id: 1, email: "a@example.com".into() }).unwrap();
//!
//!     let binder = Binder::with_config(Arc::new(lookup), BinderConfig::from_env());
//!     let app: Router = Router::new()
//!         .route("/users/{user}", get(show))
//!         .with_state(binder);
//!
//!     // Serve your app...
//! }
//! ```
//!
//! A missing row rejects the request with `404 Not Found`. Fields without
//! a marker, without a matching route parameter, with a type the lookup
//! service does not know, or named in the ignore-list are left untouched.

pub mod binder;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod introspect;
pub mod lookup;
pub mod marker;

// Re-export core types
pub use binder::{BindReport, Binder, FieldOutcome, FieldStatus, SkipReason};
pub use config::{BinderConfig, LookupStrategy};
pub use context::{BindingContext, MatchedProperties, RouteParameters};
pub use error::{BindError, Result};
pub use extract::{AutoBind, HasBinder};
pub use introspect::{Bindable, FieldSpec};
pub use lookup::{MemoryLookup, ModelInstance, ModelLookup};
#[cfg(feature = "sea-orm-db")]
pub use lookup::SeaOrmLookup;
pub use marker::{BindableProperty, DEFAULT_COLUMN};

// Re-export macros
pub use autobind_macro::Bindable;

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;
pub use serde_json;

/// `seed` merged with the fields of `target` recorded in `ctx`.
///
/// Shorthand for [`BindingContext::bound`].
pub fn bound<T: Bindable>(
    target: &T,
    ctx: &BindingContext,
    seed: serde_json::Map<String, serde_json::Value>,
) -> serde_json::Map<String, serde_json::Value> {
    ctx.bound(target, seed)
}

/// Prelude module for convenient imports
///
/// ```
/// use autobind::prelude::*;
/// ```
pub mod prelude {
    pub use crate::binder::{BindReport, Binder, FieldStatus, SkipReason};
    pub use crate::config::{BinderConfig, LookupStrategy};
    pub use crate::context::{BindingContext, RouteParameters};
    pub use crate::error::{BindError, Result};
    pub use crate::extract::{AutoBind, HasBinder};
    pub use crate::Bindable;
    pub use crate::lookup::{MemoryLookup, ModelLookup};
    pub use crate::marker::BindableProperty;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
