//! The bind/bound cycle.
//!
//! ```text
//! request ──> BindingContext::new(route params)
//!               │
//!               ▼
//!          Binder::bind(target)     reset matches for T, then per public field:
//!               │                   marker? type? ignored? route value? resolvable?
//!               │                   └─ lookup ─> assign ─> forget param ─> record
//!               ▼
//!          Binder::bound(target, seed)   seed + recorded, non-null fields
//! ```

mod report;

pub use report::{BindReport, FieldOutcome, FieldStatus, SkipReason};

use crate::config::{BinderConfig, LookupStrategy};
use crate::context::BindingContext;
use crate::error::Result;
use crate::introspect::{Bindable, FieldSpec};
use crate::lookup::{ModelInstance, ModelLookup};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Populates marked fields of a target from the request's route parameters.
///
/// # Example
/// ```rust,ignore
/// let binder = Binder::new(Arc::new(lookup));
/// let mut ctx = BindingContext::new(params);
/// let mut page = ShowPost::default();
///
/// binder.bind(&mut page, &mut ctx).await.into_result()?;
/// let payload = binder.bound(&page, &ctx, Map::new());
/// ```
#[derive(Clone)]
pub struct Binder {
    lookup: Arc<dyn ModelLookup>,
    config: BinderConfig,
}

impl Binder {
    pub fn new(lookup: Arc<dyn ModelLookup>) -> Self {
        Self::with_config(lookup, BinderConfig::default())
    }

    pub fn with_config(lookup: Arc<dyn ModelLookup>, config: BinderConfig) -> Self {
        Self { lookup, config }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Bind every qualifying field of `target`.
    ///
    /// The matches recorded for `T` in `ctx` are reset before the first
    /// field is looked at. Processing stops at the first failing lookup;
    /// fields bound before it stay bound and stay recorded.
    pub async fn bind<T: Bindable>(&self, target: &mut T, ctx: &mut BindingContext) -> BindReport {
        let type_name = T::type_name();
        ctx.matched_mut().reset(type_name);

        let mut report = BindReport::new(type_name);
        for field in T::fields() {
            let status = self.bind_field(target, &field, ctx).await;
            let failed = matches!(status, FieldStatus::Failed(_));
            report.push(field.name, status);
            if failed {
                break;
            }
        }

        tracing::info!(
            "Bound {} field(s) on {}{}",
            report.bound_fields().len(),
            type_name,
            if report.is_ok() { "" } else { " (aborted)" }
        );
        report
    }

    async fn bind_field<T: Bindable>(
        &self,
        target: &mut T,
        field: &FieldSpec,
        ctx: &mut BindingContext,
    ) -> FieldStatus {
        let type_name = T::type_name();

        let Some(marker) = &field.marker else {
            return skip(type_name, field, SkipReason::NoMarker);
        };
        let Some(declared_type) = field.declared_type else {
            return skip(type_name, field, SkipReason::NoDeclaredType);
        };
        if self.config.is_ignored(field.name) {
            return skip(type_name, field, SkipReason::Ignored);
        }
        let Some(value) = ctx.route().get(field.name).map(str::to_string) else {
            return skip(type_name, field, SkipReason::NoRouteValue);
        };
        if !self.lookup.resolves(declared_type) {
            return skip(type_name, field, SkipReason::Unresolvable);
        }

        let result = self
            .fetch(declared_type, marker.column(), &value)
            .await
            .and_then(|model| target.assign(field.name, model));

        match result {
            Ok(()) => {
                ctx.route_mut().forget(field.name);
                ctx.matched_mut().record(type_name, field.name);
                tracing::debug!(
                    "{}.{} bound to {} {}",
                    type_name,
                    field.name,
                    declared_type,
                    value
                );
                FieldStatus::Bound
            }
            Err(e) => {
                tracing::warn!("Binding {}.{} failed: {}", type_name, field.name, e);
                FieldStatus::Failed(e)
            }
        }
    }

    async fn fetch(&self, model: &str, column: &str, value: &str) -> Result<ModelInstance> {
        match self.config.strategy {
            LookupStrategy::Column => self.lookup.find_one_where(model, column, value).await,
            LookupStrategy::Identity => self.lookup.find_by_identity(model, value).await,
        }
    }

    /// `seed` plus the fields of `target` bound by the latest pass for `T`.
    ///
    /// Seed entries win; unset fields are omitted.
    pub fn bound<T: Bindable>(
        &self,
        target: &T,
        ctx: &BindingContext,
        seed: Map<String, Value>,
    ) -> Map<String, Value> {
        ctx.bound(target, seed)
    }
}

fn skip(type_name: &str, field: &FieldSpec, reason: SkipReason) -> FieldStatus {
    tracing::debug!("{}.{} skipped: {}", type_name, field.name, reason);
    FieldStatus::Skipped(reason)
}
