use crate::binder::Binder;
use crate::context::{BindingContext, RouteParameters};
use crate::error::BindError;
use crate::introspect::Bindable;
use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};

/// Trait that AppState must implement to provide the binder
pub trait HasBinder {
    fn binder(&self) -> &Binder;
}

impl HasBinder for Binder {
    fn binder(&self) -> &Binder {
        self
    }
}

/// Axum extractor running the bind pass before the handler body.
///
/// `T` is built with `Default`, its marked fields are bound from the
/// matched route's parameters, and a failed lookup rejects the request
/// (404 for a missing row). Parameters that were not consumed are left in
/// the request extensions as [`RouteParameters`].
///
/// # Example
/// ```rust,ignore
/// async fn show(page: AutoBind<ShowPost>) -> Json<Value> {
///     let extra = json!({ "title": page.post.as_ref().map(|p| &p.title) });
///     Json(Value::Object(page.bound(Map::new())))
/// }
///
/// let app = Router::new()
///     .route("/users/{author}/posts/{post}", get(show))
///     .with_state(binder);
/// ```
pub struct AutoBind<T> {
    target: T,
    context: BindingContext,
}

impl<T: Bindable> AutoBind<T> {
    /// `seed` merged with the fields bound for this request.
    pub fn bound(&self, seed: Map<String, Value>) -> Map<String, Value> {
        self.context.bound(&self.target, seed)
    }

    pub fn context(&self) -> &BindingContext {
        &self.context
    }

    pub fn into_inner(self) -> T {
        self.target
    }
}

impl<S, T> FromRequestParts<S> for AutoBind<T>
where
    S: Send + Sync + HasBinder,
    T: Bindable + Default,
{
    type Rejection = BindError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|e| BindError::MissingRouteParameters(e.to_string()))?;
        let params: RouteParameters = raw.iter().collect();

        let mut context = BindingContext::new(params);
        let mut target = T::default();
        state
            .binder()
            .bind(&mut target, &mut context)
            .await
            .into_result()?;

        parts.extensions.insert(context.route().clone());
        Ok(Self { target, context })
    }
}

impl<T> Deref for AutoBind<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.target
    }
}

impl<T> DerefMut for AutoBind<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.target
    }
}
