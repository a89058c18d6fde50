use proc_macro::TokenStream;

mod bindable;

/// Derive macro implementing `autobind::Bindable` for a struct
///
/// Public fields marked with `#[bind]` are populated from the route
/// parameter of the same name. The marker optionally names the column to
/// match, defaulting to `id`. Marked fields must be `pub` and declared as
/// `Option<Model>` (model must be `Clone`) or `Option<Arc<Model>>`; the
/// model must implement `serde::Serialize`.
///
/// # Example
/// ```ignore
/// use autobind::Bindable;
///
/// #[derive(Bindable, Default)]
/// pub struct ShowPost {
///     #[bind]
///     pub post: Option<Post>,
///     #[bind(column = "email")]
///     pub author: Option<Arc<User>>,
///     pub title: String,
/// }
/// ```
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    bindable::derive_bindable(input)
}
