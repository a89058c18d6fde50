/// Column used when a `#[bind]` marker does not name one.
pub const DEFAULT_COLUMN: &str = "id";

/// Marker carried by a field that takes part in route model binding.
///
/// Produced by `#[bind]` (column `id`) or `#[bind(column = "email")]`
/// on a `#[derive(Bindable)]` struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindableProperty {
    column: String,
}

impl BindableProperty {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    /// The column matched against the route value.
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl Default for BindableProperty {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN)
    }
}
