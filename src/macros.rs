// ABOUTME: This module provides macros to reduce boilerplate in builder implementations
// ABOUTME: Used by the request and session builders

/// Macro for generating builder setter methods
///
/// This macro generates fluent setter methods for builder patterns,
/// where each method takes a value, sets the corresponding field,
/// and returns self for method chaining.
///
/// # Arguments
/// * `$($field:ident: $type:ty),*` - Field name and type pairs
///
/// # Generated code
/// For each field, generates:
/// ```ignore
/// pub fn $field(mut self, $field: $type) -> Self {
///     self.$field = $field;
///     self
/// }
/// ```
macro_rules! builder_setters {
    ($($field:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $field(mut self, $field: $type) -> Self {
                self.$field = $field;
                self
            }
        )*
    };
}

pub(crate) use builder_setters;
