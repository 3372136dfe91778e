//! Macros for declaring model fields.
//!
//! The [`define_model!`] macro generates field constants for a model,
//! tying field names to Rust types.

/// Defines a module with typed field constants for a model.
///
/// # Syntax
///
/// ```ignore
/// define_model!(
///     person {
///         model: "Person",
///         fields: {
///             NAME: String => "name",
///             AGE: i64 => "age"
///         }
///     }
/// );
/// ```
///
/// This expands to:
///
/// ```ignore
/// pub mod person {
///     pub const MODEL: &str = "Person";
///     pub const NAME: querytext_core::expr::Field<String> = querytext_core::expr::Field::new("name");
///     pub const AGE: querytext_core::expr::Field<i64> = querytext_core::expr::Field::new("age");
/// }
/// ```
///
/// # Usage
///
/// ```rust
/// use querytext_core::{define_model, QueryBuilder};
///
/// define_model!(
///     person {
///         model: "Person",
///         fields: {
///             NAME: String => "name"
///         }
///     }
/// );
///
/// let mut query = QueryBuilder::new();
/// query.equal_to(person::NAME, 1);
/// assert_eq!(query.build(), "name = $1 ");
/// ```
#[macro_export]
macro_rules! define_model {
    (
        $model:ident {
            model: $model_name:literal,
            fields: {
                $($field:ident: $field_type:ty => $field_name:literal),* $(,)?
            }
        }
    ) => {
        pub mod $model {
            #[allow(unused_imports)]
            use $crate::expr::Field;

            pub const MODEL: &str = $model_name;

            $(
                pub const $field: Field<$field_type> = Field::new($field_name);
            )*
        }
    };
}
