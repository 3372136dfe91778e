//! Represents a typed model field.
//!
//! `Field<T>` ties a field name to a Rust type `T`. It implements
//! `AsRef<str>`, so it can be passed anywhere the builder expects a field name.

use std::{fmt, marker::PhantomData};

/// A typed reference to a model field.
///
/// The type parameter `T` documents the field's value type; it is not checked
/// against anything. The name is emitted verbatim, so dotted link paths such as
/// `"owner.name"` work as well.
///
/// # Example
///
/// ```rust
/// use querytext_core::expr::Field;
/// const NAME: Field<String> = Field::new("name");
/// assert_eq!(NAME.name(), "name");
/// ```
pub struct Field<T> {
    name: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T> Field<T> {
    /// Creates a new field reference.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _type: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> AsRef<str> for Field<T> {
    fn as_ref(&self) -> &str {
        self.name
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

impl<T> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
