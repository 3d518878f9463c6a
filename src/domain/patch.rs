//! Tri-state field for partial updates.
//!
//! A JSON body distinguishes three states for each field of an update:
//! the key is absent, the key is `null`, or the key carries a value.
//! `Option<T>` collapses the first two, so updates use [`Patch<T>`].
//!
//! Fields must be annotated with `#[serde(default)]` so that an absent
//! key deserializes to [`Patch::Unset`].

use serde::{Deserialize, Deserializer};

/// Update instruction for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the field untouched
    Unset,
    /// Clear the field
    Null,
    /// Replace the field
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    /// True if the field was mentioned in the request at all.
    pub fn is_set(&self) -> bool {
        !matches!(self, Patch::Unset)
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

// Only called when the key is present; absence is handled by `#[serde(default)]`.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}
