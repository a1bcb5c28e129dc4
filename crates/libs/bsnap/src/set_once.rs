//! First-write-wins storage for snapshot fields.

use serde::{Deserialize, Serialize};

/// A slot that is filled at most once by enrichment.
///
/// Serializes exactly like the `Option<T>` it wraps, so an empty slot is
/// rendered as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetOnce<T>(Option<T>);

impl<T> SetOnce<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self(None)
    }

    /// Current value, if any.
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Fill the slot with the value produced by `f` if it is still empty.
    ///
    /// `f` is not called when the slot already holds a value. Returns `true`
    /// only when this call stored a value.
    pub fn fill_with<F>(&mut self, f: F) -> bool
    where
        F: FnOnce() -> Option<T>,
    {
        if self.0.is_some() {
            return false;
        }
        self.0 = f();
        self.0.is_some()
    }

    /// Fill the slot with `value` if it is still empty.
    pub fn fill(&mut self, value: T) -> bool {
        self.fill_with(|| Some(value))
    }

    /// Overwrite the slot unconditionally, returning the previous value.
    pub fn replace(&mut self, value: Option<T>) -> Option<T> {
        std::mem::replace(&mut self.0, value)
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> Default for SetOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Option<T>> for SetOnce<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}
