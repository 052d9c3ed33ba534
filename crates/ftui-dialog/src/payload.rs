#![forbid(unsafe_code)]

//! Caller data attached to a spawned dialog.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Type-erased, cheaply cloneable spawn data.
///
/// Every callback of a dialog receives the payload it was spawned with.
/// Absent data is [`Payload::none`].
#[derive(Clone, Default)]
pub struct Payload(Option<Rc<dyn Any>>);

impl Payload {
    /// No data.
    pub const fn none() -> Self {
        Self(None)
    }

    /// Wrap a value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Some(Rc::new(value)))
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the value if it is a `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_deref()?.downcast_ref::<T>()
    }

    /// Whether both payloads are absent or share the same allocation.
    pub fn same(&self, other: &Payload) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Payload(..)"),
            None => f.write_str("Payload(None)"),
        }
    }
}
