#![forbid(unsafe_code)]

//! Name to delegate mapping.

use std::collections::HashMap;
use std::rc::Rc;

use crate::delegate::Delegate;
use crate::error::DialogError;

/// How a spawn names its delegate.
#[derive(Debug, Clone)]
pub enum DelegateRef {
    /// A name passed to [`Registry::register`].
    Named(String),
    /// A delegate used directly, registered or not.
    Direct(Rc<Delegate>),
}

impl From<&str> for DelegateRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for DelegateRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Rc<Delegate>> for DelegateRef {
    fn from(delegate: Rc<Delegate>) -> Self {
        Self::Direct(delegate)
    }
}

impl From<&Rc<Delegate>> for DelegateRef {
    fn from(delegate: &Rc<Delegate>) -> Self {
        Self::Direct(Rc::clone(delegate))
    }
}

impl From<Delegate> for DelegateRef {
    fn from(delegate: Delegate) -> Self {
        Self::Direct(Rc::new(delegate))
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    delegates: HashMap<String, Rc<Delegate>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `delegate` under `name`, replacing any previous one.
    ///
    /// Returns the replaced delegate.
    pub fn register(
        &mut self,
        name: &str,
        delegate: Rc<Delegate>,
    ) -> Result<Option<Rc<Delegate>>, DialogError> {
        if name.is_empty() {
            return Err(DialogError::InvalidName);
        }
        let previous = self.delegates.insert(name.to_string(), delegate);
        if previous.is_some() {
            ftui_core::debug!(name, "delegate re-registered");
        }
        Ok(previous)
    }

    pub fn unregister(&mut self, name: &str) -> Option<Rc<Delegate>> {
        self.delegates.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Delegate>> {
        self.delegates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.delegates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }

    /// Turn a reference into a delegate.
    pub fn resolve(&self, reference: &DelegateRef) -> Result<Rc<Delegate>, DialogError> {
        match reference {
            DelegateRef::Named(name) if name.is_empty() => Err(DialogError::InvalidName),
            DelegateRef::Named(name) => self
                .delegates
                .get(name)
                .cloned()
                .ok_or_else(|| DialogError::UnknownDelegate(name.clone())),
            DelegateRef::Direct(delegate) => Ok(Rc::clone(delegate)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_rejected() {
        let mut r = Registry::new();
        assert_eq!(
            r.register("", Rc::new(Delegate::new("x"))).err(),
            Some(DialogError::InvalidName)
        );
        assert_eq!(
            r.resolve(&DelegateRef::from("")).err(),
            Some(DialogError::InvalidName)
        );
    }

    #[test]
    fn reregistration_overwrites() {
        let mut r = Registry::new();
        let first = Rc::new(Delegate::new("first"));
        let second = Rc::new(Delegate::new("second"));
        assert!(r.register("confirm", first.clone()).expect("valid").is_none());
        let replaced = r.register("confirm", second.clone()).expect("valid");
        assert!(Rc::ptr_eq(&replaced.expect("previous"), &first));
        let resolved = r.resolve(&"confirm".into()).expect("registered");
        assert!(Rc::ptr_eq(&resolved, &second));
    }

    #[test]
    fn unknown_and_unregistered_names() {
        let mut r = Registry::new();
        r.register("gone", Rc::new(Delegate::new("x"))).expect("valid");
        assert!(r.unregister("gone").is_some());
        assert_eq!(
            r.resolve(&"gone".into()).err(),
            Some(DialogError::UnknownDelegate("gone".into()))
        );
    }

    #[test]
    fn direct_reference_bypasses_registry() {
        let r = Registry::new();
        let d = Rc::new(Delegate::new("inline"));
        assert!(Rc::ptr_eq(&r.resolve(&(&d).into()).expect("direct"), &d));
    }
}
