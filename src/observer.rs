//! Layout change notification.
//!
//! Observers are shared handles registered with the engine. Each event kind
//! maps to one hook; hooks an observer does not implement default to no-ops.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::engine::TableLayout;
use crate::error::{LayoutError, Result};

/// Kinds of layout change observers are told about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutEvent {
    /// Column widths were redistributed
    Columns,
    /// Section heights or overflow flags were recomputed
    Scrollable,
}

impl LayoutEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Columns => "columns",
            Self::Scrollable => "scrollable",
        }
    }
}

impl fmt::Display for LayoutEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutEvent {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "columns" => Ok(Self::Columns),
            "scrollable" => Ok(Self::Scrollable),
            other => Err(LayoutError::UnknownEvent(other.to_string())),
        }
    }
}

/// Receiver of layout changes.
///
/// A hook error stops dispatch and is returned to whoever triggered it.
pub trait LayoutObserver {
    fn on_columns_change(&mut self, _layout: &TableLayout) -> Result<()> {
        Ok(())
    }

    fn on_scrollable_change(&mut self, _layout: &TableLayout) -> Result<()> {
        Ok(())
    }
}

/// Shared observer handle; identity is pointer identity
pub type ObserverHandle = Rc<RefCell<dyn LayoutObserver>>;

type Hook = Box<dyn FnMut(&TableLayout) -> Result<()>>;

/// Observer built from optional closures
#[derive(Default)]
pub struct Callbacks {
    columns: Option<Hook>,
    scrollable: Option<Hook>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_columns(mut self, hook: impl FnMut(&TableLayout) -> Result<()> + 'static) -> Self {
        self.columns = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_scrollable(
        mut self,
        hook: impl FnMut(&TableLayout) -> Result<()> + 'static,
    ) -> Self {
        self.scrollable = Some(Box::new(hook));
        self
    }

    /// Wrap into a registrable handle
    pub fn into_handle(self) -> ObserverHandle {
        Rc::new(RefCell::new(self))
    }
}

impl LayoutObserver for Callbacks {
    fn on_columns_change(&mut self, layout: &TableLayout) -> Result<()> {
        match self.columns.as_mut() {
            Some(hook) => hook(layout),
            None => Ok(()),
        }
    }

    fn on_scrollable_change(&mut self, layout: &TableLayout) -> Result<()> {
        match self.scrollable.as_mut() {
            Some(hook) => hook(layout),
            None => Ok(()),
        }
    }
}

/// Ordered list of observers
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<ObserverHandle>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: ObserverHandle) {
        self.observers.push(observer);
    }

    /// Remove the first registration of `observer`. Returns false if it was not registered.
    pub fn unregister(&mut self, observer: &ObserverHandle) -> bool {
        match self.observers.iter().position(|o| Rc::ptr_eq(o, observer)) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Dispatch `event` to every observer in registration order
    pub fn notify(&self, event: LayoutEvent, layout: &TableLayout) -> Result<()> {
        log::trace!("notifying {} observers: {event}", self.observers.len());
        for observer in &self.observers {
            let mut observer = observer
                .try_borrow_mut()
                .map_err(|_| LayoutError::Observer(format!("observer busy during {event}")))?;
            match event {
                LayoutEvent::Columns => observer.on_columns_change(layout)?,
                LayoutEvent::Scrollable => observer.on_scrollable_change(layout)?,
            }
        }
        Ok(())
    }

    /// Dispatch an event by name. Unknown names fail before any observer runs.
    pub fn notify_named(&self, event: &str, layout: &TableLayout) -> Result<()> {
        self.notify(event.parse()?, layout)
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!("columns".parse::<LayoutEvent>().unwrap(), LayoutEvent::Columns);
        assert_eq!(
            "scrollable".parse::<LayoutEvent>().unwrap(),
            LayoutEvent::Scrollable
        );
        let err = "bogus".parse::<LayoutEvent>().unwrap_err();
        assert!(matches!(err, LayoutError::UnknownEvent(ref name) if name == "bogus"));
        assert_eq!(err.to_string(), "Table Layout don't have event bogus.");
    }

    #[test]
    fn test_unregister_removes_first_match_only() {
        let mut registry = ObserverRegistry::new();
        let a = Callbacks::new().into_handle();
        let b = Callbacks::new().into_handle();
        registry.register(Rc::clone(&a));
        registry.register(Rc::clone(&b));
        registry.register(Rc::clone(&a));

        assert!(registry.unregister(&a));
        assert_eq!(registry.len(), 2);
        assert!(registry.unregister(&a));
        assert!(!registry.unregister(&a));
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister(&b));
        assert!(registry.is_empty());
    }
}
