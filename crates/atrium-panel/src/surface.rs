//! Collaborator seams
//!
//! The panel itself renders nothing and fetches nothing. The host supplies a
//! [`PanelSurface`] (the displayed area and its loading indicator) and a
//! [`ViewFactory`] (asynchronous construction of a tab's content view).

use futures_util::future::BoxFuture;
use std::collections::HashMap;

use crate::tab::TabKind;
use crate::Result;

/// The host-rendered area the panel controls.
///
/// All calls are made from the panel's own task, in event order.
pub trait PanelSurface: Send + 'static {
    /// The displayable unit views resolve to.
    type View: Send + 'static;

    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    /// Replace the visible content with a freshly built view.
    fn install(&mut self, view: Self::View);
    /// Remove the visible content, leaving the area empty.
    fn clear(&mut self);
    fn scroll_to_start(&mut self);
}

/// Asynchronous content construction, keyed by tab.
///
/// The returned future runs off the panel task; its result is delivered back
/// onto the panel task and discarded there if the load was superseded.
pub trait ViewFactory: Send + 'static {
    type View: Send + 'static;

    fn build(&self, tab: TabKind) -> BoxFuture<'static, Result<Self::View>>;
}

type Builder<V> = Box<dyn Fn() -> BoxFuture<'static, Result<V>> + Send>;

/// [`ViewFactory`] backed by per-tab registered builders.
///
/// Every tab the panel can be asked to display must be registered. Asking for
/// an unregistered tab is a programming-contract violation and panics.
pub struct ViewRegistry<V> {
    builders: HashMap<TabKind, Builder<V>>,
}

impl<V: Send + 'static> ViewRegistry<V> {
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    pub fn register<F>(mut self, tab: TabKind, builder: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<V>> + Send + 'static,
    {
        self.builders.insert(tab, Box::new(builder));
        self
    }

    pub fn is_registered(&self, tab: TabKind) -> bool {
        self.builders.contains_key(&tab)
    }
}

impl<V: Send + 'static> Default for ViewRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + 'static> ViewFactory for ViewRegistry<V> {
    type View = V;

    fn build(&self, tab: TabKind) -> BoxFuture<'static, Result<V>> {
        match self.builders.get(&tab) {
            Some(builder) => builder(),
            None => panic!("no view builder registered for tab '{tab}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_builder_is_used() {
        let registry = ViewRegistry::new().register(TabKind::Friends, || Box::pin(async { Ok(1) }));

        assert!(registry.is_registered(TabKind::Friends));
        assert!(!registry.is_registered(TabKind::CurrentlyOnline));
    }

    #[test]
    #[should_panic(expected = "no view builder registered")]
    fn test_unregistered_tab_panics() {
        let registry: ViewRegistry<u32> = ViewRegistry::new();
        let _ = registry.build(TabKind::Friends);
    }
}
