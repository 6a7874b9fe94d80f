//! Shared, single-threaded panel handle.
//!
//! Hosts that hand the panel to callbacks (scroll handlers, focus events
//! fired by the surface itself) keep it behind `Rc<RefCell<_>>`. A call that
//! arrives while the panel is already borrowed, i.e. from inside a running
//! cycle, fails with [`HostError::ReentrantRefresh`] instead of panicking.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use fieldhost_contracts::{DisplaySurface, FocusClassifier, ResourceFactory};
use fieldhost_model::{CycleDiagnostics, ItemDescriptor, ItemId, Rect, RefreshReason};

use crate::error::{HostError, Result};
use crate::panel::VirtualizingPanel;

pub struct SharedPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    inner: Rc<RefCell<VirtualizingPanel<S, F, C>>>,
}

impl<S, F, C> Clone for SharedPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, F, C> fmt::Debug for SharedPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(panel) => f.debug_tuple("SharedPanel").field(&*panel).finish(),
            Err(_) => f.write_str("SharedPanel(<borrowed>)"),
        }
    }
}

impl<S, F, C> SharedPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    pub fn new(panel: VirtualizingPanel<S, F, C>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(panel)),
        }
    }

    pub fn downgrade(&self) -> WeakPanel<S, F, C> {
        WeakPanel {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Run `f` against the panel mutably.
    pub fn with_mut<T>(
        &self,
        f: impl FnOnce(&mut VirtualizingPanel<S, F, C>) -> Result<T>,
    ) -> Result<T> {
        let mut panel = self
            .inner
            .try_borrow_mut()
            .map_err(|_| HostError::ReentrantRefresh)?;
        f(&mut panel)
    }

    /// Run `f` against the panel immutably.
    pub fn with<T>(&self, f: impl FnOnce(&VirtualizingPanel<S, F, C>) -> T) -> Result<T> {
        let panel = self
            .inner
            .try_borrow()
            .map_err(|_| HostError::ReentrantRefresh)?;
        Ok(f(&panel))
    }

    pub fn refresh(&self, reason: RefreshReason) -> Result<CycleDiagnostics> {
        self.with_mut(|panel| panel.refresh(reason))
    }

    pub fn set_viewport(&self, visible_bounds: Rect) -> Result<CycleDiagnostics> {
        self.with_mut(|panel| panel.set_viewport(visible_bounds))
    }

    pub fn set_active(&self, active: bool) -> Result<CycleDiagnostics> {
        self.with_mut(|panel| panel.set_active(active))
    }

    pub fn set_focused_item(&self, id: Option<&ItemId>) -> Result<CycleDiagnostics> {
        self.with_mut(|panel| panel.set_focused_item(id))
    }

    pub fn add_item(&self, descriptor: ItemDescriptor) -> Result<ItemId> {
        self.with_mut(|panel| panel.add_item(descriptor))
    }

    pub fn remove_item(&self, id: &ItemId) -> Result<Option<S::Resource>> {
        self.with_mut(|panel| panel.remove_item(id))
    }
}

/// Non-owning handle, for callbacks stored inside the panel's own
/// collaborators.
pub struct WeakPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    inner: Weak<RefCell<VirtualizingPanel<S, F, C>>>,
}

impl<S, F, C> fmt::Debug for WeakPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakPanel")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<S, F, C> Clone for WeakPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S, F, C> WeakPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    pub fn upgrade(&self) -> Option<SharedPanel<S, F, C>> {
        self.inner.upgrade().map(|inner| SharedPanel { inner })
    }
}
