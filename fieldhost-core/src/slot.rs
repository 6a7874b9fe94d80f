//! Per-item owner of zero or one live resource.
//!
//! ```text
//! Empty -> LiveUnhosted -> LiveHosted -> LiveUnhosted -> { HandleReleased | Empty }
//!              ^                                              |
//!              +---------------- ensure_materialized ---------+
//! ```

use fieldhost_contracts::{DisplaySurface, ResourceError, ResourceFactory};
use fieldhost_model::{ItemDescriptor, ItemId, MemoryPolicy, Rect};
use tracing::trace;

/// Observable lifecycle position of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLifecycle {
    Empty,
    LiveUnhosted,
    LiveHosted,
    HandleReleased,
}

#[derive(Debug)]
enum Holding<R> {
    Empty,
    Live(R),
    HandleReleased(R),
}

/// What [`ManagedResourceSlot::ensure_materialized`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    AlreadyLive,
    Created,
    HandleRestored,
}

/// What [`ManagedResourceSlot::release`] did.
#[derive(Debug, PartialEq, Eq)]
pub enum Released<R> {
    Nothing,
    HandleReleased,
    Disposed,
    /// External resource handed back to its owner on final release.
    Surrendered(R),
}

#[derive(Debug)]
pub struct ManagedResourceSlot<R> {
    item_id: ItemId,
    holding: Holding<R>,
    hosted: bool,
    external: bool,
    synced_bounds: Option<Rect>,
    synced_tab_index: Option<usize>,
}

impl<R> ManagedResourceSlot<R> {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            holding: Holding::Empty,
            hosted: false,
            external: false,
            synced_bounds: None,
            synced_tab_index: None,
        }
    }

    /// Slot around a caller-supplied resource. The engine detaches it but
    /// never releases its handle or disposes it.
    pub fn with_external(item_id: ItemId, resource: R) -> Self {
        Self {
            item_id,
            holding: Holding::Live(resource),
            hosted: false,
            external: true,
            synced_bounds: None,
            synced_tab_index: None,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn is_hosted(&self) -> bool {
        self.hosted
    }

    pub fn is_external(&self) -> bool {
        self.external
    }

    pub fn lifecycle(&self) -> SlotLifecycle {
        match (&self.holding, self.hosted) {
            (Holding::Empty, _) => SlotLifecycle::Empty,
            (Holding::HandleReleased(_), _) => SlotLifecycle::HandleReleased,
            (Holding::Live(_), true) => SlotLifecycle::LiveHosted,
            (Holding::Live(_), false) => SlotLifecycle::LiveUnhosted,
        }
    }

    /// The resource, whether or not its handle is live.
    pub fn resource(&self) -> Option<&R> {
        match &self.holding {
            Holding::Empty => None,
            Holding::Live(resource) | Holding::HandleReleased(resource) => Some(resource),
        }
    }

    /// The resource only while it has a live handle.
    pub fn live_resource(&self) -> Option<&R> {
        match &self.holding {
            Holding::Live(resource) => Some(resource),
            _ => None,
        }
    }

    /// Make sure the slot holds a resource with a live handle.
    ///
    /// A failed handle restore disposes the handle-less resource through
    /// `surface`, so any failure leaves the slot `Empty`.
    pub fn ensure_materialized<F, S>(
        &mut self,
        item: &ItemDescriptor,
        factory: &mut F,
        surface: &mut S,
    ) -> Result<Materialized, ResourceError>
    where
        F: ResourceFactory<Resource = R> + ?Sized,
        S: DisplaySurface<Resource = R> + ?Sized,
    {
        match std::mem::replace(&mut self.holding, Holding::Empty) {
            Holding::Live(resource) => {
                self.holding = Holding::Live(resource);
                Ok(Materialized::AlreadyLive)
            }
            Holding::HandleReleased(mut resource) => {
                if let Err(err) = factory.restore_handle(item, &mut resource) {
                    surface.dispose(resource);
                    self.synced_bounds = None;
                    self.synced_tab_index = None;
                    trace!(item = %self.item_id, "handle restore failed, resource disposed");
                    return Err(match err {
                        err @ ResourceError::HandleRecreation { .. } => err,
                        other => ResourceError::handle_recreation(&item.id, other.to_string()),
                    });
                }
                self.holding = Holding::Live(resource);
                trace!(item = %self.item_id, "native handle restored");
                Ok(Materialized::HandleRestored)
            }
            Holding::Empty => {
                let resource = factory.create(item)?;
                self.holding = Holding::Live(resource);
                self.synced_bounds = None;
                self.synced_tab_index = None;
                trace!(item = %self.item_id, "resource created");
                Ok(Materialized::Created)
            }
        }
    }

    /// Flag transition only; attaching is the host container's job.
    pub fn set_hosted(&mut self, hosted: bool) {
        self.hosted = hosted;
    }

    /// Tear the resource down per `policy`. Final releases always dispose
    /// (or surrender an external resource). Safe to call on an empty slot.
    pub fn release<S>(
        &mut self,
        policy: MemoryPolicy,
        is_final: bool,
        surface: &mut S,
    ) -> Released<R>
    where
        S: DisplaySurface<Resource = R> + ?Sized,
    {
        if matches!(self.holding, Holding::Empty) {
            return Released::Nothing;
        }

        if self.external {
            if !is_final {
                return Released::Nothing;
            }
            return match self.take() {
                Some(resource) => Released::Surrendered(resource),
                None => Released::Nothing,
            };
        }

        if is_final || policy.disposes_on_remove() {
            if let Some(resource) = self.take() {
                surface.dispose(resource);
                trace!(item = %self.item_id, "resource disposed");
                return Released::Disposed;
            }
            return Released::Nothing;
        }

        if policy.releases_handle_on_remove() {
            match std::mem::replace(&mut self.holding, Holding::Empty) {
                Holding::Live(mut resource) => {
                    surface.release_handle(&mut resource);
                    self.holding = Holding::HandleReleased(resource);
                    self.synced_bounds = None;
                    self.synced_tab_index = None;
                    trace!(item = %self.item_id, "native handle released");
                    return Released::HandleReleased;
                }
                other => self.holding = other,
            }
        }

        Released::Nothing
    }

    /// Push position and tab index to the resource, skipping values that
    /// were already written. Returns how many writes were issued.
    pub fn sync_placement<S>(
        &mut self,
        bounds: Option<Rect>,
        tab_index: usize,
        surface: &mut S,
    ) -> usize
    where
        S: DisplaySurface<Resource = R> + ?Sized,
    {
        let Holding::Live(resource) = &mut self.holding else {
            return 0;
        };
        let mut writes = 0;
        if let Some(bounds) = bounds
            && self.synced_bounds != Some(bounds)
        {
            surface.set_position(resource, bounds);
            self.synced_bounds = Some(bounds);
            writes += 1;
        }
        if self.synced_tab_index != Some(tab_index) {
            surface.set_tab_index(resource, tab_index);
            self.synced_tab_index = Some(tab_index);
            writes += 1;
        }
        writes
    }

    fn take(&mut self) -> Option<R> {
        let holding = std::mem::replace(&mut self.holding, Holding::Empty);
        self.hosted = false;
        self.synced_bounds = None;
        self.synced_tab_index = None;
        match holding {
            Holding::Empty => None,
            Holding::Live(resource) | Holding::HandleReleased(resource) => Some(resource),
        }
    }
}
