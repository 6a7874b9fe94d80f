//! The orchestrating panel.
//!
//! A refresh cycle runs, in order: content-size and tab-order recompute
//! (when layout is dirty), planning, lazy materialization of newly required
//! items, one batched reconciliation against the display surface and a
//! diagnostics update. Mutators that only touch the catalog leave the panel
//! dirty and wait for the next refresh; viewport, activation and focus
//! changes refresh immediately.

use std::fmt;

use fieldhost_contracts::{DisplaySurface, FocusClassifier, ResourceError, ResourceFactory};
use fieldhost_model::{
    CycleDiagnostics, FocusState, ItemDescriptor, ItemId, MemoryPolicy, PanelStats, Rect,
    RefreshReason, Size,
};
use tracing::{debug, error, warn};

use crate::catalog::{Item, ItemCatalog};
use crate::error::{HostError, Result};
use crate::focus::FocusChainTracker;
use crate::host::{HostContainer, SlotMap};
use crate::planner::RefreshPlanner;
use crate::settings::VirtualizationSettings;
use crate::slot::{ManagedResourceSlot, Materialized, SlotLifecycle};
use crate::viewport::Viewport;

pub struct VirtualizingPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    catalog: ItemCatalog,
    slots: SlotMap<S::Resource>,
    host: HostContainer<S>,
    factory: F,
    classifier: C,
    focus: FocusChainTracker,
    viewport: Viewport,
    settings: VirtualizationSettings,
    planner: RefreshPlanner,
    layout_dirty: bool,
    snapshot: Option<S::Snapshot>,
    last_diagnostics: Option<CycleDiagnostics>,
    stats: PanelStats,
}

impl<S, F, C> VirtualizingPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    pub fn new(surface: S, factory: F, classifier: C) -> Self {
        Self::with_settings(surface, factory, classifier, VirtualizationSettings::default())
    }

    pub fn with_settings(
        surface: S,
        factory: F,
        classifier: C,
        settings: VirtualizationSettings,
    ) -> Self {
        Self {
            catalog: ItemCatalog::new(),
            slots: SlotMap::new(),
            host: HostContainer::new(surface),
            factory,
            classifier,
            focus: FocusChainTracker::new(),
            viewport: Viewport::default(),
            planner: RefreshPlanner::new(&settings),
            settings,
            layout_dirty: false,
            snapshot: None,
            last_diagnostics: None,
            stats: PanelStats::default(),
        }
    }

    // ---- catalog mutation -------------------------------------------------

    /// Register an item. Its resource is created on the first refresh that
    /// requires it.
    pub fn add_item(&mut self, descriptor: ItemDescriptor) -> Result<ItemId> {
        let id = self.catalog.add_item(descriptor, &self.classifier)?;
        self.slots.insert(id.clone(), ManagedResourceSlot::new(id.clone()));
        self.layout_dirty = true;
        Ok(id)
    }

    /// Register an item backed by a caller-owned resource. The panel attaches
    /// and detaches it but never releases or disposes it; [`Self::remove_item`]
    /// hands it back.
    pub fn add_external_item(
        &mut self,
        descriptor: ItemDescriptor,
        resource: S::Resource,
    ) -> Result<ItemId> {
        let id = self.catalog.add_item(descriptor, &self.classifier)?;
        self.slots
            .insert(id.clone(), ManagedResourceSlot::with_external(id.clone(), resource));
        self.layout_dirty = true;
        Ok(id)
    }

    /// Remove an item and tear its resource down for good. Returns the
    /// resource when it was caller-supplied.
    pub fn remove_item(&mut self, id: &ItemId) -> Result<Option<S::Resource>> {
        if self.catalog.remove_item(id).is_none() {
            return Err(HostError::UnknownItem(id.clone()));
        }
        self.layout_dirty = true;
        if self.focus.is_near_focus(id) {
            self.focus.recompute(&self.catalog);
        }

        let Some(slot) = self.slots.shift_remove(id) else {
            return Ok(None);
        };
        let mut outcome = self.host.retire(vec![slot], self.settings.policy);
        self.stats.disposed += outcome.disposed as u64;
        if let Some(err) = outcome.error {
            self.stats.surface_failures += 1;
            return Err(err.into());
        }
        Ok(outcome.surrendered.pop().map(|(_, resource)| resource))
    }

    pub fn set_item_bounds(&mut self, id: &ItemId, bounds: Option<Rect>) -> Result<()> {
        let changed = self
            .catalog
            .set_bounds(id, bounds)
            .ok_or_else(|| HostError::UnknownItem(id.clone()))?;
        self.layout_dirty |= changed;
        Ok(())
    }

    pub fn set_item_visible(&mut self, id: &ItemId, visible: bool) -> Result<()> {
        self.catalog
            .set_visible(id, visible)
            .ok_or_else(|| HostError::UnknownItem(id.clone()))?;
        Ok(())
    }

    pub fn set_item_focusable(&mut self, id: &ItemId, focusable: bool) -> Result<()> {
        let changed = self
            .catalog
            .set_focusable(id, focusable)
            .ok_or_else(|| HostError::UnknownItem(id.clone()))?;
        if changed {
            self.focus.recompute(&self.catalog);
        }
        Ok(())
    }

    /// Remove every item. External resources are handed back.
    pub fn clear(&mut self) -> Result<Vec<(ItemId, S::Resource)>> {
        self.catalog.clear();
        self.focus.clear();
        self.layout_dirty = true;

        let retired: Vec<_> = self.slots.drain(..).map(|(_, slot)| slot).collect();
        let outcome = self.host.retire(retired, self.settings.policy);
        self.stats.disposed += outcome.disposed as u64;
        if let Some(err) = outcome.error {
            self.stats.surface_failures += 1;
            return Err(err.into());
        }
        Ok(outcome.surrendered)
    }

    // ---- viewport, activation and focus -----------------------------------

    /// Move or resize the visible window and refresh.
    pub fn set_viewport(&mut self, visible_bounds: Rect) -> Result<CycleDiagnostics> {
        self.viewport = self.viewport.with_bounds(visible_bounds);
        self.refresh(RefreshReason::ViewportChanged)
    }

    /// Activate or deactivate the panel. Deactivating optionally captures a
    /// placeholder snapshot before resources are released; activating drops
    /// it and rematerializes what the viewport needs.
    pub fn set_active(&mut self, active: bool) -> Result<CycleDiagnostics> {
        self.track_activation(active);
        self.viewport = self.viewport.with_active(active);
        self.refresh(RefreshReason::ActivationChanged)
    }

    /// Replace bounds, content size and activation at once. A caller-supplied
    /// content size stands until the next layout recompute.
    pub fn replace_viewport(&mut self, viewport: Viewport) -> Result<CycleDiagnostics> {
        let reason = if viewport.active != self.viewport.active {
            RefreshReason::ActivationChanged
        } else {
            RefreshReason::ViewportChanged
        };
        self.track_activation(viewport.active);
        self.viewport = viewport;
        self.refresh(reason)
    }

    fn track_activation(&mut self, active: bool) {
        if active {
            self.snapshot = None;
        } else if self.viewport.active && self.settings.capture_snapshot_on_deactivate {
            self.snapshot = self.host.surface_mut().capture_snapshot();
        }
    }

    /// Focus an item (or nothing) and refresh so its neighbours are hosted.
    pub fn set_focused_item(&mut self, id: Option<&ItemId>) -> Result<CycleDiagnostics> {
        if let Some(id) = id
            && !self.catalog.contains(id)
        {
            return Err(HostError::UnknownItem(id.clone()));
        }
        if self.layout_dirty {
            self.refresh_content_size();
        }
        self.focus.on_focus_changed(&self.catalog, id);
        self.refresh(RefreshReason::FocusChanged)
    }

    /// Tab forward along the focus chain. With nothing focused, the first
    /// focusable item takes focus.
    pub fn focus_next(&mut self) -> Result<Option<ItemId>> {
        self.move_focus(|state| state.next_focusable.clone(), |catalog| {
            catalog.iter().find(|item| item.is_focusable()).map(Item::id).cloned()
        })
    }

    /// Tab backward along the focus chain.
    pub fn focus_previous(&mut self) -> Result<Option<ItemId>> {
        self.move_focus(|state| state.prev_focusable.clone(), |catalog| {
            catalog
                .iter()
                .rev()
                .find(|item| item.is_focusable())
                .map(Item::id)
                .cloned()
        })
    }

    fn move_focus(
        &mut self,
        step: impl FnOnce(&FocusState) -> Option<ItemId>,
        fallback: impl FnOnce(&ItemCatalog) -> Option<ItemId>,
    ) -> Result<Option<ItemId>> {
        if self.layout_dirty {
            self.refresh_content_size();
        }
        let target = match self.focus.focused() {
            Some(_) => step(self.focus.state()),
            None => fallback(&self.catalog),
        };
        let Some(target) = target else {
            return Ok(self.focus.focused().cloned());
        };
        self.set_focused_item(Some(&target))?;
        Ok(Some(target))
    }

    /// Scroll the minimum needed to bring an item fully into view.
    pub fn reveal_item(&mut self, id: &ItemId) -> Result<CycleDiagnostics> {
        let item = self
            .catalog
            .get(id)
            .ok_or_else(|| HostError::UnknownItem(id.clone()))?;
        let Some(bounds) = item.bounds() else {
            return self.refresh(RefreshReason::ViewportChanged);
        };
        let (dx, dy) = self.viewport.reveal_offset(&bounds);
        let moved = self.viewport.visible_bounds.translate(dx, dy);
        self.set_viewport(moved)
    }

    // ---- settings ---------------------------------------------------------

    pub fn set_policy(&mut self, policy: MemoryPolicy) -> Result<CycleDiagnostics> {
        self.set_settings(self.settings.with_policy(policy))
    }

    pub fn set_settings(&mut self, settings: VirtualizationSettings) -> Result<CycleDiagnostics> {
        if settings.content_margin != self.settings.content_margin {
            self.layout_dirty = true;
        }
        self.planner = RefreshPlanner::new(&settings);
        self.settings = settings;
        self.refresh(RefreshReason::PolicyChanged)
    }

    // ---- refresh ----------------------------------------------------------

    /// Renumber tab order and recompute the content extent from the catalog.
    pub fn refresh_content_size(&mut self) -> Size {
        self.catalog.reassign_tab_order();
        let content_size = self.catalog.content_extent(self.settings.content_margin);
        self.viewport = self.viewport.with_content_size(content_size);
        self.focus.recompute(&self.catalog);
        self.layout_dirty = false;
        content_size
    }

    /// Run one reconciliation cycle.
    ///
    /// Factory failures are absorbed per item and show up in
    /// [`CycleDiagnostics::failed`]. A display-surface failure is returned
    /// after the cycle has recorded what was actually applied.
    ///
    /// `&mut self` rules out nested cycles on an owned panel; callbacks that
    /// reach the panel through a [`SharedPanel`](crate::SharedPanel) get
    /// [`HostError::ReentrantRefresh`] from the handle instead.
    pub fn refresh(&mut self, reason: RefreshReason) -> Result<CycleDiagnostics> {
        let mut diagnostics = CycleDiagnostics::new(reason);

        if self.layout_dirty || reason.invalidates_layout() {
            self.refresh_content_size();
        }

        let slots = &self.slots;
        let plan = self.planner.compute(
            &self.catalog,
            &self.viewport,
            self.focus.state(),
            |id| slots.get(id).is_some_and(ManagedResourceSlot::is_hosted),
        );
        diagnostics.visible = plan.visible_count;

        let mut to_add = Vec::with_capacity(plan.to_add.len());
        for id in plan.to_add {
            let (Some(item), Some(slot)) = (self.catalog.get(&id), self.slots.get_mut(&id)) else {
                continue;
            };
            let materialized = slot.ensure_materialized(
                item.descriptor(),
                &mut self.factory,
                self.host.surface_mut(),
            );
            match materialized {
                Ok(Materialized::AlreadyLive) => to_add.push(id),
                Ok(Materialized::Created | Materialized::HandleRestored) => {
                    diagnostics.created += 1;
                    to_add.push(id);
                }
                Err(source) => {
                    diagnostics.failed += 1;
                    if matches!(source, ResourceError::HandleRecreation { .. }) {
                        diagnostics.disposed += 1;
                    }
                    let err = HostError::ResourceCreation {
                        item: id.clone(),
                        source,
                    };
                    warn!(
                        item = %id,
                        kind = %item.descriptor().kind,
                        error = %err,
                        "skipping item whose resource could not be created"
                    );
                }
            }
        }

        let outcome = self.host.apply_batch(
            &mut self.slots,
            &self.catalog,
            &to_add,
            &plan.to_remove,
            self.settings.policy,
        );
        self.host.sync_hosted(&mut self.slots, &self.catalog);

        diagnostics.removed = outcome.detached;
        diagnostics.destroyed = outcome.destroyed;
        diagnostics.disposed += outcome.disposed;
        diagnostics.hosted = self.hosted_count();

        self.stats.absorb(&diagnostics);
        self.last_diagnostics = Some(diagnostics);

        debug!(
            reason = %reason,
            virtualized = plan.virtualized,
            created = diagnostics.created,
            hosted = diagnostics.hosted,
            visible = diagnostics.visible,
            removed = diagnostics.removed,
            destroyed = diagnostics.destroyed,
            disposed = diagnostics.disposed,
            failed = diagnostics.failed,
            "refresh cycle complete"
        );

        match outcome.error {
            Some(err) => {
                self.stats.surface_failures += 1;
                Err(err.into())
            }
            None => Ok(diagnostics),
        }
    }

    // ---- accessors --------------------------------------------------------

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &VirtualizationSettings {
        &self.settings
    }

    pub fn focus_state(&self) -> &FocusState {
        self.focus.state()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn content_size(&self) -> Size {
        self.viewport.content_size
    }

    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    pub fn is_hosted(&self, id: &ItemId) -> bool {
        self.slots.get(id).is_some_and(ManagedResourceSlot::is_hosted)
    }

    pub fn hosted_ids(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.is_hosted())
            .map(|(id, _)| id)
    }

    pub fn hosted_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_hosted()).count()
    }

    pub fn lifecycle(&self, id: &ItemId) -> Option<SlotLifecycle> {
        self.slots.get(id).map(ManagedResourceSlot::lifecycle)
    }

    /// The item's resource, if one exists (live or handle-released).
    pub fn resource(&self, id: &ItemId) -> Option<&S::Resource> {
        self.slots.get(id).and_then(ManagedResourceSlot::resource)
    }

    pub fn last_diagnostics(&self) -> Option<&CycleDiagnostics> {
        self.last_diagnostics.as_ref()
    }

    pub fn stats(&self) -> &PanelStats {
        &self.stats
    }

    /// Placeholder captured on the last deactivation, if any.
    pub fn snapshot(&self) -> Option<&S::Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn surface(&self) -> &S {
        self.host.surface()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<S, F, C> fmt::Debug for VirtualizingPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualizingPanel")
            .field("items", &self.catalog.len())
            .field("hosted", &self.hosted_count())
            .field("viewport", &self.viewport)
            .field("focus", self.focus.state())
            .field("settings", &self.settings)
            .field("layout_dirty", &self.layout_dirty)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<S, F, C> Drop for VirtualizingPanel<S, F, C>
where
    S: DisplaySurface,
    F: ResourceFactory<Resource = S::Resource>,
    C: FocusClassifier,
{
    fn drop(&mut self) {
        if self.slots.is_empty() {
            return;
        }
        let retired: Vec<_> = self.slots.drain(..).map(|(_, slot)| slot).collect();
        let outcome = self.host.retire(retired, self.settings.policy);
        if outcome.error.is_some() {
            error!(disposed = outcome.disposed, "panel teardown left resources attached");
        }
    }
}
