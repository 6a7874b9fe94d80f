//! Batched reconciliation against the display surface.
//!
//! Every apply issues at most one bulk attach and one bulk detach so a large
//! scroll costs two surface round trips regardless of how many items move.

use fieldhost_contracts::{DisplaySurface, SurfaceError};
use fieldhost_model::{ItemId, MemoryPolicy};
use indexmap::IndexMap;
use tracing::error;

use crate::catalog::ItemCatalog;
use crate::slot::{ManagedResourceSlot, Released};

/// Slots keyed by item, in catalog order.
pub type SlotMap<R> = IndexMap<ItemId, ManagedResourceSlot<R>>;

/// What one [`HostContainer::apply_batch`] actually did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub attached: usize,
    pub detached: usize,
    /// Native handles released after detach.
    pub destroyed: usize,
    pub disposed: usize,
    /// First surface failure of the batch. Whatever the surface applied
    /// before failing is reflected in the counts above.
    pub error: Option<SurfaceError>,
}

impl BatchOutcome {
    fn record_error(&mut self, err: SurfaceError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Result of retiring slots for good.
#[derive(Debug)]
pub struct RetireOutcome<R> {
    pub detached: usize,
    pub disposed: usize,
    /// External resources handed back to the caller.
    pub surrendered: Vec<(ItemId, R)>,
    pub error: Option<SurfaceError>,
}

impl<R> Default for RetireOutcome<R> {
    fn default() -> Self {
        Self {
            detached: 0,
            disposed: 0,
            surrendered: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug)]
pub struct HostContainer<S> {
    surface: S,
}

impl<S, R> HostContainer<S>
where
    S: DisplaySurface<Resource = R>,
{
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Attach `to_add`, then detach `to_remove`.
    ///
    /// Slots in `to_add` must already be materialized; ids without a live
    /// resource are skipped. A failing attach does not prevent the detach.
    pub fn apply_batch(
        &mut self,
        slots: &mut SlotMap<R>,
        catalog: &ItemCatalog,
        to_add: &[ItemId],
        to_remove: &[ItemId],
        policy: MemoryPolicy,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        let attach_ids: Vec<&ItemId> = to_add
            .iter()
            .filter(|id| {
                slots.get(*id).is_some_and(|slot| {
                    !slot.is_hosted() && slot.live_resource().is_some()
                })
            })
            .collect();
        let attached = self.bulk(slots, &attach_ids, Direction::Attach, &mut outcome);
        for id in attached {
            let Some(slot) = slots.get_mut(id) else {
                continue;
            };
            slot.set_hosted(true);
            if let Some(item) = catalog.get(id) {
                slot.sync_placement(item.bounds(), item.tab_index(), &mut self.surface);
            }
            outcome.attached += 1;
        }

        let detach_ids: Vec<&ItemId> = to_remove
            .iter()
            .filter(|id| slots.get(*id).is_some_and(ManagedResourceSlot::is_hosted))
            .collect();
        let detached = self.bulk(slots, &detach_ids, Direction::Detach, &mut outcome);
        for id in detached {
            let Some(slot) = slots.get_mut(id) else {
                continue;
            };
            slot.set_hosted(false);
            outcome.detached += 1;
            match slot.release(policy, false, &mut self.surface) {
                Released::HandleReleased => outcome.destroyed += 1,
                Released::Disposed => outcome.disposed += 1,
                Released::Nothing | Released::Surrendered(_) => {}
            }
        }

        outcome
    }

    /// Push current bounds and tab index to every hosted resource. Only
    /// changed values reach the surface.
    pub fn sync_hosted(&mut self, slots: &mut SlotMap<R>, catalog: &ItemCatalog) -> usize {
        let mut writes = 0;
        for (id, slot) in slots.iter_mut().filter(|(_, slot)| slot.is_hosted()) {
            if let Some(item) = catalog.get(id) {
                writes += slot.sync_placement(item.bounds(), item.tab_index(), &mut self.surface);
            }
        }
        writes
    }

    /// Detach whatever is still hosted among `retired`, then release every
    /// slot finally. External resources come back in the outcome.
    pub fn retire(
        &mut self,
        retired: Vec<ManagedResourceSlot<R>>,
        policy: MemoryPolicy,
    ) -> RetireOutcome<R> {
        let mut outcome = RetireOutcome::default();

        let hosted: Vec<&R> = retired
            .iter()
            .filter(|slot| slot.is_hosted())
            .filter_map(ManagedResourceSlot::live_resource)
            .collect();
        if !hosted.is_empty() {
            let attempted = hosted.len();
            match self.surface.bulk_detach(&hosted) {
                Ok(()) => outcome.detached = attempted,
                Err(err) => {
                    error!(
                        attempted,
                        rejected = err.rejected.len(),
                        error = %err,
                        "bulk detach failed during teardown"
                    );
                    outcome.detached = attempted.saturating_sub(err.rejected.len());
                    outcome.error = Some(err);
                }
            }
        }

        for mut slot in retired {
            slot.set_hosted(false);
            match slot.release(policy, true, &mut self.surface) {
                Released::Disposed => outcome.disposed += 1,
                Released::Surrendered(resource) => {
                    outcome.surrendered.push((slot.item_id().clone(), resource));
                }
                Released::Nothing | Released::HandleReleased => {}
            }
        }
        outcome
    }

    /// Run one bulk call over `ids` and return the ids the surface applied.
    fn bulk<'a>(
        &mut self,
        slots: &SlotMap<R>,
        ids: &[&'a ItemId],
        direction: Direction,
        outcome: &mut BatchOutcome,
    ) -> Vec<&'a ItemId> {
        if ids.is_empty() {
            return Vec::new();
        }
        let batch: Vec<&R> = ids
            .iter()
            .filter_map(|id| slots.get(*id).and_then(ManagedResourceSlot::live_resource))
            .collect();

        let result = match direction {
            Direction::Attach => self.surface.bulk_attach(&batch),
            Direction::Detach => self.surface.bulk_detach(&batch),
        };

        match result {
            Ok(()) => ids.to_vec(),
            Err(err) => {
                error!(
                    operation = direction.label(),
                    attempted = err.attempted,
                    rejected = err.rejected.len(),
                    error = %err,
                    "bulk surface operation partially failed"
                );
                let applied = ids
                    .iter()
                    .enumerate()
                    .filter(|(position, _)| err.was_applied(*position))
                    .map(|(_, id)| *id)
                    .collect();
                outcome.record_error(err);
                applied
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Attach,
    Detach,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Attach => "attach",
            Direction::Detach => "detach",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldhost_contracts::{AlwaysFocusable, ResourceError, ResourceFactory};
    use fieldhost_model::{ItemDescriptor, Rect};

    #[derive(Debug)]
    struct Widget(String);

    struct Factory;

    impl ResourceFactory for Factory {
        type Resource = Widget;

        fn create(&mut self, item: &ItemDescriptor) -> Result<Widget, ResourceError> {
            Ok(Widget(item.id.to_string()))
        }

        fn restore_handle(
            &mut self,
            _item: &ItemDescriptor,
            _resource: &mut Widget,
        ) -> Result<(), ResourceError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Surface {
        attach_calls: Vec<Vec<String>>,
        detach_calls: Vec<Vec<String>>,
        reject_attach: Vec<usize>,
        positions: usize,
        released: usize,
        disposed: Vec<String>,
    }

    impl DisplaySurface for Surface {
        type Resource = Widget;
        type Snapshot = ();

        fn bulk_attach(&mut self, batch: &[&Widget]) -> Result<(), SurfaceError> {
            self.attach_calls.push(batch.iter().map(|w| w.0.clone()).collect());
            if self.reject_attach.is_empty() {
                Ok(())
            } else {
                Err(SurfaceError::new(batch.len(), self.reject_attach.clone(), "window busy"))
            }
        }

        fn bulk_detach(&mut self, batch: &[&Widget]) -> Result<(), SurfaceError> {
            self.detach_calls.push(batch.iter().map(|w| w.0.clone()).collect());
            Ok(())
        }

        fn set_position(&mut self, _resource: &mut Widget, _bounds: Rect) {
            self.positions += 1;
        }

        fn set_tab_index(&mut self, _resource: &mut Widget, _tab_index: usize) {}

        fn release_handle(&mut self, _resource: &mut Widget) {
            self.released += 1;
        }

        fn dispose(&mut self, resource: Widget) {
            self.disposed.push(resource.0);
        }
    }

    fn fixture(count: usize) -> (ItemCatalog, SlotMap<Widget>, Vec<ItemId>) {
        let mut catalog = ItemCatalog::new();
        let mut slots = SlotMap::new();
        let mut factory = Factory;
        let mut surface = Surface::default();
        for i in 0..count {
            let descriptor = ItemDescriptor::new(format!("f{i}"), "textbox")
                .with_bounds(Rect::new(0.0, i as f32 * 10.0, 10.0, 10.0));
            let id = catalog.add_item(descriptor.clone(), &AlwaysFocusable).unwrap();
            let mut slot = ManagedResourceSlot::new(id.clone());
            slot.ensure_materialized(&descriptor, &mut factory, &mut surface).unwrap();
            slots.insert(id, slot);
        }
        let ids = catalog.ids().cloned().collect();
        (catalog, slots, ids)
    }

    #[test]
    fn one_bulk_call_per_direction() {
        let (catalog, mut slots, ids) = fixture(6);
        let mut host = HostContainer::new(Surface::default());

        let policy = MemoryPolicy::default();
        let outcome = host.apply_batch(&mut slots, &catalog, &ids[..4], &[], policy);
        assert_eq!(outcome.attached, 4);
        assert_eq!(host.surface().attach_calls.len(), 1);
        assert!(host.surface().detach_calls.is_empty());
        assert_eq!(host.surface().positions, 4);

        let outcome = host.apply_batch(&mut slots, &catalog, &ids[4..], &ids[..2], policy);
        assert_eq!((outcome.attached, outcome.detached, outcome.destroyed), (2, 2, 2));
        assert_eq!(host.surface().attach_calls.len(), 2);
        assert_eq!(host.surface().detach_calls, vec![vec!["f0".to_string(), "f1".to_string()]]);
        assert!(!slots[&ids[0]].is_hosted());
        assert!(slots[&ids[5]].is_hosted());
    }

    #[test]
    fn partial_attach_failure_keeps_applied_part() {
        let (catalog, mut slots, ids) = fixture(4);
        let mut host = HostContainer::new(Surface {
            reject_attach: vec![1],
            ..Surface::default()
        });

        let outcome = host.apply_batch(&mut slots, &catalog, &ids, &[], MemoryPolicy::default());
        assert_eq!(outcome.attached, 3);
        assert!(outcome.error.is_some());
        let hosted: Vec<bool> = ids.iter().map(|id| slots[id].is_hosted()).collect();
        assert_eq!(hosted, vec![true, false, true, true]);
    }

    #[test]
    fn retire_detaches_hosted_and_disposes_everything() {
        let (catalog, mut slots, ids) = fixture(3);
        let mut host = HostContainer::new(Surface::default());
        host.apply_batch(&mut slots, &catalog, &ids[..1], &[], MemoryPolicy::empty());

        let retired: Vec<_> = slots.drain(..).map(|(_, slot)| slot).collect();
        let outcome = host.retire(retired, MemoryPolicy::empty());
        assert_eq!(outcome.detached, 1);
        assert_eq!(outcome.disposed, 3);
        assert_eq!(host.surface().disposed.len(), 3);
    }
}
