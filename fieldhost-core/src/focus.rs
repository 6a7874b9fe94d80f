//! Focus chain tracking.
//!
//! Keeps the focused item's immediate focusable neighbours in tab order so
//! the panel can keep them hosted and Tab/Shift+Tab never lands on a
//! virtualized-away field.

use fieldhost_model::{FocusState, ItemId};

use crate::catalog::{Item, ItemCatalog};

#[derive(Debug, Default, Clone)]
pub struct FocusChainTracker {
    state: FocusState,
}

impl FocusChainTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn focused(&self) -> Option<&ItemId> {
        self.state.focused.as_ref()
    }

    pub fn is_near_focus(&self, id: &ItemId) -> bool {
        self.state.is_near_focus(id)
    }

    /// Record a new focused item (or none) and recompute its neighbours.
    /// Unknown ids clear the focus state.
    pub fn on_focus_changed(
        &mut self,
        catalog: &ItemCatalog,
        focused: Option<&ItemId>,
    ) -> &FocusState {
        self.state.focused = focused.filter(|id| catalog.contains(id)).cloned();
        self.recompute(catalog)
    }

    /// Re-derive neighbours for the current focus, e.g. after tab order or
    /// focusability changed. Drops the focus if the item left the catalog.
    pub fn recompute(&mut self, catalog: &ItemCatalog) -> &FocusState {
        let index = self
            .state
            .focused
            .as_ref()
            .and_then(|id| catalog.index_of(id));

        match index {
            Some(index) => {
                let (prev, next) = neighbors(catalog, index);
                self.state.prev_focusable = prev;
                self.state.next_focusable = next;
            }
            None => self.state.clear(),
        }
        &self.state
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }
}

/// Nearest focusable items before and after `index`, wrapping around the
/// catalog once. Never returns the item at `index` itself.
pub fn neighbors(catalog: &ItemCatalog, index: usize) -> (Option<ItemId>, Option<ItemId>) {
    let len = catalog.len();
    if index >= len {
        return (None, None);
    }

    let scan = |offset: fn(usize, usize, usize) -> usize| {
        (1..len)
            .map(|step| offset(index, step, len))
            .filter_map(|at| catalog.get_index(at))
            .find(|item| item.is_focusable())
            .map(Item::id)
            .cloned()
    };

    let prev = scan(|index, step, len| (index + len - step) % len);
    let next = scan(|index, step, len| (index + step) % len);
    (prev, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldhost_contracts::FocusableKinds;
    use fieldhost_model::ItemDescriptor;

    fn catalog(kinds: &[(&str, &str)]) -> ItemCatalog {
        let classifier = FocusableKinds::new(["textbox"]);
        let mut catalog = ItemCatalog::new();
        for (id, kind) in kinds {
            catalog.add_item(ItemDescriptor::new(*id, *kind), &classifier).unwrap();
        }
        catalog
    }

    fn id(value: &str) -> ItemId {
        ItemId::new(value)
    }

    #[test]
    fn neighbours_skip_non_focusable_items() {
        let catalog = catalog(&[
            ("a", "textbox"),
            ("label", "label"),
            ("b", "textbox"),
            ("line", "line"),
            ("c", "textbox"),
        ]);
        let mut tracker = FocusChainTracker::new();
        let state = tracker.on_focus_changed(&catalog, Some(&id("b")));

        assert_eq!(state.prev_focusable, Some(id("a")));
        assert_eq!(state.next_focusable, Some(id("c")));
    }

    #[test]
    fn scan_wraps_around_the_ends() {
        let catalog = catalog(&[("a", "textbox"), ("b", "textbox"), ("c", "textbox")]);
        let mut tracker = FocusChainTracker::new();

        let state = tracker.on_focus_changed(&catalog, Some(&id("a"))).clone();
        assert_eq!(state.prev_focusable, Some(id("c")));
        assert_eq!(state.next_focusable, Some(id("b")));

        let state = tracker.on_focus_changed(&catalog, Some(&id("c")));
        assert_eq!(state.prev_focusable, Some(id("b")));
        assert_eq!(state.next_focusable, Some(id("a")));
    }

    #[test]
    fn single_focusable_item_has_no_neighbours() {
        let catalog = catalog(&[("label", "label"), ("only", "textbox"), ("line", "line")]);
        let mut tracker = FocusChainTracker::new();
        let state = tracker.on_focus_changed(&catalog, Some(&id("only")));

        assert_eq!(state.focused, Some(id("only")));
        assert_eq!(state.prev_focusable, None);
        assert_eq!(state.next_focusable, None);
    }

    #[test]
    fn two_focusable_items_point_at_each_other() {
        let catalog = catalog(&[("a", "textbox"), ("b", "textbox")]);
        let mut tracker = FocusChainTracker::new();
        let state = tracker.on_focus_changed(&catalog, Some(&id("a")));
        assert_eq!(state.prev_focusable, Some(id("b")));
        assert_eq!(state.next_focusable, Some(id("b")));
    }

    #[test]
    fn unknown_or_removed_focus_clears_state() {
        let mut catalog = catalog(&[("a", "textbox"), ("b", "textbox")]);
        let mut tracker = FocusChainTracker::new();

        assert_eq!(tracker.on_focus_changed(&catalog, Some(&id("zzz"))), &FocusState::default());

        tracker.on_focus_changed(&catalog, Some(&id("a")));
        catalog.remove_item(&id("a"));
        assert_eq!(tracker.recompute(&catalog), &FocusState::default());
    }
}
