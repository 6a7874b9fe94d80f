//! Ordered item store.
//!
//! Insertion order is tab order. Tab indices handed out on insert are
//! provisional; [`ItemCatalog::reassign_tab_order`] makes them contiguous
//! again after removals.

use fieldhost_contracts::FocusClassifier;
use fieldhost_model::{ItemDescriptor, ItemId, Rect, Size};
use indexmap::IndexMap;

use crate::error::InvalidItemReason;

/// Catalog entry: the caller's descriptor plus engine-owned ordering state.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    descriptor: ItemDescriptor,
    tab_index: usize,
    focusable: bool,
}

impl Item {
    pub fn id(&self) -> &ItemId {
        &self.descriptor.id
    }

    pub fn descriptor(&self) -> &ItemDescriptor {
        &self.descriptor
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.descriptor.bounds
    }

    pub fn tab_index(&self) -> usize {
        self.tab_index
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn is_explicitly_visible(&self) -> bool {
        self.descriptor.visible
    }
}

#[derive(Debug, Default)]
pub struct ItemCatalog {
    items: IndexMap<ItemId, Item>,
    next_tab_index: usize,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Focusability comes from the descriptor when it
    /// says so explicitly, otherwise from `classifier`.
    pub fn add_item<C>(
        &mut self,
        descriptor: ItemDescriptor,
        classifier: &C,
    ) -> Result<ItemId, InvalidItemReason>
    where
        C: FocusClassifier + ?Sized,
    {
        if descriptor.id.is_blank() {
            return Err(InvalidItemReason::MissingIdentity);
        }
        if self.items.contains_key(&descriptor.id) {
            return Err(InvalidItemReason::Duplicate(descriptor.id));
        }

        let focusable = descriptor
            .focusable
            .unwrap_or_else(|| classifier.is_focusable(&descriptor.kind));
        let id = descriptor.id.clone();
        let item = Item {
            descriptor,
            tab_index: self.next_tab_index,
            focusable,
        };
        self.next_tab_index += 1;
        self.items.insert(id.clone(), item);
        Ok(id)
    }

    /// Remove an item, keeping the relative order of the rest.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<Item> {
        self.items.shift_remove(id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.get_index_of(id)
    }

    pub fn get_index(&self, index: usize) -> Option<&Item> {
        self.items.get_index(index).map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order. Restartable: every call starts over.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Item> + ExactSizeIterator + '_ {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.items.keys()
    }

    /// Returns whether the bounds actually changed.
    pub fn set_bounds(&mut self, id: &ItemId, bounds: Option<Rect>) -> Option<bool> {
        let item = self.items.get_mut(id)?;
        let changed = item.descriptor.bounds != bounds;
        item.descriptor.bounds = bounds;
        Some(changed)
    }

    pub fn set_visible(&mut self, id: &ItemId, visible: bool) -> Option<bool> {
        let item = self.items.get_mut(id)?;
        let changed = item.descriptor.visible != visible;
        item.descriptor.visible = visible;
        Some(changed)
    }

    pub fn set_focusable(&mut self, id: &ItemId, focusable: bool) -> Option<bool> {
        let item = self.items.get_mut(id)?;
        let changed = item.focusable != focusable;
        item.focusable = focusable;
        item.descriptor.focusable = Some(focusable);
        Some(changed)
    }

    /// Renumber tab indices `0..len` in catalog order.
    pub fn reassign_tab_order(&mut self) {
        for (index, item) in self.items.values_mut().enumerate() {
            item.tab_index = index;
        }
        self.next_tab_index = self.items.len();
    }

    /// Far corner of all positioned items, plus `margin`.
    pub fn content_extent(&self, margin: Size) -> Size {
        let (right, bottom) = self
            .items
            .values()
            .filter_map(Item::bounds)
            .fold((0.0_f32, 0.0_f32), |(right, bottom), bounds| {
                (right.max(bounds.right()), bottom.max(bounds.bottom()))
            });
        Size::new(right + margin.width, bottom + margin.height)
    }

    pub fn clear(&mut self) -> Vec<Item> {
        self.next_tab_index = 0;
        self.items.drain(..).map(|(_, item)| item).collect()
    }
}
