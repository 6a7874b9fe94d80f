use crate::ids::ItemId;

/// Focused item plus its immediate focusable neighbours in tab order.
///
/// Neighbours are never the focused item itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusState {
    pub focused: Option<ItemId>,
    pub prev_focusable: Option<ItemId>,
    pub next_focusable: Option<ItemId>,
}

impl FocusState {
    /// True when `id` is the focused item or one of its neighbours.
    pub fn is_near_focus(&self, id: &ItemId) -> bool {
        [&self.focused, &self.prev_focusable, &self.next_focusable]
            .into_iter()
            .any(|slot| slot.as_ref() == Some(id))
    }

    pub fn clear(&mut self) {
        *self = FocusState::default();
    }
}
