use crate::geometry::Rect;
use crate::ids::{ItemId, ItemKind};

/// Caller-facing description of one form field.
///
/// `focusable` overrides the injected classifier when set; leave it `None`
/// to let the classifier decide from `kind`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDescriptor {
    pub id: ItemId,
    pub kind: ItemKind,
    pub bounds: Option<Rect>,
    pub visible: bool,
    pub focusable: Option<bool>,
}

impl ItemDescriptor {
    pub fn new(id: impl Into<ItemId>, kind: impl Into<ItemKind>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            bounds: None,
            visible: true,
            focusable: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = Some(focusable);
        self
    }
}
