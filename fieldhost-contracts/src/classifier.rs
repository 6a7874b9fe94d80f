use fieldhost_model::ItemKind;
use std::collections::HashSet;

/// Decides whether items of a given kind can take keyboard focus.
pub trait FocusClassifier {
    fn is_focusable(&self, kind: &ItemKind) -> bool;
}

impl<F> FocusClassifier for F
where
    F: Fn(&ItemKind) -> bool,
{
    fn is_focusable(&self, kind: &ItemKind) -> bool {
        self(kind)
    }
}

/// Treats every kind as focusable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFocusable;

impl FocusClassifier for AlwaysFocusable {
    fn is_focusable(&self, _kind: &ItemKind) -> bool {
        true
    }
}

/// Allow-list of focusable kinds.
#[derive(Debug, Clone, Default)]
pub struct FocusableKinds {
    kinds: HashSet<ItemKind>,
}

impl FocusableKinds {
    pub fn new<I, K>(kinds: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ItemKind>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
        }
    }
}

impl FocusClassifier for FocusableKinds {
    fn is_focusable(&self, kind: &ItemKind) -> bool {
        self.kinds.contains(kind)
    }
}
