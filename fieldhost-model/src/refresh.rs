use std::fmt::{self, Display};

/// Why a refresh cycle was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefreshReason {
    /// Items were added, removed or had their flags changed.
    ItemsChanged,
    /// Item geometry changed.
    LayoutChanged,
    /// Scroll position or viewport size changed.
    ViewportChanged,
    FocusChanged,
    ActivationChanged,
    PolicyChanged,
    Explicit,
}

impl RefreshReason {
    /// Whether this reason by itself forces a content-size / tab-order
    /// recompute, regardless of the dirty flag.
    pub fn invalidates_layout(&self) -> bool {
        matches!(
            self,
            RefreshReason::ItemsChanged
                | RefreshReason::LayoutChanged
                | RefreshReason::Explicit
        )
    }
}

impl Display for RefreshReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RefreshReason::ItemsChanged => "items-changed",
            RefreshReason::LayoutChanged => "layout-changed",
            RefreshReason::ViewportChanged => "viewport-changed",
            RefreshReason::FocusChanged => "focus-changed",
            RefreshReason::ActivationChanged => "activation-changed",
            RefreshReason::PolicyChanged => "policy-changed",
            RefreshReason::Explicit => "explicit",
        };
        f.write_str(label)
    }
}
