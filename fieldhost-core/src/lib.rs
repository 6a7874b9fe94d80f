//! Virtualized resource hosting for large, data-driven forms.
//!
//! A form may declare thousands of fields while only a few dozen native,
//! handle-bearing widgets exist at any time. [`VirtualizingPanel`] keeps the
//! catalog of every field, materializes resources lazily for the fields near
//! the viewport or the keyboard focus, and reconciles the hosted set against
//! the display surface in batches.
//!
//! ```text
//! caller ─► VirtualizingPanel ─► RefreshPlanner ─► HostContainer ─► DisplaySurface
//!                 │                                     │
//!                 └── ItemCatalog / FocusChainTracker   └── ManagedResourceSlot ─► ResourceFactory
//! ```
#![allow(missing_docs)]

pub mod catalog;
pub mod error;
pub mod focus;
pub mod host;
pub mod panel;
pub mod planner;
pub mod settings;
pub mod shared;
pub mod slot;
pub mod viewport;

pub use catalog::{Item, ItemCatalog};
pub use error::{HostError, InvalidItemReason, Result};
pub use focus::FocusChainTracker;
pub use host::{BatchOutcome, HostContainer, RetireOutcome, SlotMap};
pub use panel::VirtualizingPanel;
pub use planner::{RefreshPlan, RefreshPlanner};
pub use settings::{
    DEFAULT_MARGIN_X, DEFAULT_MARGIN_Y, DEFAULT_MAX_VISIBLE_RATIO, DEFAULT_MIN_CONTENT_AREA,
    VirtualizationSettings,
};
pub use shared::{SharedPanel, WeakPanel};
pub use slot::{ManagedResourceSlot, Materialized, Released, SlotLifecycle};
pub use viewport::Viewport;

pub use fieldhost_contracts::{
    AlwaysFocusable, DisplaySurface, FocusClassifier, FocusableKinds, ResourceError,
    ResourceFactory, SurfaceError,
};
pub use fieldhost_model::{
    CycleDiagnostics, FocusState, ItemDescriptor, ItemId, ItemKind, MemoryPolicy, PanelStats,
    Rect, RefreshReason, Size,
};
