//! Core data model definitions shared across fieldhost crates.
#![allow(missing_docs)]

pub mod diagnostics;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod ids;
pub mod item;
pub mod policy;
pub mod prelude;
pub mod refresh;

// Intentionally curated re-exports for downstream consumers.
pub use diagnostics::{CycleDiagnostics, PanelStats};
pub use error::{ModelError, Result};
pub use focus::FocusState;
pub use geometry::{Rect, Size};
pub use ids::{ItemId, ItemKind};
pub use item::ItemDescriptor;
pub use policy::MemoryPolicy;
pub use refresh::RefreshReason;
