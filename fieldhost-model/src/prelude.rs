pub use crate::diagnostics::{CycleDiagnostics, PanelStats};
pub use crate::focus::FocusState;
pub use crate::geometry::{Rect, Size};
pub use crate::ids::{ItemId, ItemKind};
pub use crate::item::ItemDescriptor;
pub use crate::policy::MemoryPolicy;
pub use crate::refresh::RefreshReason;
