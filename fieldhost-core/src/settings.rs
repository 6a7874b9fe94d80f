//! Tuning knobs for virtualization.

use fieldhost_model::{MemoryPolicy, Size};

/// Horizontal slack (layout units) added on each side of the viewport before
/// testing item intersection.
pub const DEFAULT_MARGIN_X: f32 = 90.0;
/// Vertical slack added above and below the viewport.
pub const DEFAULT_MARGIN_Y: f32 = 60.0;
/// Above this visible/content ratio virtualization is skipped.
pub const DEFAULT_MAX_VISIBLE_RATIO: f32 = 0.9;
/// Content areas smaller than this are never virtualized.
pub const DEFAULT_MIN_CONTENT_AREA: f32 = 100.0;

/// Runtime settings of one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VirtualizationSettings {
    pub policy: MemoryPolicy,
    pub margin_x: f32,
    pub margin_y: f32,
    pub max_visible_ratio: f32,
    pub min_content_area: f32,
    /// Padding added to the far edges of the content extent.
    pub content_margin: Size,
    /// Ask the display surface for a placeholder image before deactivating.
    pub capture_snapshot_on_deactivate: bool,
}

impl Default for VirtualizationSettings {
    fn default() -> Self {
        Self {
            policy: MemoryPolicy::default(),
            margin_x: DEFAULT_MARGIN_X,
            margin_y: DEFAULT_MARGIN_Y,
            max_visible_ratio: DEFAULT_MAX_VISIBLE_RATIO,
            min_content_area: DEFAULT_MIN_CONTENT_AREA,
            content_margin: Size::new(0.0, 0.0),
            capture_snapshot_on_deactivate: true,
        }
    }
}

impl VirtualizationSettings {
    pub fn with_policy(mut self, policy: MemoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_margins(mut self, margin_x: f32, margin_y: f32) -> Self {
        self.margin_x = margin_x;
        self.margin_y = margin_y;
        self
    }

    pub fn with_content_margin(mut self, margin: Size) -> Self {
        self.content_margin = margin;
        self
    }
}
