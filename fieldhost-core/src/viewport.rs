use fieldhost_model::{Rect, Size};

/// Visible window onto the form content.
///
/// Replaced wholesale on every layout or scroll event rather than mutated
/// field by field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub visible_bounds: Rect,
    pub content_size: Size,
    pub active: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            visible_bounds: Rect::default(),
            content_size: Size::ZERO,
            active: true,
        }
    }
}

impl Viewport {
    pub fn new(visible_bounds: Rect, content_size: Size, active: bool) -> Self {
        Self {
            visible_bounds,
            content_size,
            active,
        }
    }

    pub fn with_bounds(self, visible_bounds: Rect) -> Self {
        Self {
            visible_bounds,
            ..self
        }
    }

    pub fn with_active(self, active: bool) -> Self {
        Self { active, ..self }
    }

    pub fn with_content_size(self, content_size: Size) -> Self {
        Self {
            content_size,
            ..self
        }
    }

    /// Whether hosting only the intersecting subset pays off.
    ///
    /// Small forms, and forms that are mostly on screen anyway, are hosted
    /// in full. Visible dimensions are clamped to the content dimensions
    /// before the ratio is taken.
    pub fn warrants_virtualization(&self, min_content_area: f32, max_visible_ratio: f32) -> bool {
        let content = self.content_size;
        let content_area = content.area();
        if content_area < min_content_area || content_area <= 0.0 {
            return false;
        }
        let visible_width = self.visible_bounds.width.clamp(0.0, content.width);
        let visible_height = self.visible_bounds.height.clamp(0.0, content.height);
        (visible_width * visible_height) / content_area <= max_visible_ratio
    }

    /// Region an item must intersect to count as in view.
    pub fn hosting_region(&self, margin_x: f32, margin_y: f32) -> Rect {
        self.visible_bounds.inflate(margin_x, margin_y)
    }

    /// Smallest scroll `(dx, dy)` that brings `target` into view. When the
    /// target is larger than the viewport its top-left corner wins.
    pub fn reveal_offset(&self, target: &Rect) -> (f32, f32) {
        let view = &self.visible_bounds;
        let dx = axis_offset(view.x, view.right(), target.x, target.right());
        let dy = axis_offset(view.y, view.bottom(), target.y, target.bottom());
        (dx, dy)
    }
}

fn axis_offset(view_start: f32, view_end: f32, start: f32, end: f32) -> f32 {
    if start < view_start {
        start - view_start
    } else if end > view_end {
        (end - view_end).min(start - view_start)
    } else {
        0.0
    }
}
