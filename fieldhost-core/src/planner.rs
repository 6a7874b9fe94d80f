//! Pure hosting decisions.
//!
//! Given the catalog, the viewport, the focus chain and the memory policy,
//! decide which items must be hosted and diff that against what currently
//! is. Nothing here touches resources or the display surface.

use fieldhost_model::{FocusState, ItemId, MemoryPolicy, Rect};

use crate::catalog::{Item, ItemCatalog};
use crate::settings::VirtualizationSettings;
use crate::viewport::Viewport;

/// Diff produced by one planning pass, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshPlan {
    pub to_add: Vec<ItemId>,
    pub to_remove: Vec<ItemId>,
    /// Items whose bounds intersect the inflated viewport.
    pub visible_count: usize,
    /// Items required after the plan is applied.
    pub hosted_count: usize,
    /// Whether the viewport subset was used, as opposed to hosting every
    /// visible item.
    pub virtualized: bool,
}

impl RefreshPlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshPlanner {
    policy: MemoryPolicy,
    margin_x: f32,
    margin_y: f32,
    max_visible_ratio: f32,
    min_content_area: f32,
}

impl Default for RefreshPlanner {
    fn default() -> Self {
        Self::new(&VirtualizationSettings::default())
    }
}

impl RefreshPlanner {
    pub fn new(settings: &VirtualizationSettings) -> Self {
        Self {
            policy: settings.policy,
            margin_x: settings.margin_x,
            margin_y: settings.margin_y,
            max_visible_ratio: settings.max_visible_ratio,
            min_content_area: settings.min_content_area,
        }
    }

    pub fn policy(&self) -> MemoryPolicy {
        self.policy
    }

    /// Build the add/remove diff. `is_hosted` reports the current hosted
    /// flag of an item's slot.
    pub fn compute<H>(
        &self,
        catalog: &ItemCatalog,
        viewport: &Viewport,
        focus: &FocusState,
        is_hosted: H,
    ) -> RefreshPlan
    where
        H: Fn(&ItemId) -> bool,
    {
        let optimize = viewport
            .warrants_virtualization(self.min_content_area, self.max_visible_ratio);
        let region = viewport.hosting_region(self.margin_x, self.margin_y);

        let mut plan = RefreshPlan {
            virtualized: optimize,
            ..RefreshPlan::default()
        };

        for item in catalog.iter() {
            let in_view = in_region(item, &region);
            if in_view {
                plan.visible_count += 1;
            }

            let required = self.is_required(item, viewport, focus, optimize, in_view);
            let hosted = is_hosted(item.id());
            if required {
                plan.hosted_count += 1;
                if !hosted {
                    plan.to_add.push(item.id().clone());
                }
            } else if hosted {
                plan.to_remove.push(item.id().clone());
            }
        }
        plan
    }

    fn is_required(
        &self,
        item: &Item,
        viewport: &Viewport,
        focus: &FocusState,
        optimize: bool,
        in_view: bool,
    ) -> bool {
        if !item.is_explicitly_visible() {
            return false;
        }
        if self.policy.hosts_always() {
            return true;
        }
        viewport.active && (!optimize || in_view || focus.is_near_focus(item.id()))
    }
}

fn in_region(item: &Item, region: &Rect) -> bool {
    item.bounds().is_some_and(|bounds| bounds.intersects(region))
}
