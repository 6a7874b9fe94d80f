//! Per-cycle and cumulative counters. Informational only; nothing in the
//! engine branches on them.

use crate::refresh::RefreshReason;

/// Structured record emitted once per refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleDiagnostics {
    pub reason: RefreshReason,
    /// Resources (or native handles) created during the cycle.
    pub created: usize,
    /// Items hosted on the display surface after the cycle.
    pub hosted: usize,
    /// Items intersecting the viewport (including margins).
    pub visible: usize,
    /// Items detached from the display surface during the cycle.
    pub removed: usize,
    /// Native handles released during the cycle.
    pub destroyed: usize,
    /// Resources fully disposed during the cycle.
    pub disposed: usize,
    /// Factory failures swallowed during the cycle.
    pub failed: usize,
}

impl CycleDiagnostics {
    pub fn new(reason: RefreshReason) -> Self {
        Self {
            reason,
            created: 0,
            hosted: 0,
            visible: 0,
            removed: 0,
            destroyed: 0,
            disposed: 0,
            failed: 0,
        }
    }
}

/// Running totals across the lifetime of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelStats {
    pub cycles: u64,
    pub created: u64,
    pub removed: u64,
    pub destroyed: u64,
    pub disposed: u64,
    pub factory_failures: u64,
    pub surface_failures: u64,
}

impl PanelStats {
    pub fn absorb(&mut self, cycle: &CycleDiagnostics) {
        self.cycles += 1;
        self.created += cycle.created as u64;
        self.removed += cycle.removed as u64;
        self.destroyed += cycle.destroyed as u64;
        self.disposed += cycle.disposed as u64;
        self.factory_failures += cycle.failed as u64;
    }
}
