use crate::error::SurfaceError;
use fieldhost_model::Rect;

/// The live display surface resources are attached to.
///
/// Bulk operations exist so that large diffs cost one surface round trip
/// instead of one per item. A bulk call that partially fails reports the
/// rejected positions through [`SurfaceError::rejected`]; the applied part is
/// kept.
pub trait DisplaySurface {
    type Resource;

    /// Immutable placeholder image of the surface, painted while the panel
    /// is inactive.
    type Snapshot;

    fn bulk_attach(&mut self, batch: &[&Self::Resource]) -> Result<(), SurfaceError>;

    fn bulk_detach(&mut self, batch: &[&Self::Resource]) -> Result<(), SurfaceError>;

    fn set_position(&mut self, resource: &mut Self::Resource, bounds: Rect);

    fn set_tab_index(&mut self, resource: &mut Self::Resource, tab_index: usize);

    /// Drop the native handle while keeping the resource object.
    fn release_handle(&mut self, resource: &mut Self::Resource);

    /// Irreversibly tear the resource down.
    fn dispose(&mut self, resource: Self::Resource);

    fn capture_snapshot(&mut self) -> Option<Self::Snapshot> {
        None
    }
}
