use crate::error::ResourceError;
use fieldhost_model::ItemDescriptor;

/// Produces the native resource backing one item, on demand.
///
/// Implementations own widget construction per item kind. Failures are
/// recovered per item by the engine; one bad item never aborts a cycle.
pub trait ResourceFactory {
    type Resource;

    /// Build a fresh resource with a live native handle.
    fn create(&mut self, item: &ItemDescriptor) -> Result<Self::Resource, ResourceError>;

    /// Recreate the native handle of a resource whose handle was released,
    /// keeping the resource object itself.
    fn restore_handle(
        &mut self,
        item: &ItemDescriptor,
        resource: &mut Self::Resource,
    ) -> Result<(), ResourceError>;
}

impl<T: ResourceFactory + ?Sized> ResourceFactory for Box<T> {
    type Resource = T::Resource;

    fn create(&mut self, item: &ItemDescriptor) -> Result<Self::Resource, ResourceError> {
        (**self).create(item)
    }

    fn restore_handle(
        &mut self,
        item: &ItemDescriptor,
        resource: &mut Self::Resource,
    ) -> Result<(), ResourceError> {
        (**self).restore_handle(item, resource)
    }
}
