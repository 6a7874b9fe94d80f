use fieldhost_contracts::{ResourceError, SurfaceError};
use fieldhost_model::ItemId;
use thiserror::Error;

/// Why an item descriptor was refused by the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidItemReason {
    #[error("identity is missing")]
    MissingIdentity,

    #[error("identity `{0}` is already registered")]
    Duplicate(ItemId),
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("invalid item: {0}")]
    InvalidItem(#[from] InvalidItemReason),

    #[error("unknown item `{0}`")]
    UnknownItem(ItemId),

    /// Only ever surfaced through logs and diagnostics; refresh cycles
    /// recover from it per item.
    #[error("resource creation failed for `{item}`: {source}")]
    ResourceCreation {
        item: ItemId,
        #[source]
        source: ResourceError,
    },

    #[error("display surface failure: {0}")]
    DisplaySurface(#[from] SurfaceError),

    #[error("refresh requested while a refresh cycle is already running")]
    ReentrantRefresh,
}

pub type Result<T> = std::result::Result<T, HostError>;
