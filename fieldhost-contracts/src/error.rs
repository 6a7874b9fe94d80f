use fieldhost_model::ItemId;
use thiserror::Error;

/// Failure reported by a [`ResourceFactory`](crate::ResourceFactory).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("resource construction failed for {item}: {reason}")]
    Construction { item: ItemId, reason: String },

    #[error("native handle could not be recreated for {item}: {reason}")]
    HandleRecreation { item: ItemId, reason: String },
}

impl ResourceError {
    pub fn construction(item: &ItemId, reason: impl Into<String>) -> Self {
        ResourceError::Construction {
            item: item.clone(),
            reason: reason.into(),
        }
    }

    pub fn handle_recreation(item: &ItemId, reason: impl Into<String>) -> Self {
        ResourceError::HandleRecreation {
            item: item.clone(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by a bulk display-surface operation.
///
/// `rejected` holds the positions (within the submitted batch) that were
/// not applied; every other position is assumed to have been applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "display surface rejected {count} of {attempted} resource(s): {message}",
    count = .rejected.len()
)]
pub struct SurfaceError {
    pub attempted: usize,
    pub rejected: Vec<usize>,
    pub message: String,
}

impl SurfaceError {
    pub fn new(attempted: usize, rejected: Vec<usize>, message: impl Into<String>) -> Self {
        Self {
            attempted,
            rejected,
            message: message.into(),
        }
    }

    /// A failure where nothing in the batch was applied.
    pub fn total(attempted: usize, message: impl Into<String>) -> Self {
        Self::new(attempted, (0..attempted).collect(), message)
    }

    pub fn was_applied(&self, position: usize) -> bool {
        position < self.attempted && !self.rejected.contains(&position)
    }
}
