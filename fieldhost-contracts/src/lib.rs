//! Trait surfaces that describe the collaborators of the hosting engine:
//! where resources come from, where they are displayed, and which item
//! kinds can take keyboard focus.

pub mod classifier;
pub mod error;
pub mod factory;
pub mod surface;

pub use classifier::{AlwaysFocusable, FocusClassifier, FocusableKinds};
pub use error::{ResourceError, SurfaceError};
pub use factory::ResourceFactory;
pub use surface::DisplaySurface;

/// Frequently used trait combinators for engine and host crates.
pub mod prelude {
    pub use super::classifier::FocusClassifier;
    pub use super::error::{ResourceError, SurfaceError};
    pub use super::factory::ResourceFactory;
    pub use super::surface::DisplaySurface;
    pub use fieldhost_model::prelude::*;
}
