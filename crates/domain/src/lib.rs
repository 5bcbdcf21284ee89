//! Domain layer for heatstreak
//!
//! Contains the weather records, the hot-and-dry policy and the streak count.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod threshold;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use threshold::HotDryThreshold;
pub use value_objects::*;
