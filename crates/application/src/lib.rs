//! Application layer - Use cases and orchestration
//!
//! Contains the daily run use case, the streak notifier and the port
//! definitions the infrastructure layer implements.

pub mod error;
pub mod ports;
pub mod services;
#[cfg(test)]
pub(crate) mod testing;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
