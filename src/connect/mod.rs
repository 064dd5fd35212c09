//! # Connection abstractions.
//!
//! This module provides the boundary types the steward supervises over:
//! - [`Provider`] - trait for acquiring and releasing a connection
//! - [`ProviderRef`] - shared reference to a provider (`Arc<dyn Provider>`)
//! - [`Resource`] - trait for the readable side of one live connection
//! - [`WorkUnit`] - immutable value produced by a successful poll

mod provider;
mod resource;

pub use provider::{Provider, ProviderRef};
pub use resource::{Resource, WorkUnit};
