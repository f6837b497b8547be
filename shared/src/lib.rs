//! Shared types and business rules for the Laundry Platform
//!
//! This crate contains the domain enums and the pure pricing/replenishment
//! logic used by the backend. It performs no I/O, which keeps order pricing
//! and the reorder rules fully unit-testable.

pub mod pricing;
pub mod reorder;
pub mod types;
pub mod usage;
pub mod validation;

pub use pricing::*;
pub use reorder::*;
pub use types::*;
pub use usage::*;
pub use validation::*;
