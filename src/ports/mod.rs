//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the use cases and the outside world (currently only storage).

mod storage;

pub use storage::{AssessmentSnapshot, Storage};
