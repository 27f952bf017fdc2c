//! Abstract interfaces shared by owning and borrowed row containers
//!
//! Traits are pure interfaces plus provided methods over them - no storage.

pub mod element;
pub mod indexed;
pub mod rows;

pub use element::FixedElement;
pub use indexed::HasIndex;
pub use rows::RowAccess;
