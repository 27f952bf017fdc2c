#![no_std]

//! Row store core - definitions for keyed row-major sparse containers
//!
//! This crate provides the binary block format, element and row-access
//! traits, and layout validation shared by owning stores and borrowed
//! views. It performs no allocation and no I/O.

pub mod entry;
pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use entry::IndexedEntry;
pub use error::*;
pub use format::*;
pub use traits::*;
