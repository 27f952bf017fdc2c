//! Validation utilities for row store layouts
//!
//! This module contains pure validation functions with no I/O dependencies.

pub mod bounds;
pub mod offsets;

pub use bounds::{validate_alignment, validate_array_bounds, validate_typed_slice};
pub use offsets::{offset_for, validate_row_offsets};
