//! Binary format definitions for serialized row stores
//!
//! This module contains pure data structure definitions for the wire format.
//! No I/O here, only the layout.

pub mod block;
pub mod constants;

pub use block::BlockHeader;
pub use constants::{REVISION, UNASSIGNED};
