//! rowstore - Keyed row-major sparse containers
//!
//! Variable-length per-entity data (neighbour lists, per-marker labels,
//! inverted indexes) stored as compressed sparse rows and addressed by row
//! number or by an arbitrary sortable key.
//!
//! ## Architecture
//!
//! - **rowstore-core**: block format, element traits, validation (no I/O)
//! - **rowstore**: owning stores, borrowed views, key index, persistence
//!
//! ## Quick Start
//!
//! ```rust
//! use rowstore::{IndexedEntry, KeyedRowStore, Unbuilt};
//!
//! fn example() -> rowstore::Result<()> {
//!     let mut links = KeyedRowStore::<String, IndexedEntry<f32>, Unbuilt>::new();
//!     links.add_fixed_row("A".into(), &[IndexedEntry::new(1, 0.9)]);
//!     links.add_fixed_row("B".into(), &[IndexedEntry::new(2, 0.4)]);
//!     links.add_fixed_row("C".into(), &[]);
//!     let links = links.build_index()?;
//!
//!     // Incoming references per row, built in linear time
//!     let incoming = links.rows().transpose(links.row_count())?;
//!     assert_eq!(incoming.row(2)[0].index, 1);
//!
//!     // Keep A and C; A's reference to B is dropped
//!     let subset = links.subset_and_remap(&["A".to_string(), "C".to_string()]);
//!     assert!(subset.row_by_key("A").is_some_and(|row| row.is_empty()));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **serde**: `Serialize`/`Deserialize` for entries and configuration
//! - **mmap**: file loading through a read-only memory map

// Re-export core abstractions and format definitions
pub use rowstore_core::{
    BlockHeader, CoreError, FixedElement, HasIndex, IndexedEntry, RowAccess, REVISION,
};

mod bucket;
pub mod codec;
pub mod config;
pub mod error;
pub mod key_index;
pub mod keyed;
mod logging;
#[cfg(feature = "mmap")]
pub mod mmap;
pub mod row_store;
pub mod row_view;
pub mod span;
pub mod version;

pub use codec::KeyCodec;
pub use config::{AccessMode, StoreConfig};
pub use error::{Error, Result};
pub use key_index::{Built, IndexState, SortedKeyIndex, Unbuilt};
pub use keyed::KeyedRowStore;
pub use row_store::RowStore;
pub use row_view::{RowView, RowViewMut};
pub use span::{Span, SpanMut};
pub use version::Version;

#[cfg(feature = "mmap")]
pub use mmap::{load_file, load_keyed_file, save_file, save_keyed_file};
