//! Format constants for serialized row stores

/// Revision byte written at the start of every serialized store.
///
/// Loading accepts exactly this revision; older and newer payloads are
/// skipped rather than interpreted.
pub const REVISION: u8 = 5;

/// Width in bytes of one serialized row offset
pub const OFFSET_WIDTH: usize = 4;

/// Width in bytes of the length prefix of a textual key
pub const TEXT_LEN_WIDTH: usize = 4;

/// Width in bytes of the key count that precedes textual keys
pub const TEXT_COUNT_WIDTH: usize = 8;

/// Marker stored in `IndexedEntry::index` for "no target"
pub const UNASSIGNED: i32 = -1;
