//! Construction-time configuration for row stores

/// Range-check policy for row accessors.
///
/// `Checked` verifies every row number against the row count and panics
/// with a descriptive message on violation. `Unchecked` skips that
/// verification; slice indexing still cannot read outside the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessMode {
    Checked,
    Unchecked,
}

impl AccessMode {
    /// `Checked` for builds with debug assertions, `Unchecked` otherwise
    pub const fn from_build_profile() -> Self {
        if cfg!(debug_assertions) {
            AccessMode::Checked
        } else {
            AccessMode::Unchecked
        }
    }

    pub const fn is_checked(self) -> bool {
        matches!(self, AccessMode::Checked)
    }
}

impl Default for AccessMode {
    fn default() -> Self {
        Self::from_build_profile()
    }
}

/// Configuration applied when a store is created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreConfig {
    /// Row range-check policy
    pub access_mode: AccessMode,
    /// Rows to reserve up front
    pub row_capacity: usize,
    /// Elements to reserve up front
    pub element_capacity: usize,
}

impl StoreConfig {
    /// Config with an explicit access mode and no reservation
    pub fn with_access_mode(access_mode: AccessMode) -> Self {
        Self {
            access_mode,
            ..Self::default()
        }
    }

    /// Reserve room for `rows` rows
    pub fn with_row_capacity(mut self, rows: usize) -> Self {
        self.row_capacity = rows;
        self
    }

    /// Reserve room for `elements` elements
    pub fn with_element_capacity(mut self, elements: usize) -> Self {
        self.element_capacity = elements;
        self
    }

    /// Estimate the element reservation from an expected average row length
    pub fn with_average_row_len(mut self, average: usize) -> Self {
        self.element_capacity = self.row_capacity.saturating_mul(average);
        self
    }
}
