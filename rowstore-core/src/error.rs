//! Error types for row store format operations

/// Errors that can occur while validating or decoding row store data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// Row offsets do not describe a valid row partition of the flat data
    InvalidOffsets,
    /// Serialized element width differs from the in-memory element width
    ElementSizeMismatch,
    /// Data corruption detected
    CorruptedData,
    /// Insufficient buffer space
    InsufficientBuffer,
    /// Element count times element width does not fit in memory
    ArraySizeOverflow,
    /// Buffer is not aligned for the requested element type
    MisalignedBuffer,
}

impl core::fmt::Display for CoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            CoreError::InvalidOffsets => "Invalid row offsets",
            CoreError::ElementSizeMismatch => "Element size mismatch",
            CoreError::CorruptedData => "Data corruption detected",
            CoreError::InsufficientBuffer => "Insufficient buffer space",
            CoreError::ArraySizeOverflow => "Array size overflow",
            CoreError::MisalignedBuffer => "Misaligned buffer",
        };
        write!(f, "{msg}")
    }
}

impl core::error::Error for CoreError {}

/// Result type for core operations
pub type Result<T> = core::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn as_error(err: &dyn core::error::Error) -> Option<&dyn core::error::Error> {
        err.source()
    }

    #[test]
    fn test_core_error_is_an_error() {
        assert!(as_error(&CoreError::MisalignedBuffer).is_none());
    }
}
