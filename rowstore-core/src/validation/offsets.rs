//! Row offset invariants
//!
//! A valid offsets array has `rows + 1` entries, starts at 0, never
//! decreases, and ends at the flat element count.

use crate::CoreError;

/// Validate a row offsets array against the length of its flat buffer
pub fn validate_row_offsets(offsets: &[u32], flat_len: usize) -> Result<(), CoreError> {
    let (first, last) = match (offsets.first(), offsets.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(CoreError::InvalidOffsets),
    };

    if first != 0 || last as usize != flat_len {
        return Err(CoreError::InvalidOffsets);
    }

    if offsets.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(CoreError::InvalidOffsets);
    }

    Ok(())
}

/// Convert an element position into a stored row offset
pub fn offset_for(position: usize) -> Result<u32, CoreError> {
    u32::try_from(position).map_err(|_| CoreError::ArraySizeOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_offsets() {
        assert_eq!(validate_row_offsets(&[0], 0), Ok(()));
        assert_eq!(validate_row_offsets(&[0, 2, 2, 5], 5), Ok(()));
    }

    #[test]
    fn test_invalid_offsets() {
        let invalid = Err(CoreError::InvalidOffsets);
        assert_eq!(validate_row_offsets(&[], 0), invalid);
        assert_eq!(validate_row_offsets(&[1, 2], 2), invalid);
        assert_eq!(validate_row_offsets(&[0, 3, 2], 2), invalid);
        assert_eq!(validate_row_offsets(&[0, 2], 3), invalid);
    }

    #[test]
    fn test_offset_for() {
        assert_eq!(offset_for(7), Ok(7));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            offset_for(u32::MAX as usize + 1),
            Err(CoreError::ArraySizeOverflow)
        );
    }
}
