//! Array bounds and alignment validation
//!
//! Pure functions that check byte buffers before they are reinterpreted
//! as typed element arrays.

use crate::CoreError;

/// Validate that `byte_len` bytes hold a whole number of `width`-byte elements
///
/// Returns the element count.
pub const fn validate_array_bounds(byte_len: usize, width: usize) -> Result<usize, CoreError> {
    if width == 0 {
        return Err(CoreError::ElementSizeMismatch);
    }

    if !byte_len.is_multiple_of(width) {
        return Err(CoreError::CorruptedData);
    }

    let count = byte_len / width;

    // Row offsets are 32-bit, so no element count past u32::MAX is addressable.
    if count > u32::MAX as usize {
        return Err(CoreError::ArraySizeOverflow);
    }

    Ok(count)
}

/// Validate alignment for a pointer to typed data
pub fn validate_alignment<T>(ptr: *const u8) -> Result<(), CoreError> {
    let alignment = core::mem::align_of::<T>();
    let addr = ptr as usize;

    if !addr.is_multiple_of(alignment) {
        return Err(CoreError::MisalignedBuffer);
    }

    Ok(())
}

/// Validate that a byte slice can be safely interpreted as a typed array
///
/// Combines length and alignment validation.
pub fn validate_typed_slice<T>(data: &[u8]) -> Result<usize, CoreError> {
    validate_alignment::<T>(data.as_ptr())?;
    validate_array_bounds(data.len(), core::mem::size_of::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_array_bounds() {
        assert_eq!(validate_array_bounds(16, 4), Ok(4));
        assert_eq!(validate_array_bounds(24, 8), Ok(3));
        assert_eq!(validate_array_bounds(0, 4), Ok(0));

        assert_eq!(validate_array_bounds(15, 4), Err(CoreError::CorruptedData));
        assert_eq!(
            validate_array_bounds(8, 0),
            Err(CoreError::ElementSizeMismatch)
        );
    }

    #[test]
    fn test_validate_alignment() {
        let aligned_data: [u64; 4] = [0; 4];
        let ptr = aligned_data.as_ptr() as *const u8;

        assert_eq!(validate_alignment::<u64>(ptr), Ok(()));
        assert_eq!(validate_alignment::<u32>(ptr), Ok(()));

        let unaligned_ptr = ptr.wrapping_add(1);
        assert_eq!(
            validate_alignment::<u64>(unaligned_ptr),
            Err(CoreError::MisalignedBuffer)
        );
    }

    #[test]
    fn test_validate_typed_slice() {
        let words: [u32; 3] = [1, 2, 3];
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        assert_eq!(validate_typed_slice::<u32>(bytes), Ok(3));
        assert_eq!(
            validate_typed_slice::<u32>(&bytes[..5]),
            Err(CoreError::CorruptedData)
        );
    }
}
