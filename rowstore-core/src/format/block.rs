//! Block header definitions
//!
//! Every sequence in a serialized store (row offsets, flat data, fixed-size
//! keys) is written as a block: a 12-byte header followed by
//! `count * element_size` payload bytes.

use crate::{CoreError, Result};

/// Header preceding every serialized block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Width of one element in bytes
    pub element_size: i32,
    /// Number of elements in the block
    pub count: i64,
}

impl BlockHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = 12;

    /// Create a header for `count` elements of `element_size` bytes
    pub const fn new(element_size: usize, count: usize) -> Self {
        Self {
            element_size: element_size as i32,
            count: count as i64,
        }
    }

    /// Parse header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(CoreError::InsufficientBuffer);
        }

        let element_size = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let count = i64::from_le_bytes([
            bytes[4], bytes[5], bytes[6], bytes[7], bytes[8], bytes[9], bytes[10], bytes[11],
        ]);

        if element_size < 0 || count < 0 {
            return Err(CoreError::CorruptedData);
        }

        Ok(Self {
            element_size,
            count,
        })
    }

    /// Convert header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.element_size.to_le_bytes());
        bytes[4..12].copy_from_slice(&self.count.to_le_bytes());
        bytes
    }

    /// Check that the block holds elements of exactly `width` bytes
    pub fn expect_width(&self, width: usize) -> Result<()> {
        if self.element_size as usize != width {
            return Err(CoreError::ElementSizeMismatch);
        }
        Ok(())
    }

    /// Number of elements as `usize`
    pub fn len(&self) -> Result<usize> {
        usize::try_from(self.count).map_err(|_| CoreError::ArraySizeOverflow)
    }

    /// Whether the block carries no elements
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Payload length in bytes with overflow protection
    pub fn payload_len(&self) -> Result<usize> {
        self.len()?
            .checked_mul(self.element_size as usize)
            .ok_or(CoreError::ArraySizeOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_bytes_layout() {
        let header = BlockHeader::new(4, 3);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], &[4, 0, 0, 0]);
        assert_eq!(&bytes[4..12], &[3, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(BlockHeader::from_bytes(&bytes), Ok(header));
    }

    #[test]
    fn test_header_rejects_short_and_negative() {
        assert_eq!(
            BlockHeader::from_bytes(&[0u8; 11]),
            Err(CoreError::InsufficientBuffer)
        );

        let mut bytes = BlockHeader::new(4, 1).to_bytes();
        bytes[4..12].copy_from_slice(&(-1i64).to_le_bytes());
        assert_eq!(
            BlockHeader::from_bytes(&bytes),
            Err(CoreError::CorruptedData)
        );
    }

    #[test]
    fn test_payload_len() {
        assert_eq!(BlockHeader::new(8, 5).payload_len(), Ok(40));
        assert_eq!(BlockHeader::new(8, 0).payload_len(), Ok(0));
        assert!(BlockHeader::new(8, 0).is_empty());

        let huge = BlockHeader {
            element_size: 16,
            count: i64::MAX,
        };
        assert!(huge.payload_len().is_err());
    }

    #[test]
    fn test_expect_width() {
        let header = BlockHeader::new(8, 2);
        assert_eq!(header.expect_width(8), Ok(()));
        assert_eq!(header.expect_width(4), Err(CoreError::ElementSizeMismatch));
    }
}
