//! Binary persistence for row stores, key indexes and keyed stores
//!
//! Layout, all little-endian:
//!
//! ```text
//! revision: u8 (= 5)
//! offsets block: element_size i32 | count i64 | count * 4 bytes
//! flat block:    element_size i32 | count i64 | count * WIDTH bytes
//! keys:          fixed-width block, or count i64 then (len u32, utf-8)*
//! ```
//!
//! Loads decode into fresh buffers and validate them before anything is
//! handed back, so a failed `load_into` leaves its target untouched.

use std::io::{Read, Write};

use rowstore_core::format::constants::{OFFSET_WIDTH, TEXT_COUNT_WIDTH, TEXT_LEN_WIDTH};
use rowstore_core::validation::validate_row_offsets;
use rowstore_core::{BlockHeader, CoreError, FixedElement, REVISION};

use crate::config::AccessMode;
use crate::error::{Error, Result};
use crate::key_index::{Built, SortedKeyIndex};
use crate::keyed::KeyedRowStore;
use crate::logging::rowstore_log;
use crate::row_store::RowStore;
use crate::version::Version;

/// Elements encoded per write call
const WRITE_CHUNK: usize = 4096;

pub(crate) fn write_block<T: FixedElement, W: Write + ?Sized>(
    writer: &mut W,
    items: &[T],
) -> Result<()> {
    let header = BlockHeader::new(T::WIDTH, items.len());
    writer.write_all(&header.to_bytes())?;

    let mut buf = vec![0u8; T::WIDTH * items.len().min(WRITE_CHUNK)];
    for chunk in items.chunks(WRITE_CHUNK) {
        let bytes = &mut buf[..chunk.len() * T::WIDTH];
        for (item, out) in chunk.iter().zip(bytes.chunks_exact_mut(T::WIDTH)) {
            item.write_le(out);
        }
        writer.write_all(bytes)?;
    }
    Ok(())
}

pub(crate) fn read_block<T: FixedElement, R: Read + ?Sized>(reader: &mut R) -> Result<Vec<T>> {
    let mut raw = [0u8; BlockHeader::SIZE];
    reader.read_exact(&mut raw)?;
    let header = BlockHeader::from_bytes(&raw)?;
    header.expect_width(T::WIDTH)?;

    let payload = header.payload_len()?;
    let bytes = read_exact_vec(reader, payload)?;
    Ok(bytes.chunks_exact(T::WIDTH).map(T::read_le).collect())
}

/// Read exactly `len` bytes without trusting `len` for the allocation
fn read_exact_vec<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(CoreError::InsufficientBuffer.into());
    }
    Ok(bytes)
}

fn read_revision<R: Read + ?Sized>(reader: &mut R) -> Result<()> {
    let mut revision = [0u8; 1];
    reader.read_exact(&mut revision)?;
    if revision[0] != REVISION {
        rowstore_log!(
            log::Level::Warn,
            "load_rejected",
            "found={} expected={}",
            revision[0],
            REVISION
        );
        return Err(Error::RevisionMismatch {
            found: revision[0],
            expected: REVISION,
        });
    }
    Ok(())
}

/// Encoding of a key sequence
pub trait KeyCodec: Sized {
    fn write_keys<W: Write + ?Sized>(keys: &[Self], writer: &mut W) -> Result<()>;

    fn read_keys<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<Self>>;
}

macro_rules! impl_fixed_key {
    ($($ty:ty),*) => {
        $(
            impl KeyCodec for $ty {
                fn write_keys<W: Write + ?Sized>(keys: &[Self], writer: &mut W) -> Result<()> {
                    write_block(writer, keys)
                }

                fn read_keys<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<Self>> {
                    read_block(reader)
                }
            }
        )*
    };
}

impl_fixed_key!(u8, u16, u32, u64, u128);
impl_fixed_key!(i8, i16, i32, i64, i128);

impl KeyCodec for String {
    fn write_keys<W: Write + ?Sized>(keys: &[Self], writer: &mut W) -> Result<()> {
        writer.write_all(&(keys.len() as i64).to_le_bytes())?;
        for key in keys {
            let len = u32::try_from(key.len())
                .map_err(|_| CoreError::ArraySizeOverflow)?;
            writer.write_all(&len.to_le_bytes())?;
            writer.write_all(key.as_bytes())?;
        }
        Ok(())
    }

    fn read_keys<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<Self>> {
        let mut count = [0u8; TEXT_COUNT_WIDTH];
        reader.read_exact(&mut count)?;
        let count = i64::from_le_bytes(count);
        if count < 0 {
            return Err(CoreError::CorruptedData.into());
        }

        let mut keys = Vec::new();
        for _ in 0..count {
            let mut len = [0u8; TEXT_LEN_WIDTH];
            reader.read_exact(&mut len)?;
            let bytes = read_exact_vec(reader, u32::from_le_bytes(len) as usize)?;
            keys.push(String::from_utf8(bytes).map_err(|_| Error::InvalidKey)?);
        }
        Ok(keys)
    }
}

impl<T: FixedElement> RowStore<T> {
    /// Write the revision byte and the sealed rows
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[REVISION])?;
        self.write_body(writer)?;
        rowstore_log!(
            log::Level::Debug,
            "saved",
            "rows={} elements={}",
            self.row_count(),
            self.sealed_len()
        );
        Ok(())
    }

    fn write_body<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_block(writer, &self.offsets)?;
        write_block(writer, &self.flat[..self.sealed_len()])
    }

    /// Read a store written by [`RowStore::save`]
    pub fn load<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        read_revision(reader)?;
        let store = Self::read_body(reader, AccessMode::default())?;
        rowstore_log!(
            log::Level::Debug,
            "load_complete",
            "rows={} elements={}",
            store.row_count(),
            store.element_count()
        );
        Ok(store)
    }

    /// Replace this store with one read from `reader`
    ///
    /// On error `self` is unchanged. The access mode is kept.
    pub fn load_into<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        let mut loaded = Self::load(reader)?;
        loaded.access_mode = self.access_mode;
        *self = loaded;
        Ok(())
    }

    fn read_body<R: Read + ?Sized>(reader: &mut R, access_mode: AccessMode) -> Result<Self> {
        debug_assert_eq!(<u32 as FixedElement>::WIDTH, OFFSET_WIDTH);
        let offsets: Vec<u32> = read_block(reader)?;
        let flat: Vec<T> = read_block(reader)?;
        validate_row_offsets(&offsets, flat.len())?;
        Ok(Self::from_parts_unchecked(offsets, flat, access_mode))
    }
}

impl<K: KeyCodec + Ord> SortedKeyIndex<K, Built> {
    /// Write the keys in insertion order
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        K::write_keys(self.keys(), writer)
    }

    /// Read keys written by [`SortedKeyIndex::save`] and rebuild the order
    pub fn load<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(Self::from_keys(K::read_keys(reader)?))
    }
}

impl<K: KeyCodec + Ord, T: FixedElement> KeyedRowStore<K, T, Built> {
    /// Write the revision byte, the rows and then the keys
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[REVISION])?;
        self.rows.write_body(writer)?;
        self.index.save(writer)?;
        rowstore_log!(
            log::Level::Debug,
            "saved",
            "rows={} keys={} version={}",
            self.row_count(),
            self.index.len(),
            self.version
        );
        Ok(())
    }

    /// Read a keyed store written by [`KeyedRowStore::save`]
    ///
    /// The result gets a fresh version.
    pub fn load<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        read_revision(reader)?;
        let rows = RowStore::read_body(reader, AccessMode::default())?;
        let index = SortedKeyIndex::load(reader)?;
        if index.len() != rows.row_count() {
            return Err(Error::KeyCountMismatch {
                rows: rows.row_count(),
                keys: index.len(),
            });
        }

        let store = Self {
            rows,
            index,
            version: Version::next(),
        };
        rowstore_log!(
            log::Level::Debug,
            "load_complete",
            "rows={} elements={} version={}",
            store.row_count(),
            store.element_count(),
            store.version
        );
        Ok(store)
    }

    /// Replace this store with one read from `reader`
    ///
    /// On error `self`, including its version, is unchanged.
    pub fn load_into<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        let mut loaded = Self::load(reader)?;
        loaded.rows.access_mode = self.rows.access_mode;
        *self = loaded;
        Ok(())
    }
}
