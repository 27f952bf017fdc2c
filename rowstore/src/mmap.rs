//! File persistence: buffered writes, memory-mapped reads

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::{Mmap, MmapOptions};
use rowstore_core::FixedElement;

use crate::codec::KeyCodec;
use crate::error::Result;
use crate::keyed::KeyedRowStore;
use crate::row_store::RowStore;

fn map_file<P: AsRef<Path>>(path: P) -> Result<Mmap> {
    let file = File::open(path)?;
    // SAFETY: Read-only mapping; the bytes are decoded into owned buffers
    // before the map is dropped, and nothing keeps a pointer into it.
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    Ok(mmap)
}

/// Write `store` to `path`, replacing any existing file
pub fn save_file<T, P>(store: &RowStore<T>, path: P) -> Result<()>
where
    T: FixedElement,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    store.save(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Read a store written by [`save_file`]
pub fn load_file<T, P>(path: P) -> Result<RowStore<T>>
where
    T: FixedElement,
    P: AsRef<Path>,
{
    let mmap = map_file(path)?;
    let mut bytes: &[u8] = &mmap;
    RowStore::load(&mut bytes)
}

/// Write a keyed store to `path`, replacing any existing file
pub fn save_keyed_file<K, T, P>(store: &KeyedRowStore<K, T>, path: P) -> Result<()>
where
    K: KeyCodec + Ord,
    T: FixedElement,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    store.save(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Read a keyed store written by [`save_keyed_file`]
pub fn load_keyed_file<K, T, P>(path: P) -> Result<KeyedRowStore<K, T>>
where
    K: KeyCodec + Ord,
    T: FixedElement,
    P: AsRef<Path>,
{
    let mmap = map_file(path)?;
    let mut bytes: &[u8] = &mmap;
    KeyedRowStore::load(&mut bytes)
}
