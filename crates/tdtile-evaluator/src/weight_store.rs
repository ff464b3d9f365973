//! Weight tables and their binary file format.
//!
//! A [`WeightStore`] is a list of dense `f32` tables. Its size is fixed when it is created
//! (zero-filled or read from a file); training only changes values in place through
//! [`WeightStore::add`].
//!
//! # File Format
//!
//! ```text
//! u64            table count N
//! N times:
//!   u64          table length L
//!   L × f32      table values
//! ```
//!
//! All integers and floats use the native byte order of the machine, so a weight file is only
//! meant to be read back on the architecture that wrote it. Values are written bit for bit, so a
//! save/load round trip reproduces every weight exactly.
//!
//! Reading is strict: a truncated file, or bytes after the last table, is an error.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

const F32_SIZE: usize = size_of::<f32>();
const READ_CHUNK_LEN: usize = 1 << 16;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum WeightFileError {
    #[display("failed to open weight file {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("failed to create weight file {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },
    #[display("failed to read weight data: {_0}")]
    Read(io::Error),
    #[display("failed to write weight data: {_0}")]
    Write(io::Error),
    #[display("weight table {table} declares {len} entries, which cannot be addressed")]
    TableTooLarge { table: u64, len: u64 },
    #[display("unexpected data after the last weight table")]
    TrailingData,
}

/// Dense weight tables indexed by `(table, entry)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightStore {
    tables: Vec<Box<[f32]>>,
}

impl WeightStore {
    /// Allocates `table_count` tables of `table_len` zeros.
    #[must_use]
    pub fn zeroed(table_count: usize, table_len: usize) -> Self {
        Self {
            tables: (0..table_count)
                .map(|_| vec![0.0; table_len].into_boxed_slice())
                .collect(),
        }
    }

    /// Builds a store from already filled tables.
    #[must_use]
    pub fn from_tables(tables: Vec<Vec<f32>>) -> Self {
        Self {
            tables: tables.into_iter().map(Vec::into_boxed_slice).collect(),
        }
    }

    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Iterates over the tables in order.
    pub fn tables(&self) -> impl Iterator<Item = &[f32]> {
        self.tables.iter().map(AsRef::as_ref)
    }

    /// Returns the weight at `entry` of `table`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, table: usize, entry: usize) -> f32 {
        self.tables[table][entry]
    }

    /// Adds `delta` to the weight at `entry` of `table`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn add(&mut self, table: usize, entry: usize, delta: f32) {
        self.tables[table][entry] += delta;
    }

    /// Reads a weight file.
    pub fn load<P>(path: P) -> Result<Self, WeightFileError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| WeightFileError::Open {
            path: path.to_owned(),
            source,
        })?;
        let store = Self::read_from(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            tables = store.table_count(),
            "loaded weights"
        );
        Ok(store)
    }

    /// Writes the store to a weight file, replacing any existing file.
    pub fn save<P>(&self, path: P) -> Result<(), WeightFileError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| WeightFileError::Create {
            path: path.to_owned(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush().map_err(WeightFileError::Write)?;
        tracing::info!(
            path = %path.display(),
            tables = self.table_count(),
            "saved weights"
        );
        Ok(())
    }

    /// Reads a store in the weight file format.
    pub fn read_from<R>(mut reader: R) -> Result<Self, WeightFileError>
    where
        R: Read,
    {
        let count = read_u64(&mut reader)?;
        let mut tables = vec![];
        for table in 0..count {
            let len = read_u64(&mut reader)?;
            let len = usize::try_from(len)
                .ok()
                .filter(|len| len.checked_mul(F32_SIZE).is_some())
                .ok_or(WeightFileError::TableTooLarge { table, len })?;
            tables.push(read_table(&mut reader, len)?);
        }

        let mut probe = [0; 1];
        if reader.read(&mut probe).map_err(WeightFileError::Read)? != 0 {
            return Err(WeightFileError::TrailingData);
        }

        Ok(Self { tables })
    }

    /// Writes the store in the weight file format.
    pub fn write_to<W>(&self, mut writer: W) -> Result<(), WeightFileError>
    where
        W: Write,
    {
        write_u64(&mut writer, self.tables.len() as u64)?;
        for table in &self.tables {
            write_u64(&mut writer, table.len() as u64)?;
            for value in table {
                writer
                    .write_all(&value.to_ne_bytes())
                    .map_err(WeightFileError::Write)?;
            }
        }
        Ok(())
    }
}

fn read_u64<R>(reader: &mut R) -> Result<u64, WeightFileError>
where
    R: Read,
{
    let mut buf = [0; size_of::<u64>()];
    reader.read_exact(&mut buf).map_err(WeightFileError::Read)?;
    Ok(u64::from_ne_bytes(buf))
}

fn write_u64<W>(writer: &mut W, value: u64) -> Result<(), WeightFileError>
where
    W: Write,
{
    writer
        .write_all(&value.to_ne_bytes())
        .map_err(WeightFileError::Write)
}

// Reads in chunks so that a corrupt length fails on EOF instead of allocating it up front.
fn read_table<R>(reader: &mut R, len: usize) -> Result<Box<[f32]>, WeightFileError>
where
    R: Read,
{
    let mut values = Vec::with_capacity(len.min(READ_CHUNK_LEN));
    let mut buf = vec![0; len.min(READ_CHUNK_LEN) * F32_SIZE];
    while values.len() < len {
        let chunk_len = (len - values.len()).min(READ_CHUNK_LEN);
        let bytes = &mut buf[..chunk_len * F32_SIZE];
        reader.read_exact(bytes).map_err(WeightFileError::Read)?;
        let (chunks, _) = bytes.as_chunks::<F32_SIZE>();
        values.extend(chunks.iter().map(|chunk| f32::from_ne_bytes(*chunk)));
    }
    Ok(values.into_boxed_slice())
}
