use diesel::prelude::*;
use log::debug;
use thiserror::Error;

use crate::uniprot::cache::References;
use crate::uniprot::decoder::DecodedEntry;
use crate::uniprot::store::insert_entry;

pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

/// Buffers decoded entries and commits them in fixed-size transactions.
///
/// Owns the run's [`References`], so shared rows created by one batch are
/// reused by every later one.
pub struct BatchWriter<'c> {
    connection: &'c mut SqliteConnection,
    references: References,
    buffer: Vec<DecodedEntry>,
    batch_size: usize,
    committed: u64,
    batches: u64,
}

impl<'c> BatchWriter<'c> {
    pub fn new(
        connection: &'c mut SqliteConnection,
        references: References,
        batch_size: usize,
    ) -> Result<Self, WriteError> {
        if batch_size == 0 {
            return Err(WriteError::InvalidBatchSize);
        }
        Ok(BatchWriter {
            connection,
            references,
            buffer: Vec::with_capacity(batch_size),
            batch_size,
            committed: 0,
            batches: 0,
        })
    }

    /// Buffers `entry`, committing the buffer once it is full.
    pub fn accept(&mut self, entry: DecodedEntry) -> Result<(), WriteError> {
        self.buffer.push(entry);
        if self.buffer.len() >= self.batch_size {
            self.commit()?;
        }
        Ok(())
    }

    /// Commits whatever is buffered. No-op on an empty buffer.
    pub fn flush(&mut self) -> Result<(), WriteError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.commit()
    }

    fn commit(&mut self) -> Result<(), WriteError> {
        let BatchWriter {
            connection,
            references,
            buffer,
            ..
        } = self;

        connection.transaction::<_, diesel::result::Error, _>(|conn| {
            for entry in buffer.iter() {
                insert_entry(conn, references, entry)?;
            }
            Ok(())
        })?;

        self.committed += self.buffer.len() as u64;
        self.batches += 1;
        debug!("Committed batch {} ({} entries)", self.batches, self.buffer.len());
        self.buffer.clear();
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Entries durably written so far.
    pub fn committed(&self) -> u64 {
        self.committed
    }

    pub fn batches(&self) -> u64 {
        self.batches
    }

    pub fn references(&self) -> &References {
        &self.references
    }
}
