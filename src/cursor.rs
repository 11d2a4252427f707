//! Cursor — log selection and sequential record reads.
//!
//! [`LogReader::select`] positions the source at the first byte of a log;
//! [`LogReader::read_record`] then consumes one 4-byte chunk per call until
//! the next delimiter or end-of-file, reporting [`ReadOutcome::Stopped`].
//! Reads never cross into the following log: once stopped, the cursor stays
//! stopped until the next select.

use std::io::{Seek, SeekFrom};

use tracing::{debug, warn};

use crate::error::{LogError, Result};
use crate::reader::{LogReader, LogSource};
use crate::record::{is_delimiter, read_chunk, Record, RECORD_SIZE};

/// How `current_offset` advances per record read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OffsetMode {
    /// +1 per record.  After the first read the value is the log's start
    /// offset plus a record count, not a byte position.
    #[default]
    RecordTick,
    /// +4 per record; the value is always the byte position of the next read.
    ByteExact,
}

impl OffsetMode {
    pub fn step(self) -> u64 {
        match self {
            OffsetMode::RecordTick => 1,
            OffsetMode::ByteExact  => RECORD_SIZE as u64,
        }
    }
}

/// Result of one [`LogReader::read_record`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Continue(Record),
    /// Delimiter or end-of-file reached; the selected log is drained.
    Stopped,
}

impl ReadOutcome {
    pub fn record(self) -> Option<Record> {
        match self {
            ReadOutcome::Continue(r) => Some(r),
            ReadOutcome::Stopped     => None,
        }
    }
}

impl<S: LogSource> LogReader<S> {
    /// Move the cursor to the start of 1-based log `log_number`.
    ///
    /// The record buffer is zeroed before the number is checked.  A bad
    /// number leaves the offset, the file position and the current
    /// selection untouched.  A failed seek drops the selection and, unlike
    /// the C reader this format comes from, keeps the previous offset.
    pub fn select(&mut self, log_number: u32) -> Result<()> {
        self.last_record = [0u8; RECORD_SIZE];

        let start = self.index.start_of(log_number).map_err(|e| {
            warn!(log = log_number, logs = self.index.count(), "bad log number supplied: {e}");
            LogError::InvalidLogNumber(e)
        })?;

        if let Err(source) = self.source.seek(SeekFrom::Start(start)) {
            warn!(log = log_number, offset = start, error = %source, "could not seek position");
            self.selected = None;
            return Err(LogError::Seek { offset: start, source });
        }

        self.current_offset = start;
        self.selected       = Some(log_number);
        self.exhausted      = false;
        debug!(log = log_number, offset = start, "selected log");
        Ok(())
    }

    /// Read the next record of the selected log.
    ///
    /// Fails with [`LogError::NoLogSelected`] before any successful select.
    /// A short read at end-of-file and a delimiter both give `Stopped`
    /// without advancing `current_offset`; the bytes read land in the
    /// record buffer either way.
    pub fn read_record(&mut self) -> Result<ReadOutcome> {
        if self.selected.is_none() {
            return Err(LogError::NoLogSelected);
        }
        if self.exhausted {
            return Ok(ReadOutcome::Stopped);
        }

        let mut chunk = [0u8; RECORD_SIZE];
        let filled = read_chunk(&mut self.source, &mut chunk)?;
        self.last_record[..filled].copy_from_slice(&chunk[..filled]);

        if filled < RECORD_SIZE || is_delimiter(&chunk) {
            self.exhausted = true;
            return Ok(ReadOutcome::Stopped);
        }

        self.current_offset += self.options.offset_mode.step();
        Ok(ReadOutcome::Continue(Record(chunk)))
    }

    /// Drain the selected log as an iterator.
    pub fn records(&mut self) -> Records<'_, S> {
        Records { reader: self, done: false }
    }
}

/// Iterator returned by [`LogReader::records`].
///
/// Ends at the first `Stopped`; an I/O error is yielded once and ends it too.
pub struct Records<'a, S: LogSource> {
    reader: &'a mut LogReader<S>,
    done:   bool,
}

impl<S: LogSource> Iterator for Records<'_, S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record() {
            Ok(ReadOutcome::Continue(r)) => Some(Ok(r)),
            Ok(ReadOutcome::Stopped)     => { self.done = true; None }
            Err(e)                       => { self.done = true; Some(Err(e)) }
        }
    }
}
