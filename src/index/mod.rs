//! Delimiter index — one linear pass over the container.
//!
//! The scan rewinds to byte 0 and steps through the stream in
//! non-overlapping [`RECORD_SIZE`] chunks.  Every chunk equal to the
//! delimiter closes a log; the offset of the byte right after it is the
//! start of log `n + 1` and is pushed onto [`LogIndex::offsets`].  A short
//! tail at end-of-file is dropped, whatever its content.
//!
//! Log numbers are 1-based: log `n` starts at `offsets[n - 1]`.  A file
//! with no delimiter at all indexes as zero logs, not as one unterminated
//! log.

use serde::{Deserialize, Serialize};
use std::io::{self, BufReader, Read, Seek, SeekFrom};

use crate::error::InvalidLogNumber;
use crate::record::{is_delimiter, read_chunk, RECORD_SIZE};

/// Outcome of the last index scan.
///
/// `log_count() == 0` alone cannot tell an empty container from a failed
/// scan; this is the side channel that can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    /// Scan ran to end-of-file and found at least one delimiter.
    Indexed,
    /// Scan ran to end-of-file and found no delimiter.
    Empty,
    /// Rewind or read failed; the index was left empty.
    Failed,
}

/// Start offsets of every log in a container, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogIndex {
    offsets: Vec<u64>,
}

impl LogIndex {
    /// Rewind `source` and index it.
    ///
    /// The stream position after return is unspecified; callers must seek
    /// before reading again.
    pub fn scan<R: Read + Seek>(source: &mut R) -> io::Result<Self> {
        source.seek(SeekFrom::Start(0))?;

        let mut reader   = BufReader::new(source);
        let mut offsets  = Vec::new();
        let mut consumed = 0u64;
        let mut chunk    = [0u8; RECORD_SIZE];

        while read_chunk(&mut reader, &mut chunk)? == RECORD_SIZE {
            consumed += RECORD_SIZE as u64;
            if is_delimiter(&chunk) {
                offsets.push(consumed);
            }
        }

        Ok(Self { offsets })
    }

    /// Build an index from already known start offsets.  Offsets are
    /// sorted so the ascending invariant holds.
    #[cfg(test)]
    pub(crate) fn from_offsets(mut offsets: Vec<u64>) -> Self {
        offsets.sort_unstable();
        Self { offsets }
    }

    /// Number of delimiters found, which is the number of selectable logs.
    pub fn count(&self) -> u32 {
        u32::try_from(self.offsets.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Start offset of 1-based log `log_number`.
    pub fn start_of(&self, log_number: u32) -> Result<u64, InvalidLogNumber> {
        if log_number == 0 {
            return Err(InvalidLogNumber::Zero);
        }
        let count = self.count();
        if log_number > count {
            return Err(InvalidLogNumber::ExceedsCount { requested: log_number, count });
        }
        Ok(self.offsets[log_number as usize - 1])
    }

    /// Zero every offset, then drop them.
    pub fn clear(&mut self) {
        self.offsets.iter_mut().for_each(|o| *o = 0);
        self.offsets.clear();
        self.offsets.shrink_to_fit();
    }

    /// Status implied by a successful scan that produced `self`.
    pub(crate) fn status(&self) -> IndexStatus {
        if self.is_empty() { IndexStatus::Empty } else { IndexStatus::Indexed }
    }
}
