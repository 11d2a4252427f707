//! The container handle — [`LogReader`].
//!
//! A `LogReader` owns one seekable byte source and the [`LogIndex`] built
//! from it.  The index is filled once, before the handle is returned to the
//! caller; a handle is never observable half-built.
//!
//! ```no_run
//! use vgdlog::{LogReader, ReadOutcome};
//!
//! let mut log = LogReader::open("capture.vgd")?;
//! for n in 1..=log.log_count() {
//!     log.select(n)?;
//!     while let ReadOutcome::Continue(record) = log.read_record()? {
//!         println!("{record:08x}");
//!     }
//! }
//! log.close()?;
//! # Ok::<(), vgdlog::LogError>(())
//! ```
//!
//! Finding zero logs is not an error at open time: the handle comes back
//! with `log_count() == 0` and a warning is emitted.  [`LogReader::index_status`]
//! tells an empty container apart from a scan that failed.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::cursor::OffsetMode;
use crate::error::{LogError, Result};
use crate::index::{IndexStatus, LogIndex};
use crate::record::{Record, RECORD_SIZE};

// ── LogSource ────────────────────────────────────────────────────────────────

/// A byte source a [`LogReader`] can own.
///
/// `release` is the last thing [`LogReader::close`] does with the source;
/// an error from it is reported as [`LogError::Close`].
pub trait LogSource: Read + Seek {
    fn release(self) -> io::Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl LogSource for File {}

impl<T: AsRef<[u8]>> LogSource for Cursor<T> {}

// ── ReaderOptions ────────────────────────────────────────────────────────────

/// Configuration for [`LogReader::open_with`] and [`LogReader::from_source_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// How `current_offset` advances per record read.
    pub offset_mode: OffsetMode,
}

// ── LogReader ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct LogReader<S: LogSource = File> {
    pub(crate) source:         S,
    pub(crate) path:           Option<PathBuf>,
    pub(crate) index:          LogIndex,
    pub(crate) status:         IndexStatus,
    pub(crate) options:        ReaderOptions,
    pub(crate) current_offset: u64,
    pub(crate) last_record:    [u8; RECORD_SIZE],
    /// 1-based log the cursor sits in; `None` until a select succeeds.
    pub(crate) selected:       Option<u32>,
    /// Set once the selected log has reported `Stopped`.
    pub(crate) exhausted:      bool,
}

impl LogReader<File> {
    /// Open and index the container at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ReaderOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let file = File::open(&path).map_err(|source| {
            warn!(path = %path.display(), error = %source, "cannot open log container");
            LogError::Open { path: path.clone(), source }
        })?;
        Ok(Self::build(file, Some(path), options))
    }
}

impl<S: LogSource> LogReader<S> {
    /// Index an already open source.
    pub fn from_source(source: S) -> Self {
        Self::from_source_with(source, ReaderOptions::default())
    }

    pub fn from_source_with(source: S, options: ReaderOptions) -> Self {
        Self::build(source, None, options)
    }

    fn build(source: S, path: Option<PathBuf>, options: ReaderOptions) -> Self {
        let mut reader = Self {
            source,
            path,
            index:          LogIndex::default(),
            status:         IndexStatus::Empty,
            options,
            current_offset: 0,
            last_record:    [0u8; RECORD_SIZE],
            selected:       None,
            exhausted:      false,
        };
        reader.reindex();
        reader
    }

    /// Rescan the source and replace the index wholesale.
    ///
    /// Any selection is dropped.  A failed scan leaves zero logs and
    /// reports [`IndexStatus::Failed`]; it is not returned as an error.
    pub fn reindex(&mut self) -> IndexStatus {
        self.index.clear();
        self.selected  = None;
        self.exhausted = false;

        self.status = match LogIndex::scan(&mut self.source) {
            Ok(index) => {
                let status = index.status();
                self.index = index;
                status
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "could not index log container");
                IndexStatus::Failed
            }
        };

        if self.index.is_empty() {
            warn!(path = ?self.path, status = ?self.status, "no logs registered in container");
        } else {
            debug!(path = ?self.path, logs = self.index.count(), "indexed log container");
        }
        self.status
    }

    /// Release the source.  The index and buffers are cleared first, and
    /// are gone whether or not the release succeeds.
    pub fn close(mut self) -> Result<()> {
        self.clear_state();
        let Self { source, path, .. } = self;

        source.release().map_err(|e| {
            error!(path = ?path, error = %e, "file close error");
            LogError::Close(e)
        })
    }

    /// Zero the offsets and record buffer, drop them, and forget the cursor.
    fn clear_state(&mut self) {
        self.index.clear();
        self.last_record    = [0u8; RECORD_SIZE];
        self.current_offset = 0;
        self.selected       = None;
        self.exhausted      = false;
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    /// Number of logs found by the last scan.
    pub fn log_count(&self) -> u32 {
        self.index.count()
    }

    /// With [`OffsetMode::RecordTick`] this is the log's start offset plus
    /// the number of records read since the last select, not a byte position.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    pub fn offsets(&self) -> &[u64] {
        self.index.offsets()
    }

    pub fn index(&self) -> &LogIndex {
        &self.index
    }

    pub fn index_status(&self) -> IndexStatus {
        self.status
    }

    /// The 4-byte scratch buffer: the last record read, or the delimiter
    /// that stopped the previous read, or zeros right after a select.
    pub fn last_record(&self) -> Record {
        Record(self.last_record)
    }

    pub fn selected_log(&self) -> Option<u32> {
        self.selected
    }

    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DELIMITER;
    use std::io::SeekFrom;

    /// Source whose seeks, reads and release can be made to fail.
    struct Faulty {
        inner:           Cursor<Vec<u8>>,
        fail_seek:       bool,
        fail_release:    bool,
        /// Reads starting at or past this offset fail.
        fail_read_after: Option<u64>,
    }

    impl Read for Faulty {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if let Some(limit) = self.fail_read_after {
                if self.inner.position() >= limit {
                    return Err(io::Error::new(io::ErrorKind::Other, "read refused"));
                }
                let room = (limit - self.inner.position()) as usize;
                let n = buf.len().min(room);
                return self.inner.read(&mut buf[..n]);
            }
            self.inner.read(buf)
        }
    }

    impl Seek for Faulty {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            if self.fail_seek {
                return Err(io::Error::new(io::ErrorKind::Other, "seek refused"));
            }
            self.inner.seek(pos)
        }
    }

    impl LogSource for Faulty {
        fn release(self) -> io::Result<()> {
            if self.fail_release {
                return Err(io::Error::new(io::ErrorKind::Other, "close refused"));
            }
            Ok(())
        }
    }

    fn faulty(fail_seek: bool, fail_release: bool) -> Faulty {
        Faulty {
            inner: Cursor::new([[7u8; 4], DELIMITER].concat()),
            fail_seek,
            fail_release,
            fail_read_after: None,
        }
    }

    #[test]
    fn from_source_indexes_immediately() {
        let log = LogReader::from_source(faulty(false, false));
        assert_eq!(log.log_count(), 1);
        assert_eq!(log.offsets(), &[8]);
        assert_eq!(log.index_status(), IndexStatus::Indexed);
        assert_eq!(log.selected_log(), None);
        assert!(log.path().is_none());
    }

    #[test]
    fn failed_scan_is_soft() {
        let log = LogReader::from_source(faulty(true, false));
        assert_eq!(log.log_count(), 0);
        assert!(log.offsets().is_empty());
        assert_eq!(log.index_status(), IndexStatus::Failed);
    }

    #[test]
    fn read_error_mid_scan_is_soft() {
        let bytes = [DELIMITER, [1, 2, 3, 4], DELIMITER].concat();
        let source = Faulty {
            inner:           Cursor::new(bytes),
            fail_seek:       false,
            fail_release:    false,
            fail_read_after: Some(6),
        };
        let log = LogReader::from_source(source);
        // The first delimiter was seen before the error; it is not kept.
        assert_eq!(log.log_count(), 0);
        assert!(log.offsets().is_empty());
        assert_eq!(log.index_status(), IndexStatus::Failed);
    }

    #[test]
    fn empty_source_is_not_failed() {
        let log = LogReader::from_source(Cursor::new(Vec::<u8>::new()));
        assert_eq!(log.log_count(), 0);
        assert_eq!(log.index_status(), IndexStatus::Empty);
    }

    #[test]
    fn close_reports_release_error() {
        let log = LogReader::from_source(faulty(false, true));
        match log.close() {
            Err(LogError::Close(e)) => assert_eq!(e.to_string(), "close refused"),
            other => panic!("expected close failure, got {other:?}"),
        }
    }

    #[test]
    fn clear_state_wipes_index_and_cursor() {
        let mut log = LogReader::from_source(Cursor::new([[9u8; 4], DELIMITER, [3u8; 4]].concat()));
        log.select(1).unwrap();
        log.read_record().unwrap();
        assert_eq!(log.last_record(), Record([3u8; 4]));

        log.clear_state();
        assert_eq!(log.log_count(), 0);
        assert_eq!(log.last_record(), Record::default());
        assert_eq!(log.current_offset(), 0);
        assert_eq!(log.selected_log(), None);
        assert!(matches!(log.read_record(), Err(LogError::NoLogSelected)));
    }

    #[test]
    fn close_succeeds_for_cursor() {
        let log = LogReader::from_source(Cursor::new(DELIMITER.to_vec()));
        assert!(log.close().is_ok());
    }

    #[test]
    fn reindex_replaces_index() {
        let mut log = LogReader::from_source(Cursor::new(DELIMITER.to_vec()));
        assert_eq!(log.log_count(), 1);
        log.source.get_mut().extend_from_slice(&DELIMITER);
        assert_eq!(log.reindex(), IndexStatus::Indexed);
        assert_eq!(log.offsets(), &[4, 8]);
    }
}
