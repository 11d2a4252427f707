//! Fixed-width records and the log delimiter.
//!
//! A container is consumed in consecutive, non-overlapping 4-byte chunks
//! counted from byte 0.  A chunk equal to [`DELIMITER`] ends a log; every
//! other full chunk is a [`Record`].  A trailing chunk shorter than
//! [`RECORD_SIZE`] is never a record and never a delimiter.

use byteorder::{BigEndian, ByteOrder};
use std::fmt;
use std::io::{self, Read};

/// Width of one record (and of the delimiter) in bytes.
pub const RECORD_SIZE: usize = 4;

/// `"VG"` followed by two `0xFF` bytes.
pub const DELIMITER: [u8; RECORD_SIZE] = [b'V', b'G', 0xFF, 0xFF];

/// One raw 4-byte record.  The payload is not interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Record(pub [u8; RECORD_SIZE]);

impl Record {
    /// Build a record from its big-endian word form (`0xAABBCCDD` gives
    /// bytes `AA BB CC DD`).
    pub fn from_word(word: u32) -> Self {
        let mut bytes = [0u8; RECORD_SIZE];
        BigEndian::write_u32(&mut bytes, word);
        Record(bytes)
    }

    pub fn word(&self) -> u32 {
        BigEndian::read_u32(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_SIZE] {
        &self.0
    }

    pub fn is_delimiter(&self) -> bool {
        is_delimiter(&self.0)
    }
}

impl From<[u8; RECORD_SIZE]> for Record {
    fn from(bytes: [u8; RECORD_SIZE]) -> Self {
        Record(bytes)
    }
}

impl fmt::LowerHex for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.word(), f)
    }
}

#[inline]
pub fn is_delimiter(chunk: &[u8; RECORD_SIZE]) -> bool {
    *chunk == DELIMITER
}

/// Fill `buf` from `reader`, stopping early only at end-of-file.
///
/// Returns the number of bytes written into `buf`; anything below
/// `RECORD_SIZE` means EOF was reached mid-chunk (or right away for 0).
pub(crate) fn read_chunk<R: Read + ?Sized>(
    reader: &mut R,
    buf:    &mut [u8; RECORD_SIZE],
) -> io::Result<usize> {
    let mut filled = 0;
    while filled < RECORD_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0)  => break,
            Ok(n)  => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn delimiter_word_form() {
        assert_eq!(Record::from_word(0x5647_FFFF), Record(DELIMITER));
        assert!(Record::from_word(0x5647_FFFF).is_delimiter());
        assert!(!Record::from_word(0x5647_FFFE).is_delimiter());
        assert_eq!(format!("{:08x}", Record(DELIMITER)), "5647ffff");
    }

    #[test]
    fn read_chunk_reports_short_tail() {
        let mut src = Cursor::new(vec![1u8, 2, 3, 4, 5, 6]);
        let mut buf = [0u8; RECORD_SIZE];
        assert_eq!(read_chunk(&mut src, &mut buf).unwrap(), 4);
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(read_chunk(&mut src, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[5, 6]);
        assert_eq!(read_chunk(&mut src, &mut buf).unwrap(), 0);
    }

    /// Yields one byte per `read` call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            match (self.0.split_first(), out.first_mut()) {
                (Some((b, rest)), Some(slot)) => {
                    *slot = *b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn read_chunk_assembles_partial_reads() {
        let mut src = Trickle(&DELIMITER);
        let mut buf = [0u8; RECORD_SIZE];
        assert_eq!(read_chunk(&mut src, &mut buf).unwrap(), RECORD_SIZE);
        assert!(is_delimiter(&buf));
    }
}
