pub mod error;
pub mod record;
pub mod index;
pub mod reader;
pub mod cursor;
pub mod pixel;

pub use error::{LogError, InvalidLogNumber, Result};
pub use record::{Record, DELIMITER, RECORD_SIZE};
pub use index::{LogIndex, IndexStatus};
pub use reader::{LogReader, LogSource, ReaderOptions};
pub use cursor::{OffsetMode, ReadOutcome, Records};
pub use pixel::{Pixel, SyncFlags};
