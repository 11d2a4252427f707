//! VGA capture interpretation of a record.
//!
//! The reader never looks inside a record.  Captures produced by the VGA
//! logger lay one out as three colour bytes followed by a status byte:
//!
//! | Byte | Meaning |
//! |------|---------|
//! | 0    | red |
//! | 1    | green |
//! | 2    | blue |
//! | 3    | bit 7 = HSYNC, bit 6 = VSYNC, bit 5 = DE, bits 4..0 unused |

use serde::Serialize;
use std::fmt;

use crate::record::Record;

pub const HSYNC_BIT: u8 = 1 << 7;
pub const VSYNC_BIT: u8 = 1 << 6;
pub const DE_BIT:    u8 = 1 << 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SyncFlags {
    pub hsync:       bool,
    pub vsync:       bool,
    pub data_enable: bool,
}

impl From<u8> for SyncFlags {
    fn from(status: u8) -> Self {
        Self {
            hsync:       status & HSYNC_BIT != 0,
            vsync:       status & VSYNC_BIT != 0,
            data_enable: status & DE_BIT    != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pixel {
    pub rgb:  [u8; 3],
    pub sync: SyncFlags,
}

impl From<Record> for Pixel {
    fn from(record: Record) -> Self {
        let [r, g, b, status] = record.0;
        Self { rgb: [r, g, b], sync: SyncFlags::from(status) }
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb;
        write!(
            f,
            "HS = {}\tVS = {}\tDE = {}\tRGB = ({},{},{})",
            self.sync.hsync as u8,
            self.sync.vsync as u8,
            self.sync.data_enable as u8,
            r, g, b,
        )
    }
}
