//! The variable-width scalar encoding embedded in leaf and symbol records.
//!
//! A "numeric leaf" starts with a `u16`. Values below `0x8000` are the scalar
//! itself; values at or above are a sub-leaf marker announcing the width and
//! signedness of the bytes that follow. The wire form the producer chose is
//! preserved on decode so re-encoding is byte-identical, even where a smaller
//! form would have sufficed.

use crate::{
    file::io::{read_le_at, write_le_vec},
    Result,
};

const LF_CHAR: u16 = 0x8000;
const LF_SHORT: u16 = 0x8001;
const LF_USHORT: u16 = 0x8002;
const LF_LONG: u16 = 0x8003;
const LF_ULONG: u16 = 0x8004;

/// One scalar in its exact wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericLeaf {
    /// Unmarked immediate value, always below `0x8000`.
    Immediate(u16),
    /// `LF_CHAR` — signed 8-bit.
    Char(i8),
    /// `LF_SHORT` — signed 16-bit.
    Short(i16),
    /// `LF_USHORT` — unsigned 16-bit.
    UShort(u16),
    /// `LF_LONG` — signed 32-bit.
    Long(i32),
    /// `LF_ULONG` — unsigned 32-bit.
    ULong(u32),
}

impl NumericLeaf {
    /// Reads one numeric leaf at `offset`, advancing past it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] on truncation, or
    /// [`crate::Error::Malformed`] for a sub-leaf marker this crate does not
    /// carry (the wider integer, float, and varying-string forms).
    pub fn read_at(data: &[u8], offset: &mut usize) -> Result<Self> {
        let marker = read_le_at::<u16>(data, offset)?;
        if marker < 0x8000 {
            return Ok(NumericLeaf::Immediate(marker));
        }

        match marker {
            LF_CHAR => Ok(NumericLeaf::Char(read_le_at::<i8>(data, offset)?)),
            LF_SHORT => Ok(NumericLeaf::Short(read_le_at::<i16>(data, offset)?)),
            LF_USHORT => Ok(NumericLeaf::UShort(read_le_at::<u16>(data, offset)?)),
            LF_LONG => Ok(NumericLeaf::Long(read_le_at::<i32>(data, offset)?)),
            LF_ULONG => Ok(NumericLeaf::ULong(read_le_at::<u32>(data, offset)?)),
            _ => Err(malformed_error!(
                "Unsupported numeric sub-leaf marker {:#06x}",
                marker
            )),
        }
    }

    /// Appends this scalar in its wire form to a growing buffer.
    pub fn write_vec(&self, data: &mut Vec<u8>) {
        match *self {
            NumericLeaf::Immediate(value) => write_le_vec(data, value & 0x7FFF),
            NumericLeaf::Char(value) => {
                write_le_vec(data, LF_CHAR);
                write_le_vec(data, value);
            }
            NumericLeaf::Short(value) => {
                write_le_vec(data, LF_SHORT);
                write_le_vec(data, value);
            }
            NumericLeaf::UShort(value) => {
                write_le_vec(data, LF_USHORT);
                write_le_vec(data, value);
            }
            NumericLeaf::Long(value) => {
                write_le_vec(data, LF_LONG);
                write_le_vec(data, value);
            }
            NumericLeaf::ULong(value) => {
                write_le_vec(data, LF_ULONG);
                write_le_vec(data, value);
            }
        }
    }

    /// The scalar widened to `i64`, whatever its wire form.
    #[must_use]
    pub fn value(&self) -> i64 {
        match *self {
            NumericLeaf::Immediate(value) => i64::from(value),
            NumericLeaf::Char(value) => i64::from(value),
            NumericLeaf::Short(value) => i64::from(value),
            NumericLeaf::UShort(value) => i64::from(value),
            NumericLeaf::Long(value) => i64::from(value),
            NumericLeaf::ULong(value) => i64::from(value),
        }
    }
}
