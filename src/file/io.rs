//! Low-level byte order and safe reading/writing utilities for PDB stream parsing.
//!
//! This module provides bounds-checked, little-endian binary data access for decoding
//! and encoding PDB record streams. All PDB structures are little-endian, so unlike
//! general-purpose binary toolkits no big-endian twins are provided.
//!
//! # Key Components
//!
//! - [`crate::file::io::PdbIo`] - Trait defining endian-aware conversions for primitive types
//! - [`crate::file::io::read_le`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_le_at`] - Read a value at an offset with auto-advance
//! - [`crate::file::io::write_le_at`] - Write a value at an offset with auto-advance
//! - [`crate::file::io::write_le_vec`] - Append a value to a growing buffer
//! - [`crate::file::io::read_cstring_at`] / [`crate::file::io::write_cstring_vec`] -
//!   Null-terminated string handling used by member and symbol records
//!
//! # Error Handling
//!
//! All reading functions return [`crate::Result<T>`] and fail with
//! [`crate::Error::OutOfBounds`] if there are insufficient bytes in the buffer to
//! complete the operation. This ensures memory safety and prevents buffer overruns
//! during parsing.

use crate::{Error::OutOfBounds, Result};

/// Trait for implementing type-specific safe binary data access.
///
/// This trait provides a unified interface for reading and writing primitive types
/// from byte slices in a safe, little-endian-aware manner. It is implemented for all
/// primitive integer types used in PDB record parsing.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait PdbIo: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]> + AsRef<[u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_pdb_io {
    ($($ty:ty => $len:literal),+ $(,)?) => {
        $(
            impl PdbIo for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )+
    };
}

impl_pdb_io! {
    u8 => 1, i8 => 1,
    u16 => 2, i16 => 2,
    u32 => 4, i32 => 4,
    u64 => 8, i64 => 8,
}

/// Safely reads a value of type `T` in little-endian byte order from the start of a buffer.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: PdbIo>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes read.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (advanced after reading)
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
///
/// # Examples
///
/// ```rust
/// use pdbscope::file::io::read_le_at;
///
/// let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00];
/// let mut offset = 0;
///
/// let first: u16 = read_le_at(&data, &mut offset)?;
/// let second: u32 = read_le_at(&data, &mut offset)?;
///
/// assert_eq!(first, 1);
/// assert_eq!(second, 2);
/// assert_eq!(offset, 6);
/// # Ok::<(), pdbscope::Error>(())
/// ```
pub fn read_le_at<T: PdbIo>(data: &[u8], offset: &mut usize) -> Result<T> {
    let size = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(size) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(bytes) = T::Bytes::try_from(&data[*offset..end]) else {
        return Err(OutOfBounds);
    };

    *offset = end;
    Ok(T::from_le_bytes(bytes))
}

/// Safely writes a value of type `T` in little-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes written. Used for fixed-layout
/// structures whose size is known up front, such as the DBI header.
///
/// # Arguments
///
/// * `data` - The byte buffer to write into
/// * `offset` - Mutable reference to the offset position (advanced after writing)
/// * `value` - The value to write
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there is insufficient room in the buffer.
pub fn write_le_at<T: PdbIo>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let size = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(size) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..end].copy_from_slice(value.to_le_bytes().as_ref());
    *offset = end;
    Ok(())
}

/// Appends a value of type `T` in little-endian byte order to a growing buffer.
///
/// Record payloads are serialized into a scratch buffer before their length is
/// known (two-pass encoding), so the append form is the natural writer for them.
pub fn write_le_vec<T: PdbIo>(data: &mut Vec<u8>, value: T) {
    data.extend_from_slice(value.to_le_bytes().as_ref());
}

/// Reads a null-terminated UTF-8 string at a specific offset.
///
/// The offset is advanced past the terminating NUL byte.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if no NUL terminator exists before the end
/// of the buffer, or [`crate::Error::Malformed`] if the bytes are not valid UTF-8.
pub fn read_cstring_at(data: &[u8], offset: &mut usize) -> Result<String> {
    if *offset > data.len() {
        return Err(OutOfBounds);
    }

    let Some(nul) = data[*offset..].iter().position(|&b| b == 0) else {
        return Err(OutOfBounds);
    };

    let bytes = &data[*offset..*offset + nul];
    let Ok(text) = std::str::from_utf8(bytes) else {
        return Err(malformed_error!(
            "Invalid UTF-8 in string at offset {:#x}",
            *offset
        ));
    };

    *offset += nul + 1;
    Ok(text.to_string())
}

/// Appends a null-terminated UTF-8 string to a growing buffer.
pub fn write_cstring_vec(data: &mut Vec<u8>, value: &str) {
    data.extend_from_slice(value.as_bytes());
    data.push(0);
}
