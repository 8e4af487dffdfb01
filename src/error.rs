use thiserror::Error;

use crate::codec::StreamSpace;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The taxonomy follows the failure model of the PDB record format: structurally invalid
/// bytes are fatal to the enclosing decode operation only, an unregistered record kind is
/// recoverable by skipping its declared length, and an impossible type index is fatal for
/// that specific resolution.
///
/// # Error Categories
///
/// ## Format Errors (fatal to the enclosing decode)
/// - [`Error::Malformed`] - Corrupted or invalid record/stream structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond a record or stream boundary
///
/// ## Recoverable Errors
/// - [`Error::UnsupportedVariant`] - Well-formed header with an unregistered kind tag;
///   the caller may skip the declared number of payload bytes and continue
///
/// ## Resolution Errors
/// - [`Error::InvalidTypeIndex`] - Type index outside the range of the type stream
/// - [`Error::SessionClosed`] - A lazy reference outlived its owning resolver
///
/// ## Stream Access Errors
/// - [`Error::StreamNotFound`] - Stream id outside the container's stream directory
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust
/// use pdbscope::{codec::StreamSpace, Error};
///
/// fn handle(result: pdbscope::Result<()>) {
///     match result {
///         Ok(()) => {}
///         Err(Error::UnsupportedVariant { kind, length, .. }) => {
///             eprintln!("skipping unknown record {kind:#06x} ({length} bytes)");
///         }
///         Err(Error::Malformed { message, file, line }) => {
///             eprintln!("malformed input: {message} ({file}:{line})");
///         }
///         Err(e) => eprintln!("error: {e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The stream is damaged and could not be parsed.
    ///
    /// This error indicates that the byte structure doesn't conform to the published
    /// PDB record layout: a bad magic value, a truncated record, or a declared length
    /// exceeding the remaining stream. The error includes the source location where
    /// the malformation was detected for debugging purposes.
    ///
    /// Records decoded successfully before the failure remain valid and usable.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the stream.
    ///
    /// This error occurs when trying to read data beyond the end of a record's
    /// declared payload or beyond the backing stream. It's a safety check to
    /// prevent buffer overruns during parsing.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// A well-formed record header carries a kind tag with no registered codec.
    ///
    /// Unlike [`Error::Malformed`] this is recoverable: the header's declared
    /// `length` is reported so the caller can skip exactly that many bytes and
    /// continue decoding subsequent records.
    #[error("No codec registered for {space} record kind {kind:#06x}")]
    UnsupportedVariant {
        /// The tag space the record was decoded in
        space: StreamSpace,
        /// The unrecognized numeric kind tag
        kind: u32,
        /// The record's declared length, for skip-and-continue recovery
        length: u16,
    },

    /// A type index is out of range or semantically impossible to resolve.
    ///
    /// Raised when an index neither names a primitive type nor falls within the
    /// type stream's record table. Never silently defaulted.
    #[error("Invalid type index {0:#06x}")]
    InvalidTypeIndex(u32),

    /// The requested stream id is outside the container's stream directory.
    #[error("Stream {0} does not exist in this container")]
    StreamNotFound(u32),

    /// A lazy type reference was resolved after its owning session was dropped.
    #[error("The type resolver owning this reference no longer exists")]
    SessionClosed,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while loading stream data
    /// from disk, permission issues, or filesystem errors.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}
