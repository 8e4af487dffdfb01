//! Access contract for the container's numbered byte streams.
//!
//! A PDB file is a multi-stream container: a directory of numbered byte streams,
//! each holding one category of debug data (type records, the DBI module table,
//! per-module symbol records). Reassembling those streams from the container's
//! page layout is a separate concern; this crate consumes them through the
//! minimal [`StreamProvider`] contract and never touches the page level.
//!
//! Stream id 0 is reserved by the container format (the old stream directory)
//! and is never requested by this crate.

use crate::{Error::StreamNotFound, Result};

/// Numbered byte-stream access to the underlying multi-stream container.
///
/// Implementations are expected to treat the container as an immutable, fully
/// available random-access byte source for the lifetime of the session. All
/// calls are synchronous and blocking; there is no cancellation model.
pub trait StreamProvider {
    /// The number of streams in the container's directory.
    fn num_streams(&self) -> u32;

    /// Returns the complete contents of stream `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StreamNotFound`] if `id` is outside the stream
    /// directory.
    fn stream(&self, id: u32) -> Result<&[u8]>;
}

/// An in-memory [`StreamProvider`] over pre-extracted stream contents.
///
/// Used by sessions built from streams that were already reassembled by an
/// external container reader, and by the test suite to craft synthetic files.
///
/// # Examples
///
/// ```rust
/// use pdbscope::file::provider::{StreamProvider, VecStreamProvider};
///
/// let provider = VecStreamProvider::new(vec![
///     Vec::new(),             // stream 0 is reserved
///     vec![0x01, 0x02],
/// ]);
///
/// assert_eq!(provider.num_streams(), 2);
/// assert_eq!(provider.stream(1)?, &[0x01, 0x02]);
/// assert!(provider.stream(7).is_err());
/// # Ok::<(), pdbscope::Error>(())
/// ```
pub struct VecStreamProvider {
    streams: Vec<Vec<u8>>,
}

impl VecStreamProvider {
    /// Creates a provider over the given stream contents, indexed by stream id.
    #[must_use]
    pub fn new(streams: Vec<Vec<u8>>) -> Self {
        VecStreamProvider { streams }
    }
}

impl StreamProvider for VecStreamProvider {
    fn num_streams(&self) -> u32 {
        u32::try_from(self.streams.len()).unwrap_or(u32::MAX)
    }

    fn stream(&self, id: u32) -> Result<&[u8]> {
        self.streams
            .get(id as usize)
            .map(Vec::as_slice)
            .ok_or(StreamNotFound(id))
    }
}
