//! Offset index, decode cache, and cycle-safe resolution over the type stream.

use std::sync::{Arc, Weak};

use dashmap::{mapref::entry::Entry, DashMap};

use crate::{
    codec::{registry, CodecContext, LeafRecords, RecordHeader, StreamSpace},
    file::io::read_le_at,
    typesystem::{LazyTypeRef, PrimitiveKind, TypeContainer, TypeIndex, TypeRc},
    Error::{InvalidTypeIndex, OutOfBounds, UnsupportedVariant},
    Result,
};

/// Resolves type indices against one type stream, memoizing every decode.
///
/// One resolver is owned by one open-file session and bound to the session's
/// type stream. Construction performs a single headers-only pre-scan that maps
/// every [`TypeIndex`] to its byte offset without touching payloads; records
/// are decoded individually on first resolution and cached for the session's
/// lifetime. The cache only grows, never evicts.
///
/// # Cycle Safety
///
/// Type records reference each other freely, including mutual and self
/// references. What breaks cycles is that references captured during a decode
/// stay [`LazyTypeRef`]s and are only resolved when a consumer later walks
/// them; decoding one record never triggers another resolution, so resolution
/// never recurses.
///
/// # Thread Safety
///
/// The cache is a [`DashMap`]. A record is decoded while its vacant cache
/// entry is held, so concurrent resolutions of one index serialize on that
/// entry: one thread decodes and inserts, the rest then observe the inserted
/// container. A container only ever enters the cache fully decoded, and on a
/// decode error nothing is inserted, so every thread sees the error for
/// itself. Decoding under the entry is safe precisely because decode never
/// touches the cache (see Cycle Safety).
///
/// # Examples
///
/// ```rust
/// use pdbscope::typesystem::{TypeIndex, TypeResolver};
///
/// // One LF_LONG record: length 6, kind 0x8003, value 42.
/// let stream = vec![0x06, 0x00, 0x03, 0x80, 0x2A, 0x00, 0x00, 0x00];
/// let resolver = TypeResolver::new(stream)?;
///
/// let first = resolver.resolve(TypeIndex::new(0x1000))?;
/// let again = resolver.resolve(TypeIndex::new(0x1000))?;
/// assert!(std::sync::Arc::ptr_eq(&first, &again));
/// # Ok::<(), pdbscope::Error>(())
/// ```
pub struct TypeResolver {
    /// Raw bytes of the type stream.
    data: Vec<u8>,
    /// `offsets[i]` is the byte offset of the record with index `0x1000 + i`.
    offsets: Vec<usize>,
    /// Decode cache keyed by raw index value; grows for the session's lifetime.
    cache: DashMap<u32, TypeRc>,
    /// Self-handle so decoded records can capture lazy references back to us.
    this: Weak<TypeResolver>,
}

impl TypeResolver {
    /// Builds a resolver over the given type stream bytes.
    ///
    /// Runs the one-time headers-only pre-scan, O(record count). No payload is
    /// decoded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if any record header is truncated or
    /// declares a length overrunning the stream.
    pub fn new(data: Vec<u8>) -> Result<Arc<Self>> {
        let offsets = scan_offsets(&data)?;

        Ok(Arc::new_cyclic(|this| TypeResolver {
            data,
            offsets,
            cache: DashMap::new(),
            this: this.clone(),
        }))
    }

    /// The number of records the pre-scan found in the type stream.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.offsets.len()
    }

    /// A decode context bound to this resolver.
    pub(crate) fn context(&self) -> CodecContext {
        CodecContext::new(self.this.clone())
    }

    /// Creates a lazy reference to `index` bound to this resolver.
    #[must_use]
    pub fn lazy_ref(&self, index: TypeIndex) -> LazyTypeRef {
        LazyTypeRef::new(self.this.clone(), index)
    }

    /// Iterates over every record in the type stream in file order.
    ///
    /// Unregistered kinds are yielded as recoverable errors and skipped; see
    /// [`LeafRecords`].
    #[must_use]
    pub fn records(&self) -> LeafRecords<'_> {
        crate::codec::decode_all_leaves(self.context(), &self.data)
    }

    /// Resolves a type index to its decoded record.
    ///
    /// Primitive indices return a synthetic descriptor without stream access.
    /// Record indices are decoded on first resolution and served from the cache
    /// afterwards; two resolutions of the same index return the identical
    /// [`TypeRc`] instance.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidTypeIndex`] if the index neither names a known
    ///   primitive nor falls within the record table
    /// - [`crate::Error::UnsupportedVariant`] if the record's kind has no
    ///   registered codec
    /// - [`crate::Error::Malformed`] / [`crate::Error::OutOfBounds`] if the
    ///   record's payload is structurally invalid
    pub fn resolve(&self, index: TypeIndex) -> Result<TypeRc> {
        if index.is_primitive() {
            let Some(kind) = PrimitiveKind::from_index(index) else {
                return Err(InvalidTypeIndex(index.value()));
            };

            let container = self
                .cache
                .entry(index.value())
                .or_insert_with(|| Arc::new(TypeContainer::primitive(kind)))
                .clone();
            return Ok(container);
        }

        // Fast path; misses fall through to the entry lock below.
        if let Some(existing) = self.cache.get(&index.value()) {
            return Ok(existing.clone());
        }

        let offset = index
            .record_position()
            .and_then(|position| self.offsets.get(position))
            .copied()
            .ok_or(InvalidTypeIndex(index.value()))?;

        let mut pos = offset;
        let header = RecordHeader::read(StreamSpace::Leaf, &self.data, &mut pos)?;
        let payload_len = header.payload_len(StreamSpace::Leaf);
        let payload = self
            .data
            .get(pos..pos + payload_len)
            .ok_or(OutOfBounds)?;

        // Leaf kind tags are 2 bytes wide on the wire, so this cannot truncate.
        let kind = header.kind as u16;
        let Some(codec) = registry::leaf_codec(kind) else {
            return Err(UnsupportedVariant {
                space: StreamSpace::Leaf,
                kind: u32::from(kind),
                length: header.length,
            });
        };

        // Whoever wins the vacant entry decodes while holding it; concurrent
        // resolutions of the same index block on the entry and then find the
        // fully decoded container. Decode never calls back into the cache, so
        // holding the entry across it cannot deadlock.
        match self.cache.entry(index.value()) {
            Entry::Occupied(occupied) => Ok(occupied.get().clone()),
            Entry::Vacant(vacant) => {
                let leaf = (codec.decode)(&self.context(), payload)?;
                let container: TypeRc = Arc::new(TypeContainer::decoded(
                    kind,
                    u16::try_from(payload_len).map_err(|_| OutOfBounds)?,
                    leaf,
                ));
                vacant.insert(container.clone());
                Ok(container)
            }
        }
    }
}

/// Headers-only pre-scan: maps every record to its byte offset.
fn scan_offsets(data: &[u8]) -> Result<Vec<usize>> {
    let mut offsets = Vec::new();
    let mut offset = 0_usize;

    while offset < data.len() {
        let start = offset;
        let mut pos = offset;

        let length = usize::from(read_le_at::<u16>(data, &mut pos).map_err(|_| {
            malformed_error!("Truncated record header at offset {:#x}", start)
        })?);

        if length < StreamSpace::Leaf.kind_width() {
            return Err(malformed_error!(
                "Record at offset {:#x} declares length {} smaller than its kind tag",
                start,
                length
            ));
        }

        let end = pos + length;
        if end > data.len() {
            return Err(malformed_error!(
                "Record at offset {:#x} overruns the type stream ({} > {})",
                start,
                end,
                data.len()
            ));
        }

        offsets.push(start);
        offset = end;
    }

    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaves::Leaf;

    // length 6 = 2-byte kind + 4-byte payload
    const LONG_42: &[u8] = &[0x06, 0x00, 0x03, 0x80, 0x2A, 0x00, 0x00, 0x00];

    #[test]
    fn prescan_indexes_every_record() {
        let mut stream = LONG_42.to_vec();
        stream.extend_from_slice(LONG_42);

        let resolver = TypeResolver::new(stream).unwrap();
        assert_eq!(resolver.record_count(), 2);
    }

    #[test]
    fn prescan_rejects_overrunning_record() {
        // Declares 0x40 bytes but the stream ends after the kind tag.
        let stream = vec![0x40, 0x00, 0x03, 0x80];
        assert!(matches!(
            TypeResolver::new(stream),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn resolve_is_idempotent_by_identity() {
        let resolver = TypeResolver::new(LONG_42.to_vec()).unwrap();

        let first = resolver.resolve(TypeIndex::new(0x1000)).unwrap();
        let second = resolver.resolve(TypeIndex::new(0x1000)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        match first.leaf() {
            Leaf::Long(long) => assert_eq!(long.value, 42),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn resolve_primitive_without_stream_access() {
        let resolver = TypeResolver::new(Vec::new()).unwrap();

        let container = resolver.resolve(TypeIndex::new(0x0075)).unwrap();
        assert_eq!(container.leaf(), &Leaf::Primitive(PrimitiveKind::U4));
    }

    #[test]
    fn resolve_rejects_out_of_range_index() {
        let resolver = TypeResolver::new(LONG_42.to_vec()).unwrap();

        assert!(matches!(
            resolver.resolve(TypeIndex::new(0x1001)),
            Err(InvalidTypeIndex(0x1001))
        ));
        assert!(matches!(
            resolver.resolve(TypeIndex::new(0x0FFF)),
            Err(InvalidTypeIndex(0x0FFF))
        ));
    }

    #[test]
    fn resolve_unregistered_kind_is_recoverable() {
        // Unknown kind 0x0BAD with a 2-byte payload.
        let stream = vec![0x04, 0x00, 0xAD, 0x0B, 0xEE, 0xFF];
        let resolver = TypeResolver::new(stream).unwrap();

        match resolver.resolve(TypeIndex::new(0x1000)) {
            Err(UnsupportedVariant { kind, length, .. }) => {
                assert_eq!(kind, 0x0BAD);
                assert_eq!(length, 4);
            }
            other => panic!("expected UnsupportedVariant, got {other:?}"),
        }
    }

    #[test]
    fn concurrent_resolution_shares_one_instance() {
        let resolver = TypeResolver::new(LONG_42.to_vec()).unwrap();

        for _ in 0..200 {
            resolver.cache.clear();
            let barrier = std::sync::Barrier::new(2);

            let (first, second) = std::thread::scope(|scope| {
                let first = scope.spawn(|| {
                    barrier.wait();
                    resolver.resolve(TypeIndex::new(0x1000))
                });
                let second = scope.spawn(|| {
                    barrier.wait();
                    resolver.resolve(TypeIndex::new(0x1000))
                });
                (first.join().unwrap(), second.join().unwrap())
            });

            assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
        }
    }

    #[test]
    fn concurrent_resolution_of_bad_record_errors_on_every_thread() {
        // LF_STMEMBER whose name runs off the end of the payload without a
        // terminator, so decoding always fails.
        let stream = vec![
            0x0A, 0x00, 0x0E, 0x15, 0x03, 0x00, 0x74, 0x00, 0x00, 0x00, 0x78, 0x79,
        ];
        let resolver = TypeResolver::new(stream).unwrap();

        for _ in 0..200 {
            let barrier = std::sync::Barrier::new(2);

            let (first, second) = std::thread::scope(|scope| {
                let first = scope.spawn(|| {
                    barrier.wait();
                    resolver.resolve(TypeIndex::new(0x1000))
                });
                let second = scope.spawn(|| {
                    barrier.wait();
                    resolver.resolve(TypeIndex::new(0x1000))
                });
                (first.join().unwrap(), second.join().unwrap())
            });

            // Neither thread may come away with a container for a record that
            // never decoded, however the threads interleave.
            assert!(first.is_err(), "got {first:?}");
            assert!(second.is_err(), "got {second:?}");
        }
    }
}
