//! Generic record parsing: header handling, tag dispatch, symmetric encoding.
//!
//! PDB streams are packed sequences of variable-length records. Every record
//! starts with a [`RecordHeader`]: a 2-byte length (excluding itself) followed
//! by a numeric kind tag whose width depends on the stream — 2 bytes in the
//! [`StreamSpace::Leaf`] space of the type stream, 4 bytes in the
//! [`StreamSpace::Symbol`] space of module streams. The kind selects a variant
//! codec from the process-wide [`registry`]; an unregistered kind is a
//! recoverable [`crate::Error::UnsupportedVariant`] because the declared length
//! still tells the caller exactly how far to skip.
//!
//! Encoding is symmetric and two-pass: the payload is serialized into a scratch
//! buffer first (its length is unknown up front — several variants embed
//! length-prefixed substructures), padded to a 4-byte record boundary, and only
//! then written behind its header. Decoding relies solely on the declared
//! length, never on scanning for the next header, so padding is transparent.
//!
//! # Round-Trip Contract
//!
//! For every registered variant, `decode(encode(x))` reproduces `x`
//! field-for-field, and `encode(decode(bytes))` reproduces the original byte
//! length for records produced by this encoder.

pub mod registry;

use std::sync::{Arc, Weak};

use strum::Display;

use crate::{
    file::io::{read_le_at, write_le_vec},
    leaves::Leaf,
    symbols::Symbol,
    typesystem::{LazyTypeRef, TypeContainer, TypeIndex, TypeRc, TypeResolver},
    Error::UnsupportedVariant,
    Result,
};

/// The two numeric tag spaces of the PDB record format.
///
/// Leaf-kind and symbol-kind tags are separate enumerations that may overlap
/// numerically but never collide within one space; the registry is keyed by
/// `(space, kind)` accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StreamSpace {
    /// Type-stream records (leaves); 2-byte kind tags.
    Leaf,
    /// Module-stream records (symbols); 4-byte kind tags.
    Symbol,
}

impl StreamSpace {
    /// Width of the kind tag on the wire, in bytes.
    #[must_use]
    pub fn kind_width(&self) -> usize {
        match self {
            StreamSpace::Leaf => 2,
            StreamSpace::Symbol => 4,
        }
    }
}

/// One record's header: declared length and numeric kind tag.
///
/// `length` counts the kind tag plus payload and excludes the length field
/// itself, so a full record occupies `2 + length` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Payload byte size including the kind tag, excluding this field.
    pub length: u16,
    /// Numeric kind tag; at most 16 bits wide in the leaf space.
    pub kind: u32,
}

impl RecordHeader {
    /// Reads a header at `offset`, advancing past it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] on truncation, or
    /// [`crate::Error::Malformed`] if the declared length cannot even hold the
    /// kind tag.
    pub fn read(space: StreamSpace, data: &[u8], offset: &mut usize) -> Result<Self> {
        let length = read_le_at::<u16>(data, offset)?;
        if usize::from(length) < space.kind_width() {
            return Err(malformed_error!(
                "Record declares length {} smaller than its {}-byte kind tag",
                length,
                space.kind_width()
            ));
        }

        let kind = match space {
            StreamSpace::Leaf => u32::from(read_le_at::<u16>(data, offset)?),
            StreamSpace::Symbol => read_le_at::<u32>(data, offset)?,
        };

        Ok(RecordHeader { length, kind })
    }

    /// Appends the header to a growing buffer in its wire shape for `space`.
    pub fn write(&self, space: StreamSpace, data: &mut Vec<u8>) {
        write_le_vec(data, self.length);
        match space {
            StreamSpace::Leaf => write_le_vec(data, self.kind as u16),
            StreamSpace::Symbol => write_le_vec(data, self.kind),
        }
    }

    /// The payload size in bytes, i.e. the declared length minus the kind tag.
    #[must_use]
    pub fn payload_len(&self, space: StreamSpace) -> usize {
        usize::from(self.length) - space.kind_width()
    }

    /// Total record size from its first byte to the start of the next record.
    #[must_use]
    pub fn record_len(&self) -> usize {
        2 + usize::from(self.length)
    }
}

/// Decode-time context binding records to the session's type resolver.
///
/// Handed to every variant decode function; its only job is to let decoders
/// capture [`LazyTypeRef`]s without performing any resolution themselves.
#[derive(Clone)]
pub struct CodecContext {
    resolver: Weak<TypeResolver>,
}

impl CodecContext {
    pub(crate) fn new(resolver: Weak<TypeResolver>) -> Self {
        CodecContext { resolver }
    }

    /// A context with no resolver behind it.
    ///
    /// Records decoded through a detached context carry detached lazy
    /// references; their indices are intact but cannot be resolved. Useful for
    /// pure codec work (round-trip tooling, tests).
    #[must_use]
    pub fn detached() -> Self {
        CodecContext {
            resolver: Weak::new(),
        }
    }

    /// Reads one 4-byte type index and returns it as a lazy reference.
    ///
    /// Consumes exactly four bytes and never touches the type stream.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] on truncation.
    pub fn read_index_lazy(&self, data: &[u8], offset: &mut usize) -> Result<LazyTypeRef> {
        let raw = read_le_at::<u32>(data, offset)?;
        Ok(LazyTypeRef::new(self.resolver.clone(), TypeIndex::new(raw)))
    }
}

/// Appends a lazy reference's 4-byte index to a growing buffer.
///
/// The encode-side mirror of [`CodecContext::read_index_lazy`].
pub fn write_index_lazy(data: &mut Vec<u8>, reference: &LazyTypeRef) {
    write_le_vec(data, reference.index().value());
}

/// Serializes one leaf record, header included, padded to a 4-byte boundary.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if the leaf is a synthetic primitive
/// (those have no wire form) or the payload exceeds the 16-bit length field,
/// and [`crate::Error::UnsupportedVariant`] if the kind has no registered
/// codec.
pub fn encode_leaf(leaf: &Leaf) -> Result<Vec<u8>> {
    let Some(kind) = leaf.kind() else {
        return Err(malformed_error!(
            "Synthetic primitive leaves have no wire representation"
        ));
    };

    let Some(codec) = registry::leaf_codec(kind as u16) else {
        return Err(UnsupportedVariant {
            space: StreamSpace::Leaf,
            kind: kind as u32,
            length: 0,
        });
    };

    let mut payload = Vec::new();
    (codec.encode)(leaf, &mut payload)?;
    finish_record(StreamSpace::Leaf, kind as u32, payload)
}

/// Serializes one symbol record, header included, padded to a 4-byte boundary.
///
/// # Errors
///
/// Returns [`crate::Error::UnsupportedVariant`] if the kind has no registered
/// codec, or [`crate::Error::Malformed`] if the payload exceeds the 16-bit
/// length field.
pub fn encode_symbol(symbol: &Symbol) -> Result<Vec<u8>> {
    let kind = symbol.kind();

    let Some(codec) = registry::symbol_codec(kind as u32) else {
        return Err(UnsupportedVariant {
            space: StreamSpace::Symbol,
            kind: kind as u32,
            length: 0,
        });
    };

    let mut payload = Vec::new();
    (codec.encode)(symbol, &mut payload)?;
    finish_record(StreamSpace::Symbol, kind as u32, payload)
}

/// Second pass of the two-pass encoder: pad, compute the length, emit.
fn finish_record(space: StreamSpace, kind: u32, mut payload: Vec<u8>) -> Result<Vec<u8>> {
    while (2 + space.kind_width() + payload.len()) % 4 != 0 {
        payload.push(0);
    }

    let Ok(length) = u16::try_from(space.kind_width() + payload.len()) else {
        return Err(malformed_error!(
            "Record payload of {} bytes exceeds the 16-bit length field",
            payload.len()
        ));
    };

    let mut record = Vec::with_capacity(2 + usize::from(length));
    RecordHeader { length, kind }.write(space, &mut record);
    record.extend_from_slice(&payload);
    Ok(record)
}

/// One decoded symbol record with its wire metadata.
#[derive(Debug, PartialEq, Eq)]
pub struct SymbolContainer {
    kind: u32,
    raw_len: u16,
    symbol: Symbol,
}

impl SymbolContainer {
    /// The record's numeric kind tag.
    #[must_use]
    pub fn kind(&self) -> u32 {
        self.kind
    }

    /// The record's payload length in bytes, excluding the header.
    #[must_use]
    pub fn raw_len(&self) -> u16 {
        self.raw_len
    }

    /// The decoded payload.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Consumes the container, returning the payload.
    #[must_use]
    pub fn into_symbol(self) -> Symbol {
        self.symbol
    }
}

/// Observer callback invoked with `(kind, raw payload)` before each symbol
/// record is parsed. Purely diagnostic; cannot alter decode results.
pub type SymbolObserver<'a> = dyn Fn(u32, &[u8]) + 'a;

/// Lazy, forward-only iteration over the leaf records of a type stream.
///
/// Each step advances by `2 + length` bytes. Unregistered kinds are yielded as
/// [`crate::Error::UnsupportedVariant`] items and skipped via their declared
/// length, so subsequent records still decode; a malformed header fuses the
/// iterator since no safe resynchronization exists. Restartable only from a
/// fresh iterator at offset zero.
pub struct LeafRecords<'a> {
    ctx: CodecContext,
    data: &'a [u8],
    offset: usize,
    fused: bool,
}

/// Iterates the leaf records of `data` in file order.
#[must_use]
pub fn decode_all_leaves(ctx: CodecContext, data: &[u8]) -> LeafRecords<'_> {
    LeafRecords {
        ctx,
        data,
        offset: 0,
        fused: false,
    }
}

impl Iterator for LeafRecords<'_> {
    type Item = Result<TypeRc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused || self.offset >= self.data.len() {
            return None;
        }

        let start = self.offset;
        let mut pos = start;
        let header = match RecordHeader::read(StreamSpace::Leaf, self.data, &mut pos) {
            Ok(header) => header,
            Err(error) => {
                self.fused = true;
                return Some(Err(error));
            }
        };

        let payload_len = header.payload_len(StreamSpace::Leaf);
        let Some(payload) = self.data.get(pos..pos + payload_len) else {
            self.fused = true;
            return Some(Err(malformed_error!(
                "Record at offset {:#x} overruns the stream",
                start
            )));
        };

        // The header is sound, so the cursor can advance regardless of whether
        // the payload decodes.
        self.offset = start + header.record_len();

        let kind = header.kind as u16;
        let Some(codec) = registry::leaf_codec(kind) else {
            return Some(Err(UnsupportedVariant {
                space: StreamSpace::Leaf,
                kind: u32::from(kind),
                length: header.length,
            }));
        };

        Some((codec.decode)(&self.ctx, payload).map(|leaf| {
            Arc::new(TypeContainer::decoded(kind, payload_len as u16, leaf))
        }))
    }
}

/// Lazy, forward-only iteration over the symbol records of a module stream.
///
/// Same advancement and recovery rules as [`LeafRecords`], in the symbol tag
/// space. Order is preserved exactly; scope-end markers delimit the records
/// before them, but begin/end pairing is a consumer concern.
pub struct SymbolRecords<'a> {
    ctx: CodecContext,
    data: &'a [u8],
    offset: usize,
    fused: bool,
    observer: Option<&'a SymbolObserver<'a>>,
}

/// Iterates the symbol records of `data` in file order.
#[must_use]
pub fn decode_all_symbols(ctx: CodecContext, data: &[u8]) -> SymbolRecords<'_> {
    SymbolRecords {
        ctx,
        data,
        offset: 0,
        fused: false,
        observer: None,
    }
}

impl<'a> SymbolRecords<'a> {
    /// Attaches a diagnostic observer invoked with each record's kind and raw
    /// payload before parsing.
    #[must_use]
    pub fn with_observer(mut self, observer: &'a SymbolObserver<'a>) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl Iterator for SymbolRecords<'_> {
    type Item = Result<SymbolContainer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused || self.offset >= self.data.len() {
            return None;
        }

        let start = self.offset;
        let mut pos = start;
        let header = match RecordHeader::read(StreamSpace::Symbol, self.data, &mut pos) {
            Ok(header) => header,
            Err(error) => {
                self.fused = true;
                return Some(Err(error));
            }
        };

        let payload_len = header.payload_len(StreamSpace::Symbol);
        let Some(payload) = self.data.get(pos..pos + payload_len) else {
            self.fused = true;
            return Some(Err(malformed_error!(
                "Record at offset {:#x} overruns the stream",
                start
            )));
        };

        self.offset = start + header.record_len();

        if let Some(observer) = self.observer {
            observer(header.kind, payload);
        }

        let Some(codec) = registry::symbol_codec(header.kind) else {
            return Some(Err(UnsupportedVariant {
                space: StreamSpace::Symbol,
                kind: header.kind,
                length: header.length,
            }));
        };

        Some((codec.decode)(&self.ctx, payload).map(|symbol| SymbolContainer {
            kind: header.kind,
            raw_len: payload_len as u16,
            symbol,
        }))
    }
}
