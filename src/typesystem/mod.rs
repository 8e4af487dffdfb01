//! Type indices and the lazy type-resolution engine.
//!
//! Every cross-record reference in a PDB type stream is a [`TypeIndex`]: a 32-bit
//! handle that either names a built-in primitive type (below [`FIRST_NONPRIMITIVE`])
//! or selects a record in the type stream. Records reference each other freely,
//! including forward and cyclic references, so decoding a reference eagerly would
//! recurse without bound. Instead, references decode to [`lazy::LazyTypeRef`]
//! placeholders and are resolved on demand through the session's
//! [`resolver::TypeResolver`], which memoizes every decoded record for the
//! session's lifetime.
//!
//! # Key Components
//!
//! - [`TypeIndex`] - the numeric handle, primitive-aware
//! - [`PrimitiveKind`] - the closed set of built-in types this crate describes
//! - [`TypeContainer`] / [`TypeRc`] - one decoded type record
//! - [`lazy::LazyTypeRef`] - a deferred reference captured at decode time
//! - [`resolver::TypeResolver`] - offset index, decode cache, cycle-safe resolution

pub mod lazy;
pub mod resolver;

use strum::{Display, FromRepr};

use crate::leaves::Leaf;

pub use lazy::LazyTypeRef;
pub use resolver::TypeResolver;

/// First type index that refers to a type stream record.
///
/// Indices below this threshold denote built-in primitive types with no backing
/// record; indices at or above it select records in the type stream, assigned
/// monotonically in emission order.
pub const FIRST_NONPRIMITIVE: u32 = 0x1000;

/// A 32-bit handle identifying either a primitive type or a type-stream record.
///
/// `TypeIndex` is a plain value; turning it into a decoded record is the
/// resolver's job. Two equal indices resolved through the same resolver always
/// yield the identical decoded instance.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeIndex(pub u32);

impl TypeIndex {
    /// Creates a type index from a raw 32-bit value.
    #[must_use]
    pub fn new(value: u32) -> Self {
        TypeIndex(value)
    }

    /// Returns the raw index value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Whether this index names a built-in primitive rather than a stream record.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.0 < FIRST_NONPRIMITIVE
    }

    /// The position of this index within the type stream's record table.
    ///
    /// Returns `None` for primitive indices.
    #[must_use]
    pub fn record_position(&self) -> Option<usize> {
        if self.is_primitive() {
            None
        } else {
            Some((self.0 - FIRST_NONPRIMITIVE) as usize)
        }
    }
}

impl std::fmt::Debug for TypeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeIndex({:#06x})", self.0)
    }
}

impl std::fmt::Display for TypeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Built-in primitive types named by sub-threshold indices.
///
/// The numeric values are the published CodeView `T_` constants. The set carried
/// here covers the scalar types the record catalog produces; an index outside it
/// fails resolution with [`crate::Error::InvalidTypeIndex`] rather than being
/// silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, Display)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum PrimitiveKind {
    NoType = 0x0000,
    Void = 0x0003,
    Char = 0x0010,
    UChar = 0x0020,
    Short = 0x0011,
    UShort = 0x0021,
    Long = 0x0012,
    ULong = 0x0022,
    Bool8 = 0x0030,
    Real32 = 0x0040,
    Real64 = 0x0041,
    I4 = 0x0074,
    U4 = 0x0075,
    I8 = 0x0076,
    U8 = 0x0077,
}

impl PrimitiveKind {
    /// Maps a primitive type index to its kind, if it is one this crate describes.
    #[must_use]
    pub fn from_index(index: TypeIndex) -> Option<Self> {
        if index.is_primitive() {
            PrimitiveKind::from_repr(index.value())
        } else {
            None
        }
    }
}

/// Reference-counted handle to one resolved type record.
pub type TypeRc = std::sync::Arc<TypeContainer>;

/// One type record: its kind tag, raw payload length, and decoded payload.
///
/// A container is only constructed once its payload has been fully decoded, so
/// holding a `TypeContainer` always means holding a complete record. Decoded
/// references inside the payload stay [`LazyTypeRef`]s; the container never
/// pulls in its transitive closure.
pub struct TypeContainer {
    /// Raw numeric kind tag; `0` for synthetic primitive containers.
    kind: u16,
    /// Payload byte length on the wire; `0` for synthetic primitive containers.
    raw_len: u16,
    /// Decoded payload.
    leaf: Leaf,
}

impl TypeContainer {
    /// A container holding a decoded payload.
    pub(crate) fn decoded(kind: u16, raw_len: u16, leaf: Leaf) -> Self {
        TypeContainer { kind, raw_len, leaf }
    }

    /// A synthetic container describing a built-in primitive; no backing record.
    pub(crate) fn primitive(kind: PrimitiveKind) -> Self {
        Self::decoded(0, 0, Leaf::Primitive(kind))
    }

    /// The record's numeric kind tag as read from its header.
    #[must_use]
    pub fn kind(&self) -> u16 {
        self.kind
    }

    /// The record's payload length in bytes, excluding the header.
    #[must_use]
    pub fn raw_len(&self) -> u16 {
        self.raw_len
    }

    /// The decoded payload.
    #[must_use]
    pub fn leaf(&self) -> &Leaf {
        &self.leaf
    }
}

impl std::fmt::Debug for TypeContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeContainer")
            .field("kind", &format_args!("{:#06x}", self.kind))
            .field("raw_len", &self.raw_len)
            .field("leaf", &self.leaf)
            .finish()
    }
}
