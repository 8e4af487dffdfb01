//! The representative catalog of type-stream (leaf) records.
//!
//! Each registered leaf kind lives in its own module with its record struct and
//! the decode/encode pair the [`crate::codec::registry`] dispatches to. The
//! closed sum type [`Leaf`] carries one variant per kind, plus the synthetic
//! [`Leaf::Primitive`] variant the resolver produces for sub-threshold type
//! indices — that one never appears on the wire and is never registered.
//!
//! Shared substructures used by several records sit alongside the variants:
//! [`attributes::FieldAttributes`] (member attribute bitfields) and
//! [`numeric::NumericLeaf`] (the variable-width scalar encoding).

pub mod arglist;
pub mod attributes;
pub mod index;
pub mod long;
pub mod numeric;
pub mod stmember;

use strum::{Display, FromRepr};

use crate::typesystem::PrimitiveKind;

pub use arglist::ArgList;
pub use attributes::{FieldAccess, FieldAttributes, FieldProperties};
pub use index::Index;
pub use long::Long;
pub use numeric::NumericLeaf;
pub use stmember::StaticMember;

/// Numeric kind tags of the leaf records this crate registers.
///
/// The values are the published CodeView `LF_` constants. Records with tags
/// outside this set decode to [`crate::Error::UnsupportedVariant`] and can be
/// skipped via their declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, Display)]
#[repr(u16)]
pub enum LeafKind {
    /// `LF_ARGLIST` — argument list of a procedure type.
    ArgList = 0x1201,
    /// `LF_INDEX` — continuation reference to another type record.
    Index = 0x1404,
    /// `LF_STMEMBER` — static data member of a structure.
    StaticMember = 0x150e,
    /// `LF_LONG` — signed 32-bit scalar.
    Long = 0x8003,
}

/// One decoded leaf record payload.
///
/// A closed sum type, one variant per registered kind. Cross-record references
/// inside variants are [`crate::typesystem::LazyTypeRef`]s and stay unresolved
/// until a consumer walks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    /// `LF_ARGLIST`
    ArgList(ArgList),
    /// `LF_INDEX`
    Index(Index),
    /// `LF_STMEMBER`
    StaticMember(StaticMember),
    /// `LF_LONG`
    Long(Long),
    /// Synthetic descriptor for a built-in primitive type; no backing record.
    Primitive(PrimitiveKind),
}

impl Leaf {
    /// The wire kind tag of this payload; `None` for the synthetic primitive.
    #[must_use]
    pub fn kind(&self) -> Option<LeafKind> {
        match self {
            Leaf::ArgList(_) => Some(LeafKind::ArgList),
            Leaf::Index(_) => Some(LeafKind::Index),
            Leaf::StaticMember(_) => Some(LeafKind::StaticMember),
            Leaf::Long(_) => Some(LeafKind::Long),
            Leaf::Primitive(_) => None,
        }
    }

    /// A one-line human-readable description of this record.
    ///
    /// Explicit dispatch over the closed variant set; the presentation layers
    /// build their output from this rather than from type introspection.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Leaf::ArgList(arglist) => arglist.describe(),
            Leaf::Index(index) => index.describe(),
            Leaf::StaticMember(member) => member.describe(),
            Leaf::Long(long) => long.describe(),
            Leaf::Primitive(kind) => format!("T_{kind}"),
        }
    }
}
