//! Member attribute bitfields shared by field-list style records.

use bitflags::bitflags;
use strum::{Display, FromRepr};

/// Access level of a member, stored in the low two bits of the attribute word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, Display)]
#[repr(u16)]
pub enum FieldAccess {
    /// No access protection recorded.
    None = 0,
    /// Private member.
    Private = 1,
    /// Protected member.
    Protected = 2,
    /// Public member.
    Public = 3,
}

bitflags! {
    /// Property flags of a member, the upper bits of the attribute word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldProperties: u16 {
        /// Compiler-generated function, does not exist in source.
        const PSEUDO = 0x0020;
        /// The class cannot be inherited from.
        const NO_INHERIT = 0x0040;
        /// The class cannot be constructed.
        const NO_CONSTRUCT = 0x0080;
        /// Compiler-generated function, does exist in source.
        const COMP_GENX = 0x0100;
        /// The method cannot be overridden.
        const SEALED = 0x0200;
    }
}

/// A member's 16-bit attribute word, immutable once parsed.
///
/// The raw value is kept verbatim so re-encoding is byte-identical even for
/// bits this crate does not interpret (the method-property bits between the
/// access level and the flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAttributes {
    raw: u16,
}

impl FieldAttributes {
    /// Wraps a raw attribute word.
    #[must_use]
    pub fn new(raw: u16) -> Self {
        FieldAttributes { raw }
    }

    /// The raw 16-bit value as it appears on the wire.
    #[must_use]
    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// The member's access level.
    #[must_use]
    pub fn access(&self) -> FieldAccess {
        // Two bits, all four values defined.
        FieldAccess::from_repr(self.raw & 0x0003).unwrap_or(FieldAccess::None)
    }

    /// The member's property flags; uninterpreted bits are dropped.
    #[must_use]
    pub fn properties(&self) -> FieldProperties {
        FieldProperties::from_bits_truncate(self.raw)
    }
}
