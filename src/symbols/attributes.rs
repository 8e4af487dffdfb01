//! Flags and location attributes carried by local-variable symbol records.

use bitflags::bitflags;

use crate::{
    file::io::{read_le_at, write_le_vec},
    Result,
};

bitflags! {
    /// Properties of a local variable, immutable once parsed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LocalVarFlags: u16 {
        /// The variable is a formal parameter.
        const IS_PARAM = 0x0001;
        /// Its address is taken somewhere in the function.
        const ADDR_TAKEN = 0x0002;
        /// Compiler-generated.
        const COMP_GENX = 0x0004;
        /// The symbol is split into multiple register/stack pieces.
        const IS_AGGREGATE = 0x0008;
        /// This is one piece of an aggregated symbol.
        const IS_AGGREGATED = 0x0010;
        /// The variable has multiple simultaneous lifetimes.
        const IS_ALIASED = 0x0020;
        /// This is one of the lifetimes of an aliased variable.
        const IS_ALIAS = 0x0040;
        /// The variable holds the function's return value.
        const IS_RETVALUE = 0x0080;
        /// The variable was optimized away.
        const IS_OPTIMIZED_OUT = 0x0100;
        /// A global variable enregistered for this scope.
        const IS_ENREG_GLOBAL = 0x0200;
        /// A static variable enregistered for this scope.
        const IS_ENREG_STATIC = 0x0400;
    }
}

/// Where a local variable first becomes live, plus its [`LocalVarFlags`].
///
/// Wire layout: `u32` code offset, `u16` segment, `u16` flag word. Carried
/// inline by the attributed local-variable records; the plain `S_LOCAL` word
/// keeps only the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVarAttributes {
    /// Code offset where the variable becomes live.
    pub offset: u32,
    /// Segment of the code offset.
    pub segment: u16,
    /// Lifetime and storage properties.
    pub flags: LocalVarFlags,
}

impl LocalVarAttributes {
    pub(crate) fn read_at(data: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(LocalVarAttributes {
            offset: read_le_at::<u32>(data, offset)?,
            segment: read_le_at::<u16>(data, offset)?,
            flags: LocalVarFlags::from_bits_truncate(read_le_at::<u16>(data, offset)?),
        })
    }

    pub(crate) fn write_vec(&self, data: &mut Vec<u8>) {
        write_le_vec(data, self.offset);
        write_le_vec(data, self.segment);
        write_le_vec(data, self.flags.bits());
    }
}
