//! `S_LOCAL` — a local variable.

use crate::{
    codec::{write_index_lazy, CodecContext},
    file::io::{read_cstring_at, read_le_at, write_cstring_vec, write_le_vec},
    symbols::{LocalVarFlags, Symbol},
    typesystem::LazyTypeRef,
    Result,
};

/// A named local variable with lifetime/storage flags.
///
/// Wire layout: one `u32` type index, `u16` [`LocalVarFlags`] bitfield, a
/// null-terminated name. Where the variable actually lives is described by
/// the range records that follow it in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    /// The variable's type.
    pub value_type: LazyTypeRef,
    /// Lifetime and storage properties.
    pub flags: LocalVarFlags,
    /// The variable's name.
    pub name: String,
}

impl Local {
    /// One-line description, type unresolved.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("S_LOCAL[{} : {}]", self.name, self.value_type.index())
    }
}

pub(crate) fn decode(ctx: &CodecContext, data: &[u8]) -> Result<Symbol> {
    let mut offset = 0;

    Ok(Symbol::Local(Local {
        value_type: ctx.read_index_lazy(data, &mut offset)?,
        flags: LocalVarFlags::from_bits_truncate(read_le_at::<u16>(data, &mut offset)?),
        name: read_cstring_at(data, &mut offset)?,
    }))
}

pub(crate) fn encode(symbol: &Symbol, data: &mut Vec<u8>) -> Result<()> {
    let Symbol::Local(local) = symbol else {
        return Err(malformed_error!("S_LOCAL codec invoked on {:?}", symbol));
    };

    write_index_lazy(data, &local.value_type);
    write_le_vec(data, local.flags.bits());
    write_cstring_vec(data, &local.name);
    Ok(())
}
