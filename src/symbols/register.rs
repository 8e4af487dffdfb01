//! `S_REGISTER` — a variable living in a register.

use crate::{
    codec::{write_index_lazy, CodecContext},
    file::io::{read_cstring_at, read_le_at, write_cstring_vec, write_le_vec},
    symbols::Symbol,
    typesystem::LazyTypeRef,
    Result,
};

/// A named enregistered variable.
///
/// Wire layout: one `u32` type index, `u16` register id, a null-terminated
/// name. Register ids are machine-specific; this crate carries them verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    /// The variable's type.
    pub value_type: LazyTypeRef,
    /// Machine-specific register id.
    pub register: u16,
    /// The variable's name.
    pub name: String,
}

impl Register {
    /// One-line description, type unresolved.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("S_REGISTER[{} in reg {}]", self.name, self.register)
    }
}

pub(crate) fn decode(ctx: &CodecContext, data: &[u8]) -> Result<Symbol> {
    let mut offset = 0;

    Ok(Symbol::Register(Register {
        value_type: ctx.read_index_lazy(data, &mut offset)?,
        register: read_le_at::<u16>(data, &mut offset)?,
        name: read_cstring_at(data, &mut offset)?,
    }))
}

pub(crate) fn encode(symbol: &Symbol, data: &mut Vec<u8>) -> Result<()> {
    let Symbol::Register(register) = symbol else {
        return Err(malformed_error!("S_REGISTER codec invoked on {:?}", symbol));
    };

    write_index_lazy(data, &register.value_type);
    write_le_vec(data, register.register);
    write_cstring_vec(data, &register.name);
    Ok(())
}
