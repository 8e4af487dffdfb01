//! `S_CONSTANT` — a named compile-time constant.

use crate::{
    codec::{write_index_lazy, CodecContext},
    file::io::{read_cstring_at, write_cstring_vec},
    leaves::NumericLeaf,
    symbols::Symbol,
    typesystem::LazyTypeRef,
    Result,
};

/// A named constant with its type and value.
///
/// Wire layout: one `u32` type index, a variable-width
/// [`NumericLeaf`] value, a null-terminated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    /// The constant's type.
    pub value_type: LazyTypeRef,
    /// The constant's value, in its exact wire form.
    pub value: NumericLeaf,
    /// The constant's name.
    pub name: String,
}

impl Constant {
    /// One-line description, type unresolved.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("S_CONSTANT[{} = {}]", self.name, self.value.value())
    }
}

pub(crate) fn decode(ctx: &CodecContext, data: &[u8]) -> Result<Symbol> {
    let mut offset = 0;

    Ok(Symbol::Constant(Constant {
        value_type: ctx.read_index_lazy(data, &mut offset)?,
        value: NumericLeaf::read_at(data, &mut offset)?,
        name: read_cstring_at(data, &mut offset)?,
    }))
}

pub(crate) fn encode(symbol: &Symbol, data: &mut Vec<u8>) -> Result<()> {
    let Symbol::Constant(constant) = symbol else {
        return Err(malformed_error!("S_CONSTANT codec invoked on {:?}", symbol));
    };

    write_index_lazy(data, &constant.value_type);
    constant.value.write_vec(data);
    write_cstring_vec(data, &constant.name);
    Ok(())
}
