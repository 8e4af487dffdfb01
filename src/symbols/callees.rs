//! `S_CALLEES` — the functions called by the enclosing procedure.

use crate::{
    codec::{write_index_lazy, CodecContext},
    file::io::{read_le_at, write_le_vec},
    symbols::Symbol,
    typesystem::LazyTypeRef,
    Result,
};

/// An ordered list of callee function types.
///
/// Wire layout: `u32` count N followed by N `u32` type indices. The same
/// shape backs `S_CALLERS` and `S_INLINEES`; only the kind tag differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callees {
    /// The callee function types.
    pub functions: Vec<LazyTypeRef>,
}

impl Callees {
    /// One-line description, indices unresolved.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("S_CALLEES[{} functions]", self.functions.len())
    }
}

pub(crate) fn decode(ctx: &CodecContext, data: &[u8]) -> Result<Symbol> {
    let mut offset = 0;

    let count = read_le_at::<u32>(data, &mut offset)?;
    // An adversarial count cannot reserve more than the payload could hold.
    let mut functions = Vec::with_capacity((count as usize).min(data.len() / 4));
    for _ in 0..count {
        functions.push(ctx.read_index_lazy(data, &mut offset)?);
    }

    Ok(Symbol::Callees(Callees { functions }))
}

pub(crate) fn encode(symbol: &Symbol, data: &mut Vec<u8>) -> Result<()> {
    let Symbol::Callees(callees) = symbol else {
        return Err(malformed_error!("S_CALLEES codec invoked on {:?}", symbol));
    };

    let Ok(count) = u32::try_from(callees.functions.len()) else {
        return Err(malformed_error!(
            "Callee list with {} entries exceeds the 32-bit count field",
            callees.functions.len()
        ));
    };

    write_le_vec(data, count);
    for function in &callees.functions {
        write_index_lazy(data, function);
    }
    Ok(())
}
