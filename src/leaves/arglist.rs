//! `LF_ARGLIST` — the argument list of a procedure type.

use crate::{
    codec::{write_index_lazy, CodecContext},
    file::io::{read_le_at, write_le_vec},
    leaves::Leaf,
    typesystem::LazyTypeRef,
    Result,
};

/// An ordered list of argument types.
///
/// Wire layout: `u16` count N followed by N `u32` type indices. The indices
/// are captured lazily; nothing is resolved until a consumer walks the
/// entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgList {
    /// The argument types, in declaration order.
    pub entries: Vec<LazyTypeRef>,
}

impl ArgList {
    /// One-line description, indices unresolved.
    #[must_use]
    pub fn describe(&self) -> String {
        let indices: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.index().to_string())
            .collect();
        format!("LF_ARGLIST[{}]", indices.join(", "))
    }
}

pub(crate) fn decode(ctx: &CodecContext, data: &[u8]) -> Result<Leaf> {
    let mut offset = 0;

    let count = read_le_at::<u16>(data, &mut offset)?;
    let mut entries = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        entries.push(ctx.read_index_lazy(data, &mut offset)?);
    }

    Ok(Leaf::ArgList(ArgList { entries }))
}

pub(crate) fn encode(leaf: &Leaf, data: &mut Vec<u8>) -> Result<()> {
    let Leaf::ArgList(arglist) = leaf else {
        return Err(malformed_error!("LF_ARGLIST codec invoked on {:?}", leaf));
    };

    let Ok(count) = u16::try_from(arglist.entries.len()) else {
        return Err(malformed_error!(
            "Argument list with {} entries exceeds the 16-bit count field",
            arglist.entries.len()
        ));
    };

    write_le_vec(data, count);
    for entry in &arglist.entries {
        write_index_lazy(data, entry);
    }
    Ok(())
}
