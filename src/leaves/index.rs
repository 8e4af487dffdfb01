//! `LF_INDEX` — a continuation reference to another type record.
//!
//! Overlong field lists are split across records; the trailing `LF_INDEX`
//! links to the record holding the continuation. This is the simplest record
//! that demonstrates forward references: the referenced index routinely points
//! *ahead* in the stream, which is why it must stay lazy.

use crate::{
    codec::{write_index_lazy, CodecContext},
    file::io::{read_le_at, write_le_vec},
    leaves::Leaf,
    typesystem::LazyTypeRef,
    Result,
};

/// A reference to the record continuing this one.
///
/// Wire layout: `u16` pad (reserved, written as zero), one `u32` type index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// The continuation record.
    pub referenced: LazyTypeRef,
}

impl Index {
    /// One-line description, index unresolved.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("LF_INDEX[{}]", self.referenced.index())
    }
}

pub(crate) fn decode(ctx: &CodecContext, data: &[u8]) -> Result<Leaf> {
    let mut offset = 0;

    let _pad = read_le_at::<u16>(data, &mut offset)?;
    let referenced = ctx.read_index_lazy(data, &mut offset)?;

    Ok(Leaf::Index(Index { referenced }))
}

pub(crate) fn encode(leaf: &Leaf, data: &mut Vec<u8>) -> Result<()> {
    let Leaf::Index(index) = leaf else {
        return Err(malformed_error!("LF_INDEX codec invoked on {:?}", leaf));
    };

    write_le_vec(data, 0_u16);
    write_index_lazy(data, &index.referenced);
    Ok(())
}
