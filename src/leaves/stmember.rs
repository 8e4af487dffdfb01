//! `LF_STMEMBER` — a static data member of a structure.

use crate::{
    codec::{write_index_lazy, CodecContext},
    file::io::{read_cstring_at, read_le_at, write_cstring_vec, write_le_vec},
    leaves::{FieldAttributes, Leaf},
    typesystem::LazyTypeRef,
    Result,
};

/// A named static member with attributes and a member type.
///
/// Wire layout: `u16` attribute bitfield, one `u32` type index, a
/// null-terminated name. The encoder pads the enclosing record to the next
/// 4-byte boundary; the trailing pad bytes after the name are not part of the
/// member and are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMember {
    /// Access level and property flags.
    pub attributes: FieldAttributes,
    /// The member's type.
    pub member_type: LazyTypeRef,
    /// The member's name.
    pub name: String,
}

impl StaticMember {
    /// One-line description, member type unresolved.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "LF_STMEMBER[{} {} : {}]",
            self.attributes.access(),
            self.name,
            self.member_type.index()
        )
    }
}

pub(crate) fn decode(ctx: &CodecContext, data: &[u8]) -> Result<Leaf> {
    let mut offset = 0;

    Ok(Leaf::StaticMember(StaticMember {
        attributes: FieldAttributes::new(read_le_at::<u16>(data, &mut offset)?),
        member_type: ctx.read_index_lazy(data, &mut offset)?,
        name: read_cstring_at(data, &mut offset)?,
    }))
}

pub(crate) fn encode(leaf: &Leaf, data: &mut Vec<u8>) -> Result<()> {
    let Leaf::StaticMember(member) = leaf else {
        return Err(malformed_error!("LF_STMEMBER codec invoked on {:?}", leaf));
    };

    write_le_vec(data, member.attributes.raw());
    write_index_lazy(data, &member.member_type);
    write_cstring_vec(data, &member.name);
    Ok(())
}
