//! `S_MANREGISTER` — an enregistered variable with liveness attributes.

use crate::{
    codec::{write_index_lazy, CodecContext},
    file::io::{read_cstring_at, read_le_at, write_cstring_vec, write_le_vec},
    symbols::{LocalVarAttributes, Symbol},
    typesystem::LazyTypeRef,
    Result,
};

/// A named enregistered variable carrying a [`LocalVarAttributes`] block.
///
/// Wire layout: one `u32` type index, the 8-byte attribute block, `u16`
/// register id, a null-terminated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrRegister {
    /// The variable's type.
    pub value_type: LazyTypeRef,
    /// Where the variable becomes live, and its storage flags.
    pub attributes: LocalVarAttributes,
    /// Machine-specific register id.
    pub register: u16,
    /// The variable's name.
    pub name: String,
}

impl AttrRegister {
    /// One-line description, type unresolved.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "S_MANREGISTER[{} in reg {} from {:04x}:{:08x}]",
            self.name, self.register, self.attributes.segment, self.attributes.offset
        )
    }
}

pub(crate) fn decode(ctx: &CodecContext, data: &[u8]) -> Result<Symbol> {
    let mut offset = 0;

    Ok(Symbol::AttrRegister(AttrRegister {
        value_type: ctx.read_index_lazy(data, &mut offset)?,
        attributes: LocalVarAttributes::read_at(data, &mut offset)?,
        register: read_le_at::<u16>(data, &mut offset)?,
        name: read_cstring_at(data, &mut offset)?,
    }))
}

pub(crate) fn encode(symbol: &Symbol, data: &mut Vec<u8>) -> Result<()> {
    let Symbol::AttrRegister(register) = symbol else {
        return Err(malformed_error!(
            "S_MANREGISTER codec invoked on {:?}",
            symbol
        ));
    };

    write_index_lazy(data, &register.value_type);
    register.attributes.write_vec(data);
    write_le_vec(data, register.register);
    write_cstring_vec(data, &register.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{symbols::LocalVarFlags, typesystem::TypeIndex};

    #[test]
    fn crafted() {
        let data = [
            0x75, 0x00, 0x00, 0x00, // T_UINT4
            0x2C, 0x01, 0x00, 0x00, // live from offset 0x12c
            0x01, 0x00, // segment 1
            0x01, 0x00, // flags: parameter
            0x11, 0x00, // register 17
            b'n', 0x00, // name
        ];

        let ctx = CodecContext::detached();
        let Symbol::AttrRegister(register) = decode(&ctx, &data).unwrap() else {
            panic!("wrong variant");
        };

        assert_eq!(register.value_type.index(), TypeIndex::new(0x0075));
        assert_eq!(register.attributes.offset, 0x12C);
        assert_eq!(register.attributes.segment, 1);
        assert_eq!(register.attributes.flags, LocalVarFlags::IS_PARAM);
        assert_eq!(register.register, 17);
        assert_eq!(register.name, "n");
    }

    #[test]
    fn roundtrip() {
        let original = Symbol::AttrRegister(AttrRegister {
            value_type: LazyTypeRef::detached(TypeIndex::new(0x1002)),
            attributes: LocalVarAttributes {
                offset: 0x40,
                segment: 3,
                flags: LocalVarFlags::IS_RETVALUE,
            },
            register: 335,
            name: "ret".to_string(),
        });

        let mut payload = Vec::new();
        encode(&original, &mut payload).unwrap();

        let ctx = CodecContext::detached();
        assert_eq!(decode(&ctx, &payload).unwrap(), original);
    }

    #[test]
    fn truncated_attribute_block_is_rejected() {
        // Ends mid-attributes, before the segment word.
        let data = [0x75, 0x00, 0x00, 0x00, 0x2C, 0x01, 0x00, 0x00, 0x01];

        let ctx = CodecContext::detached();
        assert!(decode(&ctx, &data).is_err());
    }
}
