//! `LF_LONG` — a signed 32-bit scalar record.

use crate::{
    codec::CodecContext,
    file::io::{read_le, write_le_vec},
    leaves::Leaf,
    Result,
};

/// A signed 32-bit value embedded with no extra sub-header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Long {
    /// The scalar value.
    pub value: i32,
}

impl Long {
    /// One-line description.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("LF_LONG[{}]", self.value)
    }
}

pub(crate) fn decode(_ctx: &CodecContext, data: &[u8]) -> Result<Leaf> {
    Ok(Leaf::Long(Long {
        value: read_le::<i32>(data)?,
    }))
}

pub(crate) fn encode(leaf: &Leaf, data: &mut Vec<u8>) -> Result<()> {
    let Leaf::Long(long) = leaf else {
        return Err(malformed_error!("LF_LONG codec invoked on {:?}", leaf));
    };

    write_le_vec(data, long.value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        let data = [0x2A, 0x00, 0x00, 0x00];

        let ctx = CodecContext::detached();
        let Leaf::Long(long) = decode(&ctx, &data).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(long.value, 42);
    }

    #[test]
    fn negative_roundtrip() {
        let original = Leaf::Long(Long { value: -123_456 });

        let mut payload = Vec::new();
        encode(&original, &mut payload).unwrap();
        assert_eq!(payload.len(), 4);

        let ctx = CodecContext::detached();
        assert_eq!(decode(&ctx, &payload).unwrap(), original);
    }

    #[test]
    fn truncated() {
        let ctx = CodecContext::detached();
        assert!(matches!(
            decode(&ctx, &[0x2A, 0x00]),
            Err(crate::Error::OutOfBounds)
        ));
    }
}
