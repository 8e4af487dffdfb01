//! Process-wide dispatch registry from `(stream space, kind)` to variant codecs.
//!
//! The association from numeric kind tag to payload codec is an explicit
//! registry: a read-only mapping built
//! once at startup from every registered variant's decode/encode pair, shared
//! by all sessions and never rebuilt. Adding a record kind means adding its
//! module and one registration line — no central decode loop changes.

use std::{collections::HashMap, sync::OnceLock};

use crate::{
    codec::{CodecContext, StreamSpace},
    leaves::{self, LeafKind},
    symbols::{self, SymbolKind},
    Result,
};

/// Decode/encode function pair for one leaf kind.
pub(crate) struct LeafCodec {
    /// Decodes the record's payload, bounded to exactly the payload slice.
    pub decode: fn(&CodecContext, &[u8]) -> Result<leaves::Leaf>,
    /// Appends the record's payload bytes; the header is written by the caller.
    pub encode: fn(&leaves::Leaf, &mut Vec<u8>) -> Result<()>,
}

/// Decode/encode function pair for one symbol kind.
pub(crate) struct SymbolCodec {
    /// Decodes the record's payload, bounded to exactly the payload slice.
    pub decode: fn(&CodecContext, &[u8]) -> Result<symbols::Symbol>,
    /// Appends the record's payload bytes; the header is written by the caller.
    pub encode: fn(&symbols::Symbol, &mut Vec<u8>) -> Result<()>,
}

struct RecordRegistry {
    leaves: HashMap<u16, LeafCodec>,
    symbols: HashMap<u32, SymbolCodec>,
}

fn build() -> RecordRegistry {
    let mut leaf_map: HashMap<u16, LeafCodec> = HashMap::new();
    leaf_map.insert(
        LeafKind::ArgList as u16,
        LeafCodec {
            decode: leaves::arglist::decode,
            encode: leaves::arglist::encode,
        },
    );
    leaf_map.insert(
        LeafKind::Long as u16,
        LeafCodec {
            decode: leaves::long::decode,
            encode: leaves::long::encode,
        },
    );
    leaf_map.insert(
        LeafKind::Index as u16,
        LeafCodec {
            decode: leaves::index::decode,
            encode: leaves::index::encode,
        },
    );
    leaf_map.insert(
        LeafKind::StaticMember as u16,
        LeafCodec {
            decode: leaves::stmember::decode,
            encode: leaves::stmember::encode,
        },
    );

    let mut symbol_map: HashMap<u32, SymbolCodec> = HashMap::new();
    symbol_map.insert(
        SymbolKind::End as u32,
        SymbolCodec {
            decode: symbols::end::decode,
            encode: symbols::end::encode,
        },
    );
    symbol_map.insert(
        SymbolKind::Register as u32,
        SymbolCodec {
            decode: symbols::register::decode,
            encode: symbols::register::encode,
        },
    );
    symbol_map.insert(
        SymbolKind::Constant as u32,
        SymbolCodec {
            decode: symbols::constant::decode,
            encode: symbols::constant::encode,
        },
    );
    symbol_map.insert(
        SymbolKind::AttrRegister as u32,
        SymbolCodec {
            decode: symbols::attr_register::decode,
            encode: symbols::attr_register::encode,
        },
    );
    symbol_map.insert(
        SymbolKind::Local as u32,
        SymbolCodec {
            decode: symbols::local::decode,
            encode: symbols::local::encode,
        },
    );
    symbol_map.insert(
        SymbolKind::Callees as u32,
        SymbolCodec {
            decode: symbols::callees::decode,
            encode: symbols::callees::encode,
        },
    );

    RecordRegistry {
        leaves: leaf_map,
        symbols: symbol_map,
    }
}

fn registry() -> &'static RecordRegistry {
    static REGISTRY: OnceLock<RecordRegistry> = OnceLock::new();
    REGISTRY.get_or_init(build)
}

/// Looks up the codec for a leaf kind.
pub(crate) fn leaf_codec(kind: u16) -> Option<&'static LeafCodec> {
    registry().leaves.get(&kind)
}

/// Looks up the codec for a symbol kind.
pub(crate) fn symbol_codec(kind: u32) -> Option<&'static SymbolCodec> {
    registry().symbols.get(&kind)
}

/// Whether a codec is registered for `kind` in `space`.
///
/// Lets consumers distinguish skippable records up front instead of catching
/// [`crate::Error::UnsupportedVariant`].
#[must_use]
pub fn is_registered(space: StreamSpace, kind: u32) -> bool {
    match space {
        StreamSpace::Leaf => {
            u16::try_from(kind).is_ok_and(|kind| registry().leaves.contains_key(&kind))
        }
        StreamSpace::Symbol => registry().symbols.contains_key(&kind),
    }
}
