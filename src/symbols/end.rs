//! `S_END` — the scope terminator.

use crate::{codec::CodecContext, symbols::Symbol, Result};

/// Closes the innermost open scope.
///
/// Zero-length payload: the header is the whole record. Which records the
/// scope contained is determined purely by stream order; pairing begin/end
/// markers is a consumer concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeEnd;

impl ScopeEnd {
    /// One-line description.
    #[must_use]
    pub fn describe(&self) -> String {
        "S_END".to_string()
    }
}

pub(crate) fn decode(_ctx: &CodecContext, _data: &[u8]) -> Result<Symbol> {
    Ok(Symbol::End(ScopeEnd))
}

pub(crate) fn encode(symbol: &Symbol, _data: &mut Vec<u8>) -> Result<()> {
    let Symbol::End(_) = symbol else {
        return Err(malformed_error!("S_END codec invoked on {:?}", symbol));
    };
    Ok(())
}
