//! Ordered symbol decoding for one compile unit's stream.

use std::sync::Arc;

use crate::{
    codec::{decode_all_symbols, CodecContext, SymbolObserver, SymbolRecords},
    typesystem::TypeResolver,
};

/// Decodes the ordered symbol records of one module's stream.
///
/// The reader owns the module's raw bytes (obtained externally through
/// [`crate::file::provider::StreamProvider::stream`]) and iterates them with
/// the record codec in the symbol tag space. Records are yielded strictly in
/// file order; order matters to consumers ([`crate::symbols::ScopeEnd`]
/// markers delimit the records before them) but no begin/end pairing is
/// validated here.
///
/// # Examples
///
/// ```rust
/// use pdbscope::{codec::encode_symbol, module::ModuleSymbolReader, symbols::{ScopeEnd, Symbol}};
/// use pdbscope::typesystem::TypeResolver;
///
/// let resolver = TypeResolver::new(Vec::new())?;
/// let stream = encode_symbol(&Symbol::End(ScopeEnd))?;
///
/// let reader = ModuleSymbolReader::new(stream, &resolver);
/// let symbols: Vec<_> = reader.symbols().collect::<pdbscope::Result<_>>()?;
/// assert_eq!(symbols.len(), 1);
/// # Ok::<(), pdbscope::Error>(())
/// ```
pub struct ModuleSymbolReader {
    /// The module stream's raw bytes.
    data: Vec<u8>,
    /// Decode context carrying the session's resolver.
    ctx: CodecContext,
    /// Diagnostic callback invoked with each record's raw bytes before parsing.
    observer: Option<Box<SymbolObserver<'static>>>,
}

impl ModuleSymbolReader {
    /// Creates a reader over one module's stream bytes, bound to the session's
    /// type resolver so symbol records can capture lazy type references.
    #[must_use]
    pub fn new(data: Vec<u8>, resolver: &Arc<TypeResolver>) -> Self {
        ModuleSymbolReader {
            data,
            ctx: resolver.context(),
            observer: None,
        }
    }

    /// Attaches a diagnostic observer.
    ///
    /// The callback receives each record's kind tag and raw payload before
    /// parsing, synchronously. It is purely for tracing and can alter neither
    /// resolution nor control flow.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<SymbolObserver<'static>>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The raw byte size of the module stream.
    #[must_use]
    pub fn raw_len(&self) -> usize {
        self.data.len()
    }

    /// Iterates the module's symbol records in file order.
    ///
    /// Lazy and forward-only; restartable only by calling `symbols()` again.
    /// Unregistered kinds are yielded as recoverable errors and skipped via
    /// their declared length.
    #[must_use]
    pub fn symbols(&self) -> SymbolRecords<'_> {
        let records = decode_all_symbols(self.ctx.clone(), &self.data);
        match &self.observer {
            Some(observer) => records.with_observer(observer.as_ref()),
            None => records,
        }
    }
}
