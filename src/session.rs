//! The top-level session tying streams, types, and modules together.
//!
//! A [`Pdb`] owns a [`StreamProvider`] and builds the two well-known stream
//! views on top of it: the type stream ([`TypeResolver`], stream 2) and the
//! DBI stream ([`DbiReader`], stream 3). Both well-known streams are
//! validated eagerly at open time; individual type records and per-module
//! symbol streams stay untouched until first use.

use std::sync::Arc;

use crate::{
    dbi::{DbiReader, Module},
    file::provider::StreamProvider,
    module::ModuleSymbolReader,
    typesystem::{LazyTypeRef, TypeIndex, TypeResolver},
    Result,
};

/// Well-known stream number of the type (TPI) stream.
pub const STREAM_TPI: u32 = 2;
/// Well-known stream number of the DBI stream.
pub const STREAM_DBI: u32 = 3;

/// An open debug-information session.
///
/// # Examples
///
/// ```rust,no_run
/// use pdbscope::{Pdb, file::provider::VecStreamProvider};
///
/// # fn example(streams: Vec<Vec<u8>>) -> pdbscope::Result<()> {
/// let pdb = Pdb::open(Box::new(VecStreamProvider::new(streams)))?;
/// println!("{} type records", pdb.types().record_count());
/// for module in pdb.dbi().modules()? {
///     println!("{}", module.info().module_name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pdb {
    provider: Box<dyn StreamProvider>,
    types: Arc<TypeResolver>,
    dbi: DbiReader,
}

impl Pdb {
    /// Opens a session over the given stream container.
    ///
    /// The type stream header table is scanned and the DBI header validated
    /// up front; everything else is deferred.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StreamNotFound`] if the container lacks the
    /// TPI or DBI stream, or a format error if either is structurally
    /// invalid.
    pub fn open(provider: Box<dyn StreamProvider>) -> Result<Self> {
        let types = TypeResolver::new(provider.stream(STREAM_TPI)?.to_vec())?;
        let dbi = DbiReader::parse(provider.num_streams(), provider.stream(STREAM_DBI)?)?;

        Ok(Pdb {
            provider,
            types,
            dbi,
        })
    }

    /// The session's type resolver.
    #[must_use]
    pub fn types(&self) -> &Arc<TypeResolver> {
        &self.types
    }

    /// The validated DBI stream view.
    #[must_use]
    pub fn dbi(&self) -> &DbiReader {
        &self.dbi
    }

    /// Creates a lazy handle for `index`, bound to this session's resolver.
    #[must_use]
    pub fn type_ref(&self, index: TypeIndex) -> LazyTypeRef {
        self.types.lazy_ref(index)
    }

    /// Binds `module` to its symbol stream, loading it on first call.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StreamNotFound`] if the module's symbol
    /// stream number is absent from the container.
    pub fn module_symbols<'a>(&self, module: &'a Module) -> Result<&'a ModuleSymbolReader> {
        module.symbol_reader(self.provider.as_ref(), &self.types)
    }
}

impl std::fmt::Debug for Pdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdb")
            .field("streams", &self.provider.num_streams())
            .field("type_records", &self.types.record_count())
            .finish()
    }
}
