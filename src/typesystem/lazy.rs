//! Deferred cross-record type references.

use std::sync::Weak;

use crate::{
    typesystem::{TypeIndex, TypeRc, TypeResolver},
    Error::SessionClosed,
    Result,
};

/// A type reference captured at decode time and resolved on demand.
///
/// Decoding a record that references another type reads only the 4-byte index
/// and binds it to the active resolver; no stream access happens until
/// [`LazyTypeRef::resolve`] is called. This deferral is what makes cyclic and
/// forward references safe: a record mid-decode hands out `LazyTypeRef`s
/// instead of recursing into the records they point at.
///
/// Equality compares the index only — two references to the same index are
/// interchangeable, and resolving them through the same resolver yields the
/// identical decoded instance.
#[derive(Clone)]
pub struct LazyTypeRef {
    resolver: Weak<TypeResolver>,
    index: TypeIndex,
}

impl LazyTypeRef {
    pub(crate) fn new(resolver: Weak<TypeResolver>, index: TypeIndex) -> Self {
        LazyTypeRef { resolver, index }
    }

    /// Creates a reference that is not bound to any resolver.
    ///
    /// Useful for building records programmatically for encoding; the index is
    /// all that reaches the wire. Calling [`LazyTypeRef::resolve`] on a detached
    /// reference fails with [`crate::Error::SessionClosed`].
    #[must_use]
    pub fn detached(index: TypeIndex) -> Self {
        LazyTypeRef {
            resolver: Weak::new(),
            index,
        }
    }

    /// The referenced type index.
    #[must_use]
    pub fn index(&self) -> TypeIndex {
        self.index
    }

    /// Resolves the reference through its owning resolver.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SessionClosed`] if the owning resolver has been
    /// dropped, or any error the resolver reports for this index.
    pub fn resolve(&self) -> Result<TypeRc> {
        let Some(resolver) = self.resolver.upgrade() else {
            return Err(SessionClosed);
        };
        resolver.resolve(self.index)
    }
}

impl PartialEq for LazyTypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for LazyTypeRef {}

impl std::fmt::Debug for LazyTypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LazyTypeRef({})", self.index)
    }
}
