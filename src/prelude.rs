//! # pdbscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used
//! types and traits from the pdbscope library. Import this module to get
//! quick access to the essentials for PDB record decoding and type
//! resolution.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all pdbscope operations
pub use crate::Error;

/// The result type used throughout pdbscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Main entry point for an open debug-information session
pub use crate::Pdb;

/// Well-known stream numbers of the type and DBI streams
pub use crate::{STREAM_DBI, STREAM_TPI};

/// Stream container abstraction and its in-memory implementation
pub use crate::file::provider::{StreamProvider, VecStreamProvider};

// ================================================================================================
// Type System
// ================================================================================================

/// Type indices, primitives, and resolved record containers
pub use crate::typesystem::{PrimitiveKind, TypeContainer, TypeIndex, TypeRc, FIRST_NONPRIMITIVE};

/// Deferred cross-record type references and the session resolver
pub use crate::typesystem::{LazyTypeRef, TypeResolver};

// ================================================================================================
// Records and Codecs
// ================================================================================================

/// Record framing and stream enumeration
pub use crate::codec::{RecordHeader, StreamSpace, SymbolContainer};

/// Decoded type-record payloads
pub use crate::leaves::{Leaf, LeafKind, NumericLeaf};

/// Decoded symbol-record payloads
pub use crate::symbols::{Symbol, SymbolKind};

// ================================================================================================
// Modules and the DBI Stream
// ================================================================================================

/// DBI stream view, header, and module table entries
pub use crate::dbi::{DbiHeader, DbiReader, DbiVersion, Module, ModuleInfo};

/// Per-module symbol stream reading
pub use crate::module::ModuleSymbolReader;
