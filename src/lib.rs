// Copyright 2025 the pdbscope authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # pdbscope
//!
//! A codec and lazy type-resolution engine for Microsoft program database
//! (PDB) debug information, built in pure Rust. `pdbscope` decodes and
//! encodes the tagged variable-length records that make up PDB type and
//! symbol streams, resolves cross-record type references on demand, and
//! exposes the DBI stream's module table with per-module symbol access.
//!
//! ## Features
//!
//! - **Tagged record codec** - Length-prefixed leaf and symbol records with
//!   4-byte alignment padding, round-trip safe
//! - **Lazy type resolution** - Type indices resolve to decoded records on
//!   first access, memoized per session and safe under cyclic references
//! - **Module table access** - DBI header validation and lazily bound
//!   per-module symbol streams
//! - **Concurrent by construction** - Resolution caches are lock-free maps;
//!   a session can be shared across threads
//! - **Tolerant enumeration** - Unknown record kinds are surfaced as
//!   recoverable errors and skipped, never aborting a stream walk
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdbscope::prelude::*;
//!
//! # fn example(streams: Vec<Vec<u8>>) -> pdbscope::Result<()> {
//! let pdb = Pdb::open(Box::new(VecStreamProvider::new(streams)))?;
//!
//! // Walk every decodable type record.
//! for record in pdb.types().records() {
//!     if let Ok(record) = record {
//!         println!("{}", record.leaf().describe());
//!     }
//! }
//!
//! // Resolve one index lazily.
//! let handle = pdb.type_ref(TypeIndex(0x1000));
//! let record = handle.resolve()?;
//! println!("{:?}", record.leaf());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`codec`] | Record headers, registry dispatch, stream enumeration, encoding |
//! | [`typesystem`] | Type indices, primitives, the memoizing [`typesystem::TypeResolver`] |
//! | [`leaves`] | Decoded type-record payloads and their field attributes |
//! | [`symbols`] | Decoded symbol-record payloads |
//! | [`dbi`] | DBI header validation and the module table |
//! | [`module`] | Per-module symbol stream reading |
//! | [`file`] | Byte-level IO helpers and the stream container abstraction |

#[macro_use]
pub(crate) mod error;

/// Byte-level IO helpers and the stream container abstraction.
///
/// [`file::io`] holds the little-endian read/write primitives every codec
/// builds on; [`file::provider`] defines [`file::provider::StreamProvider`],
/// the seam between record decoding and whatever container holds the
/// numbered streams.
pub mod file;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use pdbscope::prelude::*;
///
/// # fn example(streams: Vec<Vec<u8>>) -> pdbscope::Result<()> {
/// let pdb = Pdb::open(Box::new(VecStreamProvider::new(streams)))?;
/// let modules = pdb.dbi().modules()?;
/// # Ok(())
/// # }
/// ```
pub mod prelude;

/// Record headers, the codec registry, and stream enumeration.
///
/// Leaf and symbol records share one framing scheme, a little-endian length
/// prefix followed by a kind tag, differing only in the tag's width per
/// [`codec::StreamSpace`]. This module decodes and encodes that framing,
/// dispatches payloads through a process-wide registry of per-kind codecs,
/// and provides the tolerant record iterators used for whole-stream walks.
pub mod codec;

/// The DBI stream: header validation and the module table.
pub mod dbi;

/// Decoded type-record (leaf) payloads.
///
/// Each supported leaf kind gets a payload struct with its exact wire
/// fields, collected under the [`leaves::Leaf`] enum. Numeric sub-leaves
/// and member field attributes live here too.
pub mod leaves;

/// Per-module symbol stream reading.
pub mod module;

/// Decoded symbol-record payloads, collected under [`symbols::Symbol`].
pub mod symbols;

/// The top-level [`session::Pdb`] session.
pub mod session;

/// Type indices, primitive types, and lazy resolution.
///
/// The heart of the crate: [`typesystem::TypeResolver`] turns a raw type
/// stream into a cycle-safe, memoizing index-to-record map, and
/// [`typesystem::LazyTypeRef`] is the deferred handle the codecs embed
/// wherever a record references another type.
pub mod typesystem;

/// `pdbscope` Result type used throughout the crate.
///
/// # Examples
///
/// ```rust,no_run
/// use pdbscope::{Pdb, Result, file::provider::VecStreamProvider};
///
/// fn load(streams: Vec<Vec<u8>>) -> Result<Pdb> {
///     Pdb::open(Box::new(VecStreamProvider::new(streams)))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `pdbscope` Error type covering every failure this library can report.
pub use error::Error;
pub use session::{Pdb, STREAM_DBI, STREAM_TPI};
