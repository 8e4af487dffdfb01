//! Byte-level access for PDB stream parsing.
//!
//! This module holds the two lowest layers of the crate: the bounds-checked
//! little-endian primitives in [`io`] that every record codec is built on, and
//! the [`provider::StreamProvider`] contract through which the underlying
//! multi-stream container hands out its numbered byte streams.

pub mod io;
pub mod provider;
