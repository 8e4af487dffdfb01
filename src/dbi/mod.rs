//! The DBI stream: header validation and the module table.
//!
//! The DBI stream opens with a fixed 64-byte header followed by a series of
//! variable-length substreams, the first of which is the module list. Header
//! validation is fail-fast: a bad signature, an unknown version constant, or
//! a symbol stream number outside the container aborts construction entirely —
//! a partially valid [`DbiReader`] is never produced, since later stream
//! lookups through it would read unrelated data.

pub mod header;
pub mod modules;

use std::sync::OnceLock;

pub use header::{DbiFlags, DbiHeader, DbiVersion, DBI_HEADER_SIZE, DBI_SIGNATURE};
pub use modules::{Module, ModuleInfo, SectionContribution};

use crate::Result;

/// Validated view over one DBI stream.
///
/// Construction validates the header against the externally reported stream
/// count; the module list is decoded lazily on first enumeration and cached
/// for the session's lifetime.
///
/// # Examples
///
/// ```rust,no_run
/// use pdbscope::{dbi::DbiReader, file::provider::{StreamProvider, VecStreamProvider}};
///
/// # fn example(provider: &VecStreamProvider) -> pdbscope::Result<()> {
/// let dbi = DbiReader::parse(provider.num_streams(), provider.stream(3)?)?;
/// for module in dbi.modules()? {
///     println!("{}", module.info().module_name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DbiReader {
    header: DbiHeader,
    /// Raw bytes of the module list substream.
    module_list: Vec<u8>,
    /// Decoded module table, populated on first enumeration.
    modules: OnceLock<Vec<Module>>,
}

impl DbiReader {
    /// Parses and validates a DBI stream.
    ///
    /// `num_streams` is the stream count reported by the container; the
    /// header's global symbol, public symbol, and symbol record stream
    /// numbers must all fall below it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] for a bad signature, an unknown
    /// version, an out-of-range stream number, or a module list size
    /// overrunning the stream.
    pub fn parse(num_streams: u32, data: &[u8]) -> Result<Self> {
        let mut offset = 0;
        let header = DbiHeader::read(data, &mut offset)?;

        for (name, number) in [
            ("GS symbols", header.gs_symbols_stream),
            ("PS symbols", header.ps_symbols_stream),
            ("symbol records", header.symbol_records_stream),
        ] {
            if u32::from(number) >= num_streams {
                return Err(malformed_error!(
                    "DBI {} stream number {} exceeds the container's {} streams",
                    name,
                    number,
                    num_streams
                ));
            }
        }

        let list_len = header.module_list_size as usize;
        let Some(module_list) = data.get(offset..offset + list_len) else {
            return Err(malformed_error!(
                "DBI module list of {} bytes overruns the stream",
                list_len
            ));
        };

        Ok(DbiReader {
            header,
            module_list: module_list.to_vec(),
            modules: OnceLock::new(),
        })
    }

    /// The validated header.
    #[must_use]
    pub fn header(&self) -> &DbiHeader {
        &self.header
    }

    /// The module table, decoded on first call and cached thereafter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] / [`crate::Error::OutOfBounds`] if
    /// the module list substream is structurally invalid.
    pub fn modules(&self) -> Result<&[Module]> {
        if let Some(modules) = self.modules.get() {
            return Ok(modules.as_slice());
        }

        let decoded: Vec<Module> = modules::decode_module_list(&self.module_list)?
            .into_iter()
            .map(Module::new)
            .collect();

        Ok(self.modules.get_or_init(|| decoded).as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbi::header::tests::sample_header;
    use crate::dbi::modules::tests::encode_module_info;

    fn dbi_stream(num_modules: usize) -> Vec<u8> {
        let entry = encode_module_info(4, "main.obj", "main.obj");
        let mut header = sample_header();
        header.module_list_size = (entry.len() * num_modules) as u32;

        let mut data = Vec::new();
        header.write(&mut data);
        for _ in 0..num_modules {
            data.extend_from_slice(&entry);
        }
        data
    }

    #[test]
    fn parse_validates_stream_bounds() {
        let data = dbi_stream(0);

        // sample_header uses streams 5..=7.
        assert!(DbiReader::parse(8, &data).is_ok());
        assert!(matches!(
            DbiReader::parse(7, &data),
            Err(crate::Error::Malformed { .. })
        ));
        assert!(matches!(
            DbiReader::parse(0, &data),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn parse_rejects_overrunning_module_list() {
        let mut data = dbi_stream(1);
        // Claim a bigger module list than the stream holds.
        let mut header = sample_header();
        header.module_list_size = 0x1000;
        let mut patched = Vec::new();
        header.write(&mut patched);
        data[..DBI_HEADER_SIZE].copy_from_slice(&patched);

        assert!(matches!(
            DbiReader::parse(8, &data),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn modules_are_decoded_lazily_and_cached() {
        let data = dbi_stream(2);
        let reader = DbiReader::parse(8, &data).unwrap();

        let first = reader.modules().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].info().module_name, "main.obj");

        let second = reader.modules().unwrap();
        assert_eq!(first.as_ptr(), second.as_ptr());
    }
}
