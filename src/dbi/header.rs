//! The DBI stream's fixed-layout header.

use bitflags::bitflags;
use strum::{Display, FromRepr};

use crate::{
    file::io::{read_le_at, write_le_vec},
    Result,
};

/// Expected value of the header's signature field.
pub const DBI_SIGNATURE: u32 = 0xFFFF_FFFF;

/// Byte size of the fixed header preceding the variable-length substreams.
pub const DBI_HEADER_SIZE: usize = 64;

/// Known DBI stream versions.
///
/// A closed set of magic constants; a header carrying anything else is
/// rejected during construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, Display)]
#[repr(u32)]
pub enum DbiVersion {
    /// VC 4.1
    V41 = 930_803,
    /// VC 5.0
    V50 = 19_960_307,
    /// VC 6.0
    V60 = 19_970_606,
    /// VC 7.0
    V70 = 19_990_903,
    /// VC 11.0
    V110 = 20_091_201,
}

bitflags! {
    /// Build properties recorded in the header's flag word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DbiFlags: u16 {
        /// Linked incrementally.
        const INCREMENTAL_LINK = 0x0001;
        /// Private symbols were stripped.
        const STRIPPED = 0x0002;
        /// Carries conflicting types (/DEBUG:CTYPES).
        const HAS_CTYPES = 0x0004;
    }
}

/// The DBI stream's 64-byte fixed header.
///
/// Field order and widths reproduce the published layout exactly;
/// [`DbiHeader::write`] re-serializes byte-identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbiHeader {
    /// Always [`DBI_SIGNATURE`].
    pub signature: u32,
    /// Stream version, one of the known constants.
    pub version: DbiVersion,
    /// Incremented on each rebuild.
    pub age: u32,
    /// Stream holding the global symbol hash.
    pub gs_symbols_stream: u16,
    /// Toolchain build version.
    pub internal_version: u16,
    /// Stream holding the public symbol hash.
    pub ps_symbols_stream: u16,
    /// Version of the producing mspdb DLL.
    pub pdb_dll_version: u16,
    /// Stream holding the symbol records.
    pub symbol_records_stream: u16,
    /// Rbld version of the producing DLL.
    pub rbld_version: u16,
    /// Byte size of the module list substream.
    pub module_list_size: u32,
    /// Byte size of the section contribution substream.
    pub section_contribution_size: u32,
    /// Byte size of the section map substream.
    pub section_map_size: u32,
    /// Byte size of the file info substream.
    pub file_info_size: u32,
    /// Byte size of the type server map substream.
    pub type_server_map_size: u32,
    /// Index of the type server in the type server map.
    pub type_server_index: u32,
    /// Byte size of the optional debug header substream.
    pub debug_header_size: u32,
    /// Byte size of the EC substream.
    pub ec_substream_size: u32,
    /// Build property flags.
    pub flags: DbiFlags,
    /// Target machine, a CV_CPU constant.
    pub machine_type: u16,
    /// Reserved, preserved verbatim.
    pub reserved: u32,
}

impl DbiHeader {
    /// Reads and validates the fixed header at `offset`, advancing past it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] for a wrong signature or an unknown
    /// version constant, [`crate::Error::OutOfBounds`] on truncation.
    pub fn read(data: &[u8], offset: &mut usize) -> Result<Self> {
        let signature = read_le_at::<u32>(data, offset)?;
        if signature != DBI_SIGNATURE {
            return Err(malformed_error!(
                "DBI signature {:#010x} is not {:#010x}",
                signature,
                DBI_SIGNATURE
            ));
        }

        let raw_version = read_le_at::<u32>(data, offset)?;
        let Some(version) = DbiVersion::from_repr(raw_version) else {
            return Err(malformed_error!(
                "Unknown DBI version constant {}",
                raw_version
            ));
        };

        Ok(DbiHeader {
            signature,
            version,
            age: read_le_at::<u32>(data, offset)?,
            gs_symbols_stream: read_le_at::<u16>(data, offset)?,
            internal_version: read_le_at::<u16>(data, offset)?,
            ps_symbols_stream: read_le_at::<u16>(data, offset)?,
            pdb_dll_version: read_le_at::<u16>(data, offset)?,
            symbol_records_stream: read_le_at::<u16>(data, offset)?,
            rbld_version: read_le_at::<u16>(data, offset)?,
            module_list_size: read_le_at::<u32>(data, offset)?,
            section_contribution_size: read_le_at::<u32>(data, offset)?,
            section_map_size: read_le_at::<u32>(data, offset)?,
            file_info_size: read_le_at::<u32>(data, offset)?,
            type_server_map_size: read_le_at::<u32>(data, offset)?,
            type_server_index: read_le_at::<u32>(data, offset)?,
            debug_header_size: read_le_at::<u32>(data, offset)?,
            ec_substream_size: read_le_at::<u32>(data, offset)?,
            flags: DbiFlags::from_bits_truncate(read_le_at::<u16>(data, offset)?),
            machine_type: read_le_at::<u16>(data, offset)?,
            reserved: read_le_at::<u32>(data, offset)?,
        })
    }

    /// Appends the header in its exact 64-byte wire layout.
    pub fn write(&self, data: &mut Vec<u8>) {
        write_le_vec(data, self.signature);
        write_le_vec(data, self.version as u32);
        write_le_vec(data, self.age);
        write_le_vec(data, self.gs_symbols_stream);
        write_le_vec(data, self.internal_version);
        write_le_vec(data, self.ps_symbols_stream);
        write_le_vec(data, self.pdb_dll_version);
        write_le_vec(data, self.symbol_records_stream);
        write_le_vec(data, self.rbld_version);
        write_le_vec(data, self.module_list_size);
        write_le_vec(data, self.section_contribution_size);
        write_le_vec(data, self.section_map_size);
        write_le_vec(data, self.file_info_size);
        write_le_vec(data, self.type_server_map_size);
        write_le_vec(data, self.type_server_index);
        write_le_vec(data, self.debug_header_size);
        write_le_vec(data, self.ec_substream_size);
        write_le_vec(data, self.flags.bits());
        write_le_vec(data, self.machine_type);
        write_le_vec(data, self.reserved);
    }
}
