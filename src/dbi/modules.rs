//! The module list substream: one entry per compile unit.

use std::sync::{Arc, OnceLock};

use crate::{
    file::io::{read_cstring_at, read_le_at},
    file::provider::StreamProvider,
    module::ModuleSymbolReader,
    typesystem::TypeResolver,
    Result,
};

/// A module's primary contribution to an executable section.
///
/// Wire layout (28 bytes): `u16` section index, 2 pad bytes, `u32` offset,
/// `u32` size, `u32` characteristics, `u16` module index, 2 pad bytes,
/// `u32` data CRC, `u32` relocation CRC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionContribution {
    /// Executable section index.
    pub section: u16,
    /// Byte offset of the contribution within the section.
    pub offset: u32,
    /// Byte size of the contribution.
    pub size: u32,
    /// COFF section characteristics.
    pub characteristics: u32,
    /// Index of the contributing module.
    pub module: u16,
    /// CRC of the contribution's data.
    pub data_crc: u32,
    /// CRC of the contribution's relocations.
    pub reloc_crc: u32,
}

impl SectionContribution {
    fn read_at(data: &[u8], offset: &mut usize) -> Result<Self> {
        let section = read_le_at::<u16>(data, offset)?;
        let _pad = read_le_at::<u16>(data, offset)?;
        let contribution_offset = read_le_at::<u32>(data, offset)?;
        let size = read_le_at::<u32>(data, offset)?;
        let characteristics = read_le_at::<u32>(data, offset)?;
        let module = read_le_at::<u16>(data, offset)?;
        let _pad = read_le_at::<u16>(data, offset)?;

        Ok(SectionContribution {
            section,
            offset: contribution_offset,
            size,
            characteristics,
            module,
            data_crc: read_le_at::<u32>(data, offset)?,
            reloc_crc: read_le_at::<u32>(data, offset)?,
        })
    }
}

/// One compile unit's entry in the module list.
///
/// The fixed 64-byte part is followed by two null-terminated names (module
/// name and object file name) and padding to the next 4-byte boundary. The
/// source and compiler names are carried as indices into the names stream;
/// resolving them is a container concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Nonzero while the module is open in the producer; preserved verbatim.
    pub opened: u32,
    /// The module's primary section contribution.
    pub section: SectionContribution,
    /// Module property flags, preserved verbatim.
    pub flags: u16,
    /// Stream number holding this module's symbol records.
    pub stream_number: u16,
    /// Byte size of the symbol substream within the module stream.
    pub symbols_size: u32,
    /// Byte size of the old line-number substream.
    pub old_lines_size: u32,
    /// Byte size of the line-number substream.
    pub lines_size: u32,
    /// Number of contributing source files.
    pub file_count: u16,
    /// Offset into the file info substream's name-offset table.
    pub file_name_offsets: u32,
    /// Names-stream index of the source file name.
    pub ni_source: u32,
    /// Names-stream index of the compiler name.
    pub ni_compiler: u32,
    /// The module's name (usually the object path as compiled).
    pub module_name: String,
    /// The object file name (the archive for members, else the module name).
    pub object_file_name: String,
}

impl ModuleInfo {
    fn read_at(data: &[u8], offset: &mut usize) -> Result<Self> {
        let opened = read_le_at::<u32>(data, offset)?;
        let section = SectionContribution::read_at(data, offset)?;
        let flags = read_le_at::<u16>(data, offset)?;
        let stream_number = read_le_at::<u16>(data, offset)?;
        let symbols_size = read_le_at::<u32>(data, offset)?;
        let old_lines_size = read_le_at::<u32>(data, offset)?;
        let lines_size = read_le_at::<u32>(data, offset)?;
        let file_count = read_le_at::<u16>(data, offset)?;
        let _pad = read_le_at::<u16>(data, offset)?;
        let file_name_offsets = read_le_at::<u32>(data, offset)?;
        let ni_source = read_le_at::<u32>(data, offset)?;
        let ni_compiler = read_le_at::<u32>(data, offset)?;

        let module_name = read_cstring_at(data, offset)?;
        let object_file_name = read_cstring_at(data, offset)?;

        // Entries are padded to the next 4-byte boundary within the substream.
        *offset = ((*offset + 3) & !3).min(data.len());

        Ok(ModuleInfo {
            opened,
            section,
            flags,
            stream_number,
            symbols_size,
            old_lines_size,
            lines_size,
            file_count,
            file_name_offsets,
            ni_source,
            ni_compiler,
            module_name,
            object_file_name,
        })
    }
}

/// Decodes the whole module list substream.
pub(crate) fn decode_module_list(data: &[u8]) -> Result<Vec<ModuleInfo>> {
    let mut modules = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        modules.push(ModuleInfo::read_at(data, &mut offset)?);
    }
    Ok(modules)
}

/// One compile unit: its [`ModuleInfo`] plus a lazily bound symbol reader.
///
/// The reader is created on first access — fetching the module's stream and
/// binding it to the session's resolver — and cached for the session's
/// lifetime.
pub struct Module {
    info: ModuleInfo,
    reader: OnceLock<ModuleSymbolReader>,
}

impl Module {
    pub(crate) fn new(info: ModuleInfo) -> Self {
        Module {
            info,
            reader: OnceLock::new(),
        }
    }

    /// The module's decoded list entry.
    #[must_use]
    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    /// The symbol reader over this module's stream, created on first call.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StreamNotFound`] if the module's assigned
    /// stream number is outside the container (including the 0xFFFF marker
    /// for modules without a symbol stream).
    pub fn symbol_reader(
        &self,
        provider: &dyn StreamProvider,
        resolver: &Arc<TypeResolver>,
    ) -> Result<&ModuleSymbolReader> {
        if let Some(reader) = self.reader.get() {
            return Ok(reader);
        }

        let data = provider.stream(u32::from(self.info.stream_number))?.to_vec();
        Ok(self
            .reader
            .get_or_init(|| ModuleSymbolReader::new(data, resolver)))
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.info.module_name)
            .field("stream", &self.info.stream_number)
            .field("bound", &self.reader.get().is_some())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::file::io::{write_cstring_vec, write_le_vec};

    pub(crate) fn encode_module_info(
        stream_number: u16,
        module_name: &str,
        object_file_name: &str,
    ) -> Vec<u8> {
        let mut data = Vec::new();
        write_le_vec(&mut data, 0_u32); // opened
        write_le_vec(&mut data, 1_u16); // section
        write_le_vec(&mut data, 0_u16); // pad
        write_le_vec(&mut data, 0x100_u32); // offset
        write_le_vec(&mut data, 0x40_u32); // size
        write_le_vec(&mut data, 0x6050_0020_u32); // characteristics
        write_le_vec(&mut data, 0_u16); // module index
        write_le_vec(&mut data, 0_u16); // pad
        write_le_vec(&mut data, 0_u32); // data crc
        write_le_vec(&mut data, 0_u32); // reloc crc
        write_le_vec(&mut data, 0_u16); // flags
        write_le_vec(&mut data, stream_number);
        write_le_vec(&mut data, 0x80_u32); // symbols size
        write_le_vec(&mut data, 0_u32); // old lines size
        write_le_vec(&mut data, 0_u32); // lines size
        write_le_vec(&mut data, 1_u16); // file count
        write_le_vec(&mut data, 0_u16); // pad
        write_le_vec(&mut data, 0_u32); // file name offsets
        write_le_vec(&mut data, 0_u32); // ni_source
        write_le_vec(&mut data, 0_u32); // ni_compiler
        write_cstring_vec(&mut data, module_name);
        write_cstring_vec(&mut data, object_file_name);
        while data.len() % 4 != 0 {
            data.push(0);
        }
        data
    }

    #[test]
    fn decode_two_entries() {
        let mut list = encode_module_info(9, "main.obj", "main.obj");
        list.extend(encode_module_info(10, "util.obj", "libutil.lib"));

        let modules = decode_module_list(&list).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].stream_number, 9);
        assert_eq!(modules[0].module_name, "main.obj");
        assert_eq!(modules[1].object_file_name, "libutil.lib");
        assert_eq!(modules[1].section.section, 1);
    }

    #[test]
    fn truncated_entry_fails() {
        let list = encode_module_info(9, "main.obj", "main.obj");
        let truncated = &list[..40];

        assert!(decode_module_list(truncated).is_err());
    }
}
