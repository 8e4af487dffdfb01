//! Integration tests for complete sessions over crafted stream containers.
//!
//! These tests assemble whole containers byte-by-byte (type stream, DBI
//! stream, module symbol streams) using the crate's own encoders, open them
//! through [`Pdb`], and exercise resolution, module enumeration, and the
//! tolerant stream walks end to end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pdbscope::{
    codec::{encode_leaf, encode_symbol},
    dbi::{DbiFlags, DbiHeader, DbiVersion, DBI_SIGNATURE},
    file::io::{write_cstring_vec, write_le_vec},
    leaves::{ArgList, Index, Leaf, NumericLeaf},
    prelude::*,
    symbols::{
        AttrRegister, Constant, Local, LocalVarAttributes, LocalVarFlags, ScopeEnd, Symbol,
    },
};

/// Stream number the crafted DBI points each module's symbols at.
const MODULE_STREAM: u32 = 4;

fn type_stream() -> Vec<u8> {
    // 0x1000: arg list referencing a primitive and the record after it.
    let mut stream = encode_leaf(&Leaf::ArgList(ArgList {
        entries: vec![
            LazyTypeRef::detached(TypeIndex::new(0x0075)),
            LazyTypeRef::detached(TypeIndex::new(0x1001)),
        ],
    }))
    .unwrap();

    // 0x1001: a plain value record.
    stream.extend(
        encode_leaf(&Leaf::Long(pdbscope::leaves::Long { value: 42 })).unwrap(),
    );
    stream
}

fn module_symbol_stream() -> Vec<u8> {
    let mut stream = encode_symbol(&Symbol::Constant(Constant {
        value_type: LazyTypeRef::detached(TypeIndex::new(0x0074)),
        value: NumericLeaf::Long(-7),
        name: "kAnswer".to_string(),
    }))
    .unwrap();
    stream.extend(
        encode_symbol(&Symbol::Local(Local {
            value_type: LazyTypeRef::detached(TypeIndex::new(0x1000)),
            flags: LocalVarFlags::IS_PARAM,
            name: "args".to_string(),
        }))
        .unwrap(),
    );
    stream.extend(
        encode_symbol(&Symbol::AttrRegister(AttrRegister {
            value_type: LazyTypeRef::detached(TypeIndex::new(0x1001)),
            attributes: LocalVarAttributes {
                offset: 0x40,
                segment: 1,
                flags: LocalVarFlags::IS_RETVALUE,
            },
            register: 17,
            name: "ret".to_string(),
        }))
        .unwrap(),
    );
    stream.extend(encode_symbol(&Symbol::End(ScopeEnd)).unwrap());
    stream
}

fn dbi_header(module_list_size: u32) -> DbiHeader {
    DbiHeader {
        signature: DBI_SIGNATURE,
        version: DbiVersion::V70,
        age: 1,
        gs_symbols_stream: 0,
        internal_version: 0,
        ps_symbols_stream: 0,
        pdb_dll_version: 0,
        symbol_records_stream: 0,
        rbld_version: 0,
        module_list_size,
        section_contribution_size: 0,
        section_map_size: 0,
        file_info_size: 0,
        type_server_map_size: 0,
        type_server_index: 0,
        debug_header_size: 0,
        ec_substream_size: 0,
        flags: DbiFlags::empty(),
        machine_type: 0x8664,
        reserved: 0,
    }
}

fn module_entry(stream_number: u16, symbols_size: u32, name: &str) -> Vec<u8> {
    let mut entry = Vec::new();
    write_le_vec(&mut entry, 0_u32); // opened
    write_le_vec(&mut entry, 1_u16); // section contribution: section
    write_le_vec(&mut entry, 0_u16); // pad
    write_le_vec(&mut entry, 0_u32); // offset
    write_le_vec(&mut entry, 0_u32); // size
    write_le_vec(&mut entry, 0_u32); // characteristics
    write_le_vec(&mut entry, 0_u16); // module index
    write_le_vec(&mut entry, 0_u16); // pad
    write_le_vec(&mut entry, 0_u32); // data crc
    write_le_vec(&mut entry, 0_u32); // reloc crc
    write_le_vec(&mut entry, 0_u16); // flags
    write_le_vec(&mut entry, stream_number);
    write_le_vec(&mut entry, symbols_size);
    write_le_vec(&mut entry, 0_u32); // old lines size
    write_le_vec(&mut entry, 0_u32); // lines size
    write_le_vec(&mut entry, 0_u16); // file count
    write_le_vec(&mut entry, 0_u16); // pad
    write_le_vec(&mut entry, 0_u32); // file name offsets
    write_le_vec(&mut entry, 0_u32); // ni_source
    write_le_vec(&mut entry, 0_u32); // ni_compiler
    write_cstring_vec(&mut entry, name);
    write_cstring_vec(&mut entry, name);
    while entry.len() % 4 != 0 {
        entry.push(0);
    }
    entry
}

fn dbi_stream(module_stream: u16, symbols_size: u32) -> Vec<u8> {
    let entry = module_entry(module_stream, symbols_size, "main.obj");
    let mut stream = Vec::new();
    dbi_header(entry.len() as u32).write(&mut stream);
    stream.extend(entry);
    stream
}

/// Streams 0 and 1 are placeholders; 2 is the type stream, 3 the DBI
/// stream, and 4 the single module's symbol stream.
fn container() -> Vec<Vec<u8>> {
    let symbols = module_symbol_stream();
    vec![
        Vec::new(),
        Vec::new(),
        type_stream(),
        dbi_stream(MODULE_STREAM as u16, symbols.len() as u32),
        symbols,
    ]
}

#[test]
fn open_session_end_to_end() -> Result<()> {
    let pdb = Pdb::open(Box::new(VecStreamProvider::new(container())))?;

    assert_eq!(pdb.types().record_count(), 2);
    assert_eq!(pdb.dbi().header().version, DbiVersion::V70);

    let modules = pdb.dbi().modules()?;
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].info().module_name, "main.obj");

    let reader = pdb.module_symbols(&modules[0])?;
    let symbols: Vec<_> = reader.symbols().collect::<Result<_>>()?;
    assert_eq!(symbols.len(), 4);

    // File order is preserved exactly.
    match symbols[0].symbol() {
        Symbol::Constant(constant) => {
            assert_eq!(constant.name, "kAnswer");
            assert_eq!(constant.value, NumericLeaf::Long(-7));
        }
        other => panic!("expected a constant first, got {other:?}"),
    }
    assert!(matches!(symbols[1].symbol(), Symbol::Local(_)));
    match symbols[2].symbol() {
        Symbol::AttrRegister(register) => {
            assert_eq!(register.attributes.offset, 0x40);
            assert_eq!(register.attributes.flags, LocalVarFlags::IS_RETVALUE);
        }
        other => panic!("expected an attributed register, got {other:?}"),
    }
    assert!(matches!(symbols[3].symbol(), Symbol::End(_)));

    Ok(())
}

#[test]
fn embedded_references_resolve_through_the_session() -> Result<()> {
    let pdb = Pdb::open(Box::new(VecStreamProvider::new(container())))?;

    let record = pdb.type_ref(TypeIndex::new(0x1000)).resolve()?;
    let Leaf::ArgList(args) = record.leaf() else {
        panic!("expected an arg list at 0x1000");
    };
    assert_eq!(args.entries.len(), 2);

    // The first entry is a primitive, the second a record reference; both
    // resolve through the reference captured at decode time.
    let first = args.entries[0].resolve()?;
    assert_eq!(first.leaf(), &Leaf::Primitive(PrimitiveKind::U4));

    let second = args.entries[1].resolve()?;
    match second.leaf() {
        Leaf::Long(long) => assert_eq!(long.value, 42),
        other => panic!("unexpected payload: {other:?}"),
    }

    Ok(())
}

#[test]
fn resolution_is_memoized_by_identity() -> Result<()> {
    let pdb = Pdb::open(Box::new(VecStreamProvider::new(container())))?;

    let first = pdb.type_ref(TypeIndex::new(0x1001)).resolve()?;
    let second = pdb.types().resolve(TypeIndex::new(0x1001))?;
    assert!(Arc::ptr_eq(&first, &second));

    Ok(())
}

#[test]
fn mutually_referencing_records_resolve_without_recursing() -> Result<()> {
    // 0x1000 and 0x1001 are forwarding records pointing at each other.
    let mut stream = encode_leaf(&Leaf::Index(Index {
        referenced: LazyTypeRef::detached(TypeIndex::new(0x1001)),
    }))
    .unwrap();
    stream.extend(
        encode_leaf(&Leaf::Index(Index {
            referenced: LazyTypeRef::detached(TypeIndex::new(0x1000)),
        }))
        .unwrap(),
    );

    let resolver = TypeResolver::new(stream)?;

    let forward = resolver.resolve(TypeIndex::new(0x1000))?;
    let Leaf::Index(index) = forward.leaf() else {
        panic!("expected a forwarding record at 0x1000");
    };

    // Walking the cycle terminates: each hop is one cache lookup.
    let back = index.referenced.resolve()?;
    let Leaf::Index(index_back) = back.leaf() else {
        panic!("expected a forwarding record at 0x1001");
    };
    let around = index_back.referenced.resolve()?;
    assert!(Arc::ptr_eq(&forward, &around));

    Ok(())
}

#[test]
fn open_rejects_dbi_stream_numbers_out_of_range() {
    let mut streams = container();

    // Point the DBI's global symbol stream past the container's end.
    let mut header = dbi_header(0);
    header.gs_symbols_stream = 99;
    let mut dbi = Vec::new();
    header.write(&mut dbi);
    streams[3] = dbi;

    assert!(matches!(
        Pdb::open(Box::new(VecStreamProvider::new(streams))),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn open_rejects_unknown_dbi_version() {
    let mut streams = container();
    // Corrupt the version field (bytes 4..8 of the DBI stream).
    streams[3][4..8].copy_from_slice(&0xDEAD_BEEF_u32.to_le_bytes());

    assert!(matches!(
        Pdb::open(Box::new(VecStreamProvider::new(streams))),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn open_without_required_streams_fails() {
    let err = Pdb::open(Box::new(VecStreamProvider::new(vec![Vec::new()])));
    assert!(matches!(err, Err(Error::StreamNotFound(_))));
}

/// Counts accesses per stream id, to observe what a session actually touches.
struct CountingProvider {
    inner: VecStreamProvider,
    hits: Arc<Vec<AtomicUsize>>,
}

impl CountingProvider {
    fn new(streams: Vec<Vec<u8>>) -> (Self, Arc<Vec<AtomicUsize>>) {
        let hits: Arc<Vec<AtomicUsize>> =
            Arc::new((0..streams.len()).map(|_| AtomicUsize::new(0)).collect());
        let provider = CountingProvider {
            inner: VecStreamProvider::new(streams),
            hits: hits.clone(),
        };
        (provider, hits)
    }
}

impl StreamProvider for CountingProvider {
    fn num_streams(&self) -> u32 {
        self.inner.num_streams()
    }

    fn stream(&self, id: u32) -> Result<&[u8]> {
        if let Some(hits) = self.hits.get(id as usize) {
            hits.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.stream(id)
    }
}

#[test]
fn module_streams_load_lazily_and_once() -> Result<()> {
    let (provider, hits) = CountingProvider::new(container());
    let pdb = Pdb::open(Box::new(provider))?;

    // Opening touches only the well-known streams.
    assert_eq!(hits[STREAM_TPI as usize].load(Ordering::Relaxed), 1);
    assert_eq!(hits[STREAM_DBI as usize].load(Ordering::Relaxed), 1);
    assert_eq!(hits[MODULE_STREAM as usize].load(Ordering::Relaxed), 0);

    let modules = pdb.dbi().modules()?;
    assert_eq!(hits[MODULE_STREAM as usize].load(Ordering::Relaxed), 0);

    // First symbol access loads the module stream; the second is served from
    // the bound reader.
    pdb.module_symbols(&modules[0])?;
    pdb.module_symbols(&modules[0])?;
    assert_eq!(hits[MODULE_STREAM as usize].load(Ordering::Relaxed), 1);

    Ok(())
}

#[test]
fn module_reader_borrows_from_its_module() -> Result<()> {
    let pdb = Pdb::open(Box::new(VecStreamProvider::new(container())))?;
    let modules = pdb.dbi().modules()?;

    // The returned reader lives as long as the module entry it is bound to
    // and stays usable alongside further session access.
    let reader = pdb.module_symbols(&modules[0])?;
    assert_eq!(reader.symbols().count(), 4);
    assert_eq!(pdb.types().record_count(), 2);

    // Repeat calls hand back the same bound reader.
    let again = pdb.module_symbols(&modules[0])?;
    assert!(std::ptr::eq(reader, again));

    Ok(())
}

#[test]
fn unknown_record_kinds_are_skipped_not_fatal() -> Result<()> {
    // A known record, an unregistered one, then another known record.
    let mut stream = encode_leaf(&Leaf::Long(pdbscope::leaves::Long { value: 1 })).unwrap();
    stream.extend([0x06, 0x00, 0xAD, 0x0B, 0xEE, 0xFF, 0x00, 0x00]);
    stream.extend(encode_leaf(&Leaf::Long(pdbscope::leaves::Long { value: 2 })).unwrap());

    let resolver = TypeResolver::new(stream)?;
    assert_eq!(resolver.record_count(), 3);

    let outcomes: Vec<_> = resolver.records().collect();
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_ok());
    assert!(matches!(
        outcomes[1],
        Err(Error::UnsupportedVariant { kind: 0x0BAD, .. })
    ));
    assert!(outcomes[2].is_ok());

    // The record after the unknown one still resolves by index.
    let third = resolver.resolve(TypeIndex::new(0x1002))?;
    match third.leaf() {
        Leaf::Long(long) => assert_eq!(long.value, 2),
        other => panic!("unexpected payload: {other:?}"),
    }

    Ok(())
}

#[test]
fn references_are_captured_without_decoding_their_target() -> Result<()> {
    // 0x1000 has no registered codec; 0x1001 references it anyway.
    let mut stream = vec![0x06, 0x00, 0xAD, 0x0B, 0xEE, 0xFF, 0x00, 0x00];
    stream.extend(
        encode_leaf(&Leaf::ArgList(ArgList {
            entries: vec![LazyTypeRef::detached(TypeIndex::new(0x1000))],
        }))
        .unwrap(),
    );

    let resolver = TypeResolver::new(stream)?;

    // Decoding the referencing record succeeds; the captured reference is a
    // handle, not a decode of its target.
    let record = resolver.resolve(TypeIndex::new(0x1001))?;
    let Leaf::ArgList(args) = record.leaf() else {
        panic!("expected an arg list at 0x1001");
    };
    assert_eq!(args.entries[0].index(), TypeIndex::new(0x1000));

    // Only following the reference touches the target and surfaces its error.
    assert!(matches!(
        args.entries[0].resolve(),
        Err(Error::UnsupportedVariant { kind: 0x0BAD, .. })
    ));

    Ok(())
}

#[test]
fn records_survive_an_encode_decode_cycle() -> Result<()> {
    let local = Symbol::Local(Local {
        value_type: LazyTypeRef::detached(TypeIndex::new(0x1000)),
        flags: LocalVarFlags::IS_PARAM | LocalVarFlags::IS_OPTIMIZED_OUT,
        name: "shadow".to_string(),
    });

    let bytes = encode_symbol(&local)?;
    assert_eq!(bytes.len() % 4, 0);

    let resolver = TypeResolver::new(Vec::new())?;
    let reader = pdbscope::module::ModuleSymbolReader::new(bytes, &resolver);
    let decoded: Vec<_> = reader.symbols().collect::<Result<_>>()?;

    assert_eq!(decoded.len(), 1);
    assert_eq!(*decoded[0].symbol(), local);
    Ok(())
}
