//! Assembles a synthetic game volume (directory file plus LECF data file),
//! then walks it back through every layer of the crate.

use scummdev::{
    res::{
        block::BlockId,
        datafile::{self, BlockBuilder},
        directory::{self, DirectoryEntry, DirectoryIndex, MaxsRecord, RoomName},
        room,
    },
    script::{
        stream::{decode_script, encode_script},
        var::{Param, VarSpec},
    },
    utils::{
        block::{BlockReader, MemBlock},
        data_writer::VecWriter,
        xor::XorKey,
    },
    Instruction,
};

const KEY: XorKey = XorKey::GAME;

fn entry_script() -> Vec<Instruction> {
    vec![
        Instruction::Move {
            var: VarSpec::Global(4),
            value: Param::Imm(1),
        },
        Instruction::StartScript {
            script: Param::Imm(10),
            args: vec![Param::Imm(0), Param::Var(VarSpec::Global(1))],
            recursive: false,
            freeze_resistant: false,
        },
        Instruction::StopObjectCode,
    ]
}

fn global_script() -> Vec<Instruction> {
    vec![
        Instruction::IsEqual {
            var: VarSpec::Global(4),
            value: Param::Imm(1),
            target: 1,
        },
        Instruction::BreakHere,
        Instruction::StopObjectCode,
    ]
}

fn build_room() -> BlockBuilder {
    let mut rmhd = Vec::new();
    rmhd.extend_from_slice(&320u16.to_le_bytes());
    rmhd.extend_from_slice(&144u16.to_le_bytes());
    rmhd.extend_from_slice(&0u16.to_le_bytes());
    BlockBuilder::container(
        BlockId::ROOM,
        vec![
            BlockBuilder::leaf(BlockId::RMHD, rmhd),
            BlockBuilder::leaf(BlockId::CYCL, vec![0]),
            BlockBuilder::leaf(BlockId::TRNS, vec![0, 0]),
            BlockBuilder::leaf(BlockId::EPAL, vec![0; 8]),
            BlockBuilder::leaf(BlockId::BOXD, vec![0; 4]),
            BlockBuilder::leaf(BlockId::BOXM, vec![0; 2]),
            BlockBuilder::leaf(BlockId::CLUT, vec![0; 12]),
            BlockBuilder::leaf(BlockId::SCAL, vec![0; 8]),
            BlockBuilder::leaf(BlockId::RMIM, vec![0x55; 16]),
            BlockBuilder::leaf(BlockId::EXCD, encode_script(&[Instruction::StopObjectCode])),
            BlockBuilder::leaf(BlockId::ENCD, encode_script(&entry_script())),
            BlockBuilder::leaf(BlockId::NLSC, vec![1]),
            BlockBuilder::leaf(BlockId::LSCR, {
                let mut payload = vec![200];
                payload.extend_from_slice(&encode_script(&[Instruction::StopObjectCode]));
                payload
            }),
        ],
    )
}

fn build_data_file() -> Vec<u8> {
    BlockBuilder::container(
        BlockId::LECF,
        vec![
            BlockBuilder::leaf(BlockId::LOFF, {
                // One room; its LFLF starts right after LECF header + LOFF.
                let mut payload = vec![1u8, 1u8];
                payload.extend_from_slice(&0u32.to_le_bytes());
                payload
            }),
            BlockBuilder::container(
                BlockId::LFLF,
                vec![
                    build_room(),
                    BlockBuilder::leaf(BlockId::SCRP, encode_script(&global_script())),
                ],
            ),
        ],
    )
    .to_vec(KEY)
}

fn build_directory() -> DirectoryIndex {
    DirectoryIndex {
        room_names: vec![RoomName {
            room: 1,
            name: "lookout".into(),
        }],
        maxs: MaxsRecord {
            variables: 800,
            unknown1: 16,
            bit_variables: 2048,
            local_objects: 200,
            arrays: 50,
            unknown2: 0,
            verbs: 100,
            fl_objects: 50,
            inventory_objects: 80,
        },
        rooms: vec![DirectoryEntry {
            container: 1,
            offset: 0,
        }],
        scripts: vec![DirectoryEntry {
            container: 1,
            offset: 0,
        }],
        sounds: vec![],
        costumes: vec![],
        charsets: vec![],
        objects: vec![],
    }
}

#[test]
fn directory_file_round_trips() {
    let index = build_directory();
    let bytes = directory::write_directory(&index, KEY).unwrap();
    let reparsed = directory::parse_directory(&MemBlock::from_vec(bytes), KEY).unwrap();
    assert_eq!(reparsed, index);
}

#[test]
fn data_file_walks_and_scripts_round_trip() {
    let data = MemBlock::from_vec(build_data_file());

    let blocks = datafile::parse_data_file_blocks(&data, KEY).unwrap();
    assert_eq!(blocks.len(), 1);
    let lecf = &blocks[0];
    assert_eq!(lecf.id, BlockId::LECF);

    // The LOFF index points at the LFLF container.
    let loff = lecf.find(BlockId::LOFF).unwrap();
    let mut reader = BlockReader::new(data.subblock(loff.offset..));
    let room_index = datafile::read_room_index(&mut reader, KEY).unwrap();
    assert_eq!(room_index.len(), 1);
    assert_eq!(room_index[0].container, 1);

    // Walk the ROOM container and decode its entry script.
    let room_block = lecf.find(BlockId::ROOM).unwrap();
    let room = room::read_room(
        &data.subblock(room_block.offset..room_block.end()),
        KEY,
    )
    .unwrap();
    assert_eq!(room.header.width, 320);
    assert_eq!(room.local_scripts.len(), 1);
    assert_eq!(room.local_scripts[0].id, 200);

    let decoded = decode_script(room.entry_script.as_slice()).unwrap();
    let instructions: Vec<_> = decoded.into_iter().map(|(_, inst)| inst).collect();
    assert_eq!(instructions, entry_script());

    // The re-encoded entry script is byte-identical to what was written.
    assert_eq!(
        encode_script(&instructions),
        room.entry_script.as_slice()
    );

    // Extract the global script through the generic block accessor.
    let scrp = lecf.find(BlockId::SCRP).unwrap();
    let payload = datafile::extract_block(&data, BlockId::SCRP, scrp.offset, KEY).unwrap();
    let decoded = decode_script(payload.as_slice()).unwrap();
    let instructions: Vec<_> = decoded.into_iter().map(|(_, inst)| inst).collect();
    assert_eq!(instructions, global_script());
}

#[test]
fn room_index_block_written_by_hand_matches_builder_output() {
    let entries = vec![DirectoryEntry {
        container: 1,
        offset: 0,
    }];
    let mut writer = VecWriter::new();
    datafile::write_room_index(&mut writer, &entries, KEY).unwrap();
    let decoded = datafile::read_room_index(
        BlockReader::new(MemBlock::from_vec(writer.into_inner())),
        KEY,
    )
    .unwrap();
    assert_eq!(decoded, entries);
}
