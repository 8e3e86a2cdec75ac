use std::io;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::utils::{
    block::{BlockReader, MemBlock},
    data_reader::DataReader,
    data_writer::{DataWriter, VecWriter},
    xor::{XorKey, XorReader, XorWriter},
};

use super::block::{self, BlockError, BlockId};

/// One resource-table row: the LOFF-numbered container holding the resource
/// and the byte offset of its block within that container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub container: u8,
    pub offset: u32,
}

/// One DOBJ row: the packed owner/state byte and the object class bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub owner_state: u8,
    pub class_data: u32,
}

/// The fixed nine-slot MAXS record of engine resource limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxsRecord {
    pub variables: u16,
    pub unknown1: u16,
    pub bit_variables: u16,
    pub local_objects: u16,
    pub arrays: u16,
    pub unknown2: u16,
    pub verbs: u16,
    pub fl_objects: u16,
    pub inventory_objects: u16,
}

impl MaxsRecord {
    const ENCODED_LEN: u32 = 18;

    fn read_from<R: DataReader>(mut reader: R) -> io::Result<MaxsRecord> {
        Ok(MaxsRecord {
            variables: reader.read_u16_le()?,
            unknown1: reader.read_u16_le()?,
            bit_variables: reader.read_u16_le()?,
            local_objects: reader.read_u16_le()?,
            arrays: reader.read_u16_le()?,
            unknown2: reader.read_u16_le()?,
            verbs: reader.read_u16_le()?,
            fl_objects: reader.read_u16_le()?,
            inventory_objects: reader.read_u16_le()?,
        })
    }

    fn write_to<W: DataWriter>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16_le(self.variables)?;
        writer.write_u16_le(self.unknown1)?;
        writer.write_u16_le(self.bit_variables)?;
        writer.write_u16_le(self.local_objects)?;
        writer.write_u16_le(self.arrays)?;
        writer.write_u16_le(self.unknown2)?;
        writer.write_u16_le(self.verbs)?;
        writer.write_u16_le(self.fl_objects)?;
        writer.write_u16_le(self.inventory_objects)
    }
}

/// A room-name table row. On disk the nine name bytes carry an extra XOR
/// with 0xFF on top of the whole-file key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomName {
    pub room: u8,
    pub name: String,
}

const ROOM_NAME_LEN: usize = 9;
const NAME_MASK: u8 = 0xFF;

/// The decoded directory file: every resource table plus the MAXS limits
/// and the optional room-name table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryIndex {
    pub room_names: Vec<RoomName>,
    pub maxs: MaxsRecord,
    pub rooms: Vec<DirectoryEntry>,
    pub scripts: Vec<DirectoryEntry>,
    pub sounds: Vec<DirectoryEntry>,
    pub costumes: Vec<DirectoryEntry>,
    pub charsets: Vec<DirectoryEntry>,
    pub objects: Vec<ObjectEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Block(#[from] BlockError),
    #[error("directory has no MAXS block")]
    MissingMaxs,
    #[error("room name longer than {ROOM_NAME_LEN} bytes: {name:?}")]
    RoomNameTooLong { name: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn truncated(id: BlockId) -> impl FnOnce(io::Error) -> BlockError {
    move |err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            BlockError::TruncatedInput { id }
        } else {
            BlockError::Io(err)
        }
    }
}

fn read_entry_table<R: DataReader>(reader: R, key: XorKey, id: BlockId) -> Result<Vec<DirectoryEntry>, BlockError> {
    let mut reader = XorReader::new(reader, key);
    let count = usize::from(reader.read_u16_le().map_err(truncated(id))?);
    let mut containers = Vec::with_capacity(count);
    for _ in 0..count {
        containers.push(reader.read_u8().map_err(truncated(id))?);
    }
    let mut entries = Vec::with_capacity(count);
    for container in containers {
        let offset = reader.read_u32_le().map_err(truncated(id))?;
        entries.push(DirectoryEntry { container, offset });
    }
    Ok(entries)
}

fn read_object_table<R: DataReader>(reader: R, key: XorKey) -> Result<Vec<ObjectEntry>, BlockError> {
    let mut reader = XorReader::new(reader, key);
    let count = usize::from(reader.read_u16_le().map_err(truncated(BlockId::DOBJ))?);
    let mut owners = Vec::with_capacity(count);
    for _ in 0..count {
        owners.push(reader.read_u8().map_err(truncated(BlockId::DOBJ))?);
    }
    let mut entries = Vec::with_capacity(count);
    for owner_state in owners {
        let class_data = reader.read_u32_le().map_err(truncated(BlockId::DOBJ))?;
        entries.push(ObjectEntry {
            owner_state,
            class_data,
        });
    }
    Ok(entries)
}

fn read_room_names<R: DataReader>(reader: R, key: XorKey) -> Result<Vec<RoomName>, BlockError> {
    let mut reader = XorReader::new(reader, key);
    let mut names = Vec::new();
    loop {
        let room = reader.read_u8().map_err(truncated(BlockId::RNAM))?;
        if room == 0 {
            return Ok(names);
        }
        let mut raw = [0; ROOM_NAME_LEN];
        reader.read_exact(&mut raw).map_err(truncated(BlockId::RNAM))?;
        for byte in &mut raw {
            *byte ^= NAME_MASK;
        }
        let len = raw.iter().position(|&b| b == 0).unwrap_or(ROOM_NAME_LEN);
        let name = String::from_utf8_lossy(&raw[..len]).into_owned();
        names.push(RoomName { room, name });
    }
}

/// Parses a directory file.
///
/// The file is a fixed sequence of blocks: an optional `RNAM`, a mandatory
/// `MAXS`, then the `DROO DSCR DSOU DCOS DCHR DOBJ` tables in that order,
/// each present only when non-empty. Any structural mismatch is fatal for
/// the whole directory: the error propagates and no partial index is
/// returned.
pub fn parse_directory(data: &MemBlock, key: XorKey) -> Result<DirectoryIndex, DirectoryError> {
    const SEQUENCE: [BlockId; 8] = [
        BlockId::RNAM,
        BlockId::MAXS,
        BlockId::DROO,
        BlockId::DSCR,
        BlockId::DSOU,
        BlockId::DCOS,
        BlockId::DCHR,
        BlockId::DOBJ,
    ];

    let mut index = DirectoryIndex::default();
    let mut seen_maxs = false;
    let mut next_slot = 0;
    let mut reader = BlockReader::new(data.clone());

    while reader.remaining()? > 0 {
        let header = block::read_header(&mut reader, key)?;
        debug!("directory block {} ({} bytes)", header.id, header.total_len);
        if !header.id.is_known() {
            return Err(BlockError::UnknownBlockId { found: header.id }.into());
        }
        let slot = SEQUENCE[next_slot..]
            .iter()
            .position(|&id| id == header.id)
            .ok_or(BlockError::UnexpectedBlockId {
                expected: SEQUENCE[next_slot.min(SEQUENCE.len() - 1)],
                found: header.id,
            })?
            + next_slot;
        next_slot = slot + 1;
        match header.id {
            BlockId::RNAM => index.room_names = read_room_names(&mut reader, key)?,
            BlockId::MAXS => {
                index.maxs = MaxsRecord::read_from(XorReader::new(&mut reader, key))
                    .map_err(truncated(BlockId::MAXS))?;
                seen_maxs = true;
            }
            BlockId::DROO => index.rooms = read_entry_table(&mut reader, key, BlockId::DROO)?,
            BlockId::DSCR => index.scripts = read_entry_table(&mut reader, key, BlockId::DSCR)?,
            BlockId::DSOU => index.sounds = read_entry_table(&mut reader, key, BlockId::DSOU)?,
            BlockId::DCOS => index.costumes = read_entry_table(&mut reader, key, BlockId::DCOS)?,
            BlockId::DCHR => index.charsets = read_entry_table(&mut reader, key, BlockId::DCHR)?,
            _ => index.objects = read_object_table(&mut reader, key)?,
        }
    }

    if !seen_maxs {
        return Err(DirectoryError::MissingMaxs);
    }
    Ok(index)
}

fn entry_table_payload(entries: &[DirectoryEntry]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(2 + entries.len() * 5);
    payload.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        payload.push(entry.container);
    }
    for entry in entries {
        payload.extend_from_slice(&entry.offset.to_le_bytes());
    }
    payload
}

fn object_table_payload(entries: &[ObjectEntry]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(2 + entries.len() * 5);
    payload.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        payload.push(entry.owner_state);
    }
    for entry in entries {
        payload.extend_from_slice(&entry.class_data.to_le_bytes());
    }
    payload
}

fn room_names_payload(names: &[RoomName]) -> Result<Vec<u8>, DirectoryError> {
    let mut payload = Vec::with_capacity(names.len() * (1 + ROOM_NAME_LEN) + 1);
    for entry in names {
        if entry.name.len() > ROOM_NAME_LEN {
            return Err(DirectoryError::RoomNameTooLong {
                name: entry.name.clone(),
            });
        }
        payload.push(entry.room);
        let mut raw = [0u8; ROOM_NAME_LEN];
        raw[..entry.name.len()].copy_from_slice(entry.name.as_bytes());
        for byte in &mut raw {
            *byte ^= NAME_MASK;
        }
        payload.extend_from_slice(&raw);
    }
    payload.push(0);
    Ok(payload)
}

/// Encodes a directory back to its on-disk form: same fixed block order as
/// [`parse_directory`], resource tables emitted only when non-empty.
pub fn write_directory(index: &DirectoryIndex, key: XorKey) -> Result<Vec<u8>, DirectoryError> {
    let mut writer = VecWriter::new();

    if !index.room_names.is_empty() {
        let payload = room_names_payload(&index.room_names)?;
        block::write_leaf_block(&mut writer, BlockId::RNAM, &payload, key)?;
    }

    block::write_header(&mut writer, BlockId::MAXS, MaxsRecord::ENCODED_LEN, key)?;
    index.maxs.write_to(XorWriter::new(&mut writer, key))?;

    let tables = [
        (BlockId::DROO, &index.rooms),
        (BlockId::DSCR, &index.scripts),
        (BlockId::DSOU, &index.sounds),
        (BlockId::DCOS, &index.costumes),
        (BlockId::DCHR, &index.charsets),
    ];
    for (id, entries) in tables {
        if entries.is_empty() {
            continue;
        }
        block::write_leaf_block(&mut writer, id, &entry_table_payload(entries), key)?;
    }

    if !index.objects.is_empty() {
        block::write_leaf_block(
            &mut writer,
            BlockId::DOBJ,
            &object_table_payload(&index.objects),
            key,
        )?;
    }

    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> DirectoryIndex {
        DirectoryIndex {
            room_names: vec![
                RoomName {
                    room: 1,
                    name: "mansion".into(),
                },
                RoomName {
                    room: 2,
                    name: "dungeon".into(),
                },
            ],
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
            rooms: vec![
                DirectoryEntry {
                    container: 1,
                    offset: 0,
                },
                DirectoryEntry {
                    container: 2,
                    offset: 0x1234,
                },
            ],
            scripts: vec![DirectoryEntry {
                container: 1,
                offset: 0x40,
            }],
            sounds: vec![],
            costumes: vec![DirectoryEntry {
                container: 2,
                offset: 0x99,
            }],
            charsets: vec![],
            objects: vec![ObjectEntry {
                owner_state: 0x0F,
                class_data: 0x8000_0001,
            }],
        }
    }

    #[test]
    fn directory_round_trip() {
        for key in [XorKey::PLAIN, XorKey::GAME] {
            let index = sample_index();
            let bytes = write_directory(&index, key).unwrap();
            let decoded = parse_directory(&MemBlock::from_vec(bytes), key).unwrap();
            assert_eq!(decoded, index);
        }
    }

    #[test]
    fn missing_maxs_is_rejected() {
        let mut writer = VecWriter::new();
        block::write_leaf_block(
            &mut writer,
            BlockId::DROO,
            &entry_table_payload(&[]),
            XorKey::PLAIN,
        )
        .unwrap();
        let err = parse_directory(&MemBlock::from_vec(writer.into_inner()), XorKey::PLAIN)
            .unwrap_err();
        assert!(matches!(err, DirectoryError::MissingMaxs));
    }

    #[test]
    fn out_of_order_table_is_rejected() {
        // DSCR before DROO violates the fixed sequence.
        let mut index = sample_index();
        index.rooms.clear();
        let mut bytes = write_directory(&index, XorKey::PLAIN).unwrap();
        // Append a DROO table after everything else.
        let mut writer = VecWriter::new();
        block::write_leaf_block(
            &mut writer,
            BlockId::DROO,
            &entry_table_payload(&[DirectoryEntry {
                container: 1,
                offset: 0,
            }]),
            XorKey::PLAIN,
        )
        .unwrap();
        bytes.extend_from_slice(&writer.into_inner());
        let err = parse_directory(&MemBlock::from_vec(bytes), XorKey::PLAIN).unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Block(BlockError::UnexpectedBlockId { .. })
        ));
    }

    #[test]
    fn foreign_block_is_rejected() {
        let mut writer = VecWriter::new();
        block::write_leaf_block(&mut writer, BlockId::SCRP, &[], XorKey::PLAIN).unwrap();
        let err = parse_directory(&MemBlock::from_vec(writer.into_inner()), XorKey::PLAIN)
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Block(BlockError::UnexpectedBlockId { .. })
        ));
    }

    #[test]
    fn truncated_table_is_fatal() {
        let mut writer = VecWriter::new();
        // Claims 4 entries but carries none.
        block::write_leaf_block(&mut writer, BlockId::MAXS, &[0u8; 18], XorKey::PLAIN).unwrap();
        block::write_leaf_block(&mut writer, BlockId::DROO, &4u16.to_le_bytes(), XorKey::PLAIN)
            .unwrap();
        let err = parse_directory(&MemBlock::from_vec(writer.into_inner()), XorKey::PLAIN)
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Block(BlockError::TruncatedInput { id: BlockId::DROO })
        ));
    }
}
