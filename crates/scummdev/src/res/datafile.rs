use std::io;

use log::{debug, trace};

use crate::utils::{
    block::{BlockReader, MemBlock},
    data_reader::DataReader,
    data_writer::{DataWriter, VecWriter},
    xor::{XorKey, XorReader, XorWriter},
};

use super::{
    block::{self, BlockError, BlockId, HEADER_LEN},
    directory::DirectoryEntry,
};

/// One node of the decoded block tree. Offsets are absolute within the
/// parsed buffer; `total_len` includes the 8 header bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub id: BlockId,
    pub offset: u64,
    pub total_len: u32,
    pub children: Vec<RawBlock>,
}

impl RawBlock {
    #[must_use]
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.total_len)
    }

    /// Depth-first search for the first block with the given id.
    #[must_use]
    pub fn find(&self, id: BlockId) -> Option<&RawBlock> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

fn walk_range(
    data: &MemBlock,
    start: u64,
    end: u64,
    key: XorKey,
    depth: usize,
) -> Result<Vec<RawBlock>, BlockError> {
    let mut blocks = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let mut reader = BlockReader::new(data.subblock(cursor..end));
        let header = block::read_header(&mut reader, key)?;
        if !header.id.is_known() {
            return Err(BlockError::UnknownBlockId { found: header.id });
        }
        let block_end = cursor + u64::from(header.total_len);
        if block_end > end {
            return Err(BlockError::MalformedLength {
                id: header.id,
                total_len: u64::from(header.total_len),
            });
        }
        trace!(
            "{:indent$}{} at {cursor:#x}, {} bytes",
            "",
            header.id,
            header.total_len,
            indent = depth * 2
        );
        let children = if header.id.is_container() {
            walk_range(data, cursor + u64::from(HEADER_LEN), block_end, key, depth + 1)?
        } else {
            Vec::new()
        };
        blocks.push(RawBlock {
            id: header.id,
            offset: cursor,
            total_len: header.total_len,
            children,
        });
        cursor = block_end;
    }
    Ok(blocks)
}

/// Walks the whole buffer as a sequence of blocks, descending into the
/// container kinds, and returns the resulting tree.
///
/// Every block must land exactly on its successor and stay inside its
/// parent; any gap or overlap surfaces as [`BlockError::MalformedLength`].
pub fn parse_data_file_blocks(data: &MemBlock, key: XorKey) -> Result<Vec<RawBlock>, BlockError> {
    let blocks = walk_range(data, 0, data.size(), key, 0)?;
    debug!("parsed {} top-level block(s)", blocks.len());
    Ok(blocks)
}

/// Reads the block at `offset`, checks its id, and returns the decoded
/// payload as an independent block.
pub fn extract_block(
    data: &MemBlock,
    id: BlockId,
    offset: u64,
    key: XorKey,
) -> Result<MemBlock, BlockError> {
    if offset + u64::from(HEADER_LEN) > data.size() {
        return Err(BlockError::TruncatedHeader);
    }
    let mut reader = BlockReader::new(data.subblock(offset..));
    let header = block::read_expected_header(&mut reader, id, key)?;
    let end = offset + u64::from(header.total_len);
    if end > data.size() {
        return Err(BlockError::MalformedLength {
            id: header.id,
            total_len: u64::from(header.total_len),
        });
    }
    let payload = data.subblock(offset + u64::from(HEADER_LEN)..end);
    Ok(MemBlock::from_vec(key.apply_to_vec(payload.as_slice().to_vec())))
}

/// Decodes the LOFF room index: a count byte, then (room, offset) pairs.
///
/// The decode is driven purely by the count byte; the declared block length
/// is not consulted.
pub fn read_room_index<R: DataReader>(
    mut reader: R,
    key: XorKey,
) -> Result<Vec<DirectoryEntry>, BlockError> {
    block::read_expected_header(&mut reader, BlockId::LOFF, key)?;
    let mut reader = XorReader::new(reader, key);
    let eof = |err: io::Error| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            BlockError::TruncatedInput { id: BlockId::LOFF }
        } else {
            BlockError::Io(err)
        }
    };
    let count = reader.read_u8().map_err(eof)?;
    let mut entries = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let container = reader.read_u8().map_err(eof)?;
        let offset = reader.read_u32_le().map_err(eof)?;
        entries.push(DirectoryEntry { container, offset });
    }
    Ok(entries)
}

/// Encodes a LOFF room index block, header included.
pub fn write_room_index<W: DataWriter>(
    mut writer: W,
    entries: &[DirectoryEntry],
    key: XorKey,
) -> io::Result<()> {
    let payload_len = 1 + entries.len() as u32 * 5;
    block::write_header(&mut writer, BlockId::LOFF, payload_len, key)?;
    let mut writer = XorWriter::new(writer, key);
    writer.write_u8(entries.len() as u8)?;
    for entry in entries {
        writer.write_u8(entry.container)?;
        writer.write_u32_le(entry.offset)?;
    }
    Ok(())
}

/// Bottom-up assembly of a block file: leaves carry payload bytes,
/// containers carry children, and lengths fall out of the structure.
#[derive(Debug, Clone)]
pub enum BlockBuilder {
    Leaf { id: BlockId, payload: Vec<u8> },
    Container { id: BlockId, children: Vec<BlockBuilder> },
}

impl BlockBuilder {
    pub fn leaf(id: BlockId, payload: impl Into<Vec<u8>>) -> BlockBuilder {
        BlockBuilder::Leaf {
            id,
            payload: payload.into(),
        }
    }

    pub fn container(id: BlockId, children: Vec<BlockBuilder>) -> BlockBuilder {
        BlockBuilder::Container { id, children }
    }

    #[must_use]
    pub fn total_len(&self) -> u32 {
        match self {
            BlockBuilder::Leaf { payload, .. } => HEADER_LEN + payload.len() as u32,
            BlockBuilder::Container { children, .. } => {
                HEADER_LEN + children.iter().map(BlockBuilder::total_len).sum::<u32>()
            }
        }
    }

    pub fn write_to<W: DataWriter>(&self, mut writer: W, key: XorKey) -> io::Result<()> {
        match self {
            BlockBuilder::Leaf { id, payload } => {
                block::write_leaf_block(&mut writer, *id, payload, key)
            }
            BlockBuilder::Container { id, children } => {
                block::write_header(&mut writer, *id, self.total_len() - HEADER_LEN, key)?;
                // Recurse through a `dyn` boundary so the generic parameter
                // does not gain a fresh `&mut` layer at each level (which would
                // make monomorphization diverge).
                let writer: &mut dyn DataWriter = &mut writer;
                for child in children {
                    child.write_to(&mut *writer, key)?;
                }
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn to_vec(&self, key: XorKey) -> Vec<u8> {
        let mut writer = VecWriter::new();
        self.write_to(&mut writer, key)
            .expect("writing to a Vec cannot fail");
        writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file(key: XorKey) -> Vec<u8> {
        BlockBuilder::container(
            BlockId::LECF,
            vec![
                BlockBuilder::leaf(BlockId::LOFF, vec![0]),
                BlockBuilder::container(
                    BlockId::LFLF,
                    vec![
                        BlockBuilder::container(
                            BlockId::ROOM,
                            vec![BlockBuilder::leaf(BlockId::RMHD, vec![0; 6])],
                        ),
                        BlockBuilder::leaf(BlockId::SCRP, vec![0x00]),
                    ],
                ),
            ],
        )
        .to_vec(key)
    }

    #[test]
    fn walks_nested_containers() {
        for key in [XorKey::PLAIN, XorKey::GAME] {
            let data = MemBlock::from_vec(sample_file(key));
            let blocks = parse_data_file_blocks(&data, key).unwrap();
            assert_eq!(blocks.len(), 1);
            let lecf = &blocks[0];
            assert_eq!(lecf.id, BlockId::LECF);
            assert_eq!(lecf.end(), data.size());
            assert_eq!(lecf.children.len(), 2);
            assert_eq!(lecf.children[0].id, BlockId::LOFF);
            let lflf = &lecf.children[1];
            assert_eq!(lflf.id, BlockId::LFLF);
            assert_eq!(lflf.children[0].id, BlockId::ROOM);
            assert_eq!(lflf.children[0].children[0].id, BlockId::RMHD);
            assert!(lecf.find(BlockId::SCRP).is_some());
        }
    }

    #[test]
    fn extracts_script_payload() {
        let key = XorKey::GAME;
        let data = MemBlock::from_vec(sample_file(key));
        let blocks = parse_data_file_blocks(&data, key).unwrap();
        let scrp = blocks[0].find(BlockId::SCRP).unwrap();
        let payload = extract_block(&data, BlockId::SCRP, scrp.offset, key).unwrap();
        assert_eq!(payload.as_slice(), &[0x00]);
    }

    #[test]
    fn extract_checks_id() {
        let key = XorKey::PLAIN;
        let data = MemBlock::from_vec(sample_file(key));
        let err = extract_block(&data, BlockId::ENCD, 0, key).unwrap_err();
        assert!(matches!(err, BlockError::UnexpectedBlockId { .. }));
    }

    #[test]
    fn oversized_child_is_malformed() {
        // A ROOM whose declared length overruns its LFLF parent.
        let mut inner = VecWriter::new();
        block::write_header(&mut inner, BlockId::ROOM, 100, XorKey::PLAIN).unwrap();
        let room = inner.into_inner();
        let mut outer = VecWriter::new();
        block::write_header(&mut outer, BlockId::LFLF, room.len() as u32, XorKey::PLAIN).unwrap();
        let mut data = outer.into_inner();
        data.extend_from_slice(&room);
        let err = parse_data_file_blocks(&MemBlock::from_vec(data), XorKey::PLAIN).unwrap_err();
        assert!(matches!(err, BlockError::MalformedLength { .. }));
    }

    #[test]
    fn unknown_id_halts_traversal() {
        let mut writer = VecWriter::new();
        block::write_leaf_block(&mut writer, BlockId::new(*b"ZZZZ"), &[], XorKey::PLAIN).unwrap();
        let err = parse_data_file_blocks(&MemBlock::from_vec(writer.into_inner()), XorKey::PLAIN)
            .unwrap_err();
        assert!(matches!(err, BlockError::UnknownBlockId { .. }));
    }

    #[test]
    fn room_index_round_trip() {
        let entries = vec![
            DirectoryEntry {
                container: 1,
                offset: 0x200,
            },
            DirectoryEntry {
                container: 3,
                offset: 0x4000,
            },
        ];
        let mut writer = VecWriter::new();
        write_room_index(&mut writer, &entries, XorKey::GAME).unwrap();
        let decoded = read_room_index(
            BlockReader::new(MemBlock::from_vec(writer.into_inner())),
            XorKey::GAME,
        )
        .unwrap();
        assert_eq!(decoded, entries);
    }

    #[test]
    fn room_index_ignores_declared_length() {
        // Header deliberately claims 13 bytes; the payload actually carries
        // a count byte plus one 5-byte entry. The decode is count-driven.
        let key = XorKey::GAME;
        let mut writer = VecWriter::new();
        block::write_header(&mut writer, BlockId::LOFF, 13 - HEADER_LEN, key).unwrap();
        let mut body = XorWriter::new(&mut writer, key);
        body.write_u8(1).unwrap();
        body.write_u8(1).unwrap();
        body.write_u32_le(0).unwrap();
        let decoded = read_room_index(
            BlockReader::new(MemBlock::from_vec(writer.into_inner())),
            key,
        )
        .unwrap();
        assert_eq!(
            decoded,
            vec![DirectoryEntry {
                container: 1,
                offset: 0,
            }]
        );
    }
}
