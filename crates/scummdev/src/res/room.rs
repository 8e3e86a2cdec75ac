use log::debug;

use crate::utils::{
    block::{BlockReader, MemBlock},
    data_reader::DataReader,
    xor::XorKey,
};

use super::block::{self, BlockError, BlockId, HEADER_LEN};

/// The RMHD record at the head of every ROOM container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomHeader {
    pub width: u16,
    pub height: u16,
    pub num_objects: u16,
}

/// A numbered local script carved out of an LSCR leaf.
#[derive(Debug, Clone)]
pub struct LocalScript {
    pub id: u8,
    pub code: MemBlock,
}

/// A ROOM container, split into its fixed child sequence.
///
/// The image and palette payloads stay opaque; the three script-buffer
/// kinds (entry, exit, local) are what the script stream consumes.
#[derive(Debug, Clone)]
pub struct Room {
    pub header: RoomHeader,
    pub color_cycle: MemBlock,
    pub transparency: MemBlock,
    pub ega_palette: MemBlock,
    pub boxes: MemBlock,
    pub box_matrix: MemBlock,
    pub palette: MemBlock,
    pub scale_slots: MemBlock,
    pub image: MemBlock,
    pub object_images: Vec<MemBlock>,
    pub object_code: Vec<MemBlock>,
    pub exit_script: MemBlock,
    pub entry_script: MemBlock,
    pub local_scripts: Vec<LocalScript>,
}

struct RoomWalker<'a> {
    data: &'a MemBlock,
    cursor: u64,
    end: u64,
    key: XorKey,
}

impl RoomWalker<'_> {
    fn next_leaf(&mut self, expected: BlockId) -> Result<MemBlock, BlockError> {
        let mut reader = BlockReader::new(self.data.subblock(self.cursor..self.end));
        let header = block::read_expected_header(&mut reader, expected, self.key)?;
        let block_end = self.cursor + u64::from(header.total_len);
        if block_end > self.end {
            return Err(BlockError::MalformedLength {
                id: header.id,
                total_len: u64::from(header.total_len),
            });
        }
        let payload = self
            .data
            .subblock(self.cursor + u64::from(HEADER_LEN)..block_end);
        self.cursor = block_end;
        Ok(MemBlock::from_vec(
            self.key.apply_to_vec(payload.as_slice().to_vec()),
        ))
    }
}

/// Parses one ROOM container, starting at its own header.
///
/// The child sequence is fixed: RMHD, CYCL, TRNS, EPAL, BOXD, BOXM, CLUT,
/// SCAL, RMIM, then one OBIM and one OBCD per object counted in RMHD, then
/// EXCD, ENCD, NLSC and one LSCR per local script counted in NLSC. The
/// walk knows the child counts; the container itself does not carry them.
pub fn read_room(data: &MemBlock, key: XorKey) -> Result<Room, BlockError> {
    let mut reader = BlockReader::new(data.clone());
    let room_header = block::read_expected_header(&mut reader, BlockId::ROOM, key)?;
    let end = u64::from(room_header.total_len).min(data.size());
    let mut walker = RoomWalker {
        data,
        cursor: u64::from(HEADER_LEN),
        end,
        key,
    };

    let rmhd = walker.next_leaf(BlockId::RMHD)?;
    let mut rmhd_reader = BlockReader::new(rmhd);
    let header = RoomHeader {
        width: rmhd_reader.read_u16_le()?,
        height: rmhd_reader.read_u16_le()?,
        num_objects: rmhd_reader.read_u16_le()?,
    };
    debug!(
        "room {}x{} with {} object(s)",
        header.width, header.height, header.num_objects
    );

    let color_cycle = walker.next_leaf(BlockId::CYCL)?;
    let transparency = walker.next_leaf(BlockId::TRNS)?;
    let ega_palette = walker.next_leaf(BlockId::EPAL)?;
    let boxes = walker.next_leaf(BlockId::BOXD)?;
    let box_matrix = walker.next_leaf(BlockId::BOXM)?;
    let palette = walker.next_leaf(BlockId::CLUT)?;
    let scale_slots = walker.next_leaf(BlockId::SCAL)?;
    let image = walker.next_leaf(BlockId::RMIM)?;

    let mut object_images = Vec::with_capacity(usize::from(header.num_objects));
    for _ in 0..header.num_objects {
        object_images.push(walker.next_leaf(BlockId::OBIM)?);
    }
    let mut object_code = Vec::with_capacity(usize::from(header.num_objects));
    for _ in 0..header.num_objects {
        object_code.push(walker.next_leaf(BlockId::OBCD)?);
    }

    let exit_script = walker.next_leaf(BlockId::EXCD)?;
    let entry_script = walker.next_leaf(BlockId::ENCD)?;

    let nlsc = walker.next_leaf(BlockId::NLSC)?;
    let num_local = BlockReader::new(nlsc).read_u8()?;
    let mut local_scripts = Vec::with_capacity(usize::from(num_local));
    for _ in 0..num_local {
        let payload = walker.next_leaf(BlockId::LSCR)?;
        let mut lscr_reader = BlockReader::new(payload.clone());
        let id = lscr_reader.read_u8()?;
        local_scripts.push(LocalScript {
            id,
            code: lscr_reader.into_rest(),
        });
    }

    Ok(Room {
        header,
        color_cycle,
        transparency,
        ega_palette,
        boxes,
        box_matrix,
        palette,
        scale_slots,
        image,
        object_images,
        object_code,
        exit_script,
        entry_script,
        local_scripts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::res::datafile::BlockBuilder;

    fn sample_room(key: XorKey) -> Vec<u8> {
        let mut rmhd = Vec::new();
        rmhd.extend_from_slice(&320u16.to_le_bytes());
        rmhd.extend_from_slice(&200u16.to_le_bytes());
        rmhd.extend_from_slice(&1u16.to_le_bytes());
        BlockBuilder::container(
            BlockId::ROOM,
            vec![
                BlockBuilder::leaf(BlockId::RMHD, rmhd),
                BlockBuilder::leaf(BlockId::CYCL, vec![0]),
                BlockBuilder::leaf(BlockId::TRNS, vec![0, 0]),
                BlockBuilder::leaf(BlockId::EPAL, vec![0; 4]),
                BlockBuilder::leaf(BlockId::BOXD, vec![0; 4]),
                BlockBuilder::leaf(BlockId::BOXM, vec![0; 2]),
                BlockBuilder::leaf(BlockId::CLUT, vec![0; 6]),
                BlockBuilder::leaf(BlockId::SCAL, vec![0; 8]),
                BlockBuilder::leaf(BlockId::RMIM, vec![1, 2, 3]),
                BlockBuilder::leaf(BlockId::OBIM, vec![9, 9]),
                BlockBuilder::leaf(BlockId::OBCD, vec![8, 8]),
                BlockBuilder::leaf(BlockId::EXCD, vec![0x00]),
                BlockBuilder::leaf(BlockId::ENCD, vec![0x80, 0x00]),
                BlockBuilder::leaf(BlockId::NLSC, vec![1]),
                BlockBuilder::leaf(BlockId::LSCR, vec![200, 0x00]),
            ],
        )
        .to_vec(key)
    }

    #[test]
    fn reads_fixed_sequence() {
        for key in [XorKey::PLAIN, XorKey::GAME] {
            let room = read_room(&MemBlock::from_vec(sample_room(key)), key).unwrap();
            assert_eq!(room.header.width, 320);
            assert_eq!(room.header.height, 200);
            assert_eq!(room.header.num_objects, 1);
            assert_eq!(room.object_images.len(), 1);
            assert_eq!(room.object_code.len(), 1);
            assert_eq!(room.image.as_slice(), &[1, 2, 3]);
            assert_eq!(room.exit_script.as_slice(), &[0x00]);
            assert_eq!(room.entry_script.as_slice(), &[0x80, 0x00]);
            assert_eq!(room.local_scripts.len(), 1);
            assert_eq!(room.local_scripts[0].id, 200);
            assert_eq!(room.local_scripts[0].code.as_slice(), &[0x00]);
        }
    }

    #[test]
    fn out_of_sequence_block_is_rejected() {
        let key = XorKey::PLAIN;
        let data = BlockBuilder::container(
            BlockId::ROOM,
            vec![BlockBuilder::leaf(BlockId::CYCL, vec![0])],
        )
        .to_vec(key);
        let err = read_room(&MemBlock::from_vec(data), key).unwrap_err();
        assert!(matches!(
            err,
            BlockError::UnexpectedBlockId {
                expected: BlockId::RMHD,
                ..
            }
        ));
    }
}
