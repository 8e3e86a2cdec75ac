use std::io;

use crate::utils::{data_reader::DataReader, data_writer::DataWriter, xor::XorKey};

/// Size of the universal block header: a 4-byte tag plus a 4-byte length.
pub const HEADER_LEN: u32 = 8;

/// A 4-byte block tag.
///
/// Equality is byte-exact. The set of tags this crate understands is the
/// closed catalogue below; anything else is rejected by the traversal with
/// [`BlockError::UnknownBlockId`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub [u8; 4]);

impl BlockId {
    pub const LECF: BlockId = BlockId(*b"LECF");
    pub const LOFF: BlockId = BlockId(*b"LOFF");
    pub const LFLF: BlockId = BlockId(*b"LFLF");
    pub const ROOM: BlockId = BlockId(*b"ROOM");
    pub const RMHD: BlockId = BlockId(*b"RMHD");
    pub const CYCL: BlockId = BlockId(*b"CYCL");
    pub const TRNS: BlockId = BlockId(*b"TRNS");
    pub const EPAL: BlockId = BlockId(*b"EPAL");
    pub const BOXD: BlockId = BlockId(*b"BOXD");
    pub const BOXM: BlockId = BlockId(*b"BOXM");
    pub const CLUT: BlockId = BlockId(*b"CLUT");
    pub const SCAL: BlockId = BlockId(*b"SCAL");
    pub const RMIM: BlockId = BlockId(*b"RMIM");
    pub const OBIM: BlockId = BlockId(*b"OBIM");
    pub const OBCD: BlockId = BlockId(*b"OBCD");
    pub const EXCD: BlockId = BlockId(*b"EXCD");
    pub const ENCD: BlockId = BlockId(*b"ENCD");
    pub const NLSC: BlockId = BlockId(*b"NLSC");
    pub const LSCR: BlockId = BlockId(*b"LSCR");
    pub const SCRP: BlockId = BlockId(*b"SCRP");
    pub const SOUN: BlockId = BlockId(*b"SOUN");
    pub const COST: BlockId = BlockId(*b"COST");
    pub const CHAR: BlockId = BlockId(*b"CHAR");
    pub const RNAM: BlockId = BlockId(*b"RNAM");
    pub const MAXS: BlockId = BlockId(*b"MAXS");
    pub const DROO: BlockId = BlockId(*b"DROO");
    pub const DSCR: BlockId = BlockId(*b"DSCR");
    pub const DSOU: BlockId = BlockId(*b"DSOU");
    pub const DCOS: BlockId = BlockId(*b"DCOS");
    pub const DCHR: BlockId = BlockId(*b"DCHR");
    pub const DOBJ: BlockId = BlockId(*b"DOBJ");

    const CATALOGUE: [BlockId; 31] = [
        BlockId::LECF,
        BlockId::LOFF,
        BlockId::LFLF,
        BlockId::ROOM,
        BlockId::RMHD,
        BlockId::CYCL,
        BlockId::TRNS,
        BlockId::EPAL,
        BlockId::BOXD,
        BlockId::BOXM,
        BlockId::CLUT,
        BlockId::SCAL,
        BlockId::RMIM,
        BlockId::OBIM,
        BlockId::OBCD,
        BlockId::EXCD,
        BlockId::ENCD,
        BlockId::NLSC,
        BlockId::LSCR,
        BlockId::SCRP,
        BlockId::SOUN,
        BlockId::COST,
        BlockId::CHAR,
        BlockId::RNAM,
        BlockId::MAXS,
        BlockId::DROO,
        BlockId::DSCR,
        BlockId::DSOU,
        BlockId::DCOS,
        BlockId::DCHR,
        BlockId::DOBJ,
    ];

    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> BlockId {
        BlockId(bytes)
    }

    #[must_use]
    pub const fn bytes(self) -> [u8; 4] {
        self.0
    }

    /// Whether this tag is in the closed catalogue at all.
    #[must_use]
    pub fn is_known(self) -> bool {
        BlockId::CATALOGUE.contains(&self)
    }

    /// Container tags hold further blocks directly after their header;
    /// everything else in the catalogue is a leaf.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, BlockId::LECF | BlockId::LFLF | BlockId::ROOM)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02X}")?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlockId({self})")
    }
}

/// A decoded block header.
///
/// `total_len` counts the header's own 8 bytes, so it is never below 8 for a
/// well-formed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub id: BlockId,
    pub total_len: u32,
}

impl BlockHeader {
    #[must_use]
    pub fn payload_len(&self) -> u32 {
        self.total_len - HEADER_LEN
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("truncated block header")]
    TruncatedHeader,
    #[error("truncated input inside {id} block")]
    TruncatedInput { id: BlockId },
    #[error("unexpected block id {found}, expected {expected}")]
    UnexpectedBlockId { expected: BlockId, found: BlockId },
    #[error("unknown block id {found}")]
    UnknownBlockId { found: BlockId },
    #[error("malformed length {total_len} for {id} block")]
    MalformedLength { id: BlockId, total_len: u64 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn truncated_as_header(err: io::Error) -> BlockError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        BlockError::TruncatedHeader
    } else {
        BlockError::Io(err)
    }
}

/// Reads one block header.
///
/// The four id bytes go through the byte transform; the length is read as a
/// big-endian word and unmasked with [`XorKey::word_mask`].
pub fn read_header<R: DataReader>(mut reader: R, key: XorKey) -> Result<BlockHeader, BlockError> {
    let mut id = [0; 4];
    reader.read_exact(&mut id).map_err(truncated_as_header)?;
    key.apply_in_place(&mut id);
    let id = BlockId(id);
    let total_len = reader.read_u32_be().map_err(truncated_as_header)? ^ key.word_mask();
    if total_len < HEADER_LEN {
        return Err(BlockError::MalformedLength {
            id,
            total_len: u64::from(total_len),
        });
    }
    Ok(BlockHeader { id, total_len })
}

/// The structural-validation checkpoint used when walking a fixed, known
/// block sequence.
pub fn expect_id(header: &BlockHeader, expected: BlockId) -> Result<(), BlockError> {
    if header.id == expected {
        Ok(())
    } else {
        Err(BlockError::UnexpectedBlockId {
            expected,
            found: header.id,
        })
    }
}

/// Reads a header and insists on the given id in one step.
pub fn read_expected_header<R: DataReader>(
    reader: R,
    expected: BlockId,
    key: XorKey,
) -> Result<BlockHeader, BlockError> {
    let header = read_header(reader, key)?;
    expect_id(&header, expected)?;
    Ok(header)
}

/// Writes a block header for a payload of `payload_len` bytes.
pub fn write_header<W: DataWriter>(
    mut writer: W,
    id: BlockId,
    payload_len: u32,
    key: XorKey,
) -> io::Result<()> {
    let mut id_bytes = id.bytes();
    key.apply_in_place(&mut id_bytes);
    writer.write_all(&id_bytes)?;
    writer.write_u32_be((payload_len + HEADER_LEN) ^ key.word_mask())
}

/// Writes a complete leaf block: header, then the payload verbatim (modulo
/// the byte transform).
pub fn write_leaf_block<W: DataWriter>(
    mut writer: W,
    id: BlockId,
    payload: &[u8],
    key: XorKey,
) -> io::Result<()> {
    write_header(
        &mut writer,
        id,
        u32::try_from(payload.len()).expect("leaf payload too large"),
        key,
    )?;
    let mut encoded = payload.to_vec();
    key.apply_in_place(&mut encoded);
    writer.write_all(&encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{
        block::{BlockReader, MemBlock},
        data_writer::VecWriter,
    };
    use proptest::prelude::*;

    fn roundtrip(id: BlockId, payload_len: u32, key: XorKey) -> BlockHeader {
        let mut writer = VecWriter::new();
        write_header(&mut writer, id, payload_len, key).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), HEADER_LEN as usize);
        read_header(BlockReader::new(MemBlock::from_vec(bytes)), key).unwrap()
    }

    #[test]
    fn header_round_trip_plain() {
        let header = roundtrip(BlockId::SCRP, 100, XorKey::PLAIN);
        assert_eq!(header.id, BlockId::SCRP);
        assert_eq!(header.total_len, 108);
        assert_eq!(header.payload_len(), 100);
    }

    #[test]
    fn header_round_trip_game_key() {
        let header = roundtrip(BlockId::LECF, 0, XorKey::GAME);
        assert_eq!(header.id, BlockId::LECF);
        assert_eq!(header.total_len, 8);
    }

    #[test]
    fn encoded_header_is_obfuscated() {
        let mut writer = VecWriter::new();
        write_header(&mut writer, BlockId::ROOM, 4, XorKey::GAME).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(&bytes[..4], &[b'R' ^ 0x69, b'O' ^ 0x69, b'O' ^ 0x69, b'M' ^ 0x69]);
        assert_eq!(
            u32::from_be_bytes(bytes[4..8].try_into().unwrap()),
            12 ^ 0x6969_6969
        );
    }

    #[test]
    fn short_input_is_truncated_header() {
        let err = read_header(
            BlockReader::new(MemBlock::from_vec(b"SCR".to_vec())),
            XorKey::PLAIN,
        )
        .unwrap_err();
        assert!(matches!(err, BlockError::TruncatedHeader));
    }

    #[test]
    fn undersized_length_is_malformed() {
        let mut bytes = b"SCRP".to_vec();
        bytes.extend_from_slice(&7u32.to_be_bytes());
        let err = read_header(BlockReader::new(MemBlock::from_vec(bytes)), XorKey::PLAIN)
            .unwrap_err();
        assert!(matches!(err, BlockError::MalformedLength { total_len: 7, .. }));
    }

    #[test]
    fn expect_id_rejects_mismatch() {
        let header = BlockHeader {
            id: BlockId::ENCD,
            total_len: 8,
        };
        assert!(expect_id(&header, BlockId::ENCD).is_ok());
        let err = expect_id(&header, BlockId::EXCD).unwrap_err();
        assert!(matches!(
            err,
            BlockError::UnexpectedBlockId {
                expected: BlockId::EXCD,
                found: BlockId::ENCD,
            }
        ));
    }

    proptest! {
        #[test]
        fn header_round_trip_any_key(payload_len in 0u32..0x0FFF_FFFF, key in any::<u8>()) {
            let key = XorKey::new(key);
            let header = roundtrip(BlockId::LFLF, payload_len, key);
            prop_assert_eq!(header.id, BlockId::LFLF);
            prop_assert_eq!(header.total_len, payload_len + HEADER_LEN);
        }
    }
}
