use std::{
    fs::File,
    io::{self, Read},
    ops::{Bound, RangeBounds},
    path::Path,
};

use bytes::Bytes;

use super::data_reader::DataReader;

/// An immutable in-memory byte block.
///
/// Subranges share the same backing storage, so carving a payload out of a
/// larger file is cheap and keeps no file handle alive.
#[derive(Clone)]
pub struct MemBlock {
    data: Bytes,
}

impl std::fmt::Debug for MemBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemBlock")
            .field("size", &self.data.len())
            .finish()
    }
}

impl MemBlock {
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: Bytes::from(data),
        }
    }

    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(data),
        }
    }

    /// Reads an entire file into memory. The handle is closed before this
    /// returns, on success and on error alike.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Self::from_vec(data))
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let end = offset + buf.len() as u64;
        if end > self.size() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "attempted to read past the end of the block",
            ));
        }
        buf.copy_from_slice(&self.data[offset as usize..end as usize]);
        Ok(())
    }

    pub fn subblock<R>(&self, range: R) -> Self
    where
        R: RangeBounds<u64>,
    {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end + 1,
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.size(),
        };
        assert!(start <= end);
        assert!(end <= self.size(), "end: {} size: {}", end, self.size());
        Self {
            data: self.data.slice(start as usize..end as usize),
        }
    }
}

/// A [`DataReader`] cursor over a [`MemBlock`].
#[derive(Debug, Clone)]
pub struct BlockReader {
    curr_pos: u64,
    block: MemBlock,
}

impl BlockReader {
    pub fn new(block: MemBlock) -> Self {
        Self { curr_pos: 0, block }
    }

    #[must_use]
    pub fn into_rest(self) -> MemBlock {
        self.block.subblock(self.curr_pos..)
    }
}

impl DataReader for BlockReader {
    fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16_le(&mut self) -> io::Result<u16> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u24_le(&mut self) -> io::Result<u32> {
        let mut buf = [0; 4];
        let (head, _) = buf.split_at_mut(3);
        self.read_exact(head)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u32_le(&mut self) -> io::Result<u32> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u32_be(&mut self) -> io::Result<u32> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.block.read_at(self.curr_pos, buf)?;
        self.curr_pos += buf.len() as u64;
        Ok(())
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        if offset > self.block.size() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "attempted to seek past the end of the block",
            ));
        }
        self.curr_pos = offset;
        Ok(())
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.curr_pos)
    }

    fn data_size(&mut self) -> io::Result<u64> {
        Ok(self.block.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subblock_shares_storage() {
        let block = MemBlock::from_vec(vec![1, 2, 3, 4, 5]);
        let sub = block.subblock(1..4);
        assert_eq!(sub.as_slice(), &[2, 3, 4]);
        assert_eq!(block.size(), 5);
    }

    #[test]
    fn reader_tracks_position() {
        let block = MemBlock::from_vec(vec![0x01, 0x02, 0x03, 0x04, 0x05]);
        let mut reader = BlockReader::new(block);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u16_le().unwrap(), 0x0302);
        assert_eq!(reader.tell().unwrap(), 3);
        assert!(reader.read_u32_le().is_err());
    }

    #[test]
    fn read_past_end_fails() {
        let block = MemBlock::from_vec(vec![0; 4]);
        let mut buf = [0; 8];
        assert!(block.read_at(0, &mut buf).is_err());
    }
}
