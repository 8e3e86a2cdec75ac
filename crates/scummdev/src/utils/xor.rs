use std::io;

use super::{data_reader::DataReader, data_writer::DataWriter};

/// The single-byte key used to obfuscate every game file.
///
/// The transform is a plain XOR, so encoding and decoding are the same
/// operation. A key of zero is the identity and disables the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XorKey(u8);

impl XorKey {
    /// No transform at all.
    pub const PLAIN: XorKey = XorKey(0);

    /// The key the stock interpreter uses for its index and data files.
    pub const GAME: XorKey = XorKey(0x69);

    #[must_use]
    pub const fn new(key: u8) -> XorKey {
        XorKey(key)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_identity(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn apply(self, byte: u8) -> u8 {
        byte ^ self.0
    }

    /// The key repeated across all four octets of a 32-bit word.
    ///
    /// Block lengths are read as one big-endian integer and then XORed with
    /// this mask as a word, not pushed byte-wise through a stream wrapper.
    #[must_use]
    pub const fn word_mask(self) -> u32 {
        self.0 as u32 * 0x0101_0101
    }

    pub fn apply_in_place(self, buf: &mut [u8]) {
        if self.is_identity() {
            return;
        }
        for byte in buf {
            *byte ^= self.0;
        }
    }

    #[must_use]
    pub fn apply_to_vec(self, mut data: Vec<u8>) -> Vec<u8> {
        self.apply_in_place(&mut data);
        data
    }
}

/// Applies the key to every byte read from the wrapped reader.
pub struct XorReader<R> {
    inner: R,
    key: XorKey,
}

impl<R: DataReader> XorReader<R> {
    pub fn new(inner: R, key: XorKey) -> Self {
        Self { inner, key }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: DataReader> DataReader for XorReader<R> {
    fn read_u8(&mut self) -> io::Result<u8> {
        Ok(self.key.apply(self.inner.read_u8()?))
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
        self.inner.read_exact(buf)?;
        self.key.apply_in_place(buf);
        Ok(())
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.inner.seek_to(offset)
    }

    fn tell(&mut self) -> io::Result<u64> {
        self.inner.tell()
    }

    fn data_size(&mut self) -> io::Result<u64> {
        self.inner.data_size()
    }
}

/// Applies the key to every byte written to the wrapped writer.
pub struct XorWriter<W> {
    inner: W,
    key: XorKey,
}

impl<W: DataWriter> XorWriter<W> {
    pub fn new(inner: W, key: XorKey) -> Self {
        Self { inner, key }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: DataWriter> DataWriter for XorWriter<W> {
    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.inner.write_u8(self.key.apply(value))
    }

    fn write_u16_le(&mut self, value: u16) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_u32_le(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_u32_be(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.key.is_identity() {
            return self.inner.write_all(buf);
        }
        let mut encoded = buf.to_vec();
        self.key.apply_in_place(&mut encoded);
        self.inner.write_all(&encoded)
    }
}
