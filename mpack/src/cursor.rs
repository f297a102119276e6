use crate::error::DecodeError;
use std::convert::TryInto;

/// A read position into a borrowed buffer. Every read either takes exactly the requested amount of bytes and advances
/// past them or fails with `DecodeError::Eof` without moving, so the position never exceeds the buffer length.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {

    pub fn new<B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Self {
        Self { buf: buf.as_ref(), pos: 0 }
    }

    /// Offset of the next unread byte
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next byte without consuming it
    #[inline]
    pub fn peek(&self) -> Result<u8, DecodeError> {
        self.buf.get(self.pos).copied().ok_or(DecodeError::Eof)
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            Err(DecodeError::Eof)
        } else {
            self.pos += len;
            Ok(&self.buf[self.pos - len..self.pos])
        }
    }

    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        // the slice has exactly N bytes, so the conversion cannot fail
        self.read_slice(N)?.try_into().map_err(|_| DecodeError::Eof)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.read_array().map(u16::from_be_bytes)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_array().map(u32::from_be_bytes)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        self.read_array().map(u64::from_be_bytes)
    }

}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::error::DecodeError;

    #[test]
    fn big_endian() {
        let buf = [0x01u8, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(0x01, cursor.read_u8().unwrap());
        assert_eq!(0x0203, cursor.read_u16().unwrap());
        assert_eq!(0x0405_0607, cursor.read_u32().unwrap());
        assert_eq!(0x0809_0a0b_0c0d_0e0f, cursor.read_u64().unwrap());
        assert!(cursor.is_empty());
    }

    #[test]
    fn short_reads_do_not_advance() {
        let buf = [0xffu8, 0xff, 0xff];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(Err(DecodeError::Eof), cursor.read_u32());
        assert_eq!(0, cursor.position());
        assert_eq!(Err(DecodeError::Eof), cursor.read_slice(4));
        assert_eq!(&[0xff, 0xff][..], cursor.read_slice(2).unwrap());
        assert_eq!(Err(DecodeError::Eof), cursor.read_u16());
        assert_eq!(2, cursor.position());
        assert_eq!(1, cursor.remaining());
    }

    #[test]
    fn empty() {
        let mut cursor = Cursor::new(&[0u8; 0]);
        assert_eq!(Err(DecodeError::Eof), cursor.peek());
        assert_eq!(Err(DecodeError::Eof), cursor.read_u8());
        assert_eq!(&[] as &[u8], cursor.read_slice(0).unwrap());
    }

}
