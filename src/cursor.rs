//! Sequential, offset-tracked reads and writes over a byte buffer.
//!
//! A [`Cursor`] owns or exclusively borrows one buffer and a single
//! `position`. Every successful operation advances `position` by exactly the
//! number of bytes it consumed or produced; a failed operation leaves it where
//! it was.
//!
//! ```
//! use cryptshelf::cursor::Cursor;
//!
//! let mut out = Cursor::allocate(5);
//! out.write_fixed(2u8).unwrap().write(b"ab").unwrap().write(b"cd").unwrap();
//!
//! let mut input = Cursor::from_bytes(out.into_inner());
//! let n = input.read_fixed::<u8>().unwrap();
//! assert_eq!(input.read(n as usize).unwrap(), b"ab");
//! assert_eq!(input.read_remaining(), b"cd");
//! ```

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cursor out of bounds: {requested} bytes requested at position {position}, {remaining} remaining")]
pub struct CursorError {
    pub position: usize,
    pub requested: usize,
    pub remaining: usize,
}

/// How many bytes a read consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadLen {
    /// Exactly this many bytes.
    Exact(usize),
    /// Everything up to, but not including, the last `n` bytes of the buffer.
    AllBut(usize),
    /// Everything up to the end of the buffer.
    Remaining,
}

/// Integers with a fixed big-endian wire width.
pub trait FixedWidth: Sized + Copy {
    const WIDTH: usize;

    fn from_be_slice(bytes: &[u8]) -> Self;
    fn write_be(self, out: &mut [u8]);
}

macro_rules! impl_fixed_width {
    ($($ty:ty),*) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(raw)
                }

                fn write_be(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_be_bytes());
                }
            }
        )*
    };
}

impl_fixed_width!(u8, u16, u32, u64);

#[derive(Debug, Clone)]
pub struct Cursor<B> {
    buffer: B,
    position: usize,
}

impl Cursor<Vec<u8>> {
    /// Creates a zero-filled buffer of `size` bytes, ready for sequential writes.
    pub fn allocate(size: usize) -> Self {
        Self {
            buffer: vec![0u8; size],
            position: 0,
        }
    }
}

impl<B: AsRef<[u8]>> Cursor<B> {
    pub fn from_bytes(buffer: B) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.buffer.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> usize {
        self.len() - self.position
    }

    pub fn get_ref(&self) -> &B {
        &self.buffer
    }

    pub fn into_inner(self) -> B {
        self.buffer
    }

    fn out_of_bounds(&self, requested: usize) -> CursorError {
        CursorError {
            position: self.position,
            requested,
            remaining: self.remaining(),
        }
    }

    fn take(&mut self, n: usize) -> Result<&[u8], CursorError> {
        if n > self.remaining() {
            return Err(self.out_of_bounds(n));
        }
        let start = self.position;
        self.position += n;
        Ok(&self.buffer.as_ref()[start..self.position])
    }

    pub fn read_len(&mut self, len: ReadLen) -> Result<&[u8], CursorError> {
        let n = match len {
            ReadLen::Exact(n) => n,
            ReadLen::AllBut(n) => self
                .remaining()
                .checked_sub(n)
                .ok_or_else(|| self.out_of_bounds(n))?,
            ReadLen::Remaining => self.remaining(),
        };
        self.take(n)
    }

    /// Returns the next `n` bytes.
    pub fn read(&mut self, n: usize) -> Result<&[u8], CursorError> {
        self.read_len(ReadLen::Exact(n))
    }

    /// Returns everything except the last `n` bytes of the buffer.
    pub fn read_all_but(&mut self, n: usize) -> Result<&[u8], CursorError> {
        self.read_len(ReadLen::AllBut(n))
    }

    pub fn read_remaining(&mut self) -> &[u8] {
        let start = self.position;
        self.position = self.len();
        &self.buffer.as_ref()[start..]
    }

    pub fn read_fixed<T: FixedWidth>(&mut self) -> Result<T, CursorError> {
        self.take(T::WIDTH).map(T::from_be_slice)
    }

    /// Moves the position by `delta` without touching the buffer.
    pub fn offset(&mut self, delta: isize) -> Result<&mut Self, CursorError> {
        let target = self
            .position
            .checked_add_signed(delta)
            .filter(|target| *target <= self.len())
            .ok_or_else(|| self.out_of_bounds(delta.unsigned_abs()))?;
        self.position = target;
        Ok(self)
    }

    pub fn reset(&mut self) -> &mut Self {
        self.position = 0;
        self
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Cursor<B> {
    fn take_mut(&mut self, n: usize) -> Result<&mut [u8], CursorError> {
        if n > self.remaining() {
            return Err(self.out_of_bounds(n));
        }
        let start = self.position;
        self.position += n;
        Ok(&mut self.buffer.as_mut()[start..start + n])
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<&mut Self, CursorError> {
        self.take_mut(bytes.len())?.copy_from_slice(bytes);
        Ok(self)
    }

    pub fn write_fixed<T: FixedWidth>(&mut self, value: T) -> Result<&mut Self, CursorError> {
        value.write_be(self.take_mut(T::WIDTH)?);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_reads_advance_position() {
        let mut cursor = Cursor::from_bytes(&b"abcdef"[..]);

        assert_eq!(cursor.read(2).unwrap(), b"ab");
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.read(3).unwrap(), b"cde");
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn read_past_end_fails_without_moving() {
        let mut cursor = Cursor::from_bytes(&b"abc"[..]);
        cursor.read(1).unwrap();

        let err = cursor.read(5).unwrap_err();

        assert_eq!(
            err,
            CursorError {
                position: 1,
                requested: 5,
                remaining: 2
            }
        );
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn read_all_but_leaves_trailer() {
        let mut cursor = Cursor::from_bytes(&b"IVcipherTAG"[..]);

        assert_eq!(cursor.read(2).unwrap(), b"IV");
        assert_eq!(cursor.read_all_but(3).unwrap(), b"cipher");
        assert_eq!(cursor.read_remaining(), b"TAG");
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn read_all_but_zero_is_remaining() {
        let mut cursor = Cursor::from_bytes(vec![1u8, 2, 3]);
        cursor.read(1).unwrap();

        assert_eq!(cursor.read_len(ReadLen::AllBut(0)).unwrap(), &[2, 3]);
    }

    #[test]
    fn read_all_but_more_than_remaining_fails() {
        let mut cursor = Cursor::from_bytes(&b"abcd"[..]);
        cursor.read(2).unwrap();

        assert!(cursor.read_all_but(3).is_err());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn read_remaining_on_exhausted_cursor_is_empty() {
        let mut cursor = Cursor::from_bytes(&b"ab"[..]);
        cursor.read(2).unwrap();

        assert!(cursor.read_remaining().is_empty());
    }

    #[test]
    fn chained_writes_fill_buffer() {
        let mut cursor = Cursor::allocate(7);
        cursor
            .write_fixed(0x01u8)
            .unwrap()
            .write_fixed(0x0203u16)
            .unwrap()
            .write(b"xyz")
            .unwrap()
            .write_fixed(0xffu8)
            .unwrap();

        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.into_inner(), vec![1, 2, 3, b'x', b'y', b'z', 0xff]);
    }

    #[test]
    fn write_past_end_fails_without_moving() {
        let mut cursor = Cursor::allocate(3);
        cursor.write(b"ab").unwrap();

        assert!(cursor.write(b"cd").is_err());
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.get_ref(), &vec![b'a', b'b', 0]);
    }

    #[test]
    fn fixed_width_roundtrip_is_big_endian() {
        let mut cursor = Cursor::allocate(14);
        cursor
            .write_fixed(0xdead_beefu32)
            .unwrap()
            .write_fixed(0x0102_0304_0506_0708u64)
            .unwrap()
            .write_fixed(7u16)
            .unwrap();
        assert_eq!(&cursor.get_ref()[..4], &[0xde, 0xad, 0xbe, 0xef]);

        cursor.reset();
        assert_eq!(cursor.read_fixed::<u32>().unwrap(), 0xdead_beef);
        assert_eq!(cursor.read_fixed::<u64>().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(cursor.read_fixed::<u16>().unwrap(), 7);
        assert!(cursor.read_fixed::<u8>().is_err());
    }

    #[test]
    fn offset_moves_both_ways_within_bounds() {
        let mut cursor = Cursor::from_bytes(&b"abcdef"[..]);

        cursor.offset(4).unwrap();
        assert_eq!(cursor.read(1).unwrap(), b"e");
        cursor.offset(-3).unwrap();
        assert_eq!(cursor.read(1).unwrap(), b"c");

        assert!(cursor.offset(-10).is_err());
        assert!(cursor.offset(4).is_err());
        assert_eq!(cursor.position(), 3);
        cursor.offset(3).unwrap();
        assert_eq!(cursor.remaining(), 0);
    }
}
