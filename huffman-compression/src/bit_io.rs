//! Bit level access to byte streams.
//!
//! Bits are packed most significant bit first. The writer zero pads the last
//! byte, so a reader has to be told how many bits are real: it never reports
//! padding as data.

use std::{
    io::{self, Read, Write},
    mem,
};

use bit_vec::BitVec;

const BITS_PER_BYTE: usize = 8;

pub struct BitWriter<W: Write> {
    inner: W,
    pending: BitVec,
    bits_written: usize,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: BitVec::with_capacity(BITS_PER_BYTE),
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.pending.push(bit);
        self.bits_written += 1;
        if self.pending.len() == BITS_PER_BYTE {
            self.write_pending()?;
        }
        Ok(())
    }

    pub fn write_bits(&mut self, bits: impl IntoIterator<Item = bool>) -> io::Result<()> {
        bits.into_iter().try_for_each(|bit| self.write_bit(bit))
    }

    pub fn bits_written(&self) -> usize {
        self.bits_written
    }

    /// Pads and writes the trailing partial byte, then flushes.
    pub fn close(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            self.write_pending()?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn write_pending(&mut self) -> io::Result<()> {
        let pending = mem::take(&mut self.pending);
        self.inner.write_all(&pending.to_bytes())
    }
}

pub struct BitReader<R: Read> {
    inner: R,
    current: BitVec,
    position: usize,
    remaining: usize,
}

impl<R: Read> BitReader<R> {
    /// `bit_count` is the logical length of the stream, padding excluded.
    pub fn new(inner: R, bit_count: usize) -> Self {
        Self {
            inner,
            current: BitVec::new(),
            position: 0,
            remaining: bit_count,
        }
    }

    pub fn has_next(&self) -> bool {
        self.remaining > 0
    }

    pub fn read_bit(&mut self) -> io::Result<bool> {
        if !self.has_next() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no bits left in the stream",
            ));
        }

        if self.position == self.current.len() {
            let mut buffer = [0; 1];
            self.inner.read_exact(&mut buffer)?;
            self.current = BitVec::from_bytes(&buffer);
            self.position = 0;
        }

        let bit = self.current[self.position];
        self.position += 1;
        self.remaining -= 1;
        Ok(bit)
    }

    /// Gives back the underlying reader, positioned after the last byte a
    /// bit was read from.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for BitReader<R> {
    type Item = io::Result<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        self.has_next().then(|| self.read_bit())
    }
}
