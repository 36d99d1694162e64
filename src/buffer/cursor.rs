//! buffer/cursor — потоковый доступ (Read/Write/Seek) к PagedBuffer.
//!
//! - read: читает с текущей позиции, сдвигается на реально прочитанное.
//! - write: пишет с текущей позиции (растит буфер при необходимости).
//! - seek: результат обрезается по len; отрицательная позиция -> InvalidInput (ChunkError::InvalidArgument).
//! - set_position: позиция может указывать за len; следующая запись заполнит разрыв нулями.

use std::io::{self, Read, Seek, SeekFrom, Write};

use super::paged::PagedBuffer;
use crate::error::ChunkError;

pub struct BufferCursor<'a> {
    buf: &'a mut PagedBuffer,
    pos: usize,
}

impl<'a> BufferCursor<'a> {
    pub fn new(buf: &'a mut PagedBuffer) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Длина нижележащего буфера.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Переустановить длину буфера (позиция не меняется).
    pub fn set_len(&mut self, len: usize) -> anyhow::Result<()> {
        self.buf.set_len(len)
    }

    pub fn get_ref(&self) -> &PagedBuffer {
        self.buf
    }
}

fn invalid_input(e: ChunkError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e)
}

impl Read for BufferCursor<'_> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = self.buf.read(self.pos, out);
        self.pos += n;
        Ok(n)
    }
}

impl Write for BufferCursor<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let end = self.pos.checked_add(data.len()).ok_or_else(|| {
            invalid_input(ChunkError::invalid("cursor write range overflows usize"))
        })?;
        self.buf
            .write(self.pos, data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        self.pos = end;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for BufferCursor<'_> {
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        let len = self.buf.len() as i128;
        let target: i128 = match from {
            SeekFrom::Start(off) => off as i128,
            SeekFrom::Current(off) => self.pos as i128 + off as i128,
            SeekFrom::End(off) => len + off as i128,
        };
        if target < 0 {
            return Err(invalid_input(ChunkError::invalid(format!(
                "seek to negative position {}",
                target
            ))));
        }
        self.pos = target.min(len) as usize;
        Ok(self.pos as u64)
    }
}
