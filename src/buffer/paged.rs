//! buffer/paged — PagedBuffer: байтовый буфер из блоков фиксированного размера.
//!
//! Модель:
//! - blocks: арена собственных блоков `Box<[u8]>` длиной block_size, индекс = номер блока.
//! - len: логическая длина; инвариант blocks.len() == ceil(len / block_size) после каждой мутации.
//! - Длина меняется только через set_len()/truncate(): добавление/освобождение хвостовых
//!   блоков, без копирования уже существующих данных.
//! - Байты за пределами len внутри выделенных блоков всегда нулевые: новые блоки выделяются
//!   обнулёнными, а при усечении хвост последнего оставшегося блока зачищается. Поэтому
//!   повторный рост всегда показывает нули.

use anyhow::{Context, Result};
use log::debug;
use std::io::{ErrorKind, Read, Write};

use crate::consts::DEFAULT_BLOCK_SIZE;
use crate::error::ChunkError;
use crate::metrics::{record_blocks_allocated, record_blocks_released};

pub struct PagedBuffer {
    block_size: usize,
    blocks: Vec<Box<[u8]>>,
    len: usize,
}

impl PagedBuffer {
    /// Пустой буфер с заданным размером блока.
    pub fn new(block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(ChunkError::invalid("block_size must be > 0").into());
        }
        Ok(Self {
            block_size,
            blocks: Vec::new(),
            len: 0,
        })
    }

    /// Пустой буфер для статических ссылок (block_size по умолчанию, без аллокаций).
    pub(crate) const fn empty_const() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            blocks: Vec::new(),
            len: 0,
        }
    }

    /// Буфер заданной длины (содержимое обнулено).
    pub fn with_len(block_size: usize, len: usize) -> Result<Self> {
        let mut b = Self::new(block_size)?;
        b.set_len(len)?;
        Ok(b)
    }

    /// Создать буфер, вычитав источник до EOF или до `cap` байт.
    pub fn from_reader<R: Read>(reader: &mut R, block_size: usize, cap: Option<usize>) -> Result<Self> {
        let mut b = Self::new(block_size)?;
        b.drain(reader, cap)?;
        Ok(b)
    }

    /// Буфер из готового среза (удобно для тестов и CLI).
    pub fn from_slice(block_size: usize, data: &[u8]) -> Result<Self> {
        let mut b = Self::new(block_size)?;
        b.write(0, data)?;
        Ok(b)
    }

    // ---------------- length ----------------

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    fn blocks_for(&self, len: usize) -> usize {
        len.div_ceil(self.block_size)
    }

    /// Число живых байт в последнем блоке (block_size при кратной длине).
    #[inline]
    fn last_block_used(&self) -> usize {
        match self.len % self.block_size {
            0 => self.block_size,
            rem => rem,
        }
    }

    /// Установить логическую длину. Единственный путь роста/усечения.
    /// Рост, для которого не удаётся выделить память, -> OutOfRange (буфер не меняется).
    pub fn set_len(&mut self, new_len: usize) -> Result<()> {
        let want = self.blocks_for(new_len);
        let have = self.blocks.len();

        if want > have {
            self.blocks.try_reserve(want - have).map_err(|e| {
                ChunkError::out_of_range(format!(
                    "cannot grow buffer to {} bytes ({} blocks): {}",
                    new_len, want, e
                ))
            })?;
            for _ in have..want {
                self.blocks.push(vec![0u8; self.block_size].into_boxed_slice());
            }
            record_blocks_allocated(want - have);
            self.len = new_len;
            return Ok(());
        }

        self.truncate(new_len);
        self.len = new_len;
        Ok(())
    }

    /// Усечь до `new_len` (no-op, если new_len >= len). Освобождает хвостовые блоки
    /// и зачищает мёртвый хвост последнего оставшегося блока.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let want = self.blocks_for(new_len);
        let have = self.blocks.len();
        if want < have {
            self.blocks.truncate(want);
            record_blocks_released(have - want);
        }
        if want > 0 {
            let live = new_len - (want - 1) * self.block_size;
            self.blocks[want - 1][live..].fill(0);
        }
        self.len = new_len;
    }

    /// Освободить все блоки (len = 0). Идемпотентно.
    pub fn release(&mut self) {
        self.truncate(0);
        self.blocks.shrink_to_fit();
    }

    // ---------------- random access ----------------

    /// Прочитать байты с позиции `pos` в `dst`.
    /// Возвращает число реально прочитанных байт (обрезается по len; pos >= len -> 0).
    pub fn read(&self, pos: usize, dst: &mut [u8]) -> usize {
        if pos >= self.len || dst.is_empty() {
            return 0;
        }
        let count = dst.len().min(self.len - pos);
        let bs = self.block_size;

        let first = pos / bs;
        let last = (pos + count - 1) / bs;
        let head_off = pos % bs;

        if first == last {
            dst[..count].copy_from_slice(&self.blocks[first][head_off..head_off + count]);
            return count;
        }

        // Голова: хвост первого блока
        let head = bs - head_off;
        dst[..head].copy_from_slice(&self.blocks[first][head_off..]);
        let mut done = head;

        // Внутренние блоки целиком
        for i in first + 1..last {
            dst[done..done + bs].copy_from_slice(&self.blocks[i]);
            done += bs;
        }

        // Хвост: начало последнего блока
        let tail = count - done;
        dst[done..count].copy_from_slice(&self.blocks[last][..tail]);
        count
    }

    /// Записать `src` с позиции `pos`. При выходе за len сначала растит буфер через set_len.
    pub fn write(&mut self, pos: usize, src: &[u8]) -> Result<()> {
        if src.is_empty() {
            return Ok(());
        }
        let end = pos.checked_add(src.len()).ok_or_else(|| {
            ChunkError::invalid(format!("write range overflows: pos={} len={}", pos, src.len()))
        })?;
        if end > self.len {
            self.set_len(end)?;
        }

        let bs = self.block_size;
        let count = src.len();
        let first = pos / bs;
        let last = (end - 1) / bs;
        let head_off = pos % bs;

        if first == last {
            self.blocks[first][head_off..head_off + count].copy_from_slice(src);
            return Ok(());
        }

        let head = bs - head_off;
        self.blocks[first][head_off..].copy_from_slice(&src[..head]);
        let mut done = head;

        for i in first + 1..last {
            self.blocks[i].copy_from_slice(&src[done..done + bs]);
            done += bs;
        }

        let tail = count - done;
        self.blocks[last][..tail].copy_from_slice(&src[done..]);
        Ok(())
    }

    /// Скопировать всё логическое содержимое в Vec.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.len];
        let n = self.read(0, &mut out);
        debug_assert_eq!(n, self.len);
        out
    }

    // ---------------- stream I/O ----------------

    /// Дочитать источник в конец буфера блоками по block_size.
    /// Останавливается на коротком чтении, EOF или при достижении `cap` байт.
    /// Возвращает число добавленных байт.
    pub fn drain<R: Read>(&mut self, reader: &mut R, cap: Option<usize>) -> Result<usize> {
        let bs = self.block_size;
        let mut total = 0usize;

        loop {
            // Первый запрос выравнивает len на границу блока
            let mut want = bs - self.len % bs;
            if let Some(c) = cap {
                want = want.min(c - total);
            }
            if want == 0 {
                debug!("paged buffer drain: cap {:?} reached after {} bytes", cap, total);
                break;
            }

            let n = if self.len % bs == 0 {
                // Читаем прямо в новый блок, без промежуточной копии
                let mut block = vec![0u8; bs].into_boxed_slice();
                let n = read_full(reader, &mut block[..want])?;
                if n == 0 {
                    break;
                }
                self.blocks.push(block);
                record_blocks_allocated(1);
                self.len += n;
                n
            } else {
                let mut tmp = vec![0u8; want];
                let n = read_full(reader, &mut tmp)?;
                if n == 0 {
                    break;
                }
                let at = self.len;
                self.write(at, &tmp[..n])?;
                n
            };

            total += n;
            if n < want {
                break;
            }
        }
        Ok(total)
    }

    /// Записать содержимое: внутренние блоки целиком, у последнего — только живые байты.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let Some((last, interior)) = self.blocks.split_last() else {
            return Ok(());
        };
        for block in interior {
            writer.write_all(block).context("write paged buffer block")?;
        }
        writer
            .write_all(&last[..self.last_block_used()])
            .context("write paged buffer tail block")?;
        Ok(())
    }
}

/// Читать, пока не заполнится `buf` или источник не вернёт 0.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("read into paged buffer"),
        }
    }
    Ok(filled)
}

impl Default for PagedBuffer {
    fn default() -> Self {
        Self::empty_const()
    }
}

impl Clone for PagedBuffer {
    fn clone(&self) -> Self {
        record_blocks_allocated(self.blocks.len());
        Self {
            block_size: self.block_size,
            blocks: self.blocks.clone(),
            len: self.len,
        }
    }
}

impl Drop for PagedBuffer {
    fn drop(&mut self) {
        record_blocks_released(self.blocks.len());
    }
}

impl std::fmt::Debug for PagedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedBuffer")
            .field("block_size", &self.block_size)
            .field("blocks", &self.blocks.len())
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 3) as u8).collect()
    }

    #[test]
    fn zero_block_size_rejected() {
        let err = PagedBuffer::new(0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChunkError>(),
            Some(ChunkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn set_len_keeps_block_invariant() {
        let mut b = PagedBuffer::new(16).unwrap();
        assert_eq!(b.block_count(), 0);
        for n in [1usize, 15, 16, 17, 33, 64, 0, 5] {
            b.set_len(n).unwrap();
            assert_eq!(b.len(), n);
            assert_eq!(b.block_count(), n.div_ceil(16), "len={}", n);
        }
        b.set_len(0).unwrap();
        assert_eq!(b.block_count(), 0);
    }

    #[test]
    fn set_len_idempotent() {
        let mut b = PagedBuffer::new(8).unwrap();
        b.set_len(21).unwrap();
        let (l1, c1) = (b.len(), b.block_count());
        b.set_len(21).unwrap();
        assert_eq!((b.len(), b.block_count()), (l1, c1));
    }

    #[test]
    fn roundtrip_single_two_and_many_blocks() {
        let mut b = PagedBuffer::new(10).unwrap();
        b.set_len(100).unwrap();
        // (pos, count): внутри одного блока, через одну границу, через несколько
        for &(pos, count) in &[(2usize, 5usize), (7, 6), (3, 45), (0, 100)] {
            let src = pattern(count);
            b.write(pos, &src).unwrap();
            let mut dst = vec![0u8; count];
            assert_eq!(b.read(pos, &mut dst), count);
            assert_eq!(dst, src, "pos={} count={}", pos, count);
        }
    }

    #[test]
    fn read_is_clamped_to_len() {
        let mut b = PagedBuffer::new(4).unwrap();
        b.write(0, &[1, 2, 3, 4, 5, 6]).unwrap();
        let mut dst = [0u8; 10];
        assert_eq!(b.read(4, &mut dst), 2);
        assert_eq!(&dst[..2], &[5, 6]);
        assert_eq!(b.read(6, &mut dst), 0);
        assert_eq!(b.read(100, &mut dst), 0);
    }

    #[test]
    fn write_past_end_grows() {
        let mut b = PagedBuffer::new(4).unwrap();
        b.write(9, &[0xAA, 0xBB]).unwrap();
        assert_eq!(b.len(), 11);
        assert_eq!(b.block_count(), 3);
        let v = b.to_vec();
        assert!(v[..9].iter().all(|&x| x == 0));
        assert_eq!(&v[9..], &[0xAA, 0xBB]);
    }

    #[test]
    fn shrink_then_grow_observes_zeros() {
        let mut b = PagedBuffer::new(8).unwrap();
        b.write(0, &[0xFF; 12]).unwrap();
        b.set_len(10).unwrap();
        b.set_len(12).unwrap();
        assert_eq!(&b.to_vec()[10..], &[0, 0]);
    }

    #[test]
    fn grow_then_shrink_preserves_prefix() {
        let mut b = PagedBuffer::new(8).unwrap();
        let src = pattern(20);
        b.write(0, &src).unwrap();
        b.set_len(100).unwrap();
        b.set_len(20).unwrap();
        assert_eq!(b.to_vec(), src);
    }

    #[test]
    fn drain_with_and_without_cap() {
        let data = pattern(50);

        let b = PagedBuffer::from_reader(&mut Cursor::new(&data), 16, None).unwrap();
        assert_eq!(b.len(), 50);
        assert_eq!(b.block_count(), 4);
        assert_eq!(b.to_vec(), data);

        let mut cur = Cursor::new(&data);
        let b = PagedBuffer::from_reader(&mut cur, 16, Some(20)).unwrap();
        assert_eq!(b.len(), 20);
        assert_eq!(b.to_vec(), &data[..20]);
        assert_eq!(cur.position(), 20, "drain must not consume past the cap");
    }

    #[test]
    fn drain_appends_to_unaligned_buffer() {
        let mut b = PagedBuffer::from_slice(8, &[9, 9, 9]).unwrap();
        let data = pattern(20);
        let n = b.drain(&mut Cursor::new(&data), None).unwrap();
        assert_eq!(n, 20);
        assert_eq!(b.len(), 23);
        assert_eq!(b.block_count(), 3);
        assert_eq!(&b.to_vec()[3..], &data[..]);
    }

    #[test]
    fn write_to_emits_only_live_bytes() {
        for len in [0usize, 1, 7, 8, 9, 24] {
            let src = pattern(len);
            let b = PagedBuffer::from_slice(8, &src).unwrap();
            let mut out = Vec::new();
            b.write_to(&mut out).unwrap();
            assert_eq!(out, src, "len={}", len);
        }
    }

    #[test]
    fn unallocatable_growth_is_an_error() {
        let mut b = PagedBuffer::from_slice(1, &[7, 8]).unwrap();
        let err = b.set_len(usize::MAX).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChunkError>(),
            Some(ChunkError::OutOfRange(_))
        ));
        // буфер не изменился
        assert_eq!(b.to_vec(), vec![7, 8]);
        assert_eq!(b.block_count(), 2);
    }

    #[test]
    fn truncate_never_grows() {
        let mut b = PagedBuffer::from_slice(4, &[1; 10]).unwrap();
        b.truncate(20);
        assert_eq!(b.len(), 10);
        b.truncate(5);
        assert_eq!(b.block_count(), 2);
        b.set_len(8).unwrap();
        assert_eq!(b.to_vec(), vec![1, 1, 1, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn release_is_idempotent() {
        let mut b = PagedBuffer::from_slice(4, &[1; 10]).unwrap();
        b.release();
        b.release();
        assert_eq!(b.len(), 0);
        assert_eq!(b.block_count(), 0);
    }
}
