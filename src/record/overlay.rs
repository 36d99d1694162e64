//! record/overlay — RecordOverlay: PagedBuffer как плотная последовательность записей R.
//!
//! - count = ceil(len / R::SIZE); частичная последняя запись видна и читается с нулевым хвостом.
//! - Вся мутация идёт через read/write/truncate буфера; своего состояния у overlay нет.
//! - Конец записи ограничен SECTION_MAX_LEN (payload секции больше не бывает), иначе OutOfRange.
//! - Сдвиги (insert/remove/remove_at) копируют сырые байты записей и только потом усекают длину.

use anyhow::Result;
use std::marker::PhantomData;

use super::Record;
use crate::buffer::PagedBuffer;
use crate::consts::SECTION_MAX_LEN;
use crate::error::ChunkError;

pub struct RecordOverlay<'a, R: Record> {
    buf: &'a mut PagedBuffer,
    _rec: PhantomData<R>,
}

impl<'a, R: Record> RecordOverlay<'a, R> {
    pub fn new(buf: &'a mut PagedBuffer) -> Result<Self> {
        if R::SIZE == 0 {
            return Err(ChunkError::invalid("record type has zero size").into());
        }
        Ok(Self {
            buf,
            _rec: PhantomData,
        })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.buf.len().div_ceil(R::SIZE)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn record_size(&self) -> usize {
        R::SIZE
    }

    pub fn buffer(&self) -> &PagedBuffer {
        self.buf
    }

    /// Байтовое смещение записи; конец записи за SECTION_MAX_LEN (или переполнение) -> OutOfRange.
    fn offset_of(index: usize) -> Result<usize> {
        index
            .checked_mul(R::SIZE)
            .filter(|off| off.checked_add(R::SIZE).is_some_and(|end| end <= SECTION_MAX_LEN))
            .ok_or_else(|| {
                ChunkError::out_of_range(format!(
                    "record {} (size {}) ends past {} bytes",
                    index,
                    R::SIZE,
                    SECTION_MAX_LEN
                ))
                .into()
            })
    }

    fn read_raw(&self, index: usize) -> Result<Vec<u8>> {
        let mut tmp = vec![0u8; R::SIZE];
        self.buf.read(Self::offset_of(index)?, &mut tmp);
        Ok(tmp)
    }

    fn write_raw(&mut self, index: usize, raw: &[u8]) -> Result<()> {
        let off = Self::offset_of(index)?;
        self.buf.write(off, raw)
    }

    #[inline]
    fn copy_record(&mut self, from: usize, to: usize) -> Result<()> {
        let raw = self.read_raw(from)?;
        self.write_raw(to, &raw)
    }

    /// Прочитать запись по индексу (index < count).
    pub fn get(&self, index: usize) -> Result<R> {
        let count = self.count();
        if index >= count {
            return Err(ChunkError::index(index, count).into());
        }
        Ok(R::decode(&self.read_raw(index)?))
    }

    /// Записать запись по индексу. Индекс за концом растит буфер (дыра заполняется нулями).
    pub fn set(&mut self, index: usize, value: &R) -> Result<()> {
        let raw = value.to_bytes();
        self.write_raw(index, &raw)
    }

    /// Добавить запись в конец (≡ set(count, value)).
    pub fn add(&mut self, value: &R) -> Result<()> {
        let at = self.count();
        self.set(at, value)
    }

    /// Вставить запись на позицию `index` (0..=count), сдвинув хвост вперёд.
    pub fn insert(&mut self, index: usize, value: &R) -> Result<()> {
        let count = self.count();
        if index > count {
            return Err(ChunkError::index(index, count).into());
        }
        // Сдвиг начиная со старшего индекса, чтобы не затирать ещё не скопированное
        for i in (index + 1..=count).rev() {
            self.copy_record(i - 1, i)?;
        }
        self.set(index, value)
    }

    /// Удалить по индексу, сдвинув хвост назад и усечь на одну запись.
    pub fn remove_at(&mut self, index: usize) -> Result<()> {
        let count = self.count();
        if index >= count {
            return Err(ChunkError::index(index, count).into());
        }
        for i in index + 1..count {
            self.copy_record(i, i - 1)?;
        }
        self.buf.truncate((count - 1) * R::SIZE);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buf.truncate(0);
    }

    /// Итератор по записям [0, count). Повторный вызов начинает заново.
    pub fn iter(&self) -> RecordIter<'_, R> {
        RecordIter::new(self.buf)
    }
}

impl<'a, R: Record + PartialEq> RecordOverlay<'a, R> {
    /// Удалить ВСЕ записи, равные `value`, уплотнив остаток. true, если удалено хоть что-то.
    pub fn remove(&mut self, value: &R) -> Result<bool> {
        let count = self.count();
        let mut removed = 0usize;
        for i in 0..count {
            let raw = self.read_raw(i)?;
            if R::decode(&raw) == *value {
                removed += 1;
            } else if removed > 0 {
                self.write_raw(i - removed, &raw)?;
            }
        }
        if removed > 0 {
            self.buf.truncate((count - removed) * R::SIZE);
        }
        Ok(removed > 0)
    }

    pub fn index_of(&self, value: &R) -> Option<usize> {
        self.iter().position(|r| r == *value)
    }

    pub fn contains(&self, value: &R) -> bool {
        self.index_of(value).is_some()
    }
}

/// Ленивый конечный обход записей буфера (только чтение).
pub struct RecordIter<'b, R: Record> {
    buf: &'b PagedBuffer,
    index: usize,
    count: usize,
    _rec: PhantomData<R>,
}

impl<'b, R: Record> RecordIter<'b, R> {
    /// Обход записей прямо по буферу, без overlay (нужен только &PagedBuffer).
    pub fn new(buf: &'b PagedBuffer) -> Self {
        let count = if R::SIZE == 0 { 0 } else { buf.len().div_ceil(R::SIZE) };
        Self {
            buf,
            index: 0,
            count,
            _rec: PhantomData,
        }
    }
}

impl<R: Record> Iterator for RecordIter<'_, R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        if self.index >= self.count {
            return None;
        }
        let mut tmp = vec![0u8; R::SIZE];
        // index < count => смещение представимо
        self.buf.read(self.index * R::SIZE, &mut tmp);
        self.index += 1;
        Some(R::decode(&tmp))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}

impl<R: Record> ExactSizeIterator for RecordIter<'_, R> {}
