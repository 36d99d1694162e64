//! record/chain — RecordChain: несколько RecordOverlay (каждый над своим буфером)
//! как одна логическая последовательность.
//!
//! Индексные операции идут по сегментам, вычитая count каждого, пока индекс не попадёт
//! в диапазон сегмента; иначе IndexOutOfRange. add всегда пишет в последний сегмент.

use anyhow::Result;

use super::overlay::RecordOverlay;
use super::Record;
use crate::buffer::PagedBuffer;
use crate::error::ChunkError;

pub struct RecordChain<'a, R: Record> {
    segments: Vec<RecordOverlay<'a, R>>,
}

impl<'a, R: Record> RecordChain<'a, R> {
    /// Построить цепочку поверх буферов (порядок сохраняется).
    pub fn new<I>(buffers: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a mut PagedBuffer>,
    {
        let segments = buffers
            .into_iter()
            .map(RecordOverlay::<R>::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[RecordOverlay<'a, R>] {
        &self.segments
    }

    pub fn count(&self) -> usize {
        self.segments.iter().map(|s| s.count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// (сегмент, локальный индекс) для index < count.
    fn locate(&self, mut index: usize) -> Option<(usize, usize)> {
        for (si, s) in self.segments.iter().enumerate() {
            let n = s.count();
            if index < n {
                return Some((si, index));
            }
            index -= n;
        }
        None
    }

    pub fn get(&self, index: usize) -> Result<R> {
        match self.locate(index) {
            Some((si, local)) => self.segments[si].get(local),
            None => Err(ChunkError::index(index, self.count()).into()),
        }
    }

    /// Перезаписать существующую запись (только внутри [0, count)).
    pub fn set(&mut self, index: usize, value: &R) -> Result<()> {
        match self.locate(index) {
            Some((si, local)) => self.segments[si].set(local, value),
            None => Err(ChunkError::index(index, self.count()).into()),
        }
    }

    /// Добавить в конец последнего сегмента.
    pub fn add(&mut self, value: &R) -> Result<()> {
        match self.segments.last_mut() {
            Some(last) => last.add(value),
            None => Err(ChunkError::index(0, 0).into()),
        }
    }

    /// Вставка: индекс на границе сегментов попадает в конец более раннего сегмента.
    pub fn insert(&mut self, index: usize, value: &R) -> Result<()> {
        let mut local = index;
        for s in self.segments.iter_mut() {
            let n = s.count();
            if local <= n {
                return s.insert(local, value);
            }
            local -= n;
        }
        Err(ChunkError::index(index, self.count()).into())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<()> {
        match self.locate(index) {
            Some((si, local)) => self.segments[si].remove_at(local),
            None => Err(ChunkError::index(index, self.count()).into()),
        }
    }

    pub fn clear(&mut self) {
        for s in self.segments.iter_mut() {
            s.clear();
        }
    }

    /// Обход всех сегментов подряд.
    pub fn iter(&self) -> impl Iterator<Item = R> + '_ {
        self.segments.iter().flat_map(|s| s.iter())
    }
}

impl<'a, R: Record + PartialEq> RecordChain<'a, R> {
    /// Удаляет совпадения во ВСЕХ сегментах; true, если хоть один сегмент что-то удалил.
    pub fn remove(&mut self, value: &R) -> Result<bool> {
        let mut any = false;
        for s in self.segments.iter_mut() {
            any |= s.remove(value)?;
        }
        Ok(any)
    }

    pub fn index_of(&self, value: &R) -> Option<usize> {
        let mut base = 0usize;
        for s in &self.segments {
            if let Some(i) = s.index_of(value) {
                return Some(base + i);
            }
            base += s.count();
        }
        None
    }

    pub fn contains(&self, value: &R) -> bool {
        self.index_of(value).is_some()
    }
}
