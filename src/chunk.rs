//! chunk — Chunk: упорядоченная последовательность секций (контейнер без общего заголовка).
//!
//! - Чтение: секции читаются подряд, пока до конца потока остаётся хотя бы SECTION_HDR_SIZE байт.
//! - Запись: секции пишутся в порядке хранения.
//! - Имена могут повторяться; поиск по имени сравнивает 4-байтовый тег.
//! - Отрицательные длины двигают курсор назад; число секций за одно чтение ограничено
//!   ChunkConfig::max_sections (иначе OutOfRange).

use anyhow::{Context, Result};
use log::debug;
use std::io::{Cursor, Read, Seek, Write};

use crate::config::ChunkConfig;
use crate::consts::SECTION_HDR_SIZE;
use crate::error::ChunkError;
use crate::record::{Record, RecordChain};
use crate::section::{encode_name, Section};
use crate::util::stream_len;

#[derive(Debug, Default, Clone)]
pub struct Chunk {
    sections: Vec<Section>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------- (de)serialization ----------------

    /// Прочитать контейнер от текущей позиции до конца потока (конфигурация из env).
    pub fn read_from<S: Read + Seek>(stream: &mut S) -> Result<Self> {
        Self::read_from_with_config(stream, &ChunkConfig::from_env())
    }

    pub fn read_from_with_config<S: Read + Seek>(stream: &mut S, cfg: &ChunkConfig) -> Result<Self> {
        let end = stream_len(stream)?;
        let mut pos = stream.stream_position().context("query stream position")?;
        let mut sections = Vec::new();

        while end.saturating_sub(pos) >= SECTION_HDR_SIZE as u64 {
            if sections.len() >= cfg.max_sections {
                return Err(ChunkError::out_of_range(format!(
                    "more than {} sections (skip loop?) at offset {}",
                    cfg.max_sections, pos
                ))
                .into());
            }
            let s = Section::read_from_with_config(stream, cfg)
                .with_context(|| format!("read section #{} at offset {}", sections.len(), pos))?;
            sections.push(s);
            pos = stream.stream_position().context("query stream position")?;
        }

        debug!(
            "chunk read: {} section(s), stopped at {} of {}",
            sections.len(),
            pos,
            end
        );
        Ok(Self { sections })
    }

    /// Прочитать контейнер из среза байт.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(&mut Cursor::new(bytes))
    }

    /// Записать все секции по порядку.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (i, s) in self.sections.iter().enumerate() {
            s.write_to(writer)
                .with_context(|| format!("write section #{} ({})", i, s.name()))?;
        }
        debug!("chunk write: {} section(s)", self.sections.len());
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Размер сериализованного контейнера.
    pub fn encoded_len(&self) -> usize {
        self.sections.iter().map(Section::encoded_len).sum()
    }

    // ---------------- list ----------------

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Section> {
        self.sections.iter_mut()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    /// Создать новую секцию в конце и вернуть её.
    pub fn add(&mut self, name: &str) -> &mut Section {
        let idx = self.sections.len();
        self.sections.push(Section::new(name));
        &mut self.sections[idx]
    }

    /// Как add, но payload новой секции получает block_size из cfg.
    pub fn add_with_config(&mut self, name: &str, cfg: &ChunkConfig) -> Result<&mut Section> {
        let idx = self.sections.len();
        self.sections.push(Section::new_with_config(name, cfg)?);
        Ok(&mut self.sections[idx])
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Создать новую секцию на позиции `index` (0..=len).
    pub fn insert(&mut self, index: usize, name: &str) -> Result<&mut Section> {
        self.insert_section(index, Section::new(name))?;
        Ok(&mut self.sections[index])
    }

    pub fn insert_section(&mut self, index: usize, section: Section) -> Result<()> {
        if index > self.sections.len() {
            return Err(ChunkError::index(index, self.sections.len()).into());
        }
        self.sections.insert(index, section);
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Section> {
        if index >= self.sections.len() {
            return Err(ChunkError::index(index, self.sections.len()).into());
        }
        Ok(self.sections.remove(index))
    }

    /// Удалить все секции с этим именем. Возвращает число удалённых.
    pub fn remove(&mut self, name: &str) -> usize {
        let tag = encode_name(name);
        let before = self.sections.len();
        self.sections.retain(|s| s.tag() != &tag);
        before - self.sections.len()
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    /// Освободить payload всех секций и очистить список. Повторный вызов безопасен.
    pub fn dispose(&mut self) {
        for s in self.sections.iter_mut() {
            s.dispose();
        }
        self.sections.clear();
    }

    // ---------------- find ----------------

    pub fn index_of(&self, name: &str) -> Option<usize> {
        let tag = encode_name(name);
        self.sections.iter().position(|s| s.tag() == &tag)
    }

    pub fn last_index_of(&self, name: &str) -> Option<usize> {
        let tag = encode_name(name);
        self.sections.iter().rposition(|s| s.tag() == &tag)
    }

    /// Все индексы секций с этим именем (лениво, по возрастанию).
    pub fn find<'c>(&'c self, name: &str) -> impl Iterator<Item = usize> + 'c {
        let tag = encode_name(name);
        self.sections
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.tag() == &tag)
            .map(|(i, _)| i)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Все секции с этим именем.
    pub fn sections_named<'c>(&'c self, name: &str) -> impl Iterator<Item = &'c Section> + 'c {
        let tag = encode_name(name);
        self.sections.iter().filter(move |s| s.tag() == &tag)
    }

    // ---------------- ordering ----------------

    /// Сортировка по тегу (побайтово, стабильно).
    pub fn sort(&mut self) {
        self.sections.sort_by(|a, b| a.tag().cmp(b.tag()));
    }

    /// Сортировка по позиции имени в `priority`. Отсутствующие в списке идут после всех
    /// перечисленных и сохраняют взаимный порядок.
    pub fn sort_by_priority(&mut self, priority: &[&str]) {
        let tags: Vec<[u8; 4]> = priority.iter().map(|n| encode_name(n)).collect();
        self.sections.sort_by_key(|s| {
            tags.iter()
                .position(|t| t == s.tag())
                .unwrap_or(usize::MAX)
        });
    }

    // ---------------- records ----------------

    /// Цепочка записей R поверх payload всех inline-секций с этим именем (в порядке хранения).
    pub fn records<R: Record>(&mut self, name: &str) -> Result<RecordChain<'_, R>> {
        let tag = encode_name(name);
        RecordChain::new(
            self.sections
                .iter_mut()
                .filter(|s| s.tag() == &tag && !s.is_skip())
                .map(|s| s.data_mut()),
        )
    }
}

impl std::ops::Index<usize> for Chunk {
    type Output = Section;

    fn index(&self, index: usize) -> &Section {
        &self.sections[index]
    }
}

impl std::ops::IndexMut<usize> for Chunk {
    fn index_mut(&mut self, index: usize) -> &mut Section {
        &mut self.sections[index]
    }
}

impl<'c> IntoIterator for &'c Chunk {
    type Item = &'c Section;
    type IntoIter = std::slice::Iter<'c, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl FromIterator<Section> for Chunk {
    fn from_iter<I: IntoIterator<Item = Section>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}
