//! section — именованный бинарный блок: 4-байтовый тег + payload в PagedBuffer.
//!
//! Формат (LE):
//! [name 4][len i32][payload len байт, если len > 0]
//!
//! Поле длины двузначно:
//! - len > 0  — inline payload, читается в буфер секции (короткий поток не ошибка:
//!   сохраняется то, что удалось дочитать);
//! - len <= 0 — payload здесь нет, позиция потока сдвигается на len относительно текущей
//!   (skip-кодирование). Секция запоминает исходное len и пишет его обратно при сериализации.

use anyhow::{Context, Result};
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};
use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::buffer::{BufferCursor, PagedBuffer};
use crate::config::ChunkConfig;
use crate::consts::{
    SECTION_HDR_SIZE, SECTION_MAX_LEN, SECTION_NAME_LEN, SECTION_OFF_LEN, SECTION_OFF_NAME,
};
use crate::error::ChunkError;
use crate::metrics::{record_section_read, record_section_skipped, record_section_written};

/// Пустой payload для skip-секций.
static EMPTY_PAYLOAD: PagedBuffer = PagedBuffer::empty_const();

/// Тело секции: собственный payload либо skip-маркер с исходной длиной (<= 0).
#[derive(Debug, Clone)]
pub enum SectionBody {
    Inline(PagedBuffer),
    Skip(i32),
}

#[derive(Debug, Clone)]
pub struct Section {
    name: [u8; SECTION_NAME_LEN],
    body: SectionBody,
}

/// ASCII-тег ровно из 4 байт: обрезка или дополнение нулями. Не-ASCII символы -> '?'.
pub fn encode_name(name: &str) -> [u8; SECTION_NAME_LEN] {
    let mut out = [0u8; SECTION_NAME_LEN];
    for (dst, ch) in out.iter_mut().zip(name.chars()) {
        *dst = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
    out
}

impl Section {
    /// Новая секция с пустым payload (block_size по умолчанию).
    pub fn new(name: &str) -> Self {
        Self::with_tag(encode_name(name))
    }

    /// Новая секция с пустым payload и block_size из конфигурации
    /// (тот же размер блока, что и при чтении с этим cfg).
    pub fn new_with_config(name: &str, cfg: &ChunkConfig) -> Result<Self> {
        Ok(Self::with_data(name, PagedBuffer::new(cfg.block_size)?))
    }

    /// Новая секция с сырым 4-байтовым тегом.
    pub fn with_tag(tag: [u8; SECTION_NAME_LEN]) -> Self {
        Self {
            name: tag,
            body: SectionBody::Inline(PagedBuffer::empty_const()),
        }
    }

    /// Новая секция с заданным payload.
    pub fn with_data(name: &str, data: PagedBuffer) -> Self {
        Self {
            name: encode_name(name),
            body: SectionBody::Inline(data),
        }
    }

    /// Прочитать секцию из потока (конфигурация из env).
    pub fn read_from<S: Read + Seek>(stream: &mut S) -> Result<Self> {
        Self::read_from_with_config(stream, &ChunkConfig::from_env())
    }

    pub fn read_from_with_config<S: Read + Seek>(stream: &mut S, cfg: &ChunkConfig) -> Result<Self> {
        let mut hdr = [0u8; SECTION_HDR_SIZE];
        stream
            .read_exact(&mut hdr)
            .context("read section header")?;

        let mut name = [0u8; SECTION_NAME_LEN];
        name.copy_from_slice(&hdr[SECTION_OFF_NAME..SECTION_OFF_NAME + SECTION_NAME_LEN]);
        let len = LittleEndian::read_i32(&hdr[SECTION_OFF_LEN..SECTION_OFF_LEN + 4]);

        if len > 0 {
            let want = (len as usize).min(cfg.max_section_bytes);
            if want < len as usize {
                warn!(
                    "section {}: payload {} bytes capped at {}",
                    tag_display(&name),
                    len,
                    want
                );
            }
            let data = PagedBuffer::from_reader(stream, cfg.block_size, Some(want))
                .with_context(|| format!("read payload of section {}", tag_display(&name)))?;
            let mut consumed = data.len() as u64;
            if data.len() == want && want < len as usize {
                // Остаток обрезанного payload пропускаем, чтобы следующий заголовок
                // читался с правильной позиции. Пропускается только то, что есть в потоке.
                let rest = (len as usize - want) as u64;
                consumed += io::copy(&mut (&mut *stream).take(rest), &mut io::sink())
                    .with_context(|| {
                        format!("skip capped payload of section {}", tag_display(&name))
                    })?;
            }
            if consumed < len as u64 {
                debug!(
                    "section {}: declared {} bytes, stream had {}",
                    tag_display(&name),
                    len,
                    consumed
                );
            }
            record_section_read(data.len());
            return Ok(Self {
                name,
                body: SectionBody::Inline(data),
            });
        }

        // len <= 0: сдвиг курсора относительно текущей позиции
        stream
            .seek(SeekFrom::Current(len as i64))
            .map_err(|e| {
                anyhow::Error::new(ChunkError::invalid(format!(
                    "section {}: skip by {} failed: {}",
                    tag_display(&name),
                    len,
                    e
                )))
            })?;
        debug!("section {}: skip by {}", tag_display(&name), len);
        record_section_read(0);
        record_section_skipped();
        Ok(Self {
            name,
            body: SectionBody::Skip(len),
        })
    }

    /// Записать секцию: тег, длина (i32 LE), payload. Skip-секция пишет своё len без payload.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let len: i32 = match &self.body {
            SectionBody::Inline(data) => {
                if data.len() > SECTION_MAX_LEN {
                    return Err(ChunkError::out_of_range(format!(
                        "section {} payload {} bytes exceeds i32::MAX",
                        tag_display(&self.name),
                        data.len()
                    ))
                    .into());
                }
                data.len() as i32
            }
            SectionBody::Skip(off) => *off,
        };

        let mut hdr = [0u8; SECTION_HDR_SIZE];
        hdr[SECTION_OFF_NAME..SECTION_OFF_NAME + SECTION_NAME_LEN].copy_from_slice(&self.name);
        LittleEndian::write_i32(&mut hdr[SECTION_OFF_LEN..SECTION_OFF_LEN + 4], len);
        writer
            .write_all(&hdr)
            .with_context(|| format!("write header of section {}", tag_display(&self.name)))?;

        if let SectionBody::Inline(data) = &self.body {
            data.write_to(writer)?;
        }
        record_section_written(self.len());
        Ok(())
    }

    // ---------------- name ----------------

    /// Тег как строка (все 4 байта, включая хвостовые NUL).
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    /// Сырые 4 байта тега.
    #[inline]
    pub fn tag(&self) -> &[u8; SECTION_NAME_LEN] {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = encode_name(name);
    }

    /// Совпадение тега с именем (имя кодируется тем же правилом дополнения/обрезки).
    #[inline]
    pub fn is_named(&self, name: &str) -> bool {
        self.name == encode_name(name)
    }

    // ---------------- payload ----------------

    pub fn body(&self) -> &SectionBody {
        &self.body
    }

    #[inline]
    pub fn is_skip(&self) -> bool {
        matches!(self.body, SectionBody::Skip(_))
    }

    /// Исходная длина skip-секции (None для inline).
    pub fn skip_offset(&self) -> Option<i32> {
        match self.body {
            SectionBody::Skip(off) => Some(off),
            SectionBody::Inline(_) => None,
        }
    }

    /// Длина payload (0 для skip-секции).
    pub fn len(&self) -> usize {
        match &self.body {
            SectionBody::Inline(data) => data.len(),
            SectionBody::Skip(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Payload (для skip-секции — пустой буфер).
    pub fn data(&self) -> &PagedBuffer {
        match &self.body {
            SectionBody::Inline(data) => data,
            SectionBody::Skip(_) => &EMPTY_PAYLOAD,
        }
    }

    /// Изменяемый payload. Skip-секция превращается в inline с пустым payload.
    pub fn data_mut(&mut self) -> &mut PagedBuffer {
        match self.body {
            SectionBody::Inline(ref mut data) => data,
            SectionBody::Skip(_) => {
                self.body = SectionBody::Inline(PagedBuffer::empty_const());
                self.data_mut()
            }
        }
    }

    /// Поток чтения/записи поверх payload.
    pub fn cursor(&mut self) -> BufferCursor<'_> {
        BufferCursor::new(self.data_mut())
    }

    /// Освободить payload. Повторный вызов — no-op.
    pub fn dispose(&mut self) {
        if let SectionBody::Inline(data) = &mut self.body {
            data.release();
        }
    }

    /// Полный размер на диске (заголовок + inline payload).
    pub fn encoded_len(&self) -> usize {
        SECTION_HDR_SIZE + self.len()
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::with_tag([0u8; SECTION_NAME_LEN])
    }
}

/// Тег для логов: печатаемые ASCII как есть, остальное — \xNN.
pub(crate) fn tag_display(tag: &[u8; SECTION_NAME_LEN]) -> String {
    tag.iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                (b as char).to_string()
            } else {
                format!("\\x{:02X}", b)
            }
        })
        .collect()
}
