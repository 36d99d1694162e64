//! record/layout — явное описание бинарной раскладки записи.
//!
//! Каждая запись объявляет упорядоченный список полей (offset, width, kind).
//! Кодирование — конкатенация полей в порядке объявления, числа little-endian,
//! без выравнивания/паддинга платформы. Размер записи выводится из раскладки.

use anyhow::Result;

use crate::error::ChunkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Беззнаковое целое LE (ширина 1/2/4/8).
    Unsigned,
    /// Знаковое целое LE (ширина 1/2/4/8).
    Signed,
    /// Сырые байты (массивы u8, зарезервированные поля).
    Bytes,
    /// Вложенная запись или массив вложенных записей.
    Nested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, width: usize, kind: FieldKind) -> Self {
        Self {
            name,
            offset,
            width,
            kind,
        }
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// Размер записи по раскладке (конец последнего поля).
pub const fn layout_size(fields: &[Field]) -> usize {
    let mut end = 0;
    let mut i = 0;
    while i < fields.len() {
        if fields[i].end() > end {
            end = fields[i].end();
        }
        i += 1;
    }
    end
}

/// Проверить раскладку: поля идут подряд в порядке объявления, без дыр и перекрытий,
/// числовые поля имеют допустимую ширину, итог совпадает с `size`.
pub fn check_layout(fields: &[Field], size: usize) -> Result<()> {
    let mut expect = 0usize;
    for f in fields {
        if f.offset != expect {
            return Err(ChunkError::invalid(format!(
                "field '{}' at offset {} (expected {})",
                f.name, f.offset, expect
            ))
            .into());
        }
        if f.width == 0 {
            return Err(ChunkError::invalid(format!("field '{}' has zero width", f.name)).into());
        }
        if matches!(f.kind, FieldKind::Unsigned | FieldKind::Signed)
            && !matches!(f.width, 1 | 2 | 4 | 8)
        {
            return Err(ChunkError::invalid(format!(
                "numeric field '{}' has width {}",
                f.name, f.width
            ))
            .into());
        }
        expect = f.end();
    }
    if expect != size {
        return Err(ChunkError::invalid(format!(
            "layout covers {} bytes, record size is {}",
            expect, size
        ))
        .into());
    }
    Ok(())
}
