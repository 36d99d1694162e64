//! error — типизированные ошибки ChunkFile.
//!
//! Публичный API возвращает `anyhow::Result`, а конкретный вид ошибки кладётся внутрь
//! как `ChunkError`. Вызывающий код может различать виды через
//! `err.downcast_ref::<ChunkError>()`.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// Недопустимый аргумент: отрицательная позиция после seek, переполнение смещения,
    /// нулевой block_size и т.п.
    InvalidArgument(String),
    /// Индекс вне `[0, count)` (или `[0, count]` для insert).
    IndexOutOfRange { index: usize, count: usize },
    /// Значение не представимо в формате (длина секции > i32::MAX, index * size переполняет usize,
    /// слишком много секций при чтении).
    OutOfRange(String),
}

impl ChunkError {
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        ChunkError::InvalidArgument(msg.into())
    }

    pub fn index(index: usize, count: usize) -> Self {
        ChunkError::IndexOutOfRange { index, count }
    }

    pub fn out_of_range<S: Into<String>>(msg: S) -> Self {
        ChunkError::OutOfRange(msg.into())
    }
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            ChunkError::IndexOutOfRange { index, count } => {
                write!(f, "index {} out of range (count={})", index, count)
            }
            ChunkError::OutOfRange(msg) => write!(f, "out of range: {}", msg),
        }
    }
}

impl Error for ChunkError {}
