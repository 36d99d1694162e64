//! Общие константы формата (секции, буферы).

// -------- Paged buffer --------
/// Размер блока по умолчанию (байт).
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

// -------- Section --------
// Формат секции на диске:
// [name 4][len i32 LE][payload len байт, если len > 0]
// При len <= 0 payload отсутствует, а читатель сдвигает позицию потока на len
// относительно текущей (skip-кодирование).
pub const SECTION_NAME_LEN: usize = 4;
pub const SECTION_OFF_NAME: usize = 0;
pub const SECTION_OFF_LEN: usize = 4;
pub const SECTION_HDR_SIZE: usize = 8;

/// Максимальная длина inline-payload, представимая в поле длины.
pub const SECTION_MAX_LEN: usize = i32::MAX as usize;

// -------- Chunk --------
/// Защита от зацикливания через отрицательные длины (по умолчанию).
pub const DEFAULT_MAX_SECTIONS: usize = 1_000_000;
