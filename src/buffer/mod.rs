//! buffer — блочный байтовый буфер и потоковый курсор над ним.
//!
//! - paged.rs  — PagedBuffer: рост/усечение без копирования, произвольный доступ через границы блоков.
//! - cursor.rs — BufferCursor: std::io::{Read, Write, Seek} поверх PagedBuffer.

pub mod paged;
pub mod cursor;

pub use paged::PagedBuffer;
pub use cursor::BufferCursor;
