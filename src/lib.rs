#![allow(non_snake_case)]

// Базовые модули
pub mod consts;
pub mod error;
pub mod config;
pub mod metrics;

// Утилиты (stream_len)
pub mod util; // src/util/mod.rs

// Блочное хранилище байтов
pub mod buffer; // src/buffer/{mod,paged,cursor}.rs

// Записи фиксированного размера поверх буфера
pub mod record; // src/record/{mod,layout,overlay,chain}.rs

// Контейнер секций
pub mod section;
pub mod chunk;

// Схемы записей карт (MRGN/THG2/UNIT/TRIG)
pub mod scx; // src/scx/{mod,location,sprite,unit,trigger}.rs

// Удобные реэкспорты
pub use buffer::{BufferCursor, PagedBuffer};
pub use chunk::Chunk;
pub use config::{ChunkConfig, ChunkConfigBuilder};
pub use error::ChunkError;
pub use record::{Field, FieldKind, Record, RecordChain, RecordOverlay};
pub use section::{Section, SectionBody};
