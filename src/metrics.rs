//! Lightweight global metrics for ChunkFile.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Paged buffer (блоки)
//! - Sections / Chunk (чтение/запись, skip-секции)

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Paged buffer -----
static BLOCKS_ALLOCATED: AtomicU64 = AtomicU64::new(0);
static BLOCKS_RELEASED: AtomicU64 = AtomicU64::new(0);

// ----- Sections -----
static SECTIONS_READ: AtomicU64 = AtomicU64::new(0);
static SECTIONS_WRITTEN: AtomicU64 = AtomicU64::new(0);
static SECTIONS_SKIPPED: AtomicU64 = AtomicU64::new(0);
static PAYLOAD_BYTES_READ: AtomicU64 = AtomicU64::new(0);
static PAYLOAD_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    // Paged buffer
    pub blocks_allocated: u64,
    pub blocks_released: u64,

    // Sections
    pub sections_read: u64,
    pub sections_written: u64,
    pub sections_skipped: u64,
    pub payload_bytes_read: u64,
    pub payload_bytes_written: u64,
}

impl MetricsSnapshot {
    /// Блоки, которые сейчас живут в каких-либо буферах процесса.
    pub fn blocks_live(&self) -> u64 {
        self.blocks_allocated.saturating_sub(self.blocks_released)
    }
}

// ----- Recorders (Paged buffer) -----
pub fn record_blocks_allocated(n: usize) {
    BLOCKS_ALLOCATED.fetch_add(n as u64, Ordering::Relaxed);
}

pub fn record_blocks_released(n: usize) {
    BLOCKS_RELEASED.fetch_add(n as u64, Ordering::Relaxed);
}

// ----- Recorders (Sections) -----
pub fn record_section_read(payload_len: usize) {
    SECTIONS_READ.fetch_add(1, Ordering::Relaxed);
    PAYLOAD_BYTES_READ.fetch_add(payload_len as u64, Ordering::Relaxed);
}

pub fn record_section_skipped() {
    SECTIONS_SKIPPED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_section_written(payload_len: usize) {
    SECTIONS_WRITTEN.fetch_add(1, Ordering::Relaxed);
    PAYLOAD_BYTES_WRITTEN.fetch_add(payload_len as u64, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        blocks_allocated: BLOCKS_ALLOCATED.load(Ordering::Relaxed),
        blocks_released: BLOCKS_RELEASED.load(Ordering::Relaxed),

        sections_read: SECTIONS_READ.load(Ordering::Relaxed),
        sections_written: SECTIONS_WRITTEN.load(Ordering::Relaxed),
        sections_skipped: SECTIONS_SKIPPED.load(Ordering::Relaxed),
        payload_bytes_read: PAYLOAD_BYTES_READ.load(Ordering::Relaxed),
        payload_bytes_written: PAYLOAD_BYTES_WRITTEN.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    BLOCKS_ALLOCATED.store(0, Ordering::Relaxed);
    BLOCKS_RELEASED.store(0, Ordering::Relaxed);

    SECTIONS_READ.store(0, Ordering::Relaxed);
    SECTIONS_WRITTEN.store(0, Ordering::Relaxed);
    SECTIONS_SKIPPED.store(0, Ordering::Relaxed);
    PAYLOAD_BYTES_READ.store(0, Ordering::Relaxed);
    PAYLOAD_BYTES_WRITTEN.store(0, Ordering::Relaxed);
}
