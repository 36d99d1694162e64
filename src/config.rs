//! Centralized configuration and builder for ChunkFile.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - ChunkConfig::from_env() reads CHUNK_* env vars; Default is env-free.
//! - ChunkConfigBuilder for fluent construction in tests and tools.
//!
//! Tunables:
//! - block_size        (CHUNK_BLOCK_SIZE, default 4096) — размер блока payload-буфера секции.
//! - max_sections      (CHUNK_MAX_SECTIONS, default 1_000_000) — guard против петель skip-секций.
//! - max_section_bytes (CHUNK_MAX_SECTION_BYTES, default i32::MAX) — лимит inline-payload при чтении.

use std::fmt;

use crate::consts::{DEFAULT_BLOCK_SIZE, DEFAULT_MAX_SECTIONS, SECTION_MAX_LEN};

/// Top-level configuration for section/chunk (de)serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Block size for section payload buffers (bytes, > 0).
    /// Env: CHUNK_BLOCK_SIZE (default 4096)
    pub block_size: usize,

    /// Upper bound on sections read by one Chunk::read_from_with_config call.
    /// Negative lengths may point the cursor backwards; this stops runaway loops.
    /// Env: CHUNK_MAX_SECTIONS (default 1_000_000)
    pub max_sections: usize,

    /// Upper bound on a single inline payload drained from a stream.
    /// Larger declared lengths are drained only up to this cap.
    /// Env: CHUNK_MAX_SECTION_BYTES (default i32::MAX)
    pub max_section_bytes: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_sections: DEFAULT_MAX_SECTIONS,
            max_section_bytes: SECTION_MAX_LEN,
        }
    }
}

impl ChunkConfig {
    /// Load configuration from environment variables (missing/invalid values keep defaults).
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CHUNK_BLOCK_SIZE") {
            if let Ok(n) = v.trim().parse::<usize>() {
                if n > 0 {
                    cfg.block_size = n;
                }
            }
        }

        if let Ok(v) = std::env::var("CHUNK_MAX_SECTIONS") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.max_sections = n;
            }
        }

        if let Ok(v) = std::env::var("CHUNK_MAX_SECTION_BYTES") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.max_section_bytes = n.min(SECTION_MAX_LEN);
            }
        }

        cfg
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_max_sections(mut self, n: usize) -> Self {
        self.max_sections = n;
        self
    }

    pub fn with_max_section_bytes(mut self, n: usize) -> Self {
        self.max_section_bytes = n.min(SECTION_MAX_LEN);
        self
    }
}

impl fmt::Display for ChunkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChunkConfig {{ block_size: {}, max_sections: {}, max_section_bytes: {} }}",
            self.block_size, self.max_sections, self.max_section_bytes,
        )
    }
}

/// Lightweight builder that produces a ChunkConfig.
#[derive(Clone, Debug)]
pub struct ChunkConfigBuilder {
    cfg: ChunkConfig,
}

impl Default for ChunkConfigBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: ChunkConfig::from_env(),
        }
    }
}

impl ChunkConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: ChunkConfig::default(),
        }
    }

    pub fn block_size(mut self, block_size: usize) -> Self {
        self.cfg.block_size = block_size;
        self
    }

    pub fn max_sections(mut self, n: usize) -> Self {
        self.cfg.max_sections = n;
        self
    }

    pub fn max_section_bytes(mut self, n: usize) -> Self {
        self.cfg.max_section_bytes = n.min(SECTION_MAX_LEN);
        self
    }

    pub fn build(self) -> ChunkConfig {
        self.cfg
    }
}
