// tests/metrics_blocks.rs
//
// Глобальные счётчики: один тест в файле (отдельный процесс), чтобы параллельные
// тесты не влияли на значения.

use anyhow::Result;

use ChunkFile::metrics;
use ChunkFile::{Chunk, PagedBuffer};

#[test]
fn blocks_are_released_and_sections_counted() -> Result<()> {
    metrics::reset();

    {
        let mut b = PagedBuffer::with_len(16, 100)?;
        assert_eq!(metrics::snapshot().blocks_live(), 7);
        b.set_len(20)?;
        let m = metrics::snapshot();
        assert_eq!(m.blocks_allocated, 7);
        assert_eq!(m.blocks_released, 5);
        let c = b.clone();
        assert_eq!(metrics::snapshot().blocks_live(), 4);
        drop(c);
        b.release();
        b.release(); // повторно — no-op
        assert_eq!(metrics::snapshot().blocks_live(), 0);
    }
    assert_eq!(metrics::snapshot().blocks_live(), 0);

    // секции: 2 inline + 1 skip
    let mut bytes = Vec::new();
    for (name, payload) in [(b"AAAA", &b"12345"[..]), (b"BBBB", &b"xyz"[..])] {
        bytes.extend_from_slice(name);
        bytes.extend_from_slice(&(payload.len() as i32).to_le_bytes());
        bytes.extend_from_slice(payload);
    }
    bytes.extend_from_slice(b"ZERO");
    bytes.extend_from_slice(&0i32.to_le_bytes());

    metrics::reset();
    let chunk = Chunk::from_bytes(&bytes)?;
    let m = metrics::snapshot();
    assert_eq!(m.sections_read, 3);
    assert_eq!(m.sections_skipped, 1);
    assert_eq!(m.payload_bytes_read, 8);

    let out = chunk.to_bytes()?;
    assert_eq!(out, bytes);
    let m = metrics::snapshot();
    assert_eq!(m.sections_written, 3);
    assert_eq!(m.payload_bytes_written, 8);

    drop(chunk);
    assert_eq!(metrics::snapshot().blocks_live(), 0);
    Ok(())
}
