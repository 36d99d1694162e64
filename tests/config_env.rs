// tests/config_env.rs
//
// ChunkConfig::from_env и его влияние на чтение. Один тест: переменные окружения
// общие для процесса.

use anyhow::Result;
use std::io::Cursor;

use ChunkFile::config::{ChunkConfig, ChunkConfigBuilder};
use ChunkFile::{Chunk, ChunkError, Section};

fn section_bytes(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = name.to_vec();
    v.extend_from_slice(&(payload.len() as i32).to_le_bytes());
    v.extend_from_slice(payload);
    v
}

#[test]
fn env_overrides_drive_reading() -> Result<()> {
    std::env::set_var("CHUNK_BLOCK_SIZE", "128");
    std::env::set_var("CHUNK_MAX_SECTIONS", "2");
    std::env::set_var("CHUNK_MAX_SECTION_BYTES", "4");

    let cfg = ChunkConfig::from_env();
    assert_eq!(cfg.block_size, 128);
    assert_eq!(cfg.max_sections, 2);
    assert_eq!(cfg.max_section_bytes, 4);

    // payload обрезается до max_section_bytes, блоки — из CHUNK_BLOCK_SIZE
    let bytes = section_bytes(b"LONG", b"0123456789");
    let mut cur = Cursor::new(bytes);
    let s = Section::read_from(&mut cur)?;
    assert_eq!(s.data().to_vec(), b"0123");
    assert_eq!(s.data().block_size(), 128);
    // остаток обрезанного payload пропущен: заголовок 8 + объявленные 10
    assert_eq!(cur.position(), 18);

    // больше max_sections секций — OutOfRange
    let mut three = Vec::new();
    for n in [b"A\0\0\0", b"B\0\0\0", b"C\0\0\0"] {
        three.extend_from_slice(&section_bytes(n, b"ab"));
    }
    let err = Chunk::from_bytes(&three).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChunkError>(),
        Some(ChunkError::OutOfRange(_))
    ));

    // мусор в переменных — значения по умолчанию
    std::env::set_var("CHUNK_BLOCK_SIZE", "zero");
    std::env::set_var("CHUNK_MAX_SECTIONS", "-1");
    std::env::remove_var("CHUNK_MAX_SECTION_BYTES");
    let cfg = ChunkConfigBuilder::new().build();
    let def = ChunkConfig::default();
    assert_eq!(cfg.block_size, def.block_size);
    assert_eq!(cfg.max_sections, def.max_sections);
    assert_eq!(cfg.max_section_bytes, def.max_section_bytes);

    // with_* поверх env
    let cfg = ChunkConfig::from_env().with_max_sections(3);
    let chunk = Chunk::read_from_with_config(&mut Cursor::new(three), &cfg)?;
    assert_eq!(chunk.len(), 3);

    std::env::remove_var("CHUNK_BLOCK_SIZE");
    std::env::remove_var("CHUNK_MAX_SECTIONS");
    Ok(())
}
