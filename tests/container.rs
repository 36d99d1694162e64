// tests/container.rs
//
// Контейнер секций целиком: запись в файл и чтение обратно, skip-секции,
// защита по заголовку, сортировки, удаление по имени.

use anyhow::Result;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use ChunkFile::config::ChunkConfig;
use ChunkFile::{Chunk, ChunkError, PagedBuffer, Section, SectionBody};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("chunktest-{prefix}-{pid}-{t}-{id}"))
}

fn names(c: &Chunk) -> Vec<String> {
    c.iter().map(|s| s.name()).collect()
}

#[test]
fn file_roundtrip_many_sections() -> Result<()> {
    let root = unique_root("roundtrip");
    fs::create_dir_all(&root)?;
    let path = root.join("map.chk");

    let mut chunk = Chunk::new();
    for i in 0..50usize {
        let name = format!("S{:03}", i);
        let payload: Vec<u8> = (0..i * 97).map(|j| (i + j) as u8).collect();
        chunk.push(Section::with_data(&name, PagedBuffer::from_slice(512, &payload)?));
    }
    // пара повторяющихся имён
    chunk.add("DUP").data_mut().write(0, b"first")?;
    chunk.add("DUP").data_mut().write(0, b"second")?;

    {
        let f = OpenOptions::new().create(true).truncate(true).write(true).open(&path)?;
        let mut w = BufWriter::new(f);
        chunk.write_to(&mut w)?;
        w.flush()?;
    }
    assert_eq!(fs::metadata(&path)?.len() as usize, chunk.encoded_len());

    let back = {
        let mut r = BufReader::new(File::open(&path)?);
        Chunk::read_from(&mut r)?
    };
    assert_eq!(back.len(), 52);
    assert_eq!(names(&back), names(&chunk));
    for (a, b) in chunk.iter().zip(back.iter()) {
        assert_eq!(a.data().to_vec(), b.data().to_vec(), "payload of {}", a.name());
    }
    let dups: Vec<Vec<u8>> = back.sections_named("DUP").map(|s| s.data().to_vec()).collect();
    assert_eq!(dups, vec![b"first".to_vec(), b"second".to_vec()]);

    let _ = fs::remove_dir_all(&root);
    Ok(())
}

#[test]
fn seven_trailing_bytes_are_not_a_section() -> Result<()> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"AAAA");
    bytes.extend_from_slice(&2i32.to_le_bytes());
    bytes.extend_from_slice(b"hi");
    bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7]);

    let mut cur = Cursor::new(bytes);
    let chunk = Chunk::read_from(&mut cur)?;
    assert_eq!(chunk.len(), 1);
    assert_eq!(chunk[0].data().to_vec(), b"hi");
    // хвост не тронут
    assert_eq!(cur.position(), 10);
    Ok(())
}

#[test]
fn skip_section_moves_cursor_and_writes_back() -> Result<()> {
    // [DATA len=8 payload][SKIP len=-16][TAIL len=1 'x']
    // SKIP возвращает курсор на начало payload DATA (позиция 8); оттуда
    // читается ещё одна секция из байтов payload'а.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"DATA");
    bytes.extend_from_slice(&8i32.to_le_bytes());
    bytes.extend_from_slice(b"INNR");
    bytes.extend_from_slice(&16i32.to_le_bytes());
    bytes.extend_from_slice(b"SKIP");
    bytes.extend_from_slice(&(-16i32).to_le_bytes());

    let cfg = ChunkConfig::default().with_max_sections(10);
    let mut cur = Cursor::new(bytes.clone());
    let chunk = Chunk::read_from_with_config(&mut cur, &cfg)?;

    // INNR объявляет 16 байт, но до конца потока только 8 (заголовок SKIP): короткое чтение
    assert_eq!(names(&chunk), vec!["DATA", "SKIP", "INNR"]);
    assert!(matches!(chunk[1].body(), SectionBody::Skip(-16)));
    assert!(chunk[1].data().is_empty());
    assert_eq!(chunk[2].data().to_vec(), bytes[16..24].to_vec());

    // skip-секция пишет своё L без payload
    let mut one = Chunk::new();
    one.push(chunk[1].clone());
    let mut expect = b"SKIP".to_vec();
    expect.extend_from_slice(&(-16i32).to_le_bytes());
    assert_eq!(one.to_bytes()?, expect);
    Ok(())
}

#[test]
fn self_referencing_skip_hits_section_limit() {
    // L = -8 возвращает курсор на этот же заголовок: бесконечный цикл без ограничения
    let mut bytes = b"LOOP".to_vec();
    bytes.extend_from_slice(&(-8i32).to_le_bytes());
    let cfg = ChunkConfig::default().with_max_sections(64);
    let err = Chunk::read_from_with_config(&mut Cursor::new(bytes), &cfg).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChunkError>(),
        Some(ChunkError::OutOfRange(_))
    ));
}

#[test]
fn sort_and_priority_are_stable() -> Result<()> {
    let mut c = Chunk::new();
    for (n, tag) in [("UNIT", 1u8), ("MRGN", 2), ("TRIG", 3), ("MRGN", 4), ("VER", 5)] {
        c.add(n).data_mut().write(0, &[tag])?;
    }

    let mut by_tag = c.clone();
    by_tag.sort();
    let order: Vec<u8> = by_tag.iter().map(|s| s.data().to_vec()[0]).collect();
    assert_eq!(order, vec![2, 4, 3, 1, 5]);

    c.sort_by_priority(&["VER", "TRIG"]);
    let order: Vec<u8> = c.iter().map(|s| s.data().to_vec()[0]).collect();
    assert_eq!(order, vec![5, 3, 1, 2, 4]);
    Ok(())
}

#[test]
fn remove_by_name_and_lookups() -> Result<()> {
    let mut c: Chunk = ["A", "B", "A", "C", "A"].iter().map(|n| Section::new(n)).collect();
    assert_eq!(c.index_of("A"), Some(0));
    assert_eq!(c.last_index_of("A"), Some(4));
    assert_eq!(c.find("A").collect::<Vec<_>>(), vec![0, 2, 4]);
    assert!(!c.contains("Z"));

    assert_eq!(c.remove("A"), 3);
    assert_eq!(names(&c), vec!["B\0\0\0".to_string(), "C\0\0\0".to_string()]);
    assert_eq!(c.remove("A"), 0);

    let err = c.remove_at(5).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ChunkError>(),
        Some(&ChunkError::IndexOutOfRange { index: 5, count: 2 })
    );
    Ok(())
}

#[test]
fn capped_section_keeps_container_framing() -> Result<()> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"BIGS");
    bytes.extend_from_slice(&16i32.to_le_bytes());
    bytes.extend_from_slice(b"0123456789ABCDEF");
    bytes.extend_from_slice(b"NEXT");
    bytes.extend_from_slice(&2i32.to_le_bytes());
    bytes.extend_from_slice(b"xy");

    let cfg = ChunkConfig::default().with_max_section_bytes(4);
    let mut cur = Cursor::new(bytes);
    let chunk = Chunk::read_from_with_config(&mut cur, &cfg)?;
    assert_eq!(names(&chunk), vec!["BIGS", "NEXT"]);
    assert_eq!(chunk[0].data().to_vec(), b"0123");
    assert_eq!(chunk[1].data().to_vec(), b"xy");
    assert_eq!(cur.position(), 34);
    Ok(())
}
