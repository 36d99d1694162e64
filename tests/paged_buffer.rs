// tests/paged_buffer.rs
//
// Блочный буфер: чтение/запись через границы блоков, рост/усечение, drain из потока,
// BufferCursor как Read/Write/Seek.

use anyhow::Result;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use ChunkFile::{BufferCursor, ChunkError, PagedBuffer};

fn pattern(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i * 7 % 251) as u8).collect()
}

#[test]
fn read_across_block_boundary() -> Result<()> {
    let data = pattern(5000);
    let mut b = PagedBuffer::new(4096)?;
    b.write(0, &data)?;
    assert_eq!(b.len(), 5000);
    assert_eq!(b.block_count(), 2);

    let mut out = vec![0u8; 100];
    let n = b.read(4090, &mut out);
    assert_eq!(n, 100);
    // 6 последних байт блока 0, затем 94 первых байта блока 1
    assert_eq!(&out[..6], &data[4090..4096]);
    assert_eq!(&out[6..], &data[4096..4190]);
    Ok(())
}

#[test]
fn read_clamps_at_len_and_past_end() -> Result<()> {
    let b = PagedBuffer::from_slice(16, &pattern(40))?;
    let mut out = vec![0xAAu8; 10];
    assert_eq!(b.read(35, &mut out), 5);
    assert_eq!(&out[..5], &pattern(40)[35..]);
    assert_eq!(b.read(40, &mut out), 0);
    assert_eq!(b.read(1000, &mut out), 0);
    Ok(())
}

#[test]
fn write_past_end_zero_fills_gap() -> Result<()> {
    let mut b = PagedBuffer::new(8)?;
    b.write(0, b"ab")?;
    b.write(20, b"cd")?;
    assert_eq!(b.len(), 22);
    let v = b.to_vec();
    assert_eq!(&v[..2], b"ab");
    assert!(v[2..20].iter().all(|&x| x == 0));
    assert_eq!(&v[20..], b"cd");
    Ok(())
}

#[test]
fn shrink_then_grow_exposes_zeros() -> Result<()> {
    let mut b = PagedBuffer::from_slice(8, &[0xFFu8; 30])?;
    b.set_len(11)?;
    assert_eq!(b.block_count(), 2);
    b.set_len(30)?;
    let v = b.to_vec();
    assert!(v[..11].iter().all(|&x| x == 0xFF));
    assert!(v[11..].iter().all(|&x| x == 0), "stale bytes after regrow: {:?}", &v[11..]);
    b.set_len(0)?;
    assert_eq!(b.block_count(), 0);
    assert!(b.is_empty());
    Ok(())
}

#[test]
fn drain_appends_in_chunks_and_respects_cap() -> Result<()> {
    let src = pattern(10_000);
    let mut b = PagedBuffer::from_slice(64, b"xyz")?;
    let mut rd = Cursor::new(&src[..]);
    let n = b.drain(&mut rd, Some(5000))?;
    assert_eq!(n, 5000);
    assert_eq!(b.len(), 5003);
    assert_eq!(&b.to_vec()[3..], &src[..5000]);
    assert_eq!(rd.position(), 5000);

    // без cap — до EOF
    let n = b.drain(&mut rd, None)?;
    assert_eq!(n, 5000);
    assert_eq!(b.len(), 10_003);
    Ok(())
}

#[test]
fn write_to_emits_exactly_len_bytes() -> Result<()> {
    let data = pattern(100);
    let b = PagedBuffer::from_slice(32, &data)?;
    let mut out = Vec::new();
    b.write_to(&mut out)?;
    assert_eq!(out, data);
    Ok(())
}

#[test]
fn zero_block_size_rejected() {
    let err = PagedBuffer::new(0).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChunkError>(),
        Some(ChunkError::InvalidArgument(_))
    ));
}

#[test]
fn cursor_streams_over_buffer() -> Result<()> {
    let mut b = PagedBuffer::new(4)?;
    {
        let mut c = BufferCursor::new(&mut b);
        c.write_all(b"hello, paged world")?;
        assert_eq!(c.position(), 18);

        c.seek(SeekFrom::Start(7))?;
        let mut word = [0u8; 5];
        c.read_exact(&mut word)?;
        assert_eq!(&word, b"paged");

        // seek за конец зажимается к len
        assert_eq!(c.seek(SeekFrom::End(10))?, 18);
        assert!(c.seek(SeekFrom::Current(-100)).is_err());

        c.seek(SeekFrom::Start(0))?;
        let mut all = Vec::new();
        c.read_to_end(&mut all)?;
        assert_eq!(all, b"hello, paged world");
    }
    assert_eq!(b.len(), 18);
    Ok(())
}
