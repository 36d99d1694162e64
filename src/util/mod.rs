//! util — общие утилиты для работы с потоками.
//!
//! Содержит:
//! - stream_len(): длина Seek-потока без изменения текущей позиции.

use anyhow::{Context, Result};
use std::io::{Seek, SeekFrom};

/// Длина потока (позиция конца). Текущая позиция восстанавливается.
pub fn stream_len<S: Seek + ?Sized>(stream: &mut S) -> Result<u64> {
    let cur = stream.stream_position().context("query stream position")?;
    let end = stream.seek(SeekFrom::End(0)).context("seek to stream end")?;
    if cur != end {
        stream
            .seek(SeekFrom::Start(cur))
            .context("restore stream position")?;
    }
    Ok(end)
}
