use anyhow::{anyhow, Context, Result};
use memmap2::Mmap;
use std::fs::{self, OpenOptions};
use std::io::{Cursor, Write};
use std::path::Path;

use ChunkFile::config::ChunkConfig;
use ChunkFile::Chunk;

/// Прочитать контейнер целиком: файл отображается read-only через mmap.
pub fn open_chunk(path: &Path) -> Result<Chunk> {
    let cfg = ChunkConfig::from_env();
    let f = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    let len = f.metadata()?.len();
    if len == 0 {
        // mmap нулевой длины не поддерживается на части платформ
        return Ok(Chunk::new());
    }
    let mmap = unsafe { Mmap::map(&f).map_err(|e| anyhow!("mmap {}: {}", path.display(), e))? };
    let mut cur = Cursor::new(&mmap[..]);
    Chunk::read_from_with_config(&mut cur, &cfg)
        .with_context(|| format!("read container {}", path.display()))
}

/// Атомарная запись: tmp рядом с целевым файлом + rename.
pub fn save_chunk(chunk: &Chunk, path: &Path) -> Result<()> {
    let bytes = chunk.to_bytes()?;
    write_atomic(path, &bytes)
}

pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = Path::new(&tmp_name);

    let mut f = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(tmp)
        .with_context(|| format!("open {}", tmp.display()))?;
    f.write_all(data)?;
    let _ = f.sync_all();
    drop(f);

    fs::rename(tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
