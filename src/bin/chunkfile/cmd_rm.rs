use anyhow::Result;
use std::path::PathBuf;

use super::util::{open_chunk, save_chunk};

pub fn exec(path: PathBuf, name: String, out: Option<PathBuf>) -> Result<()> {
    let mut chunk = open_chunk(&path)?;
    let removed = chunk.remove(&name);
    if removed == 0 {
        println!("NOT FOUND '{}'", name);
        return Ok(());
    }
    let target = out.unwrap_or_else(|| path.clone());
    save_chunk(&chunk, &target)?;
    println!("REMOVED {} x '{}' -> {}", removed, name, target.display());
    Ok(())
}
