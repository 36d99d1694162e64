use anyhow::{anyhow, Result};
use std::path::PathBuf;

use super::util::{open_chunk, write_atomic};

pub fn exec(path: PathBuf, name: String, nth: usize, out: PathBuf) -> Result<()> {
    let chunk = open_chunk(&path)?;
    let section = chunk
        .sections_named(&name)
        .nth(nth)
        .ok_or_else(|| anyhow!("section '{}' #{} not found in {}", name, nth, path.display()))?;
    if section.is_skip() {
        log::warn!("section '{}' #{} is a skip marker, payload is empty", name, nth);
    }
    let data = section.data().to_vec();
    write_atomic(&out, &data)?;
    println!("EXTRACTED '{}' #{}: {} B -> {}", name, nth, data.len(), out.display());
    Ok(())
}
