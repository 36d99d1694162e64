use anyhow::Result;
use std::path::PathBuf;

use super::util::{open_chunk, save_chunk};

pub fn exec(path: PathBuf, priority: Option<Vec<String>>, out: Option<PathBuf>) -> Result<()> {
    let mut chunk = open_chunk(&path)?;
    match &priority {
        Some(list) => {
            let names: Vec<&str> = list.iter().map(|s| s.as_str()).collect();
            chunk.sort_by_priority(&names);
        }
        None => chunk.sort(),
    }
    let target = out.unwrap_or_else(|| path.clone());
    save_chunk(&chunk, &target)?;
    println!("SORTED {} section(s) -> {}", chunk.len(), target.display());
    Ok(())
}
