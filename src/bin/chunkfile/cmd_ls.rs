use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use ChunkFile::metrics;
use ChunkFile::SectionBody;

use super::util::open_chunk;

#[derive(Serialize)]
struct SectionRow {
    index: usize,
    name: String,
    kind: &'static str,
    /// Длина payload (для skip — 0).
    len: usize,
    /// Сохранённое смещение L (только skip).
    #[serde(skip_serializing_if = "Option::is_none")]
    skip: Option<i32>,
    crc32: u32,
}

#[derive(Serialize)]
struct Listing {
    path: String,
    sections: Vec<SectionRow>,
    encoded_len: usize,
    blocks_live: u64,
}

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let chunk = open_chunk(&path)?;

    let rows: Vec<SectionRow> = chunk
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let (kind, skip) = match s.body() {
                SectionBody::Inline(_) => ("inline", None),
                SectionBody::Skip(l) => ("skip", Some(*l)),
            };
            SectionRow {
                index,
                name: s.name().trim_end_matches('\0').to_string(),
                kind,
                len: s.len(),
                skip,
                crc32: crc32fast::hash(&s.data().to_vec()),
            }
        })
        .collect();

    if json {
        let listing = Listing {
            path: path.display().to_string(),
            encoded_len: chunk.encoded_len(),
            blocks_live: metrics::snapshot().blocks_live(),
            sections: rows,
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{}: {} section(s), {} B encoded", path.display(), rows.len(), chunk.encoded_len());
    println!("{:>5}  {:<4}  {:<6}  {:>10}  {:>8}", "idx", "tag", "kind", "len", "crc32");
    for r in &rows {
        let len = match r.skip {
            Some(l) => format!("({})", l),
            None => r.len.to_string(),
        };
        println!(
            "{:>5}  {:<4}  {:<6}  {:>10}  {:08x}",
            r.index, r.name, r.kind, len, r.crc32
        );
    }
    Ok(())
}
