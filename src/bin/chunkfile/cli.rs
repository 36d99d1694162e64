use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для файлов-контейнеров секций (4-байтовый тег + i32 длина + payload)
#[derive(Parser, Debug)]
#[command(name = "chunkfile", version, about = "Section container inspector")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// List sections: index, tag, kind, length, CRC32 of payload
    Ls {
        #[arg(long)]
        path: PathBuf,
        /// Print one JSON object instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Dump the payload of a section into a file
    Extract {
        #[arg(long)]
        path: PathBuf,
        /// Section tag (padded/truncated to 4 bytes)
        #[arg(long)]
        name: String,
        /// Which match to take when the tag repeats (0-based)
        #[arg(long, default_value_t = 0)]
        nth: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Rewrite the container with sections sorted
    ///
    /// Без --priority — по тегу (байтово, стабильно).
    /// С --priority A,B,C — сначала перечисленные теги в этом порядке, остальные в конце.
    Sort {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, value_delimiter = ',')]
        priority: Option<Vec<String>>,
        /// Output file (default: overwrite --path)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rewrite the container without every section with the given tag
    Rm {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        name: String,
        /// Output file (default: overwrite --path)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
