use anyhow::Result;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod util;
mod cmd_ls;
mod cmd_extract;
mod cmd_sort;
mod cmd_rm;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    // Пример: RUST_LOG=debug ./chunkfile ls --path map.chk
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        // Логируем ошибку и выходим с кодом 1.
        error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse_args();
    match cli.cmd {
        cli::Cmd::Ls { path, json } => cmd_ls::exec(path, json),

        cli::Cmd::Extract { path, name, nth, out } => cmd_extract::exec(path, name, nth, out),

        cli::Cmd::Sort { path, priority, out } => cmd_sort::exec(path, priority, out),

        cli::Cmd::Rm { path, name, out } => cmd_rm::exec(path, name, out),
    }
}
