use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ghostwriter",
    about = "A terminal text editor that continues your writing on demand",
    version
)]
pub struct Cli {
    /// Text file to seed the document with (not written back).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Config file to use instead of .ghostwriter/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Insert continuations in one step instead of streaming them.
    #[arg(long)]
    pub instant: bool,

    /// Delay between streamed characters, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub char_delay_ms: Option<u64>,

    /// Write logs to this file. Logging is off without it since the
    /// terminal belongs to the editor.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
