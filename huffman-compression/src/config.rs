use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Compress text files with static Huffman coding", long_about = None)]
pub struct Config {
    /// Files to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Mode::RoundTrip)]
    pub mode: Mode,

    /// Where to put output files, defaults to the directory of each input
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of files processed in parallel, defaults to one per core
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write `<name>_compressed.<ext>`
    Compress,
    /// Read a compressed file and write `<name>_decompressed.<ext>`
    Decompress,
    /// Compress, decompress and check the result matches the input
    RoundTrip,
}
