use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context};
use log::{error, info, warn};
use rayon::prelude::*;

use crate::{
    config::{Config, Mode},
    container::{read_compressed, write_compressed},
    encode_decode::{compress, decompress},
    error::HuffmanError,
};

const COMPRESSED_SUFFIX: &str = "_compressed";
const DECOMPRESSED_SUFFIX: &str = "_decompressed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub distinct_symbols: usize,
    pub encoded_bits: u64,
}

impl Report {
    pub fn ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            return 1.0;
        }
        self.compressed_bytes as f64 / self.original_bytes as f64
    }
}

/// `dir/name.ext` becomes `<output_dir or dir>/name<suffix>.ext`.
pub fn derived_path(input: &Path, suffix: &str, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };

    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(file_name)
}

/// Creates `output` and hands it to `write`. A failed write leaves no
/// partial file behind.
fn write_output<F>(output: &Path, write: F) -> anyhow::Result<()>
where
    F: FnOnce(BufWriter<File>) -> Result<BufWriter<File>, HuffmanError>,
{
    let file = File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let written = write(BufWriter::new(file)).and_then(|mut writer| {
        writer.flush().map_err(HuffmanError::OutputUnwritable)
    });
    if let Err(err) = written {
        if let Err(remove_err) = fs::remove_file(output) {
            warn!(
                "failed to remove partial output {}: {}",
                output.display(),
                remove_err
            );
        }
        return Err(err).with_context(|| format!("failed to write {}", output.display()));
    }
    Ok(())
}

pub fn compress_file(input: &Path, output: &Path) -> anyhow::Result<Report> {
    let content = fs::read_to_string(input)
        .map_err(HuffmanError::InputUnreadable)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let compressed =
        compress(&content).with_context(|| format!("failed to compress {}", input.display()))?;

    write_output(output, |writer| {
        write_compressed(writer, &compressed.frequencies, &compressed.bits)
    })?;

    let compressed_bytes = fs::metadata(output)
        .with_context(|| format!("failed to stat {}", output.display()))?
        .len();
    let report = Report {
        original_bytes: content.len() as u64,
        compressed_bytes,
        distinct_symbols: compressed.codes.len(),
        encoded_bits: compressed.bits.len() as u64,
    };
    info!(
        "{} -> {}: {} bytes to {} bytes ({:.1}%), {} distinct symbols",
        input.display(),
        output.display(),
        report.original_bytes,
        report.compressed_bytes,
        report.ratio() * 100.0,
        report.distinct_symbols
    );

    Ok(report)
}

pub fn decompress_file(input: &Path, output: &Path) -> anyhow::Result<String> {
    let reader = BufReader::new(
        File::open(input)
            .map_err(HuffmanError::InputUnreadable)
            .with_context(|| format!("failed to open {}", input.display()))?,
    );
    let (frequencies, bits) = read_compressed(reader)
        .with_context(|| format!("failed to read compressed data from {}", input.display()))?;

    let content = decompress(&frequencies, &bits)
        .with_context(|| format!("failed to decode {}", input.display()))?;

    fs::write(output, &content).with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        "{} -> {}: restored {} bytes",
        input.display(),
        output.display(),
        content.len()
    );

    Ok(content)
}

/// Compresses, decompresses and checks that nothing was lost.
pub fn round_trip_file(input: &Path, output_dir: Option<&Path>) -> anyhow::Result<Report> {
    let compressed_path = derived_path(input, COMPRESSED_SUFFIX, output_dir);
    let decompressed_path = derived_path(input, DECOMPRESSED_SUFFIX, output_dir);

    let report = compress_file(input, &compressed_path)?;
    let restored = decompress_file(&compressed_path, &decompressed_path)?;

    let original = fs::read_to_string(input)
        .with_context(|| format!("failed to re-read {}", input.display()))?;
    if restored != original {
        bail!(
            "{} does not match {}",
            decompressed_path.display(),
            input.display()
        );
    }

    Ok(report)
}

fn process_file(input: &Path, config: &Config) -> anyhow::Result<()> {
    let output_dir = config.output_dir.as_deref();
    match config.mode {
        Mode::Compress => {
            compress_file(input, &derived_path(input, COMPRESSED_SUFFIX, output_dir))?;
        }
        Mode::Decompress => {
            decompress_file(input, &derived_path(input, DECOMPRESSED_SUFFIX, output_dir))?;
        }
        Mode::RoundTrip => {
            round_trip_file(input, output_dir)?;
        }
    }
    Ok(())
}

/// Every file gets its own pipeline, files are spread over the rayon pool.
/// All files are attempted before failures are reported.
pub fn run(config: &Config) -> anyhow::Result<()> {
    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = config.jobs {
            builder = builder.num_threads(jobs);
        }
        builder.build()?
    };

    let failures = pool.install(|| {
        config
            .files
            .par_iter()
            .filter(|file| match process_file(file, config) {
                Ok(()) => false,
                Err(err) => {
                    error!("{}: {:#}", file.display(), err);
                    true
                }
            })
            .count()
    });

    if failures > 0 {
        return Err(anyhow!("{failures} of {} files failed", config.files.len()));
    }
    Ok(())
}
