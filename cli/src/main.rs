// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use byteorder::{LittleEndian, WriteBytesExt};
use clap::{ArgAction, Parser, Subcommand};
use dislex::{Algorithm, ConstructConfig, CyclicShape, GappedIndex, InnerAlgorithm, StringSet};
use log::{LevelFilter, info};

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Log progress, repeat for stage timings
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the gapped suffix array of a file as little-endian 32-bit integers
    ///
    /// Single texts produce one offset per position. With --lines every position is written as
    /// a line index followed by an offset.
    Build {
        input: PathBuf,
        output: PathBuf,
        /// Cyclic shape as a string of '1' (care) and '0' (gap)
        #[arg(short, long, default_value = "1")]
        shape: CyclicShape,
        #[arg(short, long, default_value_t = Algorithm::Dislex)]
        algorithm: Algorithm,
        /// Suffix sorter for the lex text of the DisLex strategies
        #[arg(long, default_value_t = InnerAlgorithm::SacaK)]
        inner: InnerAlgorithm,
        /// Treat every line of the input as its own sequence
        #[arg(short, long)]
        lines: bool,
        /// Records buffered per spilled run with dislex-external
        #[arg(long, default_value_t = ConstructConfig::DEFAULT_RUN_CAPACITY)]
        run_capacity: usize,
        /// zstd level for spilled runs, 0 to disable compression
        #[arg(long, default_value_t = ConstructConfig::DEFAULT_SPILL_COMPRESSION)]
        spill_compression: i32,
        /// Directory for spilled runs
        #[arg(long)]
        temp_dir: Option<PathBuf>,
    },
    /// Print the positions whose gapped suffixes start with a pattern
    Find {
        input: PathBuf,
        pattern: String,
        #[arg(short, long, default_value = "1")]
        shape: CyclicShape,
        #[arg(short, long)]
        lines: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match args.command {
        Command::Build {
            input,
            output,
            shape,
            algorithm,
            inner,
            lines,
            run_capacity,
            spill_compression,
            temp_dir,
        } => {
            let data = read_input(&input)?;

            let mut config = ConstructConfig::new();
            config
                .algorithm(algorithm)
                .inner_algorithm(inner)
                .run_capacity(run_capacity)
                .spill_compression(spill_compression);
            if let Some(dir) = temp_dir {
                config.temp_dir(dir);
            }

            let output_file = File::create(&output)
                .with_context(|| format!("Failed to create output file '{}'", output.display()))?;
            let mut out = BufWriter::new(output_file);

            let written = if lines {
                let set = split_lines(&data);
                let sa = dislex::construct_with_config(&set, &shape, &config)
                    .context("Failed to construct gapped suffix array")?;
                for pos in &sa {
                    out.write_u32::<LittleEndian>(pos.seq)?;
                    out.write_u32::<LittleEndian>(pos.offset)?;
                }
                sa.len()
            } else {
                let sa = dislex::construct_with_config(data.as_slice(), &shape, &config)
                    .context("Failed to construct gapped suffix array")?;
                for &offset in &sa {
                    out.write_u32::<LittleEndian>(offset)?;
                }
                sa.len()
            };
            out.flush()
                .with_context(|| format!("Failed to write output file '{}'", output.display()))?;

            info!("Wrote {written} positions to '{}'", output.display());
        }
        Command::Find {
            input,
            pattern,
            shape,
            lines,
        } => {
            let data = read_input(&input)?;
            let mut stdout = io::stdout().lock();

            if lines {
                let set = split_lines(&data);
                let index =
                    GappedIndex::new(&set, &shape).context("Failed to build gapped index")?;
                for pos in index.find(pattern.as_bytes()) {
                    writeln!(stdout, "{}\t{}", pos.seq, pos.offset)?;
                }
            } else {
                let index = GappedIndex::new(data.as_slice(), &shape)
                    .context("Failed to build gapped index")?;
                for offset in index.find(pattern.as_bytes()) {
                    writeln!(stdout, "{offset}")?;
                }
            }
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read input file '{}'", path.display()))
}

/// Splits `data` into lines, dropping line terminators and a final empty line.
fn split_lines(data: &[u8]) -> StringSet {
    let data = data.strip_suffix(b"\n").unwrap_or(data);
    if data.is_empty() {
        return StringSet::new();
    }

    data.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines() {
        let set = split_lines(b"ACGT\r\n\nGG\n");

        assert_eq!(set.sequence_count(), 3);
        assert_eq!(set.get(0), Some(&b"ACGT"[..]));
        assert_eq!(set.get(1), Some(&b""[..]));
        assert_eq!(set.get(2), Some(&b"GG"[..]));
        assert_eq!(split_lines(b"").sequence_count(), 0);
        assert_eq!(split_lines(b"A").sequence_count(), 1);
    }

    #[test]
    fn verify_args() {
        use clap::CommandFactory;

        Args::command().debug_assert();
    }
}
