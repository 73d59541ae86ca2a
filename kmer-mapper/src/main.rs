use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kmer_mapper::align::{self, MapOpt};
use kmer_mapper::io::fasta;
use kmer_mapper::sequence::{Read, Reference};

#[derive(Parser, Debug)]
#[command(name = "kmer-mapper", author, version, about = "Map short reads with exact k-mer seeds and bounded mismatches", arg_required_else_help = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Map reads (FASTA) onto a single reference (FASTA)
    Map {
        /// Reference FASTA file (first record is used)
        reference: String,
        /// Reads FASTA file
        reads: String,
        #[arg(short = 'k', long = "kmer-size", default_value_t = 8)]
        kmer_size: usize,
        #[arg(short = 'm', long = "max-mismatches", default_value_t = 2)]
        max_mismatches: usize,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
        /// Emit a JSON summary instead of the text listing
        #[arg(long)]
        json: bool,
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Build the k-mer index of a reference and report on it
    Kmers {
        /// Reference FASTA file (first record is used)
        reference: String,
        #[arg(short = 'k', long = "kmer-size", default_value_t = 8)]
        kmer_size: usize,
        /// Print the positions of this k-mer only
        #[arg(long)]
        kmer: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Map {
            reference,
            reads,
            kmer_size,
            max_mismatches,
            threads,
            json,
            out,
        } => {
            let opt = MapOpt {
                kmer_size,
                max_mismatches,
                threads,
            };
            run_map(&reference, &reads, opt, json, out.as_deref())
        }
        Commands::Kmers {
            reference,
            kmer_size,
            kmer,
        } => run_kmers(&reference, kmer_size, kmer.as_deref()),
    }
}

fn load_reference(path: &str) -> Result<Reference> {
    let mut refs: Vec<Reference> = fasta::read_fasta(path)
        .with_context(|| format!("cannot load reference FASTA '{}'", path))?;
    if refs.is_empty() {
        anyhow::bail!("FASTA file '{}' contains no sequences", path);
    }
    if refs.len() > 1 {
        log::warn!(
            "'{}' holds {} records, only '{}' is used",
            path,
            refs.len(),
            refs[0].name()
        );
    }
    Ok(refs.swap_remove(0))
}

fn run_map(
    reference_path: &str,
    reads_path: &str,
    opt: MapOpt,
    json: bool,
    out_path: Option<&str>,
) -> Result<()> {
    let mut reference = load_reference(reference_path)?;
    let reads: Vec<Read> = fasta::read_fasta(reads_path)
        .with_context(|| format!("cannot load reads FASTA '{}'", reads_path))?;

    let mut out: Box<dyn Write> = if let Some(p) = out_path {
        let fh = std::fs::File::create(p).with_context(|| format!("cannot create '{}'", p))?;
        Box::new(std::io::BufWriter::new(fh))
    } else {
        Box::new(std::io::BufWriter::new(std::io::stdout()))
    };

    let mapping = align::map_reads_with_opt(&reads, &mut reference, &opt)?;

    if json {
        let summary = mapping.summary();
        serde_json::to_writer_pretty(&mut out, &summary)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", mapping)?;
    }
    out.flush()?;
    Ok(())
}

fn run_kmers(reference_path: &str, kmer_size: usize, kmer: Option<&str>) -> Result<()> {
    let mut reference = load_reference(reference_path)?;
    let header = reference.sequence().to_string();
    let ref_len = reference.len();
    let idx = reference.calculate_kmers(kmer_size)?;

    match kmer {
        Some(s) => {
            if s.len() != kmer_size {
                log::warn!(
                    "k-mer '{}' has length {}, index was built with k={}",
                    s,
                    s.len(),
                    kmer_size
                );
            }
            let positions = idx.positions(s.as_bytes());
            let joined: Vec<String> = positions.iter().map(ToString::to_string).collect();
            println!("{}\t{}\t{}", s, positions.len(), joined.join(","));
        }
        None => {
            println!("reference: {}", header);
            println!("length: {}", ref_len);
            println!("k: {}", kmer_size);
            println!("windows: {}", idx.total_windows());
            println!("distinct_kmers: {}", idx.len());
        }
    }
    Ok(())
}
