use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use orf_refine::cli;
use orf_refine::codon::GeneticCode;
use orf_refine::config::RefineConfig;
use orf_refine::fasta::read_fasta_path;
use orf_refine::orf::read_orf_table;
use orf_refine::pipeline::refine;
use orf_refine::sequence::SequenceStore;

#[derive(Parser)]
#[command(
    name = "refine_db",
    about = "Collapse ORFs encoding identical proteins into a refined protein database"
)]
struct Cli {
    /// ORF coordinate table (TSV)
    #[arg(short = 'i', long = "orfs")]
    orfs: PathBuf,

    /// Transcript sequences (FASTA, optionally gzip-compressed)
    #[arg(short = 'f', long = "pb_fasta")]
    pb_fasta: PathBuf,

    /// Sample name used as the output file prefix
    #[arg(short = 'n', long = "name")]
    name: String,

    /// Drop ORFs with a coding score below this value
    #[arg(short = 'c', long = "coding_score_cutoff")]
    coding_score_cutoff: Option<f64>,

    /// Optional JSON configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long = "out-dir", default_value = ".")]
    out_dir: PathBuf,

    /// Translate with the vertebrate mitochondrial code
    #[arg(long = "mitochondrial")]
    mitochondrial: bool,

    /// Keep ORFs without a stop codon
    #[arg(long = "no-require-stop")]
    no_require_stop: bool,

    /// Also write <name>_combined.tsv (protein sequence to merged accession)
    #[arg(long = "combined")]
    combined: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<RefineConfig> {
        let mut config = match &self.config {
            Some(path) => RefineConfig::from_file(path)?,
            None => RefineConfig::default(),
        };
        if let Some(cutoff) = self.coding_score_cutoff {
            config.coding_score_cutoff = cutoff;
        }
        if self.mitochondrial {
            config.codon_table = GeneticCode::Mitochondrial;
        }
        if self.no_require_stop {
            config.require_stop_codon = false;
        }
        if self.combined {
            config.write_combined = true;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Refine ORF Database");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = cli_args.resolve_config()?;
    cli::kv("ORFs", &cli_args.orfs.display().to_string());
    cli::kv("Transcripts", &cli_args.pb_fasta.display().to_string());
    cli::kv("Coding score cutoff", &config.coding_score_cutoff.to_string());
    cli::kv("Require stop codon", &config.require_stop_codon.to_string());
    cli::kv("Codon table", &config.codon_table.to_string());

    fs::create_dir_all(&cli_args.out_dir)
        .with_context(|| format!("failed to create directory: {}", cli_args.out_dir.display()))?;
    let output = |suffix: &str| cli_args.out_dir.join(format!("{}_{suffix}", cli_args.name));
    let fasta_path = output("orf_refined.fasta");
    let table_path = output("orf_refined.tsv");
    let combined_path = output("combined.tsv");

    eprintln!();

    // ── Parsing ──────────────────────────────────────────
    cli::section("Parsing");

    let records = read_fasta_path(&cli_args.pb_fasta).with_context(|| {
        format!(
            "failed to read transcript FASTA: {}",
            cli_args.pb_fasta.display()
        )
    })?;
    let store = SequenceStore::load(records);
    cli::kv("Transcripts", &format!("{} sequences", store.len()));
    if !store.redundant().is_empty() {
        cli::kv(
            "Redundant",
            &format!("{} duplicate accessions dropped", store.redundant().len()),
        );
    }

    let orf_file = File::open(&cli_args.orfs)
        .with_context(|| format!("failed to open ORF table: {}", cli_args.orfs.display()))?;
    let orfs = read_orf_table(orf_file)
        .with_context(|| format!("failed to parse ORF table: {}", cli_args.orfs.display()))?;
    cli::kv("ORF rows", &orfs.records.len().to_string());

    eprintln!();

    // ── Collapsing ───────────────────────────────────────
    cli::section("Collapsing");

    let refinement = refine(
        &store,
        &orfs,
        &config.admission_filter(),
        &config.codon_table.table(),
    )?;
    let stats = &refinement.stats;

    cli::kv("Admitted", &stats.num_admitted.to_string());
    cli::kv("Below cutoff", &stats.num_dropped_by_score.to_string());
    cli::kv("No stop codon", &stats.num_dropped_without_stop.to_string());
    cli::kv("Distinct proteins", &stats.num_groups.to_string());
    cli::kv("Collapsed isoforms", &stats.num_collapsed_isoforms.to_string());
    if stats.num_duplicate_orf_rows > 0 {
        cli::kv("Duplicate ORF rows", &stats.num_duplicate_orf_rows.to_string());
    }
    if stats.num_unrecognized_accessions > 0 {
        cli::kv(
            "Unrecognized",
            &format!(
                "{} accessions not in PB.<gene>.<isoform> form",
                stats.num_unrecognized_accessions
            )
            .yellow()
            .to_string(),
        );
    }
    if stats.num_unordered_groups > 0 {
        cli::kv(
            "Unordered groups",
            &format!(
                "{} with no PB.<gene>.<isoform> member",
                stats.num_unordered_groups
            )
            .yellow()
            .to_string(),
        );
    }
    if stats.num_skipped_groups > 0 {
        cli::kv("Skipped groups", &stats.num_skipped_groups.to_string());
    }
    if stats.num_metadata_fallbacks > 0 {
        cli::kv("Metadata fallbacks", &stats.num_metadata_fallbacks.to_string());
    }

    eprintln!();

    // ── Writing ──────────────────────────────────────────
    cli::section("Writing");

    let database = refinement.database()?;
    write_output(&fasta_path, &database.fasta)?;
    write_output(&table_path, &database.table)?;
    if config.write_combined {
        write_output(&combined_path, &refinement.combined()?)?;
    }
    cli::success(&format!(
        "{} protein entries",
        refinement.records.len().to_string().bold()
    ));

    // ── Summary ──────────────────────────────────────────
    cli::print_summary(start);
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    cli::kv("Output", &path.display().to_string());
    Ok(())
}
