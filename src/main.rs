use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bio::io::fasta;
use clap::{Parser, ValueEnum};
use pairwise_gvcf::{AlignMode, ConversionConfig, Converter, OutputFormat, ScoringParams};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pairwise-gvcf",
    version,
    about = "Align two sequences and print normalized gVCF (or compact) variant records"
)]
struct Cli {
    /// Reference sequence file (FASTA or raw sequence).
    #[arg(short = 'r', long = "ref")]
    reference: PathBuf,
    /// Alternate sequence file (FASTA or raw sequence).
    #[arg(short = 's', long = "seq")]
    sequence: PathBuf,
    /// Chromosome name written in gVCF output.
    #[arg(short = 'c', long, default_value = "Un")]
    chrom: String,
    /// Alignment to use when the pair needs one.
    #[arg(short = 'A', long = "align-type", value_enum, default_value_t = AlignArg::Global)]
    align_type: AlignArg,
    /// Output format.
    #[arg(short = 'F', long = "output-format", value_enum, default_value_t = FormatArg::Gvcf)]
    output_format: FormatArg,
    /// Keep indels where the aligner placed them.
    #[arg(short = 'Z', long = "no-normalize")]
    no_normalize: bool,
    /// Gap open penalty (initial cost of gap creation).
    #[arg(short = 'g', long, default_value_t = -5, allow_negative_numbers = true)]
    gap_open: i32,
    /// Gap extension penalty (per gap position).
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    gap_extend: i32,
    /// Score for matching bases.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    match_score: i32,
    /// Score for mismatching bases.
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    mismatch_score: i32,
    /// Score for any column involving `n` or `x`.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    ambiguity_score: i32,
    /// Log pipeline stages and records to stderr.
    #[arg(short = 'V', long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AlignArg {
    /// Global affine alignment.
    Global,
    /// Fit the alternate inside the reference.
    Fitted,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    /// One gVCF line per variant.
    Gvcf,
    /// Single comma-separated line.
    Compact,
}

impl Cli {
    fn config(&self) -> ConversionConfig {
        let align_mode = match self.align_type {
            AlignArg::Global => AlignMode::Global,
            AlignArg::Fitted => AlignMode::Fitted,
        };
        let format = match self.output_format {
            FormatArg::Gvcf => OutputFormat::Gvcf,
            FormatArg::Compact => OutputFormat::Compact,
        };
        let scoring = ScoringParams {
            match_score: self.match_score,
            mismatch_score: self.mismatch_score,
            ambiguity_score: self.ambiguity_score,
            gap_open: self.gap_open,
            gap_extend: self.gap_extend,
        };

        ConversionConfig::default()
            .with_chrom(self.chrom.as_str())
            .with_normalize(!self.no_normalize)
            .with_format(format)
            .with_align_mode(align_mode)
            .with_scoring(scoring)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config();
    debug!(?config, "configuration");
    let converter = Converter::new(config).context("invalid configuration")?;

    let reference = read_sequence_file(&cli.reference)
        .with_context(|| format!("failed to read reference from {}", cli.reference.display()))?;
    let alternate = read_sequence_file(&cli.sequence)
        .with_context(|| format!("failed to read sequence from {}", cli.sequence.display()))?;

    let records = converter
        .convert(&reference, &alternate)
        .context("conversion failed")?;
    for record in &records {
        debug!(%record, "record");
    }

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if !records.is_empty() {
        converter.write(&mut writer, &records)?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read one sequence: the first FASTA record when the file has a header,
/// otherwise every line joined. Bases are lowercased.
fn read_sequence_file(path: &Path) -> Result<Vec<u8>> {
    let contents = std::fs::read_to_string(path)?;
    let is_fasta = contents
        .lines()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|line| line.starts_with('>'));

    let mut sequence = if is_fasta {
        let record = fasta::Reader::new(contents.trim_start().as_bytes())
            .records()
            .next()
            .context("FASTA file has no records")??;
        record.seq().to_vec()
    } else {
        contents.lines().flat_map(|line| line.trim().bytes()).collect()
    };
    sequence.make_ascii_lowercase();
    Ok(sequence)
}
