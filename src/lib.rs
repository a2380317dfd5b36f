//! # Pairwise sequence to gVCF conversion
//!
//! Turns a reference sequence and an alternate sequence into a minimal,
//! normalized list of variant records, then renders them as gVCF lines or as
//! a single compact line.
//!
//! ## Pipeline
//!
//! 1. **Fast path**: equal-length pairs whose columns all agree (up to the
//!    ambiguity code) skip alignment entirely.
//! 2. **Alignment**: an external [`PairwiseAligner`] produces two gapped rows,
//!    which are wrapped in start/end sentinel columns.
//! 3. **Normalization**: indel gap runs are shifted to their leftmost
//!    equivalent position ([`normalize_pair`]).
//! 4. **Extraction**: a column-by-column state machine groups runs of
//!    identical call type into [`VariantRecord`]s ([`extract_variants`]).
//! 5. **Emission**: records become gVCF or compact output ([`emit`]).
//!
//! ## Usage Example
//!
//! ```ignore
//! use pairwise_gvcf::{ConversionConfig, Converter};
//!
//! let converter = Converter::new(ConversionConfig::default().with_chrom("chr1"))?;
//! let records = converter.convert(b"gcatgcatg", b"gcatg")?;
//! print!("{}", converter.render(&records)?);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod aligner; // Aligner seam and rust-bio adapter
pub mod alphabet; // Gap/ambiguity alphabet and equality
pub mod config; // Immutable conversion settings
pub mod diff; // Column state machine
pub mod emit; // gVCF and compact renderings
pub mod fast_path; // Alignment-free shortcut
pub mod normalize; // Indel left-normalization
pub mod record; // Variant record model

pub use aligner::{AlignedPair, AlignerError, BioAligner, PairwiseAligner};
pub use alphabet::bases_equal;
pub use config::{AlignMode, ConversionConfig, OutputFormat, ScoringParams};
pub use diff::{empty_sequence_record, extract_variants, DiffExtractor};
pub use fast_path::{extract_direct, is_fast_path};
pub use normalize::normalize_pair;
pub use record::{VariantKind, VariantRecord};

use std::io::Write;

use thiserror::Error;
use tracing::debug;

/// Errors that abort a single conversion.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Configuration rejected before any work starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Two rows that must line up column for column do not.
    #[error("sequences have different lengths: reference {reference}, alternate {alternate}")]
    LengthMismatch {
        /// Reference row length.
        reference: usize,
        /// Alternate row length.
        alternate: usize,
    },

    /// A column matched none of the classification rules.
    #[error("cannot classify column {column}: reference '{reference}', alternate '{alternate}'")]
    InvalidClassification {
        /// 0-based alignment column.
        column: usize,
        /// Reference byte in that column.
        reference: char,
        /// Alternate byte in that column.
        alternate: char,
    },

    /// The aligner could not align the inputs.
    #[error("alignment failed: {0}")]
    Alignment(#[from] AlignerError),
}

/// Conversion orchestrator.
///
/// Holds the immutable configuration and the aligner; every call to
/// [`Converter::convert`] is independent.
#[derive(Debug)]
pub struct Converter<A = BioAligner> {
    config: ConversionConfig,
    aligner: A,
}

impl Converter<BioAligner> {
    /// Create a converter backed by the rust-bio aligner.
    pub fn new(config: ConversionConfig) -> Result<Self, ConversionError> {
        let aligner = BioAligner::new(config.align_mode, config.scoring);
        Self::with_aligner(config, aligner)
    }
}

impl<A: PairwiseAligner> Converter<A> {
    /// Create a converter with a caller-supplied aligner.
    pub fn with_aligner(config: ConversionConfig, aligner: A) -> Result<Self, ConversionError> {
        config.validate()?;
        Ok(Self { config, aligner })
    }

    /// Active configuration.
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert a raw reference/alternate pair into ordered records.
    pub fn convert(
        &self,
        reference: &[u8],
        alternate: &[u8],
    ) -> Result<Vec<VariantRecord>, ConversionError> {
        if reference.is_empty() && alternate.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(record) = empty_sequence_record(reference, alternate) {
            debug!("one sequence is empty, skipping alignment");
            return Ok(vec![record]);
        }

        // The fast path only feeds the gVCF renderer.
        if self.config.format == OutputFormat::Gvcf && is_fast_path(reference, alternate) {
            return extract_direct(reference, alternate);
        }

        let pair = self.aligner.align(reference, alternate)?;
        self.convert_aligned(pair)
    }

    /// Normalize (if enabled) and extract records from an already aligned
    /// pair.
    ///
    /// Reference positions are raw offsets even when the pair covers only a
    /// window of the reference; clipped flanks produce no records.
    pub fn convert_aligned(&self, pair: AlignedPair) -> Result<Vec<VariantRecord>, ConversionError> {
        let window_start = pair.reference_start();
        let window_anchor = pair.reference_anchor();
        let (mut reference, mut alternate) = pair.into_anchored();
        debug!(
            reference = %String::from_utf8_lossy(&reference),
            alternate = %String::from_utf8_lossy(&alternate),
            "aligned rows"
        );

        // The end sentinel takes part in normalization; the start sentinel
        // never does.
        if self.config.normalize {
            normalize_pair(&mut reference[1..], &mut alternate[1..])?;
            debug!(
                reference = %String::from_utf8_lossy(&reference),
                alternate = %String::from_utf8_lossy(&alternate),
                "normalized rows"
            );
        }

        let end = reference.len() - 1;
        let mut records = extract_variants(&reference[1..end], &alternate[1..end])?;
        if window_start > 0 {
            debug!(window_start, "shifting records to raw reference offsets");
            for record in &mut records {
                shift_to_window(record, window_start, window_anchor);
            }
        }
        Ok(records)
    }

    /// Render records in the configured output format.
    pub fn render(&self, records: &[VariantRecord]) -> anyhow::Result<String> {
        emit::render_records(records, &self.config)
    }

    /// Write records in the configured output format.
    pub fn write<W: Write>(&self, writer: &mut W, records: &[VariantRecord]) -> anyhow::Result<()> {
        emit::write_records(writer, records, &self.config)
    }
}

/// Move a record extracted from a reference window to raw coordinates. A
/// record at the window start takes the base before the window as its prefix.
fn shift_to_window(record: &mut VariantRecord, start: usize, anchor: Option<u8>) {
    record.ref_pos += start;
    if record.ref_prefix.is_none() && anchor.is_some() {
        record.ref_prefix = anchor;
        record.ref_suffix = None;
    }
}
