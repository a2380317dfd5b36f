//! Immutable conversion settings.
//!
//! Built once (usually from command-line flags) and handed to
//! [`Converter::new`](crate::Converter::new); nothing is read from global
//! state afterwards.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::{is_ambiguous, GAP};
use crate::ConversionError;

/// Output rendering for a record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One tab-separated gVCF line per non-reference record.
    #[default]
    Gvcf,
    /// One comma-separated line for the whole record list.
    Compact,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Gvcf => f.write_str("gvcf"),
            OutputFormat::Compact => f.write_str("compact"),
        }
    }
}

/// Which pairwise alignment the external aligner runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignMode {
    /// Affine global (Needleman-Wunsch style) alignment.
    #[default]
    Global,
    /// Semi-global alignment fitting the alternate inside the reference.
    ///
    /// Reference flanks outside the fitted window produce no records; record
    /// positions are still raw reference offsets.
    Fitted,
}

/// Substitution and gap scores for the aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringParams {
    /// Score for identical bases.
    pub match_score: i32,
    /// Score for differing bases.
    pub mismatch_score: i32,
    /// Score for any column involving `n` or `x`.
    pub ambiguity_score: i32,
    /// Cost of opening a gap (non-positive).
    pub gap_open: i32,
    /// Cost of each gap position (non-positive).
    pub gap_extend: i32,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            match_score: 1,
            mismatch_score: -1,
            ambiguity_score: 0,
            gap_open: -5,
            gap_extend: -1,
        }
    }
}

impl ScoringParams {
    /// Score a pair of raw bytes, case-insensitively.
    pub fn score(&self, a: u8, b: u8) -> i32 {
        let (a, b) = (a.to_ascii_lowercase(), b.to_ascii_lowercase());
        if a == GAP || b == GAP {
            return if a == b { 0 } else { self.mismatch_score };
        }
        if is_masked(a) || is_masked(b) {
            return self.ambiguity_score;
        }
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }

    fn validate(&self) -> Result<(), ConversionError> {
        if self.gap_open > 0 || self.gap_extend > 0 {
            return Err(ConversionError::InvalidConfiguration(format!(
                "gap penalties must be <= 0 (open {}, extend {})",
                self.gap_open, self.gap_extend
            )));
        }
        Ok(())
    }
}

fn is_masked(byte: u8) -> bool {
    is_ambiguous(byte) || byte == b'x'
}

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Chromosome label written in the first gVCF column.
    pub chrom: Arc<str>,
    /// Left-normalize indels before extraction.
    pub normalize: bool,
    /// Output rendering.
    pub format: OutputFormat,
    /// Alignment flavour requested from the aligner.
    pub align_mode: AlignMode,
    /// Aligner scores.
    pub scoring: ScoringParams,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            chrom: Arc::from("Un"),
            normalize: true,
            format: OutputFormat::default(),
            align_mode: AlignMode::default(),
            scoring: ScoringParams::default(),
        }
    }
}

impl ConversionConfig {
    /// Set the chromosome label.
    pub fn with_chrom(mut self, chrom: impl Into<Arc<str>>) -> Self {
        self.chrom = chrom.into();
        self
    }

    /// Enable or disable indel normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Select the output rendering.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Select the alignment flavour.
    pub fn with_align_mode(mut self, align_mode: AlignMode) -> Self {
        self.align_mode = align_mode;
        self
    }

    /// Replace the aligner scores.
    pub fn with_scoring(mut self, scoring: ScoringParams) -> Self {
        self.scoring = scoring;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConversionError> {
        self.scoring.validate()
    }
}
